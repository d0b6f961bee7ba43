use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::ConfigFormat;

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the catalog verification scenario
    ///
    /// For each configured scenario: opens the site, navigates to its catalog
    /// section, applies its filters and checks every product on every result
    /// page. Then searches for the first product by title and expects to
    /// find it. Scenarios run one after another in a fresh tab each.
    Verify(VerifyArgs),

    /// Validate configuration
    ///
    /// Loads shelfcheck.json (or .toml), validates it and lists the filters
    /// that `verify` would apply. No browser is started.
    Check(CheckArgs),

    /// Write an example configuration file
    Init(InitArgs),
}

/// Arguments for the verify command
#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Path to the configuration file
    ///
    /// Defaults to shelfcheck.json or shelfcheck.toml in the current
    /// directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Site to open, overriding targetUrl
    #[arg(long, value_name = "URL")]
    pub target_url: Option<String>,

    /// Wall-clock budget for the page traversal, in minutes
    #[arg(long, value_name = "MINUTES")]
    pub timeout_minutes: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Directory for screenshots of mismatching products
    #[arg(long, value_name = "DIR")]
    pub evidence_dir: Option<PathBuf>,

    /// Run only the named scenario (repeatable)
    #[arg(short, long = "scenario", value_name = "NAME")]
    pub scenarios: Vec<String>,
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the JSON Schema of the configuration file and exit
    #[arg(long)]
    pub schema: bool,
}

/// Arguments for the init command
#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// File format to write
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ConfigFormat,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}
