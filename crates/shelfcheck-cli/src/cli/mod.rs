//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `shelfcheck verify` - run the catalog scenario in Chrome
//! - `shelfcheck check` - validate configuration without a browser
//! - `shelfcheck init` - write an example configuration

mod commands;
pub mod enums;
mod tests;

use clap::Parser;

pub use commands::{CheckArgs, Command, InitArgs, VerifyArgs};
pub use enums::ConfigFormat;

/// Shelfcheck - verify that catalog filters really filter
#[derive(Parser, Debug)]
#[command(
    name = "shelfcheck",
    version,
    about = "Verify that a marketplace catalog honors its filters",
    long_about = "Shelfcheck drives Chrome through a marketplace catalog, applies filters,\n\
                  and checks every product on every result page against them."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows every product as it is checked and every wait the browser
    /// driver performs.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
