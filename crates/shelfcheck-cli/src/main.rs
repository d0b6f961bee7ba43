//! Shelfcheck CLI - verifies that catalog filters really filter.
//!
//! Parses arguments, sets up logging and colors, then dispatches to the
//! command implementations.

use clap::Parser;
use miette::Result;
use shelfcheck_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Verify(verify_args) => commands::verify_execute(verify_args).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args).await,
        cli::Command::Init(init_args) => commands::init_execute(init_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
