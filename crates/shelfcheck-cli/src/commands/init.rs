//! Init command implementation.
//!
//! Writes an example configuration into the current directory.

use crate::cli::{ConfigFormat, InitArgs};
use crate::config::ShelfConfig;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use std::path::{Path, PathBuf};

/// Execute the init command.
///
/// # Errors
///
/// Returns `InvalidArgument` when the file exists and `--force` was not
/// given, or an I/O error when it cannot be written.
pub async fn execute(args: InitArgs) -> Result<()> {
    let path = write_config(Path::new("."), args.format, args.force)?;

    ui::success(&format!("Created {}", path.display()));
    ui::info("Next steps:");
    ui::info("  shelfcheck check    validate the configuration");
    ui::info("  shelfcheck verify   run the scenario in Chrome");
    Ok(())
}

/// Writes the example configuration into `dir`.
fn write_config(dir: &Path, format: ConfigFormat, force: bool) -> Result<PathBuf> {
    let path = dir.join(format.file_name());
    if path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let content = match format {
        ConfigFormat::Json => ShelfConfig::example_config()?,
        ConfigFormat::Toml => ShelfConfig::example_config_toml()?,
    };
    std::fs::write(&path, content).with_path(&path)?;
    Ok(path)
}
