//! Check command implementation.
//!
//! Validates configuration without starting a browser.

use crate::cli::CheckArgs;
use crate::config::{discover_config, ConfigOverrides, ShelfConfig};
use crate::error::Result;
use crate::ui;
use std::path::Path;

/// Execute the check command.
///
/// With `--schema`, prints the JSON Schema to stdout and returns without
/// reading any configuration.
///
/// # Errors
///
/// Returns errors for missing, malformed or invalid configuration.
pub async fn execute(args: CheckArgs) -> Result<()> {
    if args.schema {
        println!("{}", serde_json::to_string_pretty(&ShelfConfig::json_schema())?);
        return Ok(());
    }

    ui::info("Checking configuration...");
    match args.config.as_deref() {
        Some(path) => ui::info(&format!("Using {}", path.display())),
        None => match discover_config(Path::new(".")) {
            Some(path) => ui::info(&format!("Using {}", path.display())),
            None => ui::warning("No shelfcheck.json or shelfcheck.toml found, reading environment only"),
        },
    }

    let config = ShelfConfig::load(args.config.as_deref(), &ConfigOverrides::default())?;
    config.validate()?;
    ui::success("Configuration is valid!");

    ui::info(&format!("Target: {}", config.target_url));
    for scenario in &config.scenarios {
        ui::info(&format!(
            "Scenario '{}': {} / {}",
            scenario.name, scenario.catalog_section, scenario.section_item
        ));
        for filter in scenario.build_filters()? {
            ui::info(&format!("  {}", filter.describe()));
        }
    }

    for warning in warnings(&config) {
        ui::warning(&warning);
    }

    ui::success("All checks passed!");
    Ok(())
}

/// Settings that are valid but probably not intended.
fn warnings(config: &ShelfConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.timeout_minutes == 0 {
        warnings.push(
            "timeoutMinutes is 0: verification stops at the first page transition".to_string(),
        );
    }

    if config.min_products == 0 {
        warnings.push("minProducts is 0: an empty result page still passes".to_string());
    }

    if config.evidence_dir.is_none() {
        warnings.push("evidenceDir is not set: mismatch screenshots will not be saved".to_string());
    }

    if !config.headless && std::env::var_os("CI").is_some() {
        warnings.push("headless is false on CI".to_string());
    }

    warnings
}
