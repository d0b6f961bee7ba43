use crate::config::{Scenario, ShelfConfig};
use crate::error::{ConfigError, Result};
use std::collections::HashSet;

fn require(field: &str, value: &str, hint: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: field.to_string(),
            hint: hint.to_string(),
        }
        .into());
    }
    Ok(())
}

fn validate_scenario(scenario: &Scenario) -> Result<()> {
    require("scenarios.name", &scenario.name, "Give every scenario a name")?;

    let field = |name: &str| format!("scenarios.{}.{name}", scenario.name);
    require(
        &field("catalogSection"),
        &scenario.catalog_section,
        "Name the catalog category to hover, e.g. \"Электроника\"",
    )?;
    require(
        &field("sectionItem"),
        &scenario.section_item,
        "Name the category section to open, e.g. \"Смартфоны\"",
    )?;

    if scenario.filters.is_empty() {
        return Err(ConfigError::MissingField {
            field: field("filters"),
            hint: "Add at least one range or multiValue filter".to_string(),
        }
        .into());
    }
    scenario.build_filters()?;
    Ok(())
}

impl ShelfConfig {
    /// Validate configuration for logical consistency.
    ///
    /// # Errors
    ///
    /// Returns the first `MissingField` or `InvalidValue` found.
    pub fn validate(&self) -> Result<()> {
        require("targetUrl", &self.target_url, "Set the marketplace start page")?;

        if !(self.target_url.starts_with("http://") || self.target_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "targetUrl".to_string(),
                value: self.target_url.clone(),
                hint: "Use an absolute http(s) URL".to_string(),
            }
            .into());
        }

        if self.scenarios.is_empty() {
            return Err(ConfigError::MissingField {
                field: "scenarios".to_string(),
                hint: "Add at least one scenario with a catalogSection, sectionItem and filters"
                    .to_string(),
            }
            .into());
        }

        let mut names = HashSet::new();
        for scenario in &self.scenarios {
            validate_scenario(scenario)?;
            if !names.insert(scenario.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "scenarios.name".to_string(),
                    value: scenario.name.clone(),
                    hint: "Scenario names must be unique".to_string(),
                }
                .into());
            }
        }

        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "windowWidth/windowHeight".to_string(),
                value: format!("{}x{}", self.window_width, self.window_height),
                hint: "Window size must be non-zero".to_string(),
            }
            .into());
        }

        if self.wait_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "waitTimeoutSecs".to_string(),
                value: "0".to_string(),
                hint: "Browser waits need at least one second".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
