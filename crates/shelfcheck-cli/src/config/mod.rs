//! Configuration for a verification run, merged from several sources.
//!
//! Priority: CLI > Environment (`SHELFCHECK_*`) > File > Defaults

mod defaults;
mod loading;
mod scenario;
mod tests;
mod validation;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shelfcheck_browser::{BrowserConfig, CatalogLocators, WaitConfig};
use shelfcheck_core::FilterSpec;
use std::path::PathBuf;
use std::time::Duration;

pub use defaults::*;
pub use loading::{discover_config, ConfigOverrides, CONFIG_FILES, ENV_PREFIX};
pub use scenario::Scenario;

use crate::error::{CliError, Result};

/// Shelfcheck configuration, loaded from shelfcheck.json / shelfcheck.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShelfConfig {
    /// Marketplace start page
    pub target_url: String,

    /// Text the start page title must contain
    #[serde(default = "default_expected_title")]
    pub expected_title: String,

    /// Wall-clock budget for the page traversal, in whole minutes
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,

    /// The filtered first page must show more products than this
    #[serde(default = "default_min_products")]
    pub min_products: usize,

    /// Run Chrome without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Browser window width in pixels
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Browser window height in pixels
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Chrome executable (auto-detected when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// Ceiling for any single browser wait, in seconds
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Where screenshots of mismatching products are written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_dir: Option<PathBuf>,

    /// Catalog sections to verify, run one after another
    #[serde(default)]
    pub scenarios: Vec<Scenario>,

    /// Page selectors, for when the marketplace markup changes
    #[serde(default, skip_serializing_if = "is_default_locators")]
    pub locators: CatalogLocators,
}

fn is_default_locators(locators: &CatalogLocators) -> bool {
    *locators == CatalogLocators::default()
}

impl ShelfConfig {
    /// Generate JSON Schema for shelfcheck.json.
    #[must_use]
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(ShelfConfig);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Notebooks from HUAWEI or Lenovo and Apple smartphones, both priced
    /// 10 000 to 90 000.
    #[must_use]
    pub fn example() -> Self {
        let price = || FilterSpec::Range {
            name: "Цена".to_string(),
            min: 10_000,
            max: 90_000,
        };
        let vendors = |values: &[&str]| FilterSpec::MultiValue {
            name: "Производитель".to_string(),
            values: values.iter().map(ToString::to_string).collect(),
        };

        Self {
            target_url: "https://market.yandex.ru".to_string(),
            expected_title: default_expected_title(),
            scenarios: vec![
                Scenario {
                    name: "Notebooks".to_string(),
                    catalog_section: "Ноутбуки и компьютеры".to_string(),
                    section_item: "Ноутбуки".to_string(),
                    filters: vec![price(), vendors(&["HUAWEI", "Lenovo"])],
                },
                Scenario {
                    name: "Smartphones".to_string(),
                    catalog_section: "Электроника".to_string(),
                    section_item: "Смартфоны".to_string(),
                    filters: vec![price(), vendors(&["Apple"])],
                },
            ],
            timeout_minutes: default_timeout_minutes(),
            min_products: default_min_products(),
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            chrome_path: None,
            wait_timeout_secs: default_wait_timeout_secs(),
            evidence_dir: Some(PathBuf::from("evidence")),
            locators: CatalogLocators::default(),
        }
    }

    /// Generate example shelfcheck.json content.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if serialization fails.
    pub fn example_config() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::example())?)
    }

    /// Generate example shelfcheck.toml content.
    ///
    /// # Errors
    ///
    /// Returns a TOML error if serialization fails.
    pub fn example_config_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::example())?)
    }

    /// The scenarios named in `names`, in config order; all of them when
    /// `names` is empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a name no scenario has.
    pub fn select_scenarios(&self, names: &[String]) -> Result<Vec<&Scenario>> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.scenarios.iter().any(|s| &s.name == *name))
        {
            let known: Vec<&str> = self.scenarios.iter().map(|s| s.name.as_str()).collect();
            return Err(CliError::InvalidArgument(format!(
                "no scenario named '{unknown}' (available: {})",
                known.join(", ")
            )));
        }

        Ok(self
            .scenarios
            .iter()
            .filter(|s| names.is_empty() || names.contains(&s.name))
            .collect())
    }

    /// Ceiling for browser waits.
    #[must_use]
    pub fn wait_config(&self) -> WaitConfig {
        WaitConfig::with_timeout(Duration::from_secs(self.wait_timeout_secs))
    }

    /// Chrome launch settings.
    #[must_use]
    pub fn browser_config(&self) -> BrowserConfig {
        let mut config = BrowserConfig::new()
            .with_window_size(self.window_width, self.window_height)
            .with_wait(self.wait_config());
        config.headless = self.headless;
        if let Some(path) = &self.chrome_path {
            config = config.with_chrome_path(path.clone());
        }
        config
    }
}
