//! One catalog section to verify, with its filters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shelfcheck_core::{build_filters, Filter, FilterSpec};
use std::sync::Arc;

use crate::error::{ConfigError, Result};

/// A catalog section and the filters to check it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Scenario {
    /// Label used in output, `--scenario` and the evidence directory
    pub name: String,

    /// Catalog category to hover (e.g. "Ноутбуки и компьютеры")
    pub catalog_section: String,

    /// Section of that category to open (e.g. "Ноутбуки")
    pub section_item: String,

    /// Filters to apply, in order
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

impl Scenario {
    /// Validates the filter definitions and builds them, preserving order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` naming the first bad filter.
    pub fn build_filters(&self) -> Result<Vec<Arc<dyn Filter>>> {
        build_filters(&self.filters).map_err(|e| {
            ConfigError::InvalidValue {
                field: format!("scenarios.{}.filters", self.name),
                value: e.name,
                hint: e.reason,
            }
            .into()
        })
    }

    /// Directory name for this scenario's evidence.
    ///
    /// Letters and digits are kept (Cyrillic included), every other run of
    /// characters becomes a single `-`.
    #[must_use]
    pub fn evidence_dir_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_alphanumeric() {
                out.extend(c.to_lowercase());
            } else if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        }
        let trimmed = out.trim_end_matches('-');
        if trimmed.is_empty() {
            "scenario".to_string()
        } else {
            trimmed.to_string()
        }
    }
}
