//! Catalog filters: predicates over products that also know how to put
//! themselves into the UI.
//!
//! Each variant implements [`Filter`] on its own. The evaluator and the
//! traversal engine only ever see `dyn Filter`, so a new variant is a new
//! type plus a new `FilterSpec` arm and nothing else.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::driver::PageDriver;
use crate::error::Result;
use crate::product::Product;

/// A predicate over products, applied to the page before traversal.
#[async_trait]
pub trait Filter: Send + Sync + fmt::Debug {
    /// Filter name as shown in the UI (e.g. "Цена").
    fn name(&self) -> &str;

    /// Short stable tag for logs and reports.
    fn kind(&self) -> &'static str;

    /// Returns true if `product` satisfies this filter. Pure.
    fn matches(&self, product: &Product) -> bool;

    /// Human-readable form used in failure messages.
    fn describe(&self) -> String;

    /// Puts the page into the state this filter describes.
    async fn apply(&self, driver: &mut dyn PageDriver) -> Result<()>;
}

/// Inclusive integer range over the product price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFilter {
    name: String,
    min: i64,
    max: i64,
}

impl RangeFilter {
    /// Creates a range filter with inclusive bounds.
    pub fn new(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// Lower bound, inclusive.
    #[must_use]
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Upper bound, inclusive.
    #[must_use]
    pub fn max(&self) -> i64 {
        self.max
    }
}

#[async_trait]
impl Filter for RangeFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "range"
    }

    fn matches(&self, product: &Product) -> bool {
        product.has_price() && (self.min..=self.max).contains(&product.price())
    }

    fn describe(&self) -> String {
        format!("{} [{}..={}]", self.name, self.min, self.max)
    }

    async fn apply(&self, driver: &mut dyn PageDriver) -> Result<()> {
        let control = driver.locate_filter_control(&self.name).await?;
        driver.apply_range_values(&control, self.min, self.max).await
    }
}

/// Matches when the title contains any of several values, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueFilter {
    name: String,
    values: Vec<String>,
    folded: Vec<String>,
}

impl MultiValueFilter {
    /// Creates a multi-value filter. Order of `values` is preserved.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let folded = values.iter().map(|v| v.to_lowercase()).collect();
        Self {
            name: name.into(),
            values,
            folded,
        }
    }

    /// Acceptable values, in the order given.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[async_trait]
impl Filter for MultiValueFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "multi_value"
    }

    fn matches(&self, product: &Product) -> bool {
        let title = product.title().to_lowercase();
        self.folded.iter().any(|value| title.contains(value.as_str()))
    }

    fn describe(&self) -> String {
        format!("{} {{{}}}", self.name, self.values.join(", "))
    }

    async fn apply(&self, driver: &mut dyn PageDriver) -> Result<()> {
        let control = driver.locate_filter_control(&self.name).await?;
        driver.apply_selectable_values(&control, &self.values).await
    }
}

/// Rejected filter definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid filter '{name}': {reason}")]
pub struct InvalidFilter {
    /// Name of the offending filter
    pub name: String,
    /// What is wrong with it
    pub reason: String,
}

/// Serializable filter definition, as found in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
pub enum FilterSpec {
    /// Inclusive price range
    Range {
        /// Filter name as shown in the UI
        name: String,
        /// Lower bound, inclusive
        min: i64,
        /// Upper bound, inclusive
        max: i64,
    },
    /// Title must contain any of the values
    MultiValue {
        /// Filter name as shown in the UI
        name: String,
        /// Acceptable values
        values: Vec<String>,
    },
}

impl FilterSpec {
    /// The filter name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Range { name, .. } | Self::MultiValue { name, .. } => name,
        }
    }

    /// Checks the definition for logical consistency.
    pub fn validate(&self) -> std::result::Result<(), InvalidFilter> {
        let invalid = |reason: &str| InvalidFilter {
            name: self.name().to_string(),
            reason: reason.to_string(),
        };

        if self.name().trim().is_empty() {
            return Err(invalid("name cannot be blank"));
        }

        match self {
            Self::Range { min, max, .. } if min > max => {
                Err(invalid(&format!("min ({min}) is greater than max ({max})")))
            }
            Self::MultiValue { values, .. } if values.is_empty() => {
                Err(invalid("at least one value is required"))
            }
            Self::MultiValue { values, .. } if values.iter().any(|v| v.trim().is_empty()) => {
                Err(invalid("values cannot be blank"))
            }
            _ => Ok(()),
        }
    }

    /// Builds the runtime filter.
    #[must_use]
    pub fn build(&self) -> Arc<dyn Filter> {
        match self {
            Self::Range { name, min, max } => Arc::new(RangeFilter::new(name.clone(), *min, *max)),
            Self::MultiValue { name, values } => {
                Arc::new(MultiValueFilter::new(name.clone(), values.iter().cloned()))
            }
        }
    }
}

/// Validates and builds a list of filter definitions, preserving order.
pub fn build_filters(specs: &[FilterSpec]) -> std::result::Result<Vec<Arc<dyn Filter>>, InvalidFilter> {
    specs
        .iter()
        .map(|spec| spec.validate().map(|()| spec.build()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::UNPARSEABLE_PRICE;

    fn priced(price: i64) -> Product {
        Product::new("Ноутбук", "/p/1", price)
    }

    fn titled(title: &str) -> Product {
        Product::new(title, "/p/1", 100)
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let filter = RangeFilter::new("Цена", 10_000, 90_000);
        assert!(filter.matches(&priced(10_000)));
        assert!(filter.matches(&priced(90_000)));
        assert!(filter.matches(&priced(50_000)));
        assert!(!filter.matches(&priced(9_999)));
        assert!(!filter.matches(&priced(90_001)));
    }

    #[test]
    fn sentinel_price_never_matches_a_range() {
        let filter = RangeFilter::new("Цена", i64::MIN, i64::MAX);
        assert!(!filter.matches(&priced(UNPARSEABLE_PRICE)));
    }

    #[test]
    fn multi_value_is_case_insensitive_substring_any() {
        let filter = MultiValueFilter::new("Производитель", ["HUAWEI", "Lenovo"]);
        assert!(filter.matches(&titled("Ноутбук Huawei MateBook D15")));
        assert!(filter.matches(&titled("LENOVO IdeaPad 3")));
        assert!(filter.matches(&titled("ThinkPad by lenovogroup")));
        assert!(!filter.matches(&titled("Apple MacBook Air")));
    }

    #[test]
    fn multi_value_folds_cyrillic_case() {
        let filter = MultiValueFilter::new("Тип", ["игровой"]);
        assert!(filter.matches(&titled("ИГРОВОЙ ноутбук")));
    }

    #[test]
    fn descriptions_name_bounds_and_values() {
        assert_eq!(RangeFilter::new("Цена", 1, 2).describe(), "Цена [1..=2]");
        assert_eq!(
            MultiValueFilter::new("Производитель", ["HUAWEI", "Lenovo"]).describe(),
            "Производитель {HUAWEI, Lenovo}"
        );
    }

    #[test]
    fn spec_deserializes_from_tagged_json() {
        let specs: Vec<FilterSpec> = serde_json::from_str(
            r#"[
                {"kind": "range", "name": "Цена", "min": 10000, "max": 90000},
                {"kind": "multiValue", "name": "Производитель", "values": ["Apple"]}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            specs[0],
            FilterSpec::Range {
                name: "Цена".to_string(),
                min: 10_000,
                max: 90_000
            }
        );

        let filters = build_filters(&specs).unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].kind(), "range");
        assert_eq!(filters[1].kind(), "multi_value");
        assert_eq!(filters[1].name(), "Производитель");
    }

    #[test]
    fn spec_validation() {
        let inverted = FilterSpec::Range {
            name: "Цена".to_string(),
            min: 5,
            max: 1,
        };
        assert!(inverted.validate().unwrap_err().reason.contains("greater than"));

        let empty = FilterSpec::MultiValue {
            name: "Производитель".to_string(),
            values: vec![],
        };
        assert!(empty.validate().is_err());

        let blank = FilterSpec::Range {
            name: "  ".to_string(),
            min: 1,
            max: 5,
        };
        assert!(blank.validate().is_err());

        assert!(build_filters(&[inverted]).is_err());
    }
}
