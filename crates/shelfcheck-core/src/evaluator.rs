//! Applies a filter set to a single product.

use std::fmt;
use std::sync::Arc;

use crate::filter::Filter;
use crate::product::Product;

/// Outcome of one filter against one product.
#[derive(Debug, Clone)]
pub struct FilterVerdict {
    /// The filter that was checked
    pub filter: Arc<dyn Filter>,
    /// Whether the product satisfied it
    pub passed: bool,
}

/// Per-filter breakdown for one product, in filter order.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    verdicts: Vec<FilterVerdict>,
}

impl Evaluation {
    /// All verdicts, one per filter.
    #[must_use]
    pub fn verdicts(&self) -> &[FilterVerdict] {
        &self.verdicts
    }

    /// True when every filter passed (vacuously true for no filters).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.verdicts.iter().all(|v| v.passed)
    }

    /// Verdicts of the filters the product failed.
    pub fn failed(&self) -> impl Iterator<Item = &FilterVerdict> {
        self.verdicts.iter().filter(|v| !v.passed)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, verdict) in self.verdicts.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            let mark = if verdict.passed { "ok" } else { "FAILED" };
            write!(f, "{}: {mark}", verdict.filter.describe())?;
        }
        Ok(())
    }
}

/// Checks `product` against every filter.
///
/// Never short-circuits: the result holds exactly one verdict per filter,
/// in input order, so diagnostics show the full picture.
#[must_use]
pub fn evaluate(product: &Product, filters: &[Arc<dyn Filter>]) -> Evaluation {
    let verdicts = filters
        .iter()
        .map(|filter| FilterVerdict {
            filter: Arc::clone(filter),
            passed: filter.matches(product),
        })
        .collect();

    Evaluation { verdicts }
}
