//! Error types for catalog verification.
//!
//! Every variant is terminal for the verification session that raised it.
//! The engine never retries; the calling harness reports and cleans up.
//! Variants split into two families: verification failures (the catalog did
//! not match the expectation) and driver failures (the browser or page
//! collaborator could not do its job).

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::driver::ProductRef;
use crate::evaluator::Evaluation;

/// The main error type for verification operations.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// A named filter control could not be located in the UI.
    #[error("filter '{name}' not found on the page")]
    FilterNotFound {
        /// Name of the filter as configured
        name: String,
    },

    /// A requested option is absent from a multi-value control.
    #[error("value '{value}' not found in filter '{filter}'")]
    FilterValueNotFound {
        /// Name of the filter control
        filter: String,
        /// The option that could not be selected
        value: String,
    },

    /// A scanned product failed at least one active filter.
    #[error("{0}")]
    FilterMismatch(Box<MismatchReport>),

    /// Fewer products are present than an assertion or lookup requires.
    #[error("expected at least {expected} product(s) on the page, found {actual}")]
    InsufficientProducts {
        /// Minimum number of products required
        expected: usize,
        /// Number of products actually present
        actual: usize,
    },

    /// A product expected on the current page is not there.
    #[error("product '{title}' not found on the current page")]
    ProductNotFound {
        /// Title of the missing product
        title: String,
    },

    /// The wall-clock budget ran out before every page was verified.
    #[error(
        "verification timed out after {elapsed:?} (budget: {budget_minutes} min, pages scanned: {pages_scanned})"
    )]
    VerificationTimeout {
        /// Time spent since the session started
        elapsed: Duration,
        /// Configured budget in whole minutes
        budget_minutes: u64,
        /// Pages fully verified before the budget ran out
        pages_scanned: usize,
    },

    /// The page driver failed for reasons unrelated to the catalog contents.
    #[error("page driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl VerifyError {
    /// Wraps a collaborator error as a driver failure.
    pub fn driver<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Driver(err.into())
    }

    /// Returns true if the catalog contradicted an expectation, as opposed
    /// to the driver failing.
    #[must_use]
    pub fn is_verification_failure(&self) -> bool {
        !matches!(self, Self::Driver(_))
    }

    /// Returns the mismatch report if this is a `FilterMismatch`.
    #[must_use]
    pub fn mismatch(&self) -> Option<&MismatchReport> {
        match self {
            Self::FilterMismatch(report) => Some(report),
            _ => None,
        }
    }
}

/// Everything known about the first product that failed a filter.
#[derive(Debug, Clone)]
pub struct MismatchReport {
    /// The offending product and where it sits
    pub product: ProductRef,
    /// Per-filter breakdown, in filter order
    pub evaluation: Evaluation,
    /// Best-effort PNG evidence; `None` when capture failed
    pub snapshot: Option<Vec<u8>>,
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "product '{}' (page {}, position {}) does not match filter(s): ",
            self.product.product.title(),
            self.product.page,
            self.product.index + 1,
        )?;
        let failed: Vec<String> = self
            .evaluation
            .failed()
            .map(|verdict| verdict.filter.describe())
            .collect();
        f.write_str(&failed.join(", "))
    }
}

/// A specialized Result type for verification operations.
pub type Result<T> = std::result::Result<T, VerifyError>;
