//! # shelfcheck-core
//!
//! Filter matching and paginated verification for catalog listing pages.
//!
//! A search result page is put into a filtered state (price range, brand
//! checkboxes), then every product on every result page is checked against
//! the same filters. The first product that fails stops the run with a
//! report naming the product, its position and each filter it violated.
//!
//! ## Architecture
//!
//! - **Product**: scraped item with identity that ignores tracking parameters
//! - **Filter**: predicate over products that can also apply itself to a page
//! - **evaluate**: checks one product against every filter, no short-circuit
//! - **PageDriver**: what the engine needs from a browser page
//! - **TraversalEngine**: walks pages until the last one, a mismatch, or the
//!   time budget
//!
//! This crate has no browser dependency. `shelfcheck-browser` implements
//! [`PageDriver`] on top of Chrome; tests use scripted in-memory drivers.
//!
//! ## Example Usage
//!
//! ```ignore
//! use shelfcheck_core::{build_filters, FilterSpec, TraversalEngine, VerificationSession};
//!
//! let filters = build_filters(&[FilterSpec::Range {
//!     name: "Цена".into(),
//!     min: 10_000,
//!     max: 90_000,
//! }])?;
//!
//! let mut engine = TraversalEngine::new(driver);
//! engine.apply_filters(&filters).await?;
//! engine.assert_more_than(12).await?;
//!
//! let session = VerificationSession::new(filters, 10);
//! let summary = engine.verify_all(&session).await?;
//! println!("{} pages verified", summary.pages_scanned);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod driver;
pub mod error;
pub mod evaluator;
pub mod filter;
pub mod price;
pub mod product;
pub mod traversal;

// Re-export main types for convenience
pub use driver::{FilterControl, PageDriver, ProductRef, RawProduct};
pub use error::{MismatchReport, Result, VerifyError};
pub use evaluator::{evaluate, Evaluation, FilterVerdict};
pub use filter::{build_filters, Filter, FilterSpec, InvalidFilter, MultiValueFilter, RangeFilter};
pub use price::{parse_price, UNPARSEABLE_PRICE};
pub use product::{normalize_url, Product};
pub use traversal::{
    Outcome, TraversalEngine, TraversalState, TraversalSummary, VerificationSession,
};
