//! The page driver contract the traversal engine depends on.
//!
//! shelfcheck-core doesn't know how to talk to a browser. It consumes
//! products and page transitions from anything implementing [`PageDriver`];
//! shelfcheck-browser provides the Chrome-backed implementation and tests
//! provide scripted ones.

use async_trait::async_trait;

use crate::error::Result;
use crate::product::Product;

/// Fields extracted for one product, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProduct {
    /// Title text of the product link
    pub title: String,
    /// `href` of the product link
    pub url: String,
    /// Price text exactly as rendered
    pub price_text: String,
}

impl RawProduct {
    /// Creates a raw product record.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        price_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            price_text: price_text.into(),
        }
    }
}

/// A product together with its position in the traversal.
#[derive(Debug, Clone)]
pub struct ProductRef {
    /// 1-based page number within the session
    pub page: usize,
    /// 0-based position on that page
    pub index: usize,
    /// The product itself
    pub product: Product,
}

/// Opaque handle to a located filter control.
///
/// Returned by [`PageDriver::locate_filter_control`] and handed back to the
/// `apply_*` operations of the same driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    /// Filter name the control was located by
    pub name: String,
    /// Driver-specific position of the control
    pub index: usize,
}

/// Browser-side operations the verification engine needs.
///
/// Calls are awaited one at a time; implementations own their internal
/// wait timeouts for page readiness and loading indicators.
#[async_trait]
pub trait PageDriver: Send {
    /// Returns the products of the current page in display order.
    ///
    /// Virtualized lists must be fully realized and any loading indicator
    /// resolved before this returns.
    async fn products_on_current_page(&mut self) -> Result<Vec<RawProduct>>;

    /// Moves to the next page of results.
    ///
    /// Returns `false` when there is no next page.
    async fn advance_to_next_page(&mut self) -> Result<bool>;

    /// Captures PNG evidence for one product on the current page.
    ///
    /// Used for failure diagnostics only; callers tolerate errors.
    async fn capture_snapshot(&mut self, product: &ProductRef) -> Result<Vec<u8>>;

    /// Finds the filter control with the given name.
    ///
    /// # Errors
    ///
    /// Returns `FilterNotFound` if no control matches.
    async fn locate_filter_control(&mut self, name: &str) -> Result<FilterControl>;

    /// Enters inclusive bounds into a range control.
    async fn apply_range_values(&mut self, control: &FilterControl, min: i64, max: i64)
        -> Result<()>;

    /// Selects each of `values` in a multi-value control.
    ///
    /// # Errors
    ///
    /// Returns `FilterValueNotFound` for the first value the control lacks.
    async fn apply_selectable_values(
        &mut self,
        control: &FilterControl,
        values: &[String],
    ) -> Result<()>;
}

#[async_trait]
impl<D: PageDriver + ?Sized> PageDriver for Box<D> {
    async fn products_on_current_page(&mut self) -> Result<Vec<RawProduct>> {
        (**self).products_on_current_page().await
    }

    async fn advance_to_next_page(&mut self) -> Result<bool> {
        (**self).advance_to_next_page().await
    }

    async fn capture_snapshot(&mut self, product: &ProductRef) -> Result<Vec<u8>> {
        (**self).capture_snapshot(product).await
    }

    async fn locate_filter_control(&mut self, name: &str) -> Result<FilterControl> {
        (**self).locate_filter_control(name).await
    }

    async fn apply_range_values(
        &mut self,
        control: &FilterControl,
        min: i64,
        max: i64,
    ) -> Result<()> {
        (**self).apply_range_values(control, min, max).await
    }

    async fn apply_selectable_values(
        &mut self,
        control: &FilterControl,
        values: &[String],
    ) -> Result<()> {
        (**self).apply_selectable_values(control, values).await
    }
}
