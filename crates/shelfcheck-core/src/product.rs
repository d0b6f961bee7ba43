//! Scraped catalog product with identity-aware equality.
//!
//! Listing pages decorate product links with tracking parameters that change
//! between page loads, so a product's identity is its title plus the link
//! with the query string removed.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::driver::RawProduct;
use crate::price::{parse_price, UNPARSEABLE_PRICE};

static URL_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^?]+)\??.*$").expect("URL path pattern is valid"));

/// Strips the query string from a product link.
///
/// Links the pattern cannot split (empty, or starting with `?`) are
/// returned unchanged.
#[must_use]
pub fn normalize_url(url: &str) -> &str {
    URL_PATH
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map_or(url, |path| path.as_str())
}

/// A catalog item as scraped from a listing page. Immutable.
#[derive(Debug, Clone)]
pub struct Product {
    title: String,
    url: String,
    price: i64,
}

impl Product {
    /// Creates a product from already-parsed fields.
    pub fn new(title: impl Into<String>, url: impl Into<String>, price: i64) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            price,
        }
    }

    /// Creates a product from driver output, parsing the price text.
    #[must_use]
    pub fn from_raw(raw: RawProduct) -> Self {
        let price = parse_price(&raw.price_text);
        Self::new(raw.title, raw.url, price)
    }

    /// Product title as displayed.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Product link, including any tracking parameters.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Price, or [`UNPARSEABLE_PRICE`].
    #[must_use]
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Returns false when the page showed no parseable price.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price != UNPARSEABLE_PRICE
    }

    /// The link with its query string removed.
    #[must_use]
    pub fn normalized_url(&self) -> &str {
        normalize_url(&self.url)
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.normalized_url() == other.normalized_url()
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.normalized_url().hash(state);
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ({}) ", self.title, self.normalized_url())?;
        if self.has_price() {
            write!(f, "price {}", self.price)
        } else {
            f.write_str("no price")
        }
    }
}
