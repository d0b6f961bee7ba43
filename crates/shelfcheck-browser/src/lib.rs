//! # shelfcheck-browser
//!
//! Headless Chrome driver for catalog verification, built on chromiumoxide.
//!
//! ## Architecture
//!
//! - **CatalogBrowser**: manages the Chrome process lifecycle
//! - **Page**: a tab with XPath helpers, scripting and screenshots
//! - **CatalogPage**: implements `shelfcheck_core::PageDriver` for a search
//!   result page
//! - **MarketSite**: landing page, catalog menu, search and page numbers
//! - **CatalogLocators**: every XPath the driver uses, overridable
//! - **WaitConfig**: polling waits with timeouts
//!
//! ## Example Usage
//!
//! ```ignore
//! use shelfcheck_browser::{BrowserConfig, CatalogBrowser, CatalogLocators};
//! use shelfcheck_core::TraversalEngine;
//!
//! let browser = CatalogBrowser::launch(BrowserConfig::default()).await?;
//! let catalog = browser.open_catalog_page(CatalogLocators::default()).await?;
//!
//! let site = catalog.site();
//! site.open("https://market.yandex.ru", "Маркет").await?;
//! site.open_catalog().await?;
//! site.hover_section("Ноутбуки и компьютеры").await?;
//! site.open_section_item("Ноутбуки").await?;
//!
//! let mut engine = TraversalEngine::new(catalog);
//! // apply filters, verify...
//! browser.close().await?;
//! ```
//!
//! ## Testing Strategy
//!
//! 1. **Unit tests**: script builders, URL rewriting, wait strategies
//! 2. **Integration tests**: real browser against `data:` pages (require
//!    Chrome installed)
//!
//! Run with `cargo test` (unit) or `cargo test -- --ignored` (integration).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod browser;
pub mod catalog;
pub mod error;
mod js;
pub mod locators;
pub mod page;
pub mod site;
pub mod wait;

// Re-export main types for convenience
pub use browser::{BrowserConfig, CatalogBrowser};
pub use catalog::CatalogPage;
pub use error::{BrowserError, Result};
pub use locators::CatalogLocators;
pub use page::{Page, Region};
pub use site::{with_page_number, MarketSite};
pub use wait::{WaitConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};
