//! Navigation around the marketplace: landing page, catalog menu, search
//! and result page numbers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{BrowserError, Result};
use crate::js;
use crate::locators::CatalogLocators;
use crate::page::Page;

static PAGE_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([?&])page=\d+").expect("page parameter pattern is valid"));

/// Returns `url` pointing at result page `page`.
///
/// An existing `page=N` parameter is replaced; otherwise one is appended,
/// with `?` or `&` depending on whether the URL already has a query.
#[must_use]
pub fn with_page_number(url: &str, page: usize) -> String {
    if PAGE_PARAM.is_match(url) {
        return PAGE_PARAM
            .replace(url, |caps: &regex::Captures<'_>| format!("{}page={page}", &caps[1]))
            .into_owned();
    }

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}page={page}")
}

/// Site-level navigation on a catalog tab.
#[derive(Debug, Clone, Copy)]
pub struct MarketSite<'a> {
    page: &'a Page,
    locators: &'a CatalogLocators,
}

impl<'a> MarketSite<'a> {
    /// Navigation helpers over `page`.
    #[must_use]
    pub fn new(page: &'a Page, locators: &'a CatalogLocators) -> Self {
        Self { page, locators }
    }

    /// Opens `url` and waits until the title contains `expected_title`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationFailed` or `WaitTimeout`.
    pub async fn open(&self, url: &str, expected_title: &str) -> Result<()> {
        self.page.navigate(url).await?;
        self.page
            .wait_for_title_contains(expected_title, self.page.wait_config())
            .await?;
        info!(url, "Opened site");
        Ok(())
    }

    /// Opens the catalog popup unless it is already open.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` when there is no catalog button.
    pub async fn open_catalog(&self) -> Result<()> {
        let button = self
            .page
            .element(&self.locators.catalog_button)
            .await?
            .ok_or_else(|| BrowserError::not_found("catalog button"))?;

        let expanded = button.attribute("aria-expanded").await?;
        if expanded.as_deref() != Some("true") {
            button
                .click()
                .await
                .map_err(|e| BrowserError::interaction("open catalog", e))?;
        }

        self.page
            .wait_for_selector(&self.locators.category_tab, self.page.wait_config())
            .await
    }

    /// Moves the pointer over a catalog category so its sections show.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` when no category has that name.
    pub async fn hover_section(&self, name: &str) -> Result<()> {
        self.page
            .wait_for_selector(&self.locators.category_tab, self.page.wait_config())
            .await?;

        let tab = self
            .page
            .element_where(
                &js::find_by_text(),
                &[Value::from(self.locators.category_tab.as_str()), Value::from(name)],
            )
            .await?
            .ok_or_else(|| BrowserError::not_found(format!("catalog section '{name}'")))?;

        tab.hover()
            .await
            .map_err(|e| BrowserError::interaction(format!("hover section '{name}'"), e))?;

        self.page
            .wait_for_selector(&self.locators.section_item, self.page.wait_config())
            .await?;
        debug!(section = name, "Hovered catalog section");
        Ok(())
    }

    /// Opens a section of the hovered category and waits for its page.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` when the category has no such section.
    pub async fn open_section_item(&self, name: &str) -> Result<()> {
        let item = self
            .page
            .element_where(
                &js::find_by_text(),
                &[Value::from(self.locators.section_item.as_str()), Value::from(name)],
            )
            .await?
            .ok_or_else(|| BrowserError::not_found(format!("catalog item '{name}'")))?;

        item.click()
            .await
            .map_err(|e| BrowserError::interaction(format!("open catalog item '{name}'"), e))?;

        self.page
            .wait_for_title_contains(name, self.page.wait_config())
            .await?;
        info!(item = name, "Opened catalog item");
        Ok(())
    }

    /// Reloads the current listing at result page `page`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationFailed` if the page doesn't load.
    pub async fn go_to_page(&self, page: usize) -> Result<()> {
        let url = with_page_number(&self.page.url().await?, page);
        info!(page, "Going to result page");
        self.page.navigate(&url).await
    }

    /// Searches the catalog for `text` through the header search box.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` when the search box or button is missing.
    pub async fn search(&self, text: &str) -> Result<()> {
        let input = self
            .page
            .element(&self.locators.search_input)
            .await?
            .ok_or_else(|| BrowserError::not_found("search input"))?;

        input
            .click()
            .await
            .map_err(|e| BrowserError::interaction("focus search input", e))?;
        self.page
            .evaluate_with::<bool>(
                &js::clear_input(),
                &[Value::from(self.locators.search_input.as_str())],
            )
            .await?;
        input
            .type_str(text)
            .await
            .map_err(|e| BrowserError::interaction("type search text", e))?;

        let button = self
            .page
            .element(&self.locators.search_button)
            .await?
            .ok_or_else(|| BrowserError::not_found("search button"))?;
        button
            .click()
            .await
            .map_err(|e| BrowserError::interaction("submit search", e))?;

        self.page.wait_for_load(self.page.wait_config()).await?;
        self.page
            .wait_for_selector(&self.locators.page_ready, self.page.wait_config())
            .await?;
        info!(query = text, "Searched catalog");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_page_number() {
        assert_eq!(
            with_page_number("https://market.example/catalog/54544?hid=91013&page=7&how=dpop", 1),
            "https://market.example/catalog/54544?hid=91013&page=1&how=dpop"
        );
        assert_eq!(
            with_page_number("https://market.example/search?page=12", 3),
            "https://market.example/search?page=3"
        );
    }

    #[test]
    fn appends_page_number() {
        assert_eq!(
            with_page_number("https://market.example/catalog/54544?hid=91013", 2),
            "https://market.example/catalog/54544?hid=91013&page=2"
        );
        assert_eq!(
            with_page_number("https://market.example/catalog/54544", 1),
            "https://market.example/catalog/54544?page=1"
        );
    }

    #[test]
    fn similarly_named_parameters_are_not_page_numbers() {
        assert_eq!(
            with_page_number("https://market.example/search?subpage=4", 1),
            "https://market.example/search?subpage=4&page=1"
        );
    }
}
