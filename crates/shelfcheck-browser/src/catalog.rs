//! Chrome-backed [`PageDriver`] for a catalog search result page.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use shelfcheck_core::{FilterControl, PageDriver, ProductRef, RawProduct, VerifyError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{BrowserError, Result};
use crate::js;
use crate::locators::CatalogLocators;
use crate::page::{Page, Region};
use crate::site::MarketSite;
use crate::wait::{wait_for_result, wait_for_value, wait_until_stable, WaitConfig};

/// Ceiling for the result list preloader to go away.
const PRELOADER_TIMEOUT: Duration = Duration::from_secs(20);

/// Ceiling for a filter block or value label to show up.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between scroll steps while the list is still growing.
const SCROLL_INTERVAL: Duration = Duration::from_millis(500);

/// Unchanged item counts in a row before the list counts as loaded.
const SETTLE_POLLS: usize = 2;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapedProduct {
    title: String,
    url: String,
    price_text: String,
}

impl From<ScrapedProduct> for RawProduct {
    fn from(p: ScrapedProduct) -> Self {
        RawProduct::new(p.title, p.url, p.price_text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocatedRegion {
    found: bool,
    #[serde(default)]
    by_position: bool,
    #[serde(default)]
    region: Option<Region>,
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NextControl {
    Missing,
    Disabled,
    Enabled,
}

/// A catalog search result page driven through Chrome.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    page: Page,
    locators: CatalogLocators,
}

impl CatalogPage {
    /// Wraps an open tab.
    #[must_use]
    pub fn new(page: Page, locators: CatalogLocators) -> Self {
        Self { page, locators }
    }

    /// The underlying tab.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Locators in use.
    #[must_use]
    pub fn locators(&self) -> &CatalogLocators {
        &self.locators
    }

    /// Closes the tab.
    ///
    /// # Errors
    ///
    /// Returns an error if closing the page fails.
    pub async fn close(self) -> Result<()> {
        self.page.close().await
    }

    /// Site navigation on the same tab.
    #[must_use]
    pub fn site(&self) -> MarketSite<'_> {
        MarketSite::new(&self.page, &self.locators)
    }

    /// Scrolls to the card of `product` and returns its box.
    ///
    /// The card is picked by position on the page; the title is only used
    /// when the card at that position shows a different product. `None`
    /// when no card carries the title or the card has no size.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails.
    pub async fn product_card_region(&self, product: &ProductRef) -> Result<Option<Region>> {
        let l = &self.locators;
        let located: LocatedRegion = self
            .page
            .evaluate_with(
                &js::product_region(),
                &[
                    Value::from(l.product_list.as_str()),
                    Value::from(l.product_link.as_str()),
                    Value::from(l.product_block.as_str()),
                    Value::from(product.index),
                    Value::from(product.product.title()),
                ],
            )
            .await?;

        if located.found && !located.by_position {
            debug!(index = product.index, "Card moved, located by title");
        }
        Ok(located
            .region
            .filter(|r| located.found && r.width > 0.0 && r.height > 0.0))
    }

    fn wait(&self) -> WaitConfig {
        self.page.wait_config()
    }

    async fn wait_for_preloader(&self) -> Result<()> {
        self.page
            .wait_for_absent(&self.locators.preloader, self.wait().capped(PRELOADER_TIMEOUT))
            .await
    }

    async fn scroll_step(&self) -> Result<usize> {
        let l = &self.locators;
        self.page
            .evaluate_with(
                &js::scroll_product_list(),
                &[
                    Value::from(l.product_list.as_str()),
                    Value::from(l.product_link.as_str()),
                    Value::from(l.scroller.as_str()),
                ],
            )
            .await
    }

    async fn signature(&self) -> Result<String> {
        let l = &self.locators;
        self.page
            .evaluate_with(
                &js::listing_signature(),
                &[
                    Value::from(l.product_list.as_str()),
                    Value::from(l.product_link.as_str()),
                ],
            )
            .await
    }

    async fn filter_index(&self, name: &str) -> Result<Option<usize>> {
        let index: i64 = self
            .page
            .evaluate_with(
                &js::locate_filter_block(),
                &[Value::from(self.locators.filter_block.as_str()), Value::from(name)],
            )
            .await?;
        Ok(usize::try_from(index).ok())
    }

    fn block_args(&self, control: &FilterControl) -> [Value; 2] {
        [
            Value::from(self.locators.filter_block.as_str()),
            Value::from(control.index),
        ]
    }

    async fn select_value(&self, control: &FilterControl, value: &str) -> shelfcheck_core::Result<()> {
        let l = &self.locators;
        let [blocks, index] = self.block_args(control);

        let searchable: bool = self
            .page
            .evaluate_with(
                &js::search_filter_values(),
                &[
                    blocks.clone(),
                    index.clone(),
                    Value::from(l.value_search.as_str()),
                    Value::from(value),
                ],
            )
            .await?;
        debug!(filter = %control.name, value, searchable, "Looking up filter value");

        let label_args = [blocks, index, Value::from(l.value_label.as_str()), Value::from(value)];
        let label_args = &label_args;
        let script = js::find_value_label();
        let script = script.as_str();
        let page = &self.page;
        let found = wait_for_value(
            move || page.element_where(script, label_args),
            self.wait().capped(LOOKUP_TIMEOUT),
            &format!("value '{value}' in filter '{}'", control.name),
        )
        .await;

        let label = match found {
            Ok(label) => label,
            Err(BrowserError::WaitTimeout { .. }) => {
                return Err(VerifyError::FilterValueNotFound {
                    filter: control.name.clone(),
                    value: value.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        label
            .click()
            .await
            .map_err(|e| BrowserError::interaction(format!("select '{value}'"), e))?;
        self.wait_for_preloader().await?;
        info!(filter = %control.name, value, "Selected filter value");
        Ok(())
    }
}

#[async_trait]
impl PageDriver for CatalogPage {
    async fn products_on_current_page(&mut self) -> shelfcheck_core::Result<Vec<RawProduct>> {
        self.page
            .wait_for_selector(&self.locators.page_ready, self.wait())
            .await?;

        let this = &*self;
        let realized = wait_until_stable(
            move || this.scroll_step(),
            SETTLE_POLLS,
            WaitConfig::new(self.wait().timeout, SCROLL_INTERVAL),
            "product list to stop growing",
        )
        .await?;
        self.wait_for_preloader().await?;

        let l = &self.locators;
        let scraped: Vec<ScrapedProduct> = self
            .page
            .evaluate_with(
                &js::extract_products(),
                &[
                    Value::from(l.product_list.as_str()),
                    Value::from(l.product_link.as_str()),
                    Value::from(l.product_price.as_str()),
                ],
            )
            .await?;

        debug!(realized, extracted = scraped.len(), "Read products from page");
        Ok(scraped.into_iter().map(RawProduct::from).collect())
    }

    async fn advance_to_next_page(&mut self) -> shelfcheck_core::Result<bool> {
        let state: NextControl = self
            .page
            .evaluate_with(
                &js::next_page_state(),
                &[Value::from(self.locators.next_page.as_str())],
            )
            .await?;
        if state != NextControl::Enabled {
            debug!(?state, "No next page");
            return Ok(false);
        }

        let Some(next) = self.page.element(&self.locators.next_page).await? else {
            debug!("Next page control went away");
            return Ok(false);
        };

        let before = self.signature().await?;
        next.click()
            .await
            .map_err(|e| BrowserError::interaction("click next page", e))?;

        let this = &*self;
        let before = before.as_str();
        wait_for_result(
            move || async move { Ok(this.signature().await? != before) },
            self.wait(),
            "next page of results",
        )
        .await?;
        self.wait_for_preloader().await?;
        Ok(true)
    }

    async fn capture_snapshot(&mut self, product: &ProductRef) -> shelfcheck_core::Result<Vec<u8>> {
        let png = match self.product_card_region(product).await? {
            Some(region) => self.page.screenshot_region(region).await?,
            None => {
                warn!(title = product.product.title(), "Product card not found, capturing viewport");
                self.page.screenshot().await?
            }
        };
        Ok(png)
    }

    async fn locate_filter_control(&mut self, name: &str) -> shelfcheck_core::Result<FilterControl> {
        let this = &*self;
        let found = wait_for_value(
            move || this.filter_index(name),
            self.wait().capped(LOOKUP_TIMEOUT),
            &format!("filter '{name}'"),
        )
        .await;

        match found {
            Ok(index) => {
                debug!(filter = name, index, "Located filter block");
                Ok(FilterControl {
                    name: name.to_string(),
                    index,
                })
            }
            Err(BrowserError::WaitTimeout { .. }) => Err(VerifyError::FilterNotFound {
                name: name.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn apply_range_values(
        &mut self,
        control: &FilterControl,
        min: i64,
        max: i64,
    ) -> shelfcheck_core::Result<()> {
        let l = &self.locators;
        let [blocks, index] = self.block_args(control);
        let status: String = self
            .page
            .evaluate_with(
                &js::set_range(),
                &[
                    blocks,
                    index,
                    Value::from(l.range_min.as_str()),
                    Value::from(l.range_max.as_str()),
                    Value::from(min),
                    Value::from(max),
                ],
            )
            .await?;

        match status.as_str() {
            "ok" => {
                self.wait_for_preloader().await?;
                info!(filter = %control.name, min, max, "Set range filter");
                Ok(())
            }
            "inputs" => Err(BrowserError::not_found(format!(
                "range inputs of filter '{}'",
                control.name
            ))
            .into()),
            _ => Err(VerifyError::FilterNotFound {
                name: control.name.clone(),
            }),
        }
    }

    async fn apply_selectable_values(
        &mut self,
        control: &FilterControl,
        values: &[String],
    ) -> shelfcheck_core::Result<()> {
        let [blocks, index] = self.block_args(control);
        let present: bool = self
            .page
            .evaluate_with(
                &js::expand_filter_block(),
                &[blocks, index, Value::from(self.locators.expand_button.as_str())],
            )
            .await?;
        if !present {
            return Err(VerifyError::FilterNotFound {
                name: control.name.clone(),
            });
        }

        for value in values {
            self.select_value(control, value).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_control_states_parse() {
        let state: NextControl = serde_json::from_str("\"disabled\"").unwrap();
        assert_eq!(state, NextControl::Disabled);
        let state: NextControl = serde_json::from_str("\"enabled\"").unwrap();
        assert_eq!(state, NextControl::Enabled);
    }

    #[test]
    fn located_region_reads_position_flag() {
        let located: LocatedRegion = serde_json::from_str(
            r#"{ "found": true, "byPosition": true, "region": { "x": 0, "y": 900, "width": 300, "height": 420 } }"#,
        )
        .unwrap();
        assert!(located.by_position);
        assert_eq!(located.region.map(|r| r.y), Some(900.0));

        let missing: LocatedRegion = serde_json::from_str(r#"{ "found": false }"#).unwrap();
        assert!(!missing.found && missing.region.is_none());
    }
}
