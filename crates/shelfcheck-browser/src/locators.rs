//! XPath locators for the catalog site.
//!
//! Every expression is overridable from configuration because the markup
//! changes more often than the verification logic. Expressions starting
//! with `.` are evaluated relative to a context node (a filter block or a
//! product link); the rest are absolute.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Page selectors used by [`CatalogPage`](crate::CatalogPage) and
/// [`MarketSite`](crate::MarketSite).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogLocators {
    /// Element present once a search result page has rendered
    pub page_ready: String,
    /// Container of the virtualized product list
    pub product_list: String,
    /// Product title links, relative to the product list
    pub product_link: String,
    /// Price text, relative to a product link
    pub product_price: String,
    /// Product card, relative to a product link
    pub product_block: String,
    /// Loading indicator over the result list
    pub preloader: String,
    /// Scrollable element of the virtualized list
    pub scroller: String,
    /// One block per filter in the sidebar
    pub filter_block: String,
    /// Lower bound input, relative to a filter block
    pub range_min: String,
    /// Upper bound input, relative to a filter block
    pub range_max: String,
    /// "Show all" toggle, relative to a filter block
    pub expand_button: String,
    /// Value search input, relative to a filter block
    pub value_search: String,
    /// Selectable value labels, relative to a filter block
    pub value_label: String,
    /// Pagination "next" control
    pub next_page: String,
    /// Button opening the catalog popup
    pub catalog_button: String,
    /// Category tabs in the catalog popup
    pub category_tab: String,
    /// Section items of the hovered category
    pub section_item: String,
    /// Header search input
    pub search_input: String,
    /// Header search submit button
    pub search_button: String,
}

impl Default for CatalogLocators {
    fn default() -> Self {
        Self {
            page_ready: "//*[@id='greed']".to_string(),
            product_list: "//*[@data-test-id='virtuoso-item-list']".to_string(),
            product_link: ".//article//h3[@data-zone-name='title']/a[@href]".to_string(),
            product_price: "./ancestor::article//*[@data-zone-name='price']//span[count(@*)=0]"
                .to_string(),
            product_block: "./ancestor::article".to_string(),
            preloader: "//*[@id='searchResults']/../div[@data-auto='preloader']".to_string(),
            scroller: "//div[@data-virtuoso-scroller]".to_string(),
            filter_block: "//*[@data-grabber='SearchFilters']//*[@data-filter-id]".to_string(),
            range_min: ".//*[@data-auto='filter-range-min']//input | .//input[@data-auto='filter-range-min']"
                .to_string(),
            range_max: ".//*[@data-auto='filter-range-max']//input | .//input[@data-auto='filter-range-max']"
                .to_string(),
            expand_button: ".//button[@aria-expanded]".to_string(),
            value_search: ".//input[@type='text']".to_string(),
            value_label: ".//*[@data-filter-value-id and .//span[text()!='']]/label".to_string(),
            next_page: "//*[@data-auto='pagination-next']".to_string(),
            catalog_button: "//*[@id='catalogPopupButton']".to_string(),
            category_tab: "//li[@role='tab']/a".to_string(),
            section_item: "//div[@role='tabpanel']/div//ul[@data-autotest-id='subItems']/li"
                .to_string(),
            search_input: "//input[@id='header-search']".to_string(),
            search_button: "//button[@data-r='search-button']".to_string(),
        }
    }
}
