//! Page-level browser operations and navigation.
//!
//! Locators are XPath expressions throughout. Scripts receive their
//! arguments JSON-encoded, never spliced in as raw text.

use crate::error::{BrowserError, Result};
use crate::wait::{wait_for_result, WaitConfig};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, Viewport};
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page as ChromePage, ScreenshotParams};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Attribute used to hand an element found by script over to CDP.
const MARKER: &str = "data-shelfcheck-target";

/// Resolves the first node matching an XPath, optionally under a context node.
pub(crate) const FIRST_NODE: &str = "(xpath, context) => document.evaluate(\
    xpath, context || document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue";

/// A rectangle in page coordinates, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Region {
    /// Left edge, including horizontal scroll offset
    pub x: f64,
    /// Top edge, including vertical scroll offset
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// A browser tab.
///
/// Wraps `chromiumoxide::page::Page` with XPath helpers and the waits the
/// catalog driver needs.
#[derive(Debug, Clone)]
pub struct Page {
    inner: ChromePage,
    wait: WaitConfig,
}

impl Page {
    /// Wraps a chromiumoxide page. `wait` is the default ceiling for
    /// navigation waits.
    pub(crate) fn new(page: ChromePage, wait: WaitConfig) -> Self {
        Self { inner: page, wait }
    }

    /// Default wait configuration of this page.
    #[must_use]
    pub fn wait_config(&self) -> WaitConfig {
        self.wait
    }

    /// Navigates to an absolute URL and waits for the document to load.
    ///
    /// # Errors
    ///
    /// Returns `NavigationFailed` if the page fails to load or times out.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!(url, "Navigating");
        self.inner
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.wait_for_load(self.wait).await
    }

    /// Waits until `document.readyState` is `complete`.
    ///
    /// # Errors
    ///
    /// Returns `WaitTimeout` if the document doesn't finish loading in time.
    pub async fn wait_for_load(&self, config: WaitConfig) -> Result<()> {
        wait_for_result(
            move || async move {
                let state: String = self.evaluate("document.readyState").await?;
                Ok(state == "complete")
            },
            config,
            "document ready",
        )
        .await
    }

    /// Executes JavaScript in the page context and returns the result.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails or the result cannot be deserialized.
    pub async fn evaluate<T>(&self, script: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let result = self
            .inner
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?;

        result
            .into_value()
            .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))
    }

    /// Calls a JavaScript function expression with JSON-encoded arguments.
    ///
    /// ```ignore
    /// let n: usize = page.evaluate_with("(xpath) => ...", &[json!("//article")]).await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails or the result cannot be deserialized.
    pub async fn evaluate_with<T>(&self, function: &str, args: &[Value]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.evaluate(&call_expression(function, args)).await
    }

    /// Returns true if the XPath matches at least one node.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails.
    pub async fn exists(&self, xpath: &str) -> Result<bool> {
        let function = format!("(xpath) => ({FIRST_NODE})(xpath) !== null");
        self.evaluate_with(&function, &[Value::from(xpath)]).await
    }

    /// Waits for an XPath to match a node.
    ///
    /// # Errors
    ///
    /// Returns `WaitTimeout` if nothing matches in time.
    pub async fn wait_for_selector(&self, xpath: &str, config: WaitConfig) -> Result<()> {
        wait_for_result(
            move || self.exists(xpath),
            config,
            &format!("element '{xpath}' to appear"),
        )
        .await
    }

    /// Waits until an XPath matches nothing. Succeeds at once if nothing
    /// matches already.
    ///
    /// # Errors
    ///
    /// Returns `WaitTimeout` if a match remains after the timeout.
    pub async fn wait_for_absent(&self, xpath: &str, config: WaitConfig) -> Result<()> {
        wait_for_result(
            move || async move { Ok(!self.exists(xpath).await?) },
            config,
            &format!("element '{xpath}' to disappear"),
        )
        .await
    }

    /// Waits until the document title contains `text`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `WaitTimeout` if the title never matches.
    pub async fn wait_for_title_contains(&self, text: &str, config: WaitConfig) -> Result<()> {
        let needle = text.to_lowercase();
        let needle = needle.as_str();
        wait_for_result(
            move || async move { Ok(self.title().await?.to_lowercase().contains(needle)) },
            config,
            &format!("title to contain '{text}'"),
        )
        .await
    }

    /// Resolves an element chosen by a script to a CDP element handle.
    ///
    /// `function` is called with `args` and must return a DOM element or
    /// `null`. Returns `None` when it returns `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution or the CDP lookup fails.
    pub async fn element_where(&self, function: &str, args: &[Value]) -> Result<Option<Element>> {
        let script = format!(
            "(() => {{ \
                document.querySelectorAll('[{MARKER}]').forEach(e => e.removeAttribute('{MARKER}')); \
                const el = {call}; \
                if (!el) return false; \
                el.setAttribute('{MARKER}', ''); \
                return true; \
            }})()",
            call = call_expression(function, args),
        );

        if !self.evaluate::<bool>(&script).await? {
            return Ok(None);
        }

        let element = self.inner.find_element(format!("[{MARKER}]")).await?;
        Ok(Some(element))
    }

    /// Resolves the first node matching an absolute XPath.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution or the CDP lookup fails.
    pub async fn element(&self, xpath: &str) -> Result<Option<Element>> {
        self.element_where(FIRST_NODE, &[Value::from(xpath)]).await
    }

    /// Returns the current page URL.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails.
    pub async fn url(&self) -> Result<String> {
        self.evaluate("window.location.href").await
    }

    /// Returns the page title.
    ///
    /// # Errors
    ///
    /// Returns an error if script execution fails.
    pub async fn title(&self) -> Result<String> {
        self.evaluate("document.title").await
    }

    /// Takes a PNG screenshot of the viewport.
    ///
    /// # Errors
    ///
    /// Returns an error if screenshot capture fails.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();

        self.inner
            .screenshot(params)
            .await
            .map_err(|e| BrowserError::interaction("capture screenshot", e))
    }

    /// Takes a PNG screenshot clipped to `region`.
    ///
    /// # Errors
    ///
    /// Returns an error if screenshot capture fails.
    pub async fn screenshot_region(&self, region: Region) -> Result<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .clip(Viewport {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                scale: 1.0,
            })
            .build();

        self.inner
            .screenshot(params)
            .await
            .map_err(|e| BrowserError::interaction("capture element screenshot", e))
    }

    /// Closes the tab.
    ///
    /// # Errors
    ///
    /// Returns an error if closing the page fails.
    pub async fn close(self) -> Result<()> {
        self.inner.close().await?;
        Ok(())
    }
}

/// Builds `(function)(arg0, arg1, ...)` with every argument JSON-encoded.
pub(crate) fn call_expression(function: &str, args: &[Value]) -> String {
    let args: Vec<String> = args.iter().map(Value::to_string).collect();
    format!("({function})({})", args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn call_expression_json_encodes_arguments() {
        let call = call_expression("(a, b) => a + b", &[json!("x'); alert(1);//"), json!(3)]);
        assert_eq!(call, r#"((a, b) => a + b)("x'); alert(1);//", 3)"#);
    }

    #[test]
    fn call_expression_escapes_quotes_and_newlines() {
        let call = call_expression("(s) => s", &[json!("//a[@title=\"x\"]\n")]);
        assert_eq!(call, r#"((s) => s)("//a[@title=\"x\"]\n")"#);
    }

    #[test]
    fn call_expression_without_arguments() {
        assert_eq!(call_expression("() => 1", &[]), "(() => 1)()");
    }

    #[test]
    fn region_deserializes_from_dom_rect() {
        let region: Region =
            serde_json::from_value(json!({"x": 10.5, "y": 2000, "width": 300, "height": 420}))
                .unwrap();
        assert_eq!(region.y, 2000.0);
        assert_eq!(region.width, 300.0);
    }
}
