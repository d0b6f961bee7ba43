//! Browser lifecycle management and process control.
//!
//! `CatalogBrowser` launches Chrome, keeps the CDP handler running and
//! hands out tabs. Close it explicitly; `Drop` only logs when that was
//! skipped, and chromiumoxide kills the process. Each launch gets its own
//! temporary profile directory, removed together with the browser.

use crate::catalog::CatalogPage;
use crate::error::{BrowserError, Result};
use crate::locators::CatalogLocators;
use crate::page::Page;
use crate::wait::WaitConfig;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Configuration for launching the browser.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true unless the `visible` feature is on).
    pub headless: bool,

    /// Browser window size (default: 1920x1080).
    pub window_size: (u32, u32),

    /// Additional Chrome arguments.
    pub args: Vec<String>,

    /// Chrome executable path (None = auto-detect).
    pub chrome_path: Option<PathBuf>,

    /// Ceiling for page-ready and navigation waits.
    pub wait: WaitConfig,
}

impl BrowserConfig {
    /// Creates a new config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the browser window.
    #[must_use]
    pub fn visible(mut self) -> Self {
        self.headless = false;
        self
    }

    /// Sets a custom window size.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Uses a specific Chrome executable.
    #[must_use]
    pub fn with_chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// Sets the wait ceiling for page operations.
    #[must_use]
    pub fn with_wait(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Adds additional Chrome arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args.extend(args);
        self
    }

    /// Every Chrome argument this config launches with, except the
    /// per-launch user data directory.
    #[must_use]
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![format!(
            "--window-size={},{}",
            self.window_size.0, self.window_size.1
        )];
        args.extend(self.args.iter().cloned());
        args
    }

    #[allow(clippy::result_large_err)]
    fn to_chrome_config(&self, user_data_dir: &Path) -> Result<ChromeConfig> {
        let mut config = ChromeConfig::builder().viewport(None);

        if !self.headless {
            config = config.with_head();
        }

        for arg in self.chrome_args() {
            config = config.arg(arg);
        }

        // Unique profile per launch so parallel runs don't share a ProcessSingleton
        config = config.arg(format!("--user-data-dir={}", user_data_dir.display()));

        if let Some(path) = &self.chrome_path {
            config = config.chrome_executable(path.clone());
        }

        config.build().map_err(|e| BrowserError::LaunchFailed {
            reason: format!("invalid browser configuration: {e}"),
            source: None,
        })
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: !cfg!(feature = "visible"),
            window_size: (1920, 1080),
            args: vec![
                // Needed when user namespaces are unavailable (containers, CI)
                "--no-sandbox".to_string(),
                // Prevents /dev/shm exhaustion in containerized environments
                "--disable-dev-shm-usage".to_string(),
                // Hides navigator.webdriver, which the marketplace answers with a captcha
                "--disable-blink-features=AutomationControlled".to_string(),
                "--incognito".to_string(),
            ],
            chrome_path: None,
            wait: WaitConfig::default(),
        }
    }
}

/// A managed Chrome instance.
///
/// ```ignore
/// let browser = CatalogBrowser::launch(BrowserConfig::default()).await?;
/// let catalog = browser.open_catalog_page(CatalogLocators::default()).await?;
/// catalog.site().open("https://market.yandex.ru", "Маркет").await?;
/// browser.close().await?;
/// ```
pub struct CatalogBrowser {
    inner: Arc<Mutex<Option<Browser>>>,
    wait: WaitConfig,
    profile: Option<TempDir>,
}

impl CatalogBrowser {
    /// Launches Chrome and starts the CDP event loop.
    ///
    /// # Errors
    ///
    /// Returns `LaunchFailed` if Chrome is not installed, not executable,
    /// or fails to start.
    pub async fn launch(config: BrowserConfig) -> Result<Self> {
        debug!(?config, "Launching browser");

        let profile = tempfile::Builder::new()
            .prefix("shelfcheck-")
            .tempdir()
            .map_err(|e| BrowserError::LaunchFailed {
                reason: "failed to create a browser profile directory".to_string(),
                source: Some(Box::new(e)),
            })?;
        let chrome_config = config.to_chrome_config(profile.path())?;

        let (browser, mut handler) =
            Browser::launch(chrome_config)
                .await
                .map_err(|e| BrowserError::LaunchFailed {
                    reason: "failed to launch Chrome process".to_string(),
                    source: Some(Box::new(e)),
                })?;

        // chromiumoxide processes CDP events only while the handler is polled
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("Browser handler error: {}", e);
                }
            }
        });

        debug!("Browser launched successfully");

        Ok(Self {
            inner: Arc::new(Mutex::new(Some(browser))),
            wait: config.wait,
            profile: Some(profile),
        })
    }

    /// Opens a blank tab.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed` if the browser has been closed.
    pub async fn new_page(&self) -> Result<Page> {
        let browser = self.inner.lock().await;

        let browser = browser.as_ref().ok_or(BrowserError::AlreadyClosed)?;

        let chrome_page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;

        Ok(Page::new(chrome_page, self.wait))
    }

    /// Opens a blank tab wrapped as a catalog page driver.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed` if the browser has been closed.
    pub async fn open_catalog_page(&self, locators: CatalogLocators) -> Result<CatalogPage> {
        Ok(CatalogPage::new(self.new_page().await?, locators))
    }

    /// Closes the browser, waits for the Chrome process to exit and removes
    /// its profile directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser fails to close gracefully.
    pub async fn close(mut self) -> Result<()> {
        if let Some(mut browser) = self.inner.lock().await.take() {
            debug!("Closing browser gracefully");
            browser
                .close()
                .await
                .map_err(|e| BrowserError::ConnectionFailed(e.to_string()))?;
            // Chrome keeps writing to the profile until the process is gone
            if let Err(e) = browser.wait().await {
                warn!("Waiting for Chrome to exit failed: {}", e);
            }
        }

        if let Some(profile) = self.profile.take() {
            let path = profile.path().to_path_buf();
            if let Err(e) = profile.close() {
                warn!(path = %path.display(), "Could not remove browser profile: {}", e);
            }
        }

        Ok(())
    }

    /// Profile directory of this launch, until the browser is closed.
    #[must_use]
    pub fn profile_dir(&self) -> Option<&Path> {
        self.profile.as_ref().map(TempDir::path)
    }

    /// Returns true if the browser has been closed.
    pub async fn is_closed(&self) -> bool {
        self.inner.lock().await.is_none()
    }
}

impl Drop for CatalogBrowser {
    fn drop(&mut self) {
        // chromiumoxide's Browser::drop kills the process if close() never ran
        let still_open = self
            .inner
            .try_lock()
            .map_or(true, |browser| browser.is_some());
        if still_open {
            warn!("CatalogBrowser dropped without close(), forcing shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_hides_automation() {
        let config = BrowserConfig::default();
        let args = config.chrome_args();

        assert_eq!(args[0], "--window-size=1920,1080");
        assert!(args.iter().any(|a| a == "--no-sandbox"));
        assert!(args.iter().any(|a| a == "--disable-blink-features=AutomationControlled"));
        assert!(args.iter().any(|a| a == "--incognito"));
    }

    #[test]
    fn builder_overrides() {
        let config = BrowserConfig::new()
            .visible()
            .with_window_size(1280, 720)
            .with_chrome_path("/usr/bin/chromium")
            .with_args(vec!["--lang=ru".to_string()]);

        assert!(!config.headless);
        assert_eq!(config.chrome_args()[0], "--window-size=1280,720");
        assert!(config.chrome_args().contains(&"--lang=ru".to_string()));
        assert_eq!(config.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
    }

    #[tokio::test]
    #[ignore] // Requires Chrome to be installed
    async fn browser_launch_and_close() {
        let browser = CatalogBrowser::launch(BrowserConfig::default())
            .await
            .expect("failed to launch browser");

        assert!(!browser.is_closed().await);
        let profile = browser.profile_dir().expect("profile directory").to_path_buf();
        assert!(profile.is_dir());

        browser.close().await.expect("failed to close browser");
        assert!(!profile.exists());
    }
}
