//! Polling waits with a timeout.
//!
//! Catalog pages load products lazily and re-render after every filter
//! change, so nearly every driver operation is "do something, then poll the
//! DOM until it settles". Conditions are async closures retried at a fixed
//! interval until they hold or the timeout expires.

use crate::error::{BrowserError, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::trace;

/// Default timeout for wait operations (60 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default poll interval for checking conditions (250ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Configuration for wait operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Maximum time to wait for the condition.
    pub timeout: Duration,

    /// How often to check if the condition is satisfied.
    pub poll_interval: Duration,
}

impl WaitConfig {
    /// Creates a new wait configuration.
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Creates a config with custom timeout and default poll interval.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }

    /// Same poll interval, timeout capped at `ceiling`.
    #[must_use]
    pub fn capped(self, ceiling: Duration) -> Self {
        Self::new(self.timeout.min(ceiling), self.poll_interval)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Waits for a fallible condition.
///
/// Errors from the condition are treated like `false`: the DOM is often
/// mid-render while we poll, and a script touching a detached node fails
/// transiently.
///
/// # Errors
///
/// Returns `WaitTimeout` naming `description` when the timeout expires.
pub async fn wait_for_result<F, Fut>(
    condition: F,
    config: WaitConfig,
    description: &str,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();

    loop {
        match condition().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(err) => trace!(condition = description, error = %err, "Wait check failed"),
        }

        if start.elapsed() >= config.timeout {
            return Err(timeout(description, config));
        }

        sleep(config.poll_interval).await;
    }
}

/// Waits for a poll to produce a value.
///
/// Like [`wait_for_result`], but the poll returns `Some(value)` once the
/// condition holds and the value is handed back to the caller.
///
/// # Errors
///
/// Returns `WaitTimeout` naming `description` when the timeout expires.
pub async fn wait_for_value<F, Fut, T>(poll: F, config: WaitConfig, description: &str) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let start = Instant::now();

    loop {
        match poll().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(err) => trace!(condition = description, error = %err, "Wait check failed"),
        }

        if start.elapsed() >= config.timeout {
            return Err(timeout(description, config));
        }

        sleep(config.poll_interval).await;
    }
}

/// Polls `poll` until it returns the same value `settle` times in a row.
///
/// Used to scroll a virtualized list until no more items appear. Returns
/// the settled value.
///
/// # Errors
///
/// Returns `WaitTimeout` if the value keeps changing past the timeout, or
/// the first error from `poll`.
pub async fn wait_until_stable<F, Fut, T>(
    poll: F,
    settle: usize,
    config: WaitConfig,
    description: &str,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
    T: PartialEq,
{
    let start = Instant::now();
    let mut last = poll().await?;
    let mut unchanged = 0;

    loop {
        if unchanged >= settle {
            return Ok(last);
        }

        if start.elapsed() >= config.timeout {
            return Err(timeout(description, config));
        }

        sleep(config.poll_interval).await;

        let current = poll().await?;
        if current == last {
            unchanged += 1;
        } else {
            unchanged = 0;
            last = current;
        }
    }
}

fn timeout(description: &str, config: WaitConfig) -> BrowserError {
    BrowserError::WaitTimeout {
        condition: description.to_string(),
        timeout: config.timeout,
    }
}
