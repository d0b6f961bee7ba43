//! Error types for browser operations.
//!
//! Browser failures are infrastructure failures from the verifier's point
//! of view. They convert into [`VerifyError::Driver`] so the traversal
//! engine can propagate them without knowing about Chrome.

use shelfcheck_core::VerifyError;
use std::time::Duration;
use thiserror::Error;

/// The main error type for all browser operations.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Failed to launch the browser process.
    ///
    /// This typically occurs when Chrome/Chromium is not installed,
    /// or when there are permission issues with the executable.
    #[error("failed to launch browser: {reason}")]
    LaunchFailed {
        /// Human-readable reason for the launch failure
        reason: String,
        /// Optional underlying error that caused the failure
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to establish Chrome DevTools Protocol connection.
    #[error("CDP connection failed: {0}")]
    ConnectionFailed(String),

    /// Navigation to a URL failed or timed out.
    #[error("navigation to '{url}' failed: {reason}")]
    NavigationFailed {
        /// The URL that failed to load
        url: String,
        /// Reason for the navigation failure
        reason: String,
    },

    /// A wait condition was not satisfied within the timeout.
    #[error("wait condition '{condition}' timed out after {timeout:?}")]
    WaitTimeout {
        /// Description of the condition that timed out
        condition: String,
        /// How long we waited before timing out
        timeout: Duration,
    },

    /// JavaScript execution in the page context failed.
    #[error("JavaScript execution failed: {0}")]
    ScriptExecutionFailed(String),

    /// A page element the driver relies on is missing.
    #[error("element not found: {what}")]
    ElementNotFound {
        /// Description of the element, usually with its locator
        what: String,
    },

    /// Clicking, hovering or typing into an element failed.
    #[error("failed to {action}: {reason}")]
    InteractionFailed {
        /// What was being attempted
        action: String,
        /// Reason reported by the browser
        reason: String,
    },

    /// An operation was attempted on a closed browser instance.
    #[error("browser instance is already closed")]
    AlreadyClosed,

    /// Wraps errors from the chromiumoxide library.
    #[error("chromiumoxide error: {0}")]
    ChromiumOxide(#[from] chromiumoxide::error::CdpError),

    /// Generic I/O errors (file access, network, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrowserError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::ElementNotFound { what: what.into() }
    }

    pub(crate) fn interaction(action: impl Into<String>, reason: impl ToString) -> Self {
        Self::InteractionFailed {
            action: action.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<BrowserError> for VerifyError {
    fn from(err: BrowserError) -> Self {
        VerifyError::driver(err)
    }
}

/// A specialized Result type for browser operations.
pub type Result<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_errors_become_driver_failures() {
        let err: VerifyError = BrowserError::WaitTimeout {
            condition: "preloader to disappear".to_string(),
            timeout: Duration::from_secs(20),
        }
        .into();

        assert!(matches!(err, VerifyError::Driver(_)));
        assert!(!err.is_verification_failure());
        assert!(err.to_string().contains("preloader to disappear"));
    }

    #[test]
    fn interaction_error_names_the_action() {
        let err = BrowserError::interaction("click next page", "node is detached");
        assert_eq!(err.to_string(), "failed to click next page: node is detached");
    }
}
