//! Error handling for the CLI.
//!
//! `CliError` is what commands return. Domain errors from the core engine,
//! the browser driver and configuration loading convert into it with `?`.
//! [`cli_error_to_miette`] turns it into a report in `main`.
//!
//! ```rust,no_run
//! use shelfcheck_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_config(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Run 'shelfcheck init' to create one")
//! }
//! ```

mod miette;

pub use self::miette::cli_error_to_miette;

use shelfcheck_browser::BrowserError;
use shelfcheck_core::VerifyError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog failed verification, or the engine could not proceed
    #[error("Verification failed: {0}")]
    Verify(#[from] VerifyError),

    /// Chrome could not be launched or driven
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file doesn't exist at the given location
    #[error("Config file not found: {}\n\nHint: Run 'shelfcheck init' or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// Config file extension is neither .json nor .toml
    #[error("Unsupported config format: {}\n\nHint: Use a .json or .toml file", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Sources could not be merged into a configuration
    #[error("{0}\n\nHint: Check shelfcheck.json syntax and field names")]
    Load(String),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Reports a missing file as `FileNotFound` for `path`.
    ///
    /// # Errors
    ///
    /// Returns the original error, converted to `CliError`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Appends a hint to the error message.
    ///
    /// # Errors
    ///
    /// Returns the original error with the hint attached.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefixes the error message.
    ///
    /// # Errors
    ///
    /// Returns the original error with the prefix attached.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{err}\n\nHint: {hint}"))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}
