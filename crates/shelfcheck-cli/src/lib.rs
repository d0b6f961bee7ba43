//! Shelfcheck CLI - verifies that a marketplace catalog only shows products
//! matching the filters applied to it.
//!
//! # Architecture
//!
//! - [`cli`] - argument parsing with clap
//! - [`config`] - `shelfcheck.json` / `shelfcheck.toml` loading and validation
//! - [`commands`] - `verify`, `check` and `init`
//! - [`error`] - error types with actionable hints
//! - [`logger`] - tracing setup
//! - [`ui`] - terminal messages and spinners
//!
//! # Example
//!
//! ```rust,no_run
//! use shelfcheck_cli::{config::ShelfConfig, error::Result};
//!
//! fn main() -> Result<()> {
//!     let config = ShelfConfig::load(None, &Default::default())?;
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ResultExt};
