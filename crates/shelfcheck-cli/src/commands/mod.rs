//! Command implementations.
//!
//! - [`verify`] - the end-to-end catalog scenario
//! - [`check`] - configuration validation
//! - [`init`] - example configuration
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod check;
pub mod init;
pub mod verify;

pub use check::execute as check_execute;
pub use init::execute as init_execute;
pub use verify::execute as verify_execute;
