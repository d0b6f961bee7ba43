//! Logging setup for the CLI.
//!
//! Everything logs through `tracing`; this module installs the subscriber.
//! `--verbose` shows debug output from the shelfcheck crates, `--quiet`
//! shows errors only, and otherwise `RUST_LOG` or the info level applies.
//!
//! ```rust,no_run
//! use shelfcheck_cli::logger::init_logger;
//! use tracing::info;
//!
//! init_logger(false, false, false);
//! info!("Starting verification");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_DIRECTIVES: &str =
    "shelfcheck=debug,shelfcheck_cli=debug,shelfcheck_core=debug,shelfcheck_browser=debug";

const QUIET_DIRECTIVES: &str = "error";

// chromiumoxide is chatty at info level, so only our crates are enabled
const DEFAULT_DIRECTIVES: &str =
    "shelfcheck=info,shelfcheck_cli=info,shelfcheck_core=info,shelfcheck_browser=info";

/// Builds the filter for the given verbosity flags.
///
/// `verbose` wins over `quiet`; clap already rejects both together.
#[must_use]
pub fn env_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_DIRECTIVES)
    } else if quiet {
        EnvFilter::new(QUIET_DIRECTIVES)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
    }
}

/// Installs the global tracing subscriber.
///
/// Call once, before anything logs. Output goes to stderr so that stdout
/// stays clean for `check --schema`.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(env_filter(verbose, quiet), no_color);
}

/// Installs the global subscriber with a custom filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // The subscriber is global, so these only exercise filter construction.

    #[test]
    fn verbose_enables_debug_for_our_crates() {
        let filter = env_filter(true, false).to_string();
        assert!(filter.contains("shelfcheck_core=debug"));
        assert!(filter.contains("shelfcheck_browser=debug"));
    }

    #[test]
    fn quiet_shows_errors_only() {
        assert_eq!(env_filter(false, true).to_string(), "error");
    }

    #[test]
    fn verbose_wins_over_quiet() {
        assert!(env_filter(true, true).to_string().contains("debug"));
    }
}
