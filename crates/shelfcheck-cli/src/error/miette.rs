//! Miette report conversion for CLI errors.

use ::miette::{miette, Report};
use shelfcheck_core::{MismatchReport, VerifyError};

use crate::error::CliError;

/// Converts a `CliError` into a miette report for display.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Verify(e) => verify_error_to_miette(e),
        CliError::Browser(e) => miette!(
            help = "Check that Chrome or Chromium is installed, or set chromePath",
            "Browser error: {e}"
        ),
        other => miette!("{other}"),
    }
}

/// Converts a `VerifyError` into a miette report.
pub fn verify_error_to_miette(err: VerifyError) -> Report {
    match err {
        VerifyError::FilterMismatch(report) => mismatch_to_miette(&report),
        VerifyError::VerificationTimeout {
            elapsed,
            budget_minutes,
            pages_scanned,
        } => miette!(
            help = "Raise timeoutMinutes or narrow the filters",
            "Verification timed out after {}s with {pages_scanned} page(s) verified (budget: {budget_minutes} min)",
            elapsed.as_secs()
        ),
        VerifyError::FilterNotFound { name } => miette!(
            help = "Filter names are matched against the sidebar text, ignoring case",
            "Filter '{name}' not found on the page"
        ),
        other => miette!("{other}"),
    }
}

fn mismatch_to_miette(report: &MismatchReport) -> Report {
    let failed: Vec<String> = report
        .evaluation
        .failed()
        .map(|verdict| format!("  - {}", verdict.filter.describe()))
        .collect();

    miette!(
        "Product does not match the applied filters\n\n  {}\n  {}\n  page {}, position {}\n\nFailed filters:\n{}",
        report.product.product.title(),
        report.product.product.url(),
        report.product.page,
        report.product.index + 1,
        failed.join("\n")
    )
}
