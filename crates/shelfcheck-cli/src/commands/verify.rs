//! Verify command implementation.
//!
//! Runs every selected scenario in Chrome, one after another, each in a
//! fresh tab:
//!
//! 1. Open the site and wait for its title
//! 2. Open the catalog section item
//! 3. Apply the filters
//! 4. Require more than `minProducts` products on the first page
//! 5. Check every product on every page against the filters
//! 6. Go back to page 1 and take the first product
//! 7. Search for its title
//! 8. Expect it among the search results
//!
//! A failing scenario does not stop the ones after it. The command fails
//! with the first failure once all of them ran.

use shelfcheck_browser::{CatalogBrowser, CatalogPage};
use shelfcheck_core::{
    Filter, MismatchReport, Product, ProductRef, TraversalEngine, TraversalSummary,
    VerificationSession,
};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::cli::VerifyArgs;
use crate::config::{ConfigOverrides, Scenario, ShelfConfig};
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// What a successful scenario found.
#[derive(Debug)]
struct ScenarioReport {
    first_page_products: usize,
    summary: TraversalSummary,
    searched: Product,
}

impl VerifyArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            target_url: self.target_url.clone(),
            timeout_minutes: self.timeout_minutes,
            headless: self.headed.then_some(false),
            evidence_dir: self.evidence_dir.clone(),
        }
    }
}

/// Execute the verify command.
///
/// The browser is closed on every path, including failures.
///
/// # Errors
///
/// Returns configuration errors, browser errors, and the first
/// verification failure (`FilterMismatch`, `VerificationTimeout`, ...).
pub async fn execute(args: VerifyArgs) -> Result<()> {
    let config = ShelfConfig::load(args.config.as_deref(), &args.overrides())?;
    config.validate()?;
    let scenarios = config.select_scenarios(&args.scenarios)?;

    let started = Instant::now();
    let browser = step("Launching browser", "Browser launched", async {
        CatalogBrowser::launch(config.browser_config()).await
    })
    .await?;

    let total = scenarios.len();
    let mut failures = Vec::new();
    for (n, scenario) in scenarios.into_iter().enumerate() {
        ui::info(&format!("Scenario {}/{total}: {}", n + 1, scenario.name));
        match run_scenario(&browser, &config, scenario).await {
            Ok(report) => report_success(scenario, &report),
            Err(err) => {
                ui::error(&format!("Scenario '{}' failed: {err}", scenario.name));
                failures.push(err);
            }
        }
    }

    let closed = browser.close().await;

    let failed = failures.len();
    if let Some(first) = failures.into_iter().next() {
        if let Err(err) = closed {
            warn!(error = %err, "Could not close the browser");
        }
        ui::error(&format!("{failed} of {total} scenario(s) failed"));
        return Err(first);
    }
    closed?;

    ui::success(&format!(
        "{total} scenario(s) passed in {}",
        ui::format_duration(started.elapsed())
    ));
    Ok(())
}

fn report_success(scenario: &Scenario, report: &ScenarioReport) {
    ui::success(&format!(
        "{}: {} product(s) on {} page(s) match every filter",
        scenario.name, report.summary.products_checked, report.summary.pages_scanned
    ));
    ui::info(&format!(
        "First page showed {} products; '{}' found by search",
        report.first_page_products,
        report.searched.title()
    ));
}

/// Runs one scenario in its own tab and closes the tab afterwards.
async fn run_scenario(
    browser: &CatalogBrowser,
    config: &ShelfConfig,
    scenario: &Scenario,
) -> Result<ScenarioReport> {
    let filters = scenario.build_filters()?;
    let catalog = browser.open_catalog_page(config.locators.clone()).await?;
    let mut engine = TraversalEngine::new(catalog);

    let outcome = drive_scenario(&mut engine, config, scenario, filters).await;

    if let Err(err) = engine.into_driver().close().await {
        warn!(error = %err, scenario = %scenario.name, "Could not close the scenario tab");
    }
    outcome
}

async fn drive_scenario(
    engine: &mut TraversalEngine<CatalogPage>,
    config: &ShelfConfig,
    scenario: &Scenario,
    filters: Vec<Arc<dyn Filter>>,
) -> Result<ScenarioReport> {
    let site = engine.driver().site();
    step("Opening site", "Site opened", async {
        site.open(&config.target_url, &config.expected_title).await
    })
    .await?;

    step(
        &format!("Opening {} / {}", scenario.catalog_section, scenario.section_item),
        &format!("Opened {}", scenario.section_item),
        async {
            site.open_catalog().await?;
            site.hover_section(&scenario.catalog_section).await?;
            site.open_section_item(&scenario.section_item).await
        },
    )
    .await?;

    step(
        "Applying filters",
        &format!("Applied {} filter(s)", filters.len()),
        engine.apply_filters(&filters),
    )
    .await?;

    let first_page_products = step(
        "Counting products",
        &format!("More than {} products on the first page", config.min_products),
        engine.assert_more_than(config.min_products),
    )
    .await?;

    let session = VerificationSession::new(filters, config.timeout_minutes);
    let spinner = ui::Spinner::new("Checking every product against the filters");
    let summary = match engine.verify_all(&session).await {
        Ok(summary) => {
            spinner.finish(&format!(
                "Checked {} product(s) on {} page(s)",
                summary.products_checked, summary.pages_scanned
            ));
            summary
        }
        Err(err) => {
            spinner.fail("Verification failed");
            if let (Some(report), Some(dir)) = (err.mismatch(), config.evidence_dir.as_deref()) {
                record_evidence(&dir.join(scenario.evidence_dir_name()), report).await;
            }
            return Err(err.into());
        }
    };

    step("Returning to page 1", "Back on page 1", async {
        engine.driver().site().go_to_page(1).await
    })
    .await?;
    let first = engine.find_nth_product(1).await?;

    step(
        &format!("Searching for '{}'", first.title()),
        "Search results loaded",
        async { engine.driver().site().search(first.title()).await },
    )
    .await?;

    step(
        "Looking for the product in the results",
        "Product found in search results",
        engine.assert_contains(&first),
    )
    .await?;

    Ok(ScenarioReport {
        first_page_products,
        summary,
        searched: first,
    })
}

/// Runs one scenario step behind a spinner.
async fn step<T, E>(
    message: &str,
    done: &str,
    work: impl Future<Output = std::result::Result<T, E>>,
) -> Result<T>
where
    E: Into<CliError>,
{
    let spinner = ui::Spinner::new(message);
    match work.await {
        Ok(value) => {
            spinner.finish(done);
            Ok(value)
        }
        Err(err) => {
            spinner.fail(message);
            Err(err.into())
        }
    }
}

/// File name of the screenshot of a mismatching product.
fn evidence_file_name(product: &ProductRef) -> String {
    format!("mismatch-p{}-i{}.png", product.page, product.index + 1)
}

/// Writes the mismatch snapshot into `dir`, if there is one.
///
/// Returns the written path, or `None` when there was no snapshot.
async fn save_evidence(dir: &Path, report: &MismatchReport) -> Result<Option<PathBuf>> {
    let Some(png) = &report.snapshot else {
        return Ok(None);
    };

    tokio::fs::create_dir_all(dir)
        .await
        .with_hint(format!("Check that {} is writable, or change evidenceDir", dir.display()))?;
    let path = dir.join(evidence_file_name(&report.product));
    tokio::fs::write(&path, png)
        .await
        .context(format!("Could not write {}", path.display()))?;
    Ok(Some(path))
}

async fn record_evidence(dir: &Path, report: &MismatchReport) {
    match save_evidence(dir, report).await {
        Ok(Some(path)) => ui::info(&format!("Screenshot saved to {}", path.display())),
        Ok(None) => ui::warning("No screenshot of the mismatching product was captured"),
        Err(err) => ui::warning(&format!("Could not save screenshot: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfcheck_core::Evaluation;
    use tempfile::TempDir;

    fn report(snapshot: Option<Vec<u8>>) -> MismatchReport {
        MismatchReport {
            product: ProductRef {
                page: 3,
                index: 4,
                product: Product::new("Ноутбук ASUS VivoBook", "https://market.example/p/1", 45_000),
            },
            evaluation: Evaluation::default(),
            snapshot,
        }
    }

    #[test]
    fn evidence_name_uses_page_and_position() {
        assert_eq!(evidence_file_name(&report(None).product), "mismatch-p3-i5.png");
    }

    #[tokio::test]
    async fn evidence_is_written() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("evidence").join("notebooks");

        let path = save_evidence(&dir, &report(Some(vec![0x89, 0x50, 0x4E, 0x47])))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(path, dir.join("mismatch-p3-i5.png"));
        assert_eq!(std::fs::read(path).unwrap(), [0x89, 0x50, 0x4E, 0x47]);
    }

    #[tokio::test]
    async fn missing_snapshot_writes_nothing() {
        let temp = TempDir::new().unwrap();
        assert!(save_evidence(temp.path(), &report(None)).await.unwrap().is_none());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unwritable_evidence_dir_carries_a_hint() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("evidence");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = save_evidence(&blocker.join("notebooks"), &report(Some(vec![1])))
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Custom(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("I/O error"), "{msg}");
        assert!(msg.contains("Hint: Check that"), "{msg}");
        assert!(msg.contains("evidenceDir"), "{msg}");
    }

    #[test]
    fn headed_overrides_headless() {
        let args = VerifyArgs {
            headed: true,
            timeout_minutes: Some(2),
            scenarios: vec!["Notebooks".to_string()],
            ..VerifyArgs::default()
        };
        let overrides = args.overrides();
        assert_eq!(overrides.headless, Some(false));
        assert_eq!(overrides.timeout_minutes, Some(2));

        assert!(VerifyArgs::default().overrides().headless.is_none());
    }
}
