//! Paginated verification of a filtered catalog.
//!
//! # State machine
//!
//! ```text
//!             all products pass                 next page exists,
//!  Scanning ───────────────────▶ Advancing ───── budget left ─────▶ Scanning (page + 1)
//!     │                              │  │
//!     │ first mismatch               │  └─ budget spent ──▶ Done(Timeout)
//!     ▼                              ▼
//!  Done(Failure)               no next page ──▶ Done(Success)
//! ```
//!
//! The budget is checked once per page transition, in whole elapsed
//! minutes, after the driver has advanced. A single slow page fetch can
//! therefore overshoot it; the engine never interrupts a driver call.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, debug_span, info, info_span, warn, Instrument};

use crate::driver::{PageDriver, ProductRef};
use crate::error::{MismatchReport, Result, VerifyError};
use crate::evaluator::evaluate;
use crate::filter::Filter;
use crate::product::Product;

/// One full verification run: the filters and the clock.
#[derive(Debug, Clone)]
pub struct VerificationSession {
    filters: Vec<Arc<dyn Filter>>,
    started_at: Instant,
    timeout_minutes: u64,
}

impl VerificationSession {
    /// Starts a session now.
    #[must_use]
    pub fn new(filters: Vec<Arc<dyn Filter>>, timeout_minutes: u64) -> Self {
        Self {
            filters,
            started_at: Instant::now(),
            timeout_minutes,
        }
    }

    /// Overrides the start time, e.g. to count time spent applying filters.
    #[must_use]
    pub fn with_start(mut self, started_at: Instant) -> Self {
        self.started_at = started_at;
        self
    }

    /// Active filters, in evaluation order.
    #[must_use]
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    /// Configured budget in minutes.
    #[must_use]
    pub fn timeout_minutes(&self) -> u64 {
        self.timeout_minutes
    }

    /// Time since the session started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// True once the elapsed whole minutes reach the budget.
    #[must_use]
    pub fn budget_exhausted(&self) -> bool {
        self.elapsed().as_secs() / 60 >= self.timeout_minutes
    }
}

/// How a traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every page was scanned and every product matched
    Success,
    /// A product failed a filter, or the driver failed
    Failure,
    /// The budget ran out before the last page
    Timeout,
}

/// Where the engine is in a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    /// Not started yet
    Idle,
    /// Evaluating the products of `page` (1-based)
    Scanning {
        /// Page being scanned
        page: usize,
    },
    /// `page` passed; asking the driver for the next one
    Advancing {
        /// Page that was just scanned
        page: usize,
    },
    /// Terminal
    Done(Outcome),
}

/// Statistics of a successful traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalSummary {
    /// Pages fully verified
    pub pages_scanned: usize,
    /// Products checked across all pages
    pub products_checked: usize,
    /// Wall-clock time since the session started
    pub elapsed: Duration,
}

/// Drives a [`PageDriver`] through a filtered catalog.
#[derive(Debug)]
pub struct TraversalEngine<D> {
    driver: D,
    state: TraversalState,
}

impl<D: PageDriver> TraversalEngine<D> {
    /// Creates an engine around `driver`.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: TraversalState::Idle,
        }
    }

    /// State after the last traversal step.
    #[must_use]
    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Shared access to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Exclusive access to the driver, for navigation between checks.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Consumes the engine and returns its driver.
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Puts the page into the filtered state, one filter at a time.
    ///
    /// # Errors
    ///
    /// Returns `FilterNotFound` or `FilterValueNotFound` from the first
    /// filter that cannot be applied.
    pub async fn apply_filters(&mut self, filters: &[Arc<dyn Filter>]) -> Result<()> {
        for filter in filters {
            info!(filter = %filter.describe(), kind = filter.kind(), "Applying filter");
            filter.apply(&mut self.driver).await?;
        }
        Ok(())
    }

    /// Verifies every product on every page against the session's filters.
    ///
    /// Starts on whatever page the driver is positioned on.
    ///
    /// # Errors
    ///
    /// - `FilterMismatch` for the first product failing any filter
    /// - `VerificationTimeout` when the budget runs out between pages
    /// - `Driver` when the page driver fails
    pub async fn verify_all(&mut self, session: &VerificationSession) -> Result<TraversalSummary> {
        info!(
            filters = session.filters().len(),
            budget_minutes = session.timeout_minutes(),
            "Verifying catalog against filters"
        );

        let mut products_checked = 0;
        self.state = TraversalState::Scanning { page: 1 };

        loop {
            match self.state {
                TraversalState::Scanning { page } => {
                    let scanned = self
                        .scan_page(page, session)
                        .instrument(info_span!("page", page))
                        .await;
                    match scanned {
                        Ok(count) => {
                            products_checked += count;
                            self.state = TraversalState::Advancing { page };
                        }
                        Err(err) => return Err(self.finish(Outcome::Failure, err)),
                    }
                }
                TraversalState::Advancing { page } => {
                    let advanced = match self.driver.advance_to_next_page().await {
                        Ok(advanced) => advanced,
                        Err(err) => return Err(self.finish(Outcome::Failure, err)),
                    };

                    if !advanced {
                        self.state = TraversalState::Done(Outcome::Success);
                        let summary = TraversalSummary {
                            pages_scanned: page,
                            products_checked,
                            elapsed: session.elapsed(),
                        };
                        info!(
                            pages = summary.pages_scanned,
                            products = summary.products_checked,
                            "All products match the filters"
                        );
                        return Ok(summary);
                    }

                    if session.budget_exhausted() {
                        let err = VerifyError::VerificationTimeout {
                            elapsed: session.elapsed(),
                            budget_minutes: session.timeout_minutes(),
                            pages_scanned: page,
                        };
                        return Err(self.finish(Outcome::Timeout, err));
                    }

                    debug!(page = page + 1, "Advanced to next page");
                    self.state = TraversalState::Scanning { page: page + 1 };
                }
                TraversalState::Idle | TraversalState::Done(_) => {
                    self.state = TraversalState::Scanning { page: 1 };
                }
            }
        }
    }

    /// Returns the `n`-th (1-based) product of the current page.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientProducts` when the page has fewer than `n`
    /// products or `n` is zero.
    pub async fn find_nth_product(&mut self, n: usize) -> Result<Product> {
        let mut products = self.current_products().await?;
        let actual = products.len();

        if n == 0 || actual < n {
            return Err(VerifyError::InsufficientProducts {
                expected: n.max(1),
                actual,
            });
        }

        Ok(products.swap_remove(n - 1))
    }

    /// Number of products on the current page.
    pub async fn count_on_current_page(&mut self) -> Result<usize> {
        Ok(self.driver.products_on_current_page().await?.len())
    }

    /// Checks that the current page shows more than `threshold` products.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientProducts` otherwise.
    pub async fn assert_more_than(&mut self, threshold: usize) -> Result<usize> {
        let actual = self.count_on_current_page().await?;
        if actual > threshold {
            info!(count = actual, threshold, "Enough products on the page");
            Ok(actual)
        } else {
            Err(VerifyError::InsufficientProducts {
                expected: threshold.saturating_add(1),
                actual,
            })
        }
    }

    /// Checks that `product` is on the current page, by identity.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` otherwise.
    pub async fn assert_contains(&mut self, product: &Product) -> Result<()> {
        if self.current_products().await?.contains(product) {
            Ok(())
        } else {
            Err(VerifyError::ProductNotFound {
                title: product.title().to_string(),
            })
        }
    }

    async fn current_products(&mut self) -> Result<Vec<Product>> {
        let raw = self.driver.products_on_current_page().await?;
        Ok(raw.into_iter().map(Product::from_raw).collect())
    }

    async fn scan_page(&mut self, page: usize, session: &VerificationSession) -> Result<usize> {
        let products = self.current_products().await?;
        debug!(count = products.len(), "Scanning page");

        for (index, product) in products.iter().enumerate() {
            let evaluation = {
                let _span = debug_span!("product", index, title = product.title()).entered();
                let evaluation = evaluate(product, session.filters());
                debug!(verdicts = %evaluation, "Checked product");
                evaluation
            };

            if evaluation.all_passed() {
                continue;
            }

            let product = ProductRef {
                page,
                index,
                product: product.clone(),
            };
            let snapshot = match self.driver.capture_snapshot(&product).await {
                Ok(png) => Some(png),
                Err(err) => {
                    warn!(error = %err, "Could not capture product snapshot");
                    None
                }
            };

            return Err(VerifyError::FilterMismatch(Box::new(MismatchReport {
                product,
                evaluation,
                snapshot,
            })));
        }

        Ok(products.len())
    }

    fn finish(&mut self, outcome: Outcome, err: VerifyError) -> VerifyError {
        warn!(?outcome, error = %err, "Catalog verification stopped");
        self.state = TraversalState::Done(outcome);
        err
    }
}
