//! Detail-page worker pool.
//!
//! K workers share one [`TaskQueue`]. Each owns a single document view, claims
//! jobs until the queue is empty and records exactly one result per claimed
//! job. A destroyed view makes its worker drain the whole queue as empty
//! results, so the output always has one entry per input job.

use crate::heuristics::{DocumentSnapshot, HeuristicChain, PHONE_MARKUP_SELECTOR};
use crate::progress::ProgressReporter;
use crate::queue::TaskQueue;
use crate::scripts;
use futures::future::join_all;
use leadscan_browser::{evaluate_as, BrowserError, DocumentView, ViewFactory};
use leadscan_core::{ExtractionConfig, ExtractionJob, ExtractionResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Concurrency, retry and timing limits for the worker pool.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Maximum number of jobs processed at once
    pub concurrency: usize,
    /// Extra attempts per job after a recoverable failure
    pub retry_budget: u32,
    /// Fixed pause between attempts
    pub retry_delay: Duration,
    /// Navigation limit for one detail page
    pub detail_timeout: Duration,
    /// How long to wait for phone markup before running the heuristics
    pub phone_wait: Duration,
}

impl From<&ExtractionConfig> for PoolSettings {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            retry_budget: config.retry_budget,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            detail_timeout: Duration::from_secs(config.detail_timeout_secs),
            phone_wait: Duration::from_millis(config.phone_wait_ms),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::from(&ExtractionConfig::default())
    }
}

/// How a single job ended.
#[derive(Debug)]
enum JobOutcome {
    /// Heuristics ran; the phone may still be empty.
    Extracted(String),
    /// Every attempt failed recoverably or the failure was not retryable.
    GaveUp,
    /// The worker's view is gone.
    ViewDestroyed,
}

/// Counters and results shared by every worker of one run.
struct PoolState {
    total: usize,
    completed: AtomicUsize,
    results: Mutex<Vec<ExtractionResult>>,
}

impl PoolState {
    fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            results: Mutex::new(Vec::with_capacity(total)),
        }
    }

    /// Append one terminal result and return the new completion count.
    fn record(&self, result: ExtractionResult) -> usize {
        let mut results = self.results.lock().unwrap_or_else(PoisonError::into_inner);
        results.push(result);
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record_and_report(&self, result: ExtractionResult, reporter: &dyn ProgressReporter) {
        let done = self.record(result);
        reporter.report(
            &format!("Extracting name and phone... ({done}/{})", self.total),
            done,
        );
    }

    fn into_results(self) -> Vec<ExtractionResult> {
        self.results
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bounded set of workers draining a [`TaskQueue`].
pub struct WorkerPool {
    settings: PoolSettings,
    chain: Arc<HeuristicChain>,
}

impl WorkerPool {
    /// Pool that runs `chain` on every detail page.
    pub fn new(settings: PoolSettings, chain: Arc<HeuristicChain>) -> Self {
        Self { settings, chain }
    }

    /// Settings in use.
    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    /// Process every job in `queue` and return one result per job.
    ///
    /// Results are in completion order. Nothing here fails: jobs that cannot be
    /// processed are recorded with an empty phone.
    pub async fn run<F>(
        &self,
        factory: &F,
        queue: &TaskQueue,
        reporter: &dyn ProgressReporter,
    ) -> Vec<ExtractionResult>
    where
        F: ViewFactory + ?Sized,
    {
        let total = queue.len();
        let state = PoolState::new(total);
        if total == 0 {
            return Vec::new();
        }

        let workers = self.settings.concurrency.min(total);
        info!("Starting {} workers for {} jobs", workers, total);

        join_all((0..workers).map(|id| self.worker(id, factory, queue, &state, reporter))).await;

        // Workers that never got a view leave their share behind.
        let stranded = queue.drain();
        if !stranded.is_empty() {
            warn!(
                "{} jobs left unprocessed, recording them without a phone",
                stranded.len()
            );
            for job in stranded {
                state.record_and_report(job.into_empty_result(), reporter);
            }
        }

        let results = state.into_results();
        debug_assert_eq!(results.len(), total);
        results
    }

    async fn worker<F>(
        &self,
        id: usize,
        factory: &F,
        queue: &TaskQueue,
        state: &PoolState,
        reporter: &dyn ProgressReporter,
    ) where
        F: ViewFactory + ?Sized,
    {
        let view = match factory.open_view().await {
            Ok(view) => view,
            Err(e) => {
                error!("Worker {} could not open a view: {}", id, e);
                return;
            }
        };

        while let Some(job) = queue.claim_next() {
            debug!("Worker {} claimed job {} ({})", id, job.position, job.item);

            match self.process_job(&view, &job).await {
                JobOutcome::Extracted(phone) => {
                    state.record_and_report(job.into_result(phone), reporter);
                }
                JobOutcome::GaveUp => {
                    state.record_and_report(job.into_empty_result(), reporter);
                }
                JobOutcome::ViewDestroyed => {
                    error!(
                        "Worker {} lost its view on {}; skipping the remaining queue",
                        id, job.item
                    );
                    state.record_and_report(job.into_empty_result(), reporter);
                    for pending in queue.drain() {
                        state.record_and_report(pending.into_empty_result(), reporter);
                    }
                    let recorded = state.completed.load(Ordering::SeqCst);
                    reporter.report(
                        &format!("Partial extraction: {recorded} contacts recorded."),
                        recorded,
                    );
                    // A destroyed view cannot be closed.
                    return;
                }
            }
        }

        if let Err(e) = view.close().await {
            debug!("Worker {} failed to close its view: {}", id, e);
        }
    }

    /// Run one job with the retry budget.
    async fn process_job<V>(&self, view: &V, job: &ExtractionJob) -> JobOutcome
    where
        V: DocumentView + ?Sized,
    {
        let attempts = self.settings.retry_budget + 1;

        for attempt in 1..=attempts {
            match self.attempt(view, &job.item.detail_url).await {
                Ok(phone) => return JobOutcome::Extracted(phone),
                Err(e) if e.is_view_destroyed() => return JobOutcome::ViewDestroyed,
                Err(e) if !e.is_recoverable() => {
                    warn!("Giving up on {}: {}", job.item, e);
                    return JobOutcome::GaveUp;
                }
                Err(e) => {
                    if attempt < attempts {
                        warn!(
                            "Attempt {}/{} failed for {}: {}, retrying in {:?}...",
                            attempt, attempts, job.item, e, self.settings.retry_delay
                        );
                        if !self.settings.retry_delay.is_zero() {
                            tokio::time::sleep(self.settings.retry_delay).await;
                        }
                    } else {
                        warn!(
                            "Retries exhausted for {} after {} attempts: {}",
                            job.item, attempts, e
                        );
                    }
                }
            }
        }

        JobOutcome::GaveUp
    }

    /// Navigate, give the phone control a moment to render and run the chain.
    async fn attempt<V>(&self, view: &V, url: &str) -> Result<String, BrowserError>
    where
        V: DocumentView + ?Sized,
    {
        view.navigate(url, self.settings.detail_timeout).await?;

        if let Err(e) = view
            .wait_for_selector(PHONE_MARKUP_SELECTOR, self.settings.phone_wait)
            .await
        {
            if e.is_view_destroyed() {
                return Err(e);
            }
            debug!("No phone markup rendered on {}: {}", url, e);
        }

        let snapshot: DocumentSnapshot = evaluate_as(view, scripts::SNAPSHOT).await?;
        Ok(self.chain.detect_phone(&snapshot))
    }
}
