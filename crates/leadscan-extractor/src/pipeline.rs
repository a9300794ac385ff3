//! The extraction entry point.

use crate::error::{ExtractionError, Result};
use crate::heuristics::{HeuristicChain, PhoneLocale};
use crate::listing::{validate_listing_url, ListingEnumerator, ListingSettings};
use crate::pool::{PoolSettings, WorkerPool};
use crate::progress::ProgressReporter;
use crate::queue::TaskQueue;
use crate::report::ExtractionReport;
use leadscan_browser::{DocumentView, ViewFactory};
use leadscan_core::{AppConfig, ExtractionResult, ListingConfig};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs listing enumeration and the detail worker pool against views from `F`.
///
/// `Extractor<()>` is a prepared extractor without views yet; see
/// [`Extractor::prepare`].
pub struct Extractor<F> {
    factory: F,
    listing_config: ListingConfig,
    enumerator: ListingEnumerator,
    pool: WorkerPool,
}

impl Extractor<()> {
    /// Validate `config` and compile the phone locale without any views.
    ///
    /// Every configuration error surfaces here, so nothing expensive has to
    /// be started before the configuration is known to be usable.
    pub fn prepare(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let locale = PhoneLocale::from_config(&config.locale)?;
        debug!("Using phone locale {}", locale.name());

        Ok(Self {
            factory: (),
            listing_config: config.listing.clone(),
            enumerator: ListingEnumerator::new(ListingSettings::from_config(
                &config.listing,
                &config.browser,
            )),
            pool: WorkerPool::new(
                PoolSettings::from(&config.extraction),
                Arc::new(HeuristicChain::new(locale)),
            ),
        })
    }
}

impl<F> Extractor<F> {
    /// Attach the view factory. Cannot fail.
    pub fn with_factory<G: ViewFactory>(self, factory: G) -> Extractor<G> {
        Extractor {
            factory,
            listing_config: self.listing_config,
            enumerator: self.enumerator,
            pool: self.pool,
        }
    }
}

impl<F: ViewFactory> Extractor<F> {
    /// Build an extractor from validated configuration.
    pub fn new(factory: F, config: &AppConfig) -> Result<Self> {
        Ok(Extractor::prepare(config)?.with_factory(factory))
    }

    /// The view factory used for every run.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Give the view factory back, e.g. to shut the browser down.
    pub fn into_factory(self) -> F {
        self.factory
    }

    /// Extract one `{ name, phone }` record per unique listing item.
    ///
    /// Once enumeration succeeds the result has exactly one entry per item,
    /// whatever happens to individual detail pages.
    pub async fn extract(
        &self,
        listing_url: &str,
        on_progress: &dyn ProgressReporter,
    ) -> Result<Vec<ExtractionResult>> {
        let listing_url = validate_listing_url(listing_url, &self.listing_config)?;
        info!("Starting extraction for {}", listing_url);

        let view = self
            .factory
            .open_view()
            .await
            .map_err(ExtractionError::ListingUnavailable)?;
        let enumerated = self
            .enumerator
            .enumerate(&view, listing_url.as_str(), on_progress)
            .await;
        if let Err(e) = view.close().await {
            debug!("Failed to close listing view: {}", e);
        }
        let items = enumerated?;

        let total = items.len();
        on_progress.report(
            &format!("{total} listings found. Extracting name and phone..."),
            total,
        );

        let queue = TaskQueue::from_items(items);
        let results = self.pool.run(&self.factory, &queue, on_progress).await;

        on_progress.report(
            &format!("Extraction finished! {} contacts collected.", results.len()),
            results.len(),
        );
        info!("Extraction finished: {}", ExtractionReport::summarize(&results));

        Ok(results)
    }
}
