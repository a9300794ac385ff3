//! Leadscan Extractor - contact extraction from scrolling listing pages.
//!
//! A run has two phases. The [`ListingEnumerator`] scrolls a listing feed until
//! it stops growing and collects one [`ListingItem`](leadscan_core::ListingItem)
//! per unique detail URL. The [`WorkerPool`] then visits every detail page with
//! a bounded number of document views and runs the [`HeuristicChain`] on each.
//!
//! # Guarantees
//!
//! - Once enumeration succeeds, [`Extractor::extract`] returns exactly one
//!   result per unique item, even when detail pages time out or a view crashes
//! - A phone that cannot be found is an empty string, never an error
//! - Progress is reported for every scroll iteration and every finished job
//!
//! # Example
//!
//! ```rust,ignore
//! use leadscan_browser::BrowserEngine;
//! use leadscan_core::AppConfig;
//! use leadscan_extractor::{Extractor, TracingReporter};
//!
//! let config = AppConfig::load_with_env()?;
//! let engine = BrowserEngine::launch(&config.browser).await?;
//! let extractor = Extractor::new(engine, &config)?;
//!
//! let results = extractor
//!     .extract("https://www.google.com/maps/search/pizzaria", &TracingReporter)
//!     .await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod heuristics;
pub mod listing;
pub mod pipeline;
pub mod pool;
pub mod progress;
pub mod queue;
pub mod report;
pub mod scripts;

pub use error::{ExtractionError, Result};
pub use heuristics::{DocumentSnapshot, HeuristicChain, PhoneLocale, PhoneMatch, PhoneStrategy};
pub use listing::{dedup_by_url, validate_listing_url, ListingEnumerator, StabilityTracker};
pub use pipeline::Extractor;
pub use pool::{PoolSettings, WorkerPool};
pub use progress::{
    ChannelReporter, ExtractionEvent, ProgressEvent, ProgressReporter, TracingReporter,
};
pub use queue::TaskQueue;
pub use report::ExtractionReport;
