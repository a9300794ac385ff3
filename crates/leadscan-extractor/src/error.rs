//! Run-level extraction errors.

use leadscan_browser::BrowserError;
use leadscan_core::ConfigError;
use thiserror::Error;

/// Failures that abort a whole run.
///
/// Per-job failures never surface here; they become empty-phone results.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The listing URL was rejected before any browser work
    #[error("Invalid listing URL {url}: {reason}")]
    InvalidListingUrl {
        /// The URL as given
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The listing view could not be opened or loaded
    #[error("Listing view unavailable: {0}")]
    ListingUnavailable(#[source] BrowserError),

    /// A browser failure outside the per-job retry loop
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
