//! Listing enumeration.
//!
//! Scrolls a listing feed until its height and item count stop changing, then
//! reads every rendered item anchor once and deduplicates by detail URL.

use crate::error::{ExtractionError, Result};
use crate::progress::ProgressReporter;
use crate::scripts;
use leadscan_browser::{evaluate_as, DocumentView};
use leadscan_core::{BrowserConfig, ListingConfig, ListingItem};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Name used for anchors without an accessible label.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Selectors and timings for one enumeration.
#[derive(Debug, Clone)]
pub struct ListingSettings {
    /// Scrollable results container
    pub feed_selector: String,
    /// Item anchors inside the feed
    pub item_selector: String,
    /// Limit for loading the listing page
    pub navigation_timeout: Duration,
    /// How long to wait for the feed to render
    pub container_timeout: Duration,
    /// Pixels scrolled per iteration
    pub scroll_increment: u32,
    /// Pause after each scroll
    pub scroll_settle: Duration,
    /// Unchanged checks needed before stopping
    pub stability_threshold: u32,
}

impl ListingSettings {
    /// Settings from the `[listing]` and `[browser]` config sections.
    pub fn from_config(listing: &ListingConfig, browser: &BrowserConfig) -> Self {
        Self {
            feed_selector: listing.feed_selector.clone(),
            item_selector: listing.item_selector.clone(),
            navigation_timeout: Duration::from_secs(browser.navigation_timeout_secs),
            container_timeout: Duration::from_secs(listing.container_timeout_secs),
            scroll_increment: listing.scroll_increment_px,
            scroll_settle: Duration::from_millis(listing.scroll_settle_ms),
            stability_threshold: listing.stability_threshold,
        }
    }
}

/// Counts consecutive scroll iterations that changed nothing.
#[derive(Debug, Clone)]
pub struct StabilityTracker {
    threshold: u32,
    previous: Option<(u64, usize)>,
    unchanged: u32,
}

impl StabilityTracker {
    /// Tracker that stops after `threshold` unchanged checks (at least one).
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            previous: None,
            unchanged: 0,
        }
    }

    /// Record one iteration; returns true once the list is considered complete.
    pub fn observe(&mut self, height: u64, count: usize) -> bool {
        if self.previous == Some((height, count)) {
            self.unchanged += 1;
        } else {
            self.unchanged = 0;
        }
        self.previous = Some((height, count));
        self.unchanged >= self.threshold
    }

    /// Consecutive unchanged checks so far.
    pub fn unchanged(&self) -> u32 {
        self.unchanged
    }
}

#[derive(Debug, Deserialize)]
struct ScrollProbe {
    scrolled: bool,
    #[serde(default)]
    height: u64,
}

#[derive(Debug, Deserialize)]
struct RawAnchor {
    name: Option<String>,
    url: Option<String>,
}

impl RawAnchor {
    fn into_item(self) -> Option<ListingItem> {
        let url = self.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        Some(ListingItem::new(name, url))
    }
}

/// Keep the first item seen for every detail URL, in order.
pub fn dedup_by_url(items: impl IntoIterator<Item = ListingItem>) -> Vec<ListingItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.detail_url.clone()))
        .collect()
}

/// Reject URLs that cannot be a listing page before any browser work.
pub fn validate_listing_url(listing_url: &str, config: &ListingConfig) -> Result<url::Url> {
    let invalid = |reason: &str| ExtractionError::InvalidListingUrl {
        url: listing_url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = url::Url::parse(listing_url.trim()).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }

    let host = parsed.host_str().ok_or_else(|| invalid("missing host"))?;
    if !config.required_host_fragment.is_empty() && !host.contains(&config.required_host_fragment)
    {
        return Err(invalid(&format!(
            "host must contain `{}`",
            config.required_host_fragment
        )));
    }

    if !config.required_path_fragment.is_empty()
        && !parsed.path().contains(&config.required_path_fragment)
    {
        return Err(invalid(&format!(
            "path must contain `{}`",
            config.required_path_fragment
        )));
    }

    Ok(parsed)
}

/// Scrolls a listing feed and collects its items.
pub struct ListingEnumerator {
    settings: ListingSettings,
}

impl ListingEnumerator {
    /// Enumerator using `settings`.
    pub fn new(settings: ListingSettings) -> Self {
        Self { settings }
    }

    /// Settings in use.
    pub fn settings(&self) -> &ListingSettings {
        &self.settings
    }

    /// Load the listing in `view` and return its deduplicated items.
    ///
    /// A missing feed container only produces a warning; a failed navigation
    /// is `ListingUnavailable`.
    pub async fn enumerate<V>(
        &self,
        view: &V,
        listing_url: &str,
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<ListingItem>>
    where
        V: DocumentView + ?Sized,
    {
        let settings = &self.settings;

        reporter.report("Opening the listing page...", 0);
        view.navigate(listing_url, settings.navigation_timeout)
            .await
            .map_err(ExtractionError::ListingUnavailable)?;

        if let Err(e) = view
            .wait_for_selector(&settings.feed_selector, settings.container_timeout)
            .await
        {
            if e.is_view_destroyed() {
                return Err(e.into());
            }
            warn!("Listing feed did not appear for {}: {}", listing_url, e);
            reporter.report(
                "Warning: results list not found. Check that the link points to a search listing.",
                0,
            );
        }

        reporter.report("Scrolling the page and capturing every listing...", 0);
        let iterations = self.scroll_until_stable(view, reporter).await?;

        let anchors: Vec<RawAnchor> =
            evaluate_as(view, &scripts::collect_items(&settings.item_selector)).await?;
        let rendered = anchors.len();
        let items = dedup_by_url(anchors.into_iter().filter_map(RawAnchor::into_item));

        info!(
            "Enumerated {} unique listings ({} anchors) after {} scroll iterations",
            items.len(),
            rendered,
            iterations
        );
        Ok(items)
    }

    async fn scroll_until_stable<V>(&self, view: &V, reporter: &dyn ProgressReporter) -> Result<u32>
    where
        V: DocumentView + ?Sized,
    {
        let settings = &self.settings;
        let scroll_script = scripts::scroll_feed(&settings.feed_selector, settings.scroll_increment);
        let count_script = scripts::count_items(&settings.item_selector);
        let mut tracker = StabilityTracker::new(settings.stability_threshold);
        let mut iterations = 0;

        loop {
            let probe: ScrollProbe = evaluate_as(view, &scroll_script).await?;
            if !probe.scrolled {
                debug!("No scrollable feed, stopping after {} iterations", iterations);
                break;
            }

            if !settings.scroll_settle.is_zero() {
                tokio::time::sleep(settings.scroll_settle).await;
            }

            let count: usize = evaluate_as(view, &count_script).await?;
            iterations += 1;
            reporter.report(&format!("Scrolling... ({count} listings visible)"), count);

            if tracker.observe(probe.height, count) {
                debug!(
                    "Feed stable at height {} with {} items after {} iterations",
                    probe.height, count, iterations
                );
                break;
            }
        }

        Ok(iterations)
    }
}
