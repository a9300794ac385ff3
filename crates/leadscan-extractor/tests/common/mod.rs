//! In-memory document views for driving the pipeline without Chromium.

#![allow(dead_code)]

use leadscan_browser::{BrowserError, DocumentView, ViewFactory};
use leadscan_core::AppConfig;
use leadscan_extractor::{scripts, DocumentSnapshot};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const LISTING_URL: &str = "https://www.google.com/maps/search/pizzaria+em+pinheiros";

/// What a detail URL does when a view navigates to it.
#[derive(Debug, Clone)]
pub enum PageBehavior {
    /// Loads and renders the given markup.
    Html(String),
    /// Times out this many times, then renders the markup.
    FailTimes(usize, String),
    /// Kills the view that navigates here.
    Destroy,
    /// Times out on every attempt.
    AlwaysFail,
}

/// Detail page whose phone sits in a structured `data-item-id`.
pub fn phone_page(name: &str, number: &str) -> PageBehavior {
    PageBehavior::Html(format!(
        r#"<html><body><h1>{name}</h1><button data-item-id="phone:tel:{number}">Ligar</button></body></html>"#
    ))
}

/// Detail page without any phone.
pub fn bare_page(name: &str) -> PageBehavior {
    PageBehavior::Html(format!(
        "<html><body><h1>{name}</h1><p>Rua Augusta, 1000</p></body></html>"
    ))
}

pub fn detail_url(id: usize) -> String {
    format!("https://www.google.com/maps/place/item-{id}")
}

/// The whole fake site: listing behavior plus every detail page.
#[derive(Debug, Default)]
pub struct FakeSite {
    pub feed_present: bool,
    /// `(height, count)` returned by successive scrolls; the last repeats.
    pub scroll_steps: Vec<(u64, usize)>,
    /// `{ name, url }` objects returned when collecting anchors.
    pub anchors: Vec<Value>,
    pub pages: HashMap<String, PageBehavior>,
    pub listing_unreachable: bool,
    /// Views beyond this many cannot be opened.
    pub max_views: Option<usize>,

    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    /// Detail pages currently between navigation and snapshot.
    pub in_flight: AtomicUsize,
    /// Highest `in_flight` seen.
    pub peak_in_flight: AtomicUsize,
    pub navigations: Mutex<HashMap<String, usize>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self {
            feed_present: true,
            scroll_steps: vec![(1000, 0)],
            ..Self::default()
        }
    }

    pub fn with_anchor(mut self, name: Option<&str>, url: Option<&str>) -> Self {
        self.anchors.push(json!({ "name": name, "url": url }));
        self
    }

    pub fn with_page(mut self, url: impl Into<String>, behavior: PageBehavior) -> Self {
        self.pages.insert(url.into(), behavior);
        self
    }

    /// `n` anchors and matching detail pages built by `page`.
    pub fn with_items(mut self, n: usize, page: impl Fn(usize) -> PageBehavior) -> Self {
        for id in 1..=n {
            let url = detail_url(id);
            self.anchors
                .push(json!({ "name": format!("Item {id}"), "url": url }));
            self.pages.insert(url, page(id));
        }
        self.scroll_steps = vec![(1000, n)];
        self
    }

    pub fn navigations_to(&self, url: &str) -> usize {
        self.navigations.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[derive(Clone)]
pub struct FakeFactory {
    pub site: Arc<FakeSite>,
}

impl FakeFactory {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
        }
    }
}

#[async_trait::async_trait]
impl ViewFactory for FakeFactory {
    type View = FakeView;

    async fn open_view(&self) -> Result<FakeView, BrowserError> {
        let opened = self.site.opened.fetch_add(1, Ordering::SeqCst);
        if self.site.max_views.is_some_and(|max| opened >= max) {
            return Err(BrowserError::ChromiumError("no more renderers".to_string()));
        }
        Ok(FakeView {
            site: Arc::clone(&self.site),
            html: Mutex::new(String::new()),
            scrolls: AtomicUsize::new(0),
            destroyed: AtomicBool::new(false),
            busy: AtomicBool::new(false),
        })
    }
}

pub struct FakeView {
    site: Arc<FakeSite>,
    html: Mutex<String>,
    scrolls: AtomicUsize,
    destroyed: AtomicBool,
    busy: AtomicBool,
}

impl FakeView {
    fn check_alive(&self) -> Result<(), BrowserError> {
        if self.destroyed.load(Ordering::SeqCst) {
            Err(BrowserError::ViewDestroyed("target crashed".to_string()))
        } else {
            Ok(())
        }
    }

    fn begin_job(&self) {
        if !self.busy.swap(true, Ordering::SeqCst) {
            let now = self.site.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.site.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        }
    }

    fn end_job(&self) {
        if self.busy.swap(false, Ordering::SeqCst) {
            self.site.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn load(&self, url: &str, nav_timeout: Duration) -> Result<(), BrowserError> {
        self.check_alive()?;

        let attempt = {
            let mut navigations = self.site.navigations.lock().unwrap();
            let count = navigations.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        if url == LISTING_URL {
            if self.site.listing_unreachable {
                return Err(timeout(url, nav_timeout));
            }
            *self.html.lock().unwrap() = "<html><body></body></html>".to_string();
            return Ok(());
        }

        let html = match self.site.pages.get(url) {
            None => "<html><body></body></html>".to_string(),
            Some(PageBehavior::Html(html)) => html.clone(),
            Some(PageBehavior::FailTimes(failures, html)) => {
                if attempt <= *failures {
                    return Err(timeout(url, nav_timeout));
                }
                html.clone()
            }
            Some(PageBehavior::Destroy) => {
                self.destroyed.store(true, Ordering::SeqCst);
                return Err(BrowserError::ViewDestroyed("target crashed".to_string()));
            }
            Some(PageBehavior::AlwaysFail) => return Err(timeout(url, nav_timeout)),
        };
        *self.html.lock().unwrap() = html;
        Ok(())
    }

    fn current_step(&self) -> (u64, usize) {
        let steps = &self.site.scroll_steps;
        let index = self.scrolls.load(Ordering::SeqCst).saturating_sub(1);
        steps
            .get(index)
            .or_else(|| steps.last())
            .copied()
            .unwrap_or((0, 0))
    }
}

fn timeout(url: &str, timeout: Duration) -> BrowserError {
    BrowserError::NavigationTimeout {
        url: url.to_string(),
        timeout,
    }
}

#[async_trait::async_trait]
impl DocumentView for FakeView {
    async fn navigate(&self, url: &str, nav_timeout: Duration) -> Result<(), BrowserError> {
        if url != LISTING_URL {
            self.begin_job();
        }
        // Give other workers a chance to interleave.
        tokio::task::yield_now().await;

        let loaded = self.load(url, nav_timeout);
        if loaded.is_err() {
            self.end_job();
        }
        loaded
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.check_alive()?;
        let present = if selector == AppConfig::default().listing.feed_selector {
            self.site.feed_present
        } else {
            self.html.lock().unwrap().contains("tel:")
        };
        if present {
            Ok(())
        } else {
            Err(BrowserError::ConditionTimeout {
                condition: selector.to_string(),
                timeout,
            })
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value, BrowserError> {
        tokio::task::yield_now().await;
        self.check_alive()?;

        let listing = AppConfig::default().listing;
        if script == scripts::scroll_feed(&listing.feed_selector, listing.scroll_increment_px) {
            if !self.site.feed_present {
                return Ok(json!({ "scrolled": false, "height": 0 }));
            }
            self.scrolls.fetch_add(1, Ordering::SeqCst);
            let (height, _) = self.current_step();
            return Ok(json!({ "scrolled": true, "height": height }));
        }
        if script == scripts::count_items(&listing.item_selector) {
            return Ok(json!(self.current_step().1));
        }
        if script == scripts::collect_items(&listing.item_selector) {
            return Ok(Value::Array(self.site.anchors.clone()));
        }
        if script == scripts::SNAPSHOT {
            let html = self.html.lock().unwrap().clone();
            self.end_job();
            return Ok(serde_json::to_value(DocumentSnapshot::from_html(html)).unwrap());
        }
        Err(BrowserError::EvaluationError(format!("unexpected script: {script}")))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.site.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Default configuration with every delay removed.
pub fn fast_config(concurrency: usize) -> AppConfig {
    let mut config = AppConfig::default();
    config.extraction.concurrency = concurrency;
    config.extraction.retry_delay_ms = 0;
    config.extraction.phone_wait_ms = 0;
    config.listing.scroll_settle_ms = 0;
    config.listing.stability_threshold = 2;
    config
}

/// Reporter that keeps every report.
#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Mutex<Vec<(String, usize)>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|(message, _)| message.clone())
            .collect()
    }
}

impl leadscan_extractor::ProgressReporter for RecordingReporter {
    fn report(&self, message: &str, count: usize) {
        self.reports.lock().unwrap().push((message.to_string(), count));
    }
}
