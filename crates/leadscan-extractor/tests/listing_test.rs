//! Listing enumeration against in-memory views.

mod common;

use common::{fast_config, FakeFactory, FakeSite, RecordingReporter, LISTING_URL};
use leadscan_browser::ViewFactory;
use leadscan_core::ListingItem;
use leadscan_extractor::listing::{ListingEnumerator, ListingSettings, UNKNOWN_NAME};
use leadscan_extractor::ExtractionError;

fn enumerator() -> ListingEnumerator {
    let config = fast_config(1);
    ListingEnumerator::new(ListingSettings::from_config(&config.listing, &config.browser))
}

fn scroll_reports(reporter: &RecordingReporter) -> Vec<usize> {
    reporter
        .reports
        .lock()
        .unwrap()
        .iter()
        .filter(|(message, _)| message.starts_with("Scrolling... ("))
        .map(|(_, count)| *count)
        .collect()
}

#[tokio::test]
async fn test_scrolls_until_feed_is_stable() {
    let mut site = FakeSite::new().with_anchor(Some("A"), Some("https://www.google.com/maps/place/a"));
    site.scroll_steps = vec![(1000, 5), (2000, 10), (3000, 15), (3000, 15), (3000, 15), (3000, 15)];
    let factory = FakeFactory::new(site);
    let view = factory.open_view().await.unwrap();
    let reporter = RecordingReporter::default();

    enumerator()
        .enumerate(&view, LISTING_URL, &reporter)
        .await
        .unwrap();

    // growth for three iterations, then two unchanged checks
    assert_eq!(scroll_reports(&reporter), vec![5, 10, 15, 15, 15]);
}

#[tokio::test]
async fn test_missing_feed_warns_and_returns_rendered_anchors() {
    let mut site = FakeSite::new().with_anchor(Some("A"), Some("https://www.google.com/maps/place/a"));
    site.feed_present = false;
    let factory = FakeFactory::new(site);
    let view = factory.open_view().await.unwrap();
    let reporter = RecordingReporter::default();

    let items = enumerator()
        .enumerate(&view, LISTING_URL, &reporter)
        .await
        .unwrap();

    assert_eq!(
        items,
        vec![ListingItem::new("A", "https://www.google.com/maps/place/a")]
    );
    assert!(reporter
        .messages()
        .iter()
        .any(|message| message.starts_with("Warning: results list not found")));
    assert!(scroll_reports(&reporter).is_empty());
}

#[tokio::test]
async fn test_zero_items() {
    let factory = FakeFactory::new(FakeSite::new());
    let view = factory.open_view().await.unwrap();

    let items = enumerator()
        .enumerate(&view, LISTING_URL, &RecordingReporter::default())
        .await
        .unwrap();

    assert!(items.is_empty());
}

#[tokio::test]
async fn test_anchor_cleanup_and_dedup() {
    let site = FakeSite::new()
        .with_anchor(Some("A"), Some("https://www.google.com/maps/place/a"))
        .with_anchor(None, Some("https://www.google.com/maps/place/b"))
        .with_anchor(Some("No link"), None)
        .with_anchor(Some("A duplicate"), Some("https://www.google.com/maps/place/a"));
    let factory = FakeFactory::new(site);
    let view = factory.open_view().await.unwrap();

    let items = enumerator()
        .enumerate(&view, LISTING_URL, &RecordingReporter::default())
        .await
        .unwrap();

    assert_eq!(
        items,
        vec![
            ListingItem::new("A", "https://www.google.com/maps/place/a"),
            ListingItem::new(UNKNOWN_NAME, "https://www.google.com/maps/place/b"),
        ]
    );
}

#[tokio::test]
async fn test_unreachable_listing() {
    let mut site = FakeSite::new();
    site.listing_unreachable = true;
    let factory = FakeFactory::new(site);
    let view = factory.open_view().await.unwrap();

    let err = enumerator()
        .enumerate(&view, LISTING_URL, &RecordingReporter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractionError::ListingUnavailable(_)));
}
