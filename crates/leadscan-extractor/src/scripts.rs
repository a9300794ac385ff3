//! In-page scripts evaluated against document views.
//!
//! Selectors are embedded as JSON string literals so quotes inside them
//! cannot break the script.

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Scroll the feed by `increment` pixels; yields `{ scrolled, height }`.
pub fn scroll_feed(feed_selector: &str, increment: u32) -> String {
    format!(
        "(() => {{ const feed = document.querySelector({sel}); \
         if (!feed) return {{ scrolled: false, height: 0 }}; \
         feed.scrollBy(0, {increment}); \
         return {{ scrolled: true, height: feed.scrollHeight }}; }})()",
        sel = js_string(feed_selector),
    )
}

/// Number of rendered item anchors.
pub fn count_items(item_selector: &str) -> String {
    format!(
        "document.querySelectorAll({sel}).length",
        sel = js_string(item_selector)
    )
}

/// Every rendered item anchor as `{ name, url }`.
pub fn collect_items(item_selector: &str) -> String {
    format!(
        "Array.from(document.querySelectorAll({sel})).map(a => \
         ({{ name: a.getAttribute('aria-label'), url: a.href || null }}))",
        sel = js_string(item_selector)
    )
}

/// Serialized document plus its visible text, as `{ html, text }`.
pub const SNAPSHOT: &str = "({ html: document.documentElement.outerHTML, \
     text: document.body ? document.body.innerText : '' })";
