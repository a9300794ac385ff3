//! Shared types for the extraction pipeline.
//!
//! A run enumerates [`ListingItem`]s from a listing view, wraps each one in an
//! [`ExtractionJob`] for the task queue, and produces exactly one
//! [`ExtractionResult`] per job.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a listing view: the name shown on the card and the link to its
/// detail view.
///
/// Identity is the `detail_url`; two items may share a display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingItem {
    /// Name shown on the listing card
    #[serde(rename = "name")]
    pub display_name: String,
    /// Absolute URL of the item's detail view
    #[serde(rename = "url")]
    pub detail_url: String,
}

impl ListingItem {
    /// Create a new listing item.
    #[must_use]
    pub fn new(display_name: impl Into<String>, detail_url: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            detail_url: detail_url.into(),
        }
    }
}

impl fmt::Display for ListingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.display_name, self.detail_url)
    }
}

/// A listing item queued for a detail-page visit.
///
/// Jobs are owned by the task queue until a worker claims one; they are never
/// handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionJob {
    /// Zero-based position in enumeration order
    pub position: usize,
    /// The item to visit
    pub item: ListingItem,
}

impl ExtractionJob {
    /// Create a job for the item at `position`.
    #[must_use]
    pub fn new(position: usize, item: ListingItem) -> Self {
        Self { position, item }
    }

    /// Build jobs for a whole enumeration, preserving order.
    #[must_use]
    pub fn from_items(items: Vec<ListingItem>) -> Vec<Self> {
        items
            .into_iter()
            .enumerate()
            .map(|(position, item)| Self::new(position, item))
            .collect()
    }

    /// Terminal result carrying the given phone (empty for "not found").
    #[must_use]
    pub fn into_result(self, phone: impl Into<String>) -> ExtractionResult {
        ExtractionResult {
            name: self.item.display_name,
            phone: phone.into(),
        }
    }

    /// Terminal result for a job that produced no phone.
    #[must_use]
    pub fn into_empty_result(self) -> ExtractionResult {
        self.into_result(String::new())
    }
}

/// Outcome of one job. An empty `phone` means no number was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Display name of the listing item
    pub name: String,
    /// Extracted phone number, or empty
    pub phone: String,
}

impl ExtractionResult {
    /// Whether a phone number was extracted.
    #[must_use]
    pub fn has_phone(&self) -> bool {
        !self.phone.is_empty()
    }
}
