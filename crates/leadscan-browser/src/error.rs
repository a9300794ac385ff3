use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

/// Substrings of CDP failures that mean the renderer or browser is gone.
const VIEW_DESTROYED_MARKERS: &[&str] = &[
    "has been closed",
    "target closed",
    "target crashed",
    "session closed",
    "no session with given id",
    "channel closed",
    "receiver is gone",
    "connection closed",
];

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("condition `{condition}` not met within {timeout:?}")]
    ConditionTimeout { condition: String, timeout: Duration },

    #[error("view destroyed: {0}")]
    ViewDestroyed(String),

    #[error("evaluation failed: {0}")]
    EvaluationError(String),
}

impl BrowserError {
    /// Map a raw CDP failure message, promoting it to `ViewDestroyed` when it
    /// says the page or browser process is gone.
    pub fn classify(message: impl Into<String>, otherwise: impl FnOnce(String) -> Self) -> Self {
        let message = message.into();
        if indicates_view_destroyed(&message) {
            Self::ViewDestroyed(message)
        } else {
            otherwise(message)
        }
    }

    /// The underlying render process died; the view cannot be used again.
    pub fn is_view_destroyed(&self) -> bool {
        matches!(self, Self::ViewDestroyed(_))
    }

    /// Worth another attempt on the same view.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NavigationError(_)
                | Self::NavigationTimeout { .. }
                | Self::ConditionTimeout { .. }
                | Self::EvaluationError(_)
        )
    }
}

fn indicates_view_destroyed(message: &str) -> bool {
    let lower = message.to_lowercase();
    VIEW_DESTROYED_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}
