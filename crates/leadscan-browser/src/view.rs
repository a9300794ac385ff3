use crate::error::{BrowserError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// One navigable page instance.
///
/// Every method may fail with [`BrowserError::ViewDestroyed`] once the
/// underlying render process is gone; callers must not reuse the view after
/// that.
#[async_trait::async_trait]
pub trait DocumentView: Send + Sync {
    /// Navigate to a URL, failing with `NavigationTimeout` after `timeout`
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Wait for a selector to appear, failing with `ConditionTimeout`
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Run a read-only script against the current document and return its value
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Close the view and release its renderer
    async fn close(&self) -> Result<()>;
}

/// Source of fresh document views.
#[async_trait::async_trait]
pub trait ViewFactory: Send + Sync {
    type View: DocumentView;

    /// Open a new, blank view
    async fn open_view(&self) -> Result<Self::View>;
}

/// Evaluate a script and deserialize its value.
pub async fn evaluate_as<T, V>(view: &V, script: &str) -> Result<T>
where
    T: DeserializeOwned,
    V: DocumentView + ?Sized,
{
    let value = view.evaluate(script).await?;
    serde_json::from_value(value)
        .map_err(|e| BrowserError::EvaluationError(format!("unexpected script result: {e}")))
}
