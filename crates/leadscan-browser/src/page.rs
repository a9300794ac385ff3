use crate::error::{BrowserError, Result};
use crate::view::DocumentView;
use chromiumoxide::Page;
use std::time::{Duration, Instant};

/// Interval between selector probes while waiting for a condition.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A Chromium tab exposed as a [`DocumentView`].
pub struct ChromiumView {
    page: Page,
}

impl ChromiumView {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait::async_trait]
impl DocumentView for ChromiumView {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::classify(
                e.to_string(),
                BrowserError::NavigationError,
            )),
            Err(_) => Err(BrowserError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            }),
        }
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;

        loop {
            match self.page.find_element(selector).await {
                Ok(_) => return Ok(()),
                Err(e) => {
                    let err = BrowserError::classify(e.to_string(), BrowserError::EvaluationError);
                    if err.is_view_destroyed() {
                        return Err(err);
                    }
                }
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::ConditionTimeout {
                    condition: selector.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::classify(e.to_string(), BrowserError::EvaluationError))?;

        result
            .into_value::<serde_json::Value>()
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))
    }

    async fn close(&self) -> Result<()> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| BrowserError::classify(e.to_string(), BrowserError::ChromiumError))
    }
}
