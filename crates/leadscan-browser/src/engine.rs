use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use crate::page::ChromiumView;
use crate::view::ViewFactory;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use futures::stream::StreamExt;
use leadscan_core::BrowserConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Headless Chromium that hands out one tab per [`ChromiumView`].
pub struct BrowserEngine {
    browser: Mutex<Browser>,
    fingerprint: FingerprintConfig,
    handler: JoinHandle<()>,
}

impl BrowserEngine {
    /// Launch Chromium with the given settings.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let fingerprint = FingerprintConfig::from_config(config);

        let mut builder = ChromeConfig::builder()
            .no_sandbox()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height)
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--no-zygote");
        if !config.headless {
            builder = builder.with_head();
        }
        if config.block_images {
            builder = builder.arg("--blink-settings=imagesEnabled=false");
        }

        let chrome_config = builder
            .build()
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {}", e);
                }
            }
            tracing::debug!("Browser handler stopped");
        });

        tracing::info!(
            "Browser launched (headless: {}, {}x{})",
            config.headless,
            fingerprint.viewport_width,
            fingerprint.viewport_height
        );

        Ok(Self {
            browser: Mutex::new(browser),
            fingerprint,
            handler,
        })
    }

    /// Close the browser process and stop the handler loop.
    pub async fn shutdown(self) -> Result<()> {
        let mut browser = self.browser.into_inner();
        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::ChromiumError(e.to_string()));
        self.handler.abort();
        closed
    }
}

#[async_trait::async_trait]
impl ViewFactory for BrowserEngine {
    type View = ChromiumView;

    async fn open_view(&self) -> Result<ChromiumView> {
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| BrowserError::classify(e.to_string(), BrowserError::ChromiumError))?
        };

        page.execute(SetUserAgentOverrideParams::new(
            self.fingerprint.user_agent.clone(),
        ))
        .await
        .map_err(|e| BrowserError::classify(e.to_string(), BrowserError::ChromiumError))?;

        Ok(ChromiumView::new(page))
    }
}
