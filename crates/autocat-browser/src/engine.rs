use crate::actions::{extract_domain, ManagedSession, PageActions, SessionLauncher};
use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use autocat_core::BrowserConfig as BrowserSettings;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures_util::stream::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Headless Chromium with a single reusable page
pub struct BrowserEngine {
    browser: Browser,
    /// `None` once the session has been shut down
    page: Option<Page>,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
    network_idle: Duration,
}

impl BrowserEngine {
    /// Launch Chromium and open a blank page
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let fingerprint = FingerprintConfig::from_config(settings);
        let navigation_timeout = Duration::from_secs(settings.navigation_timeout_secs);

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(fingerprint.viewport_width, fingerprint.viewport_height)
            .request_timeout(navigation_timeout)
            .args(fingerprint.chromium_args());
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("CDP handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(BrowserError::ChromiumError(e.to_string()));
            }
        };

        tracing::info!(
            "Browser launched ({}x{}, locale {})",
            fingerprint.viewport_width,
            fingerprint.viewport_height,
            fingerprint.locale
        );

        Ok(Self {
            browser,
            page: Some(page),
            handler,
            navigation_timeout,
            network_idle: Duration::from_millis(settings.network_idle_ms),
        })
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| BrowserError::ChromiumError("session already shut down".to_string()))
    }
}

#[async_trait::async_trait]
impl PageActions for BrowserEngine {
    async fn navigate(&self, url: &str) -> Result<()> {
        let page = self.page()?;
        let domain = extract_domain(url)?;
        tracing::debug!("Navigating to {} on {}", url, domain);

        match tokio::time::timeout(self.navigation_timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::NavigationError(format!("{url}: {e}"))),
            Err(_) => Err(BrowserError::Timeout(format!(
                "{url} after {:?}",
                self.navigation_timeout
            ))),
        }
    }

    async fn wait_for_network_idle(&self) -> Result<()> {
        let page = self.page()?;

        match tokio::time::timeout(self.navigation_timeout, page.wait_for_navigation()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(BrowserError::NavigationError(e.to_string())),
            Err(_) => {
                return Err(BrowserError::Timeout(format!(
                    "page load after {:?}",
                    self.navigation_timeout
                )))
            }
        }

        // Late XHR-driven rendering settles after the load event
        tokio::time::sleep(self.network_idle).await;
        Ok(())
    }

    async fn rendered_markup(&self) -> Result<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder().full_page(true).build();
        self.page()?
            .save_screenshot(params, path)
            .await
            .map_err(|e| BrowserError::ScreenshotError(format!("{}: {e}", path.display())))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ManagedSession for BrowserEngine {
    async fn shutdown(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::warn!("Failed to close page: {}", e);
            }
        }

        let closed = self
            .browser
            .close()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()));
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to reap browser process: {}", e);
        }
        self.handler.abort();

        closed.map(|_| {
            tracing::info!("Browser stopped");
        })
    }
}

impl Drop for BrowserEngine {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// Launches a [`BrowserEngine`] per run
#[derive(Debug, Clone)]
pub struct EngineLauncher {
    settings: BrowserSettings,
}

impl EngineLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl SessionLauncher for EngineLauncher {
    type Session = BrowserEngine;

    async fn launch(&self) -> Result<BrowserEngine> {
        BrowserEngine::launch(&self.settings).await
    }
}
