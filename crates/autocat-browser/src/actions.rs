use crate::error::{BrowserError, Result};
use std::path::Path;

/// Page operations the catalog walker needs from a rendering engine
#[async_trait::async_trait]
pub trait PageActions: Send + Sync {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Block until the page has stopped loading resources
    async fn wait_for_network_idle(&self) -> Result<()>;

    /// Get the current DOM serialized as HTML
    async fn rendered_markup(&self) -> Result<String>;

    /// Write a full-page PNG screenshot to `path`
    async fn screenshot(&self, path: &Path) -> Result<()>;
}

/// A page session whose underlying browser must be released after use
#[async_trait::async_trait]
pub trait ManagedSession: PageActions {
    /// Close the page and stop the browser
    async fn shutdown(&mut self) -> Result<()>;
}

/// Acquires a fresh page session for one run
#[async_trait::async_trait]
pub trait SessionLauncher: Send + Sync {
    type Session: ManagedSession;

    /// Start the browser and open a blank page
    async fn launch(&self) -> Result<Self::Session>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}
