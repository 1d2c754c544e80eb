//! Browser session for JavaScript-rendered catalog pages.
//!
//! Provides the [`PageActions`] surface the catalog walker drives and a
//! headless Chromium implementation of it.

pub mod actions;
pub mod engine;
pub mod error;
pub mod fingerprint;

pub use actions::{ManagedSession, PageActions, SessionLauncher};
pub use engine::{BrowserEngine, EngineLauncher};
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
