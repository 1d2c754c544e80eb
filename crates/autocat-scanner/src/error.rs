use autocat_browser::BrowserError;
use std::path::PathBuf;
use thiserror::Error;

/// A single table cell that could not be normalized.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("malformed {field} value '{value}'")]
    Malformed { field: &'static str, value: String },

    #[error("{field} value '{value}' is out of range")]
    OutOfRange { field: &'static str, value: String },
}

/// Failure fetching one catalog page.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BrowserError,
    },
}

/// Failure of a whole run invocation.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid run request: {0}")]
    InvalidMode(String),

    #[error("Browser session unavailable: {0}")]
    Session(#[source] BrowserError),

    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to write output to {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
