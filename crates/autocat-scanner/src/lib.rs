//! Autocat Scanner - Catalog extraction pipeline.
//!
//! This crate turns rendered catalog pages into typed records and walks the
//! brand → model → engine hierarchy through a [`PageActions`] session.
//!
//! # Features
//!
//! - Field normalization for years, power, displacement, fuel and country
//! - Brand, model and engine extractors with ordered fallback strategies
//! - Per-branch failure isolation during a full walk
//! - Four run modes with guaranteed session shutdown and atomic JSON output
//!
//! # Example
//!
//! ```rust,ignore
//! use autocat_browser::EngineLauncher;
//! use autocat_core::AppConfig;
//! use autocat_scanner::{RunController, RunRequest};
//!
//! let config = AppConfig::load_with_env()?;
//! let controller = RunController::new(EngineLauncher::new(config.browser.clone()), &config);
//!
//! let request = RunRequest {
//!     mode: "full".to_string(),
//!     ..RunRequest::default()
//! };
//! controller.execute(&request, Path::new("catalog.json")).await?;
//! ```
//!
//! [`PageActions`]: autocat_browser::PageActions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod controller;
pub mod error;
#[allow(missing_docs)]
pub mod filter;
#[allow(missing_docs)]
pub mod markup;
#[allow(missing_docs)]
pub mod normalize;
#[allow(missing_docs)]
pub mod output;
#[allow(missing_docs)]
pub mod parser;
#[allow(missing_docs)]
pub mod snapshot;
#[allow(missing_docs)]
pub mod url_builder;
#[allow(missing_docs)]
pub mod walker;

// Re-export commonly used types
pub use controller::{RunController, RunMode, RunOutput, RunRequest};
pub use error::{FieldError, Result, RunError, ScanError};
pub use filter::BrandFilter;
pub use output::{write_empty, write_json_atomic};
pub use parser::{extract_brands, extract_engines, extract_models};
pub use snapshot::SnapshotWriter;
pub use walker::{BranchFailure, CatalogWalker, Limits, WalkReport};
