//! Autocat Core - Foundation crate for the autocat vehicle catalog scraper.
//!
//! This crate provides the catalog data model, error handling and configuration
//! management that the browser and scanner crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Catalog records (`Brand`, `Model`, `EngineVariant`) and the nested `Catalog`
//!
//! # Example
//!
//! ```rust
//! use autocat_core::{AppConfig, Brand, BrandId, Catalog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.limits.max_brands, Some(10));
//!
//! let mut catalog = Catalog::new();
//! catalog.insert_brand(&Brand {
//!     id: BrandId::new("audi")?,
//!     name: "AUDI".to_string(),
//!     country: "Germany".to_string(),
//! });
//! assert_eq!(catalog.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, LimitsConfig, RunConfig, SiteConfig};
pub use error::{CatalogError, ConfigError, ConfigResult, Result};
pub use types::{
    Brand, BrandEntry, BrandId, BrandInfo, Catalog, EngineVariant, Model, ModelEntry, ModelId,
    ModelInfo,
};
