use autocat_core::AppConfig;
use autocat_scanner::RunRequest;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "autocat", author, version, about)]
pub struct Cli {
    /// JSON file to write; `{}` is written when the run fails.
    pub output: PathBuf,

    /// Run mode: full, brands, models or engines.
    pub mode: String,

    /// Brand id (required by `models`).
    #[arg(long)]
    pub brand_id: Option<String>,

    /// Model id (required by `engines`).
    #[arg(long)]
    pub model_id: Option<String>,

    /// Maximum brands to walk.
    #[arg(long)]
    pub max_brands: Option<usize>,

    /// Maximum models per brand.
    #[arg(long)]
    pub max_models: Option<usize>,

    /// Maximum engines per model.
    #[arg(long)]
    pub max_engines: Option<usize>,

    /// Only walk these brands (case-insensitive).
    #[arg(long, num_args = 1..)]
    pub brands_filter: Vec<String>,

    /// Config file to use instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save a screenshot and markup of every fetched page here.
    #[arg(long)]
    pub debug_dir: Option<PathBuf>,
}

impl Cli {
    /// Layer command-line flags over the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if self.max_brands.is_some() {
            config.limits.max_brands = self.max_brands;
        }
        if self.max_models.is_some() {
            config.limits.max_models = self.max_models;
        }
        if self.max_engines.is_some() {
            config.limits.max_engines = self.max_engines;
        }
        if !self.brands_filter.is_empty() {
            config.limits.brand_filter.clone_from(&self.brands_filter);
        }
        if self.debug_dir.is_some() {
            config.run.debug_dir.clone_from(&self.debug_dir);
        }
    }

    pub fn request(&self, config: &AppConfig) -> RunRequest {
        RunRequest {
            mode: self.mode.clone(),
            brand_id: self.brand_id.clone(),
            model_id: self.model_id.clone(),
            brand_filter: config.limits.brand_filter.clone(),
        }
    }
}
