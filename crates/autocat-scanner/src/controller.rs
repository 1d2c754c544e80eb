//! Run modes and the browser session lifecycle around them.

use crate::error::RunError;
use crate::filter::BrandFilter;
use crate::output::{write_empty, write_json_atomic};
use crate::snapshot::SnapshotWriter;
use crate::walker::{CatalogWalker, Limits, WalkReport};
use autocat_browser::{ManagedSession, SessionLauncher};
use autocat_core::{AppConfig, Brand, BrandId, EngineVariant, Model, ModelId, SiteConfig};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;

/// What a run collects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// The whole brand → model → engine catalog
    Full { brand_filter: BrandFilter },
    /// Only the brand list
    Brands,
    /// Models of one brand
    Models { brand_id: BrandId },
    /// Engines of one model
    Engines { model_id: ModelId },
}

/// An unvalidated run request as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub mode: String,
    pub brand_id: Option<String>,
    pub model_id: Option<String>,
    pub brand_filter: Vec<String>,
}

impl RunRequest {
    /// Check the mode name and the ids it requires.
    pub fn resolve(&self) -> Result<RunMode, RunError> {
        match self.mode.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(RunMode::Full {
                brand_filter: BrandFilter::from_names(&self.brand_filter),
            }),
            "brands" => Ok(RunMode::Brands),
            "models" => {
                let id = required(self.brand_id.as_deref(), "models", "brand")?;
                let brand_id = BrandId::new(id)
                    .map_err(|e| RunError::InvalidMode(format!("bad brand id: {e}")))?;
                Ok(RunMode::Models { brand_id })
            }
            "engines" => {
                let id = required(self.model_id.as_deref(), "engines", "model")?;
                let model_id = ModelId::new(id)
                    .map_err(|e| RunError::InvalidMode(format!("bad model id: {e}")))?;
                Ok(RunMode::Engines { model_id })
            }
            other => Err(RunError::InvalidMode(format!(
                "unknown mode '{other}', expected full, brands, models or engines"
            ))),
        }
    }
}

fn required<'r>(value: Option<&'r str>, mode: &str, what: &str) -> Result<&'r str, RunError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RunError::InvalidMode(format!("{mode} mode requires a {what} id")))
}

/// Records collected by a run.
#[derive(Debug, Clone)]
pub enum RunOutput {
    Catalog(WalkReport),
    Brands(Vec<Brand>),
    Models(Vec<Model>),
    Engines(Vec<EngineVariant>),
}

impl RunOutput {
    /// The JSON document persisted for this output.
    ///
    /// A catalog is written as the bare nested map; lists are wrapped in an
    /// object under their level name.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match self {
            RunOutput::Catalog(report) => serde_json::to_value(&report.catalog),
            RunOutput::Brands(brands) => wrapped("brands", brands),
            RunOutput::Models(models) => wrapped("models", models),
            RunOutput::Engines(engines) => wrapped("engines", engines),
        }
    }
}

fn wrapped<T: Serialize>(key: &str, records: &T) -> Result<Value, serde_json::Error> {
    let mut object = Map::new();
    object.insert(key.to_string(), serde_json::to_value(records)?);
    Ok(Value::Object(object))
}

/// Runs one mode inside a freshly launched browser session.
pub struct RunController<L: SessionLauncher> {
    launcher: L,
    site: SiteConfig,
    limits: Limits,
    pacing: Duration,
    snapshots: Option<SnapshotWriter>,
}

impl<L: SessionLauncher> RunController<L> {
    pub fn new(launcher: L, config: &AppConfig) -> Self {
        Self {
            launcher,
            site: config.site.clone(),
            limits: Limits::from(&config.limits),
            pacing: Duration::from_millis(config.run.pacing_ms),
            snapshots: config.run.debug_dir.clone().map(SnapshotWriter::new),
        }
    }

    /// Launch a session, run `mode` and shut the session down again,
    /// whether or not the mode succeeded.
    pub async fn run(&self, mode: &RunMode) -> Result<RunOutput, RunError> {
        let mut session = self.launcher.launch().await.map_err(RunError::Session)?;

        let result = self.dispatch(&session, mode).await;

        if let Err(e) = session.shutdown().await {
            tracing::warn!("Browser shutdown failed: {}", e);
        }
        result
    }

    async fn dispatch(&self, session: &L::Session, mode: &RunMode) -> Result<RunOutput, RunError> {
        let walker = CatalogWalker::new(session, &self.site, self.limits)
            .with_pacing(self.pacing)
            .with_snapshots(self.snapshots.clone());

        let output = match mode {
            RunMode::Full { brand_filter } => RunOutput::Catalog(walker.walk(brand_filter).await?),
            RunMode::Brands => RunOutput::Brands(walker.fetch_brands(self.limits.max_brands).await?),
            RunMode::Models { brand_id } => RunOutput::Models(walker.fetch_models(brand_id).await?),
            RunMode::Engines { model_id } => {
                RunOutput::Engines(walker.fetch_engines(model_id).await?)
            }
        };
        Ok(output)
    }

    /// Resolve `request`, run it and persist the result to `output`.
    ///
    /// On any failure `{}` is written to `output` and the error returned.
    pub async fn execute(&self, request: &RunRequest, output: &Path) -> Result<RunOutput, RunError> {
        let outcome = match request.resolve() {
            Ok(mode) => {
                tracing::info!("Starting {:?} run", mode);
                self.run(&mode).await
            }
            Err(e) => Err(e),
        };

        let persisted = outcome.and_then(|out| {
            let document = out.to_json()?;
            write_json_atomic(output, &document)?;
            Ok(out)
        });

        if let Err(e) = &persisted {
            tracing::error!("Run failed: {}", e);
            if let Err(write_err) = write_empty(output) {
                tracing::error!("Could not write empty result: {}", write_err);
            }
        }
        persisted
    }
}
