//! Brand → model → engine traversal over a single page.
//!
//! The walker fetches each level in order, hands the markup to the
//! extractors and assembles the nested [`Catalog`]. Only the brand list is
//! required: a model or engine page that cannot be fetched leaves an empty
//! branch behind and is recorded in the [`WalkReport`].

use crate::error::{Result, ScanError};
use crate::filter::BrandFilter;
use crate::parser::{extract_brands, extract_engines, extract_models};
use crate::snapshot::SnapshotWriter;
use crate::url_builder::{brand_url, brands_url, model_url};
use autocat_browser::PageActions;
use autocat_core::{
    Brand, BrandId, Catalog, EngineVariant, LimitsConfig, Model, ModelId, SiteConfig,
};
use std::time::Duration;

/// Delay after each successful engine fetch unless configured otherwise.
pub const DEFAULT_PACING: Duration = Duration::from_millis(1000);

/// Per-level record limits. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_brands: Option<usize>,
    pub max_models: Option<usize>,
    pub max_engines: Option<usize>,
}

impl From<&LimitsConfig> for Limits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            max_brands: config.max_brands,
            max_models: config.max_models,
            max_engines: config.max_engines,
        }
    }
}

/// A branch of the catalog that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    /// Brand display name
    pub brand: String,
    /// Model display name; `None` when the brand's model page failed
    pub model: Option<String>,
    pub error: String,
}

/// Result of a full walk: everything that was collected plus the branches
/// left empty.
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    pub catalog: Catalog,
    pub failures: Vec<BranchFailure>,
}

impl WalkReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives one page through the catalog.
pub struct CatalogWalker<'a, P: PageActions + ?Sized> {
    page: &'a P,
    site: &'a SiteConfig,
    limits: Limits,
    pacing: Duration,
    snapshots: Option<SnapshotWriter>,
}

impl<'a, P: PageActions + ?Sized> CatalogWalker<'a, P> {
    pub fn new(page: &'a P, site: &'a SiteConfig, limits: Limits) -> Self {
        Self {
            page,
            site,
            limits,
            pacing: DEFAULT_PACING,
            snapshots: None,
        }
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub fn with_snapshots(mut self, snapshots: Option<SnapshotWriter>) -> Self {
        self.snapshots = snapshots;
        self
    }

    /// Navigate, wait for the page to settle and return its rendered markup.
    async fn fetch_page(&self, url: &str, label: &str) -> Result<String> {
        let fetch_err = |source| ScanError::Fetch {
            url: url.to_string(),
            source,
        };

        tracing::debug!("Fetching {}", url);
        self.page.navigate(url).await.map_err(fetch_err)?;
        self.page.wait_for_network_idle().await.map_err(fetch_err)?;
        let markup = self.page.rendered_markup().await.map_err(fetch_err)?;

        if let Some(snapshots) = &self.snapshots {
            snapshots.capture(self.page, label, &markup).await;
        }

        Ok(markup)
    }

    /// Brands listed on the catalog root, sorted by name.
    pub async fn fetch_brands(&self, max: Option<usize>) -> Result<Vec<Brand>> {
        let markup = self.fetch_page(&brands_url(self.site), "brands_page").await?;
        let brands = extract_brands(&markup, self.site, max);
        tracing::info!("Found {} brands", brands.len());
        Ok(brands)
    }

    /// Models of one brand, sorted by name and truncated to the model limit.
    pub async fn fetch_models(&self, brand_id: &BrandId) -> Result<Vec<Model>> {
        let label = format!("models_{brand_id}");
        let markup = self.fetch_page(&brand_url(self.site, brand_id), &label).await?;
        Ok(extract_models(&markup, self.site, brand_id, self.limits.max_models))
    }

    /// Engine variants of one model, sorted by description and truncated to
    /// the engine limit.
    pub async fn fetch_engines(&self, model_id: &ModelId) -> Result<Vec<EngineVariant>> {
        let label = format!("engines_{model_id}");
        let markup = self.fetch_page(&model_url(self.site, model_id), &label).await?;
        Ok(extract_engines(&markup, self.limits.max_engines))
    }

    /// Walk every selected brand down to its engines.
    ///
    /// Fails only when the brand list itself cannot be fetched.
    pub async fn walk(&self, filter: &BrandFilter) -> Result<WalkReport> {
        let brands = self.select_brands(filter).await?;
        let mut report = WalkReport::default();

        for brand in &brands {
            tracing::info!("Processing brand {} ({})", brand.name, brand.id);
            report.catalog.insert_brand(brand);

            let models = match self.fetch_models(&brand.id).await {
                Ok(models) => models,
                Err(e) => {
                    tracing::warn!("Skipping models of brand {} ({}): {}", brand.name, brand.id, e);
                    report.failures.push(BranchFailure {
                        brand: brand.name.clone(),
                        model: None,
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            tracing::info!("Brand {} has {} models", brand.name, models.len());

            for model in &models {
                let engines = match self.fetch_engines(&model.id).await {
                    Ok(engines) => {
                        tracing::info!(
                            "Model {} ({}) of brand {}: {} engines",
                            model.name,
                            model.id,
                            brand.id,
                            engines.len()
                        );
                        tokio::time::sleep(self.pacing).await;
                        engines
                    }
                    Err(e) => {
                        tracing::warn!(
                            "No engines for model {} ({}) of brand {}: {}",
                            model.name,
                            model.id,
                            brand.id,
                            e
                        );
                        report.failures.push(BranchFailure {
                            brand: brand.name.clone(),
                            model: Some(model.name.clone()),
                            error: e.to_string(),
                        });
                        Vec::new()
                    }
                };

                if let Some(entry) = report.catalog.brand_mut(&brand.name) {
                    entry.insert_model(model).engines = engines;
                }
            }
        }

        tracing::info!(
            "Walk finished: {} brands, {} failed branches",
            report.catalog.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// The brand list after filtering and truncation.
    ///
    /// With an allow-list the whole list is extracted first so the limit
    /// counts matching brands only.
    async fn select_brands(&self, filter: &BrandFilter) -> Result<Vec<Brand>> {
        if filter.is_all() {
            return self.fetch_brands(self.limits.max_brands).await;
        }

        let mut brands = self.fetch_brands(None).await?;
        brands.retain(|b| filter.matches(b));
        if let Some(max) = self.limits.max_brands {
            brands.truncate(max);
        }
        tracing::info!("{} brands match the filter", brands.len());
        Ok(brands)
    }
}
