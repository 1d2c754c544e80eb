use autocat_core::{BrandId, ModelId, SiteConfig};

/// URL of the page listing every brand.
pub fn brands_url(site: &SiteConfig) -> String {
    format!("{}{}", site.base_url.trim_end_matches('/'), site.brands_path)
}

/// URL of a brand's model list.
pub fn brand_url(site: &SiteConfig, brand_id: &BrandId) -> String {
    detail_url(site, brand_id.as_str())
}

/// URL of a model's engine table.
///
/// Model ids already carry enough of the path to address the page on their
/// own, without the owning brand id.
pub fn model_url(site: &SiteConfig, model_id: &ModelId) -> String {
    detail_url(site, model_id.as_str())
}

fn detail_url(site: &SiteConfig, id: &str) -> String {
    format!(
        "{}{}{}{}",
        site.base_url.trim_end_matches('/'),
        site.catalog_prefix,
        site.detail_marker(),
        id
    )
}
