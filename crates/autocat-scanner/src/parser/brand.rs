use super::{truncate, LinkRules};
use crate::markup::{document_links, segment_after};
use crate::normalize::resolve_country;
use autocat_core::{Brand, BrandId, SiteConfig};
use scraper::Html;

const BRAND_RULES: LinkRules = LinkRules {
    min_chars: 1,
    max_chars: 50,
    reject_all_caps: false,
};

/// Brands linked from the catalog root page, sorted by name.
pub fn extract_brands(html: &str, site: &SiteConfig, max: Option<usize>) -> Vec<Brand> {
    let document = Html::parse_document(html);
    let detail_marker = site.detail_marker();

    let mut brands: Vec<Brand> = document_links(&document, &site.identification_marker)
        .into_iter()
        .filter(|link| BRAND_RULES.accepts(&link.text))
        .filter_map(|link| {
            let id = BrandId::new(segment_after(&link.href, &detail_marker)?).ok()?;
            let country = resolve_country(&link.text).to_string();
            Some(Brand {
                id,
                name: link.text,
                country,
            })
        })
        .collect();

    tracing::debug!("Found {} brands", brands.len());

    brands.sort_by(|a, b| a.name.cmp(&b.name));
    truncate(&mut brands, max);
    brands
}
