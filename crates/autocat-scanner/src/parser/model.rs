use super::{truncate, LinkRules};
use crate::markup::{document_links, links_containing, segment_after, table_rows, Link};
use crate::normalize::extract_year_range;
use autocat_core::{BrandId, Model, ModelId, SiteConfig};
use scraper::Html;

const TABLE_RULES: LinkRules = LinkRules {
    min_chars: 1,
    max_chars: 100,
    reject_all_caps: true,
};

const FLAT_SCAN_RULES: LinkRules = LinkRules {
    min_chars: 2,
    ..TABLE_RULES
};

/// What a strategy needs besides the document.
pub struct ModelPage<'a> {
    pub document: &'a Html,
    pub site: &'a SiteConfig,
    /// `<detail marker><brand id>-`
    pub model_prefix: String,
}

/// One way of finding model links on a brand page.
pub type ModelStrategy = fn(&ModelPage<'_>) -> Vec<Model>;

/// Tried in order; the first strategy returning anything wins.
pub const MODEL_STRATEGIES: &[(&str, ModelStrategy)] =
    &[("table", table_strategy), ("flat-scan", flat_scan_strategy)];

/// Models linked from a brand page, sorted by name.
pub fn extract_models(
    html: &str,
    site: &SiteConfig,
    brand_id: &BrandId,
    max: Option<usize>,
) -> Vec<Model> {
    let document = Html::parse_document(html);
    let page = ModelPage {
        document: &document,
        site,
        model_prefix: format!("{}{}-", site.detail_marker(), brand_id),
    };

    let mut models = MODEL_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let found = strategy(&page);
            tracing::debug!(
                "Model strategy '{}' found {} models for brand {}",
                name,
                found.len(),
                brand_id
            );
            (!found.is_empty()).then_some(found)
        })
        .unwrap_or_default();

    models.sort_by(|a, b| a.name.cmp(&b.name));
    truncate(&mut models, max);
    models
}

/// Identification links inside table rows that continue the brand id.
fn table_strategy(page: &ModelPage<'_>) -> Vec<Model> {
    table_rows(page.document)
        .flat_map(|row| links_containing(row, &page.site.identification_marker))
        .filter(|link| TABLE_RULES.accepts(&link.text))
        .filter_map(|link| to_model(&link, &page.model_prefix))
        .collect()
}

/// Any link on the page that continues the brand id.
fn flat_scan_strategy(page: &ModelPage<'_>) -> Vec<Model> {
    document_links(page.document, &page.model_prefix)
        .into_iter()
        .filter(|link| FLAT_SCAN_RULES.accepts(&link.text))
        .filter_map(|link| to_model(&link, &page.model_prefix))
        .collect()
}

fn to_model(link: &Link, model_prefix: &str) -> Option<Model> {
    let id = ModelId::new(segment_after(&link.href, model_prefix)?).ok()?;
    let range = extract_year_range(&link.text);

    Some(Model {
        id,
        name: range.label,
        year_start: range.start,
        year_end: range.end,
        body_type: None,
        code: None,
    })
}
