//! Element queries over rendered catalog pages.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("valid selector"));
static TABLE_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table tr").expect("valid selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("valid selector"));
static DATA_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("valid selector"));

/// A link with its trimmed label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// Trimmed concatenation of every text node under `element`.
pub fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Anchors under `scope` whose `href` contains `needle`, in document order.
pub fn links_containing(scope: ElementRef<'_>, needle: &str) -> Vec<Link> {
    scope
        .select(&ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            href.contains(needle).then(|| Link {
                text: text_of(&a),
                href: href.to_string(),
            })
        })
        .collect()
}

/// Anchors anywhere in the document whose `href` contains `needle`.
pub fn document_links(document: &Html, needle: &str) -> Vec<Link> {
    links_containing(document.root_element(), needle)
}

/// Every `<tr>` nested in a `<table>`.
pub fn table_rows(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.select(&TABLE_ROW)
}

/// Every `<table>` in the document.
pub fn tables(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.select(&TABLE)
}

/// Lower-cased `<th>` texts of a table joined by spaces.
pub fn header_text(table: ElementRef<'_>) -> String {
    table
        .select(&HEADER_CELL)
        .map(|th| text_of(&th).to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rows of a table; the first is the header row.
pub fn rows(table: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    table.select(&ROW)
}

/// Trimmed `<td>` texts of a row.
pub fn cell_texts(row: ElementRef<'_>) -> Vec<String> {
    row.select(&DATA_CELL).map(|td| text_of(&td)).collect()
}

/// The path token after the first `marker` in `href`, cut at the next
/// separator or parameter marker.
pub fn segment_after<'h>(href: &'h str, marker: &str) -> Option<&'h str> {
    let start = href.find(marker)? + marker.len();
    let rest = &href[start..];
    let end = rest.find(['/', ';', '?', '#']).unwrap_or(rest.len());
    let segment = &rest[..end];
    (!segment.is_empty()).then_some(segment)
}
