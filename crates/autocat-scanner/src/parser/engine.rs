use super::truncate;
use crate::error::FieldError;
use crate::markup::{cell_texts, header_text, rows, tables};
use crate::normalize::{coerce_int, extract_year_span, infer_fuel_type, parse_displacement};
use autocat_core::EngineVariant;
use scraper::Html;

/// A table is an engine table when its header text contains one of these.
pub const ENGINE_HEADER_KEYWORDS: &[&str] =
    &["kw", "hp", "ccm", "motor", "tip", "cilindri", "carburant"];

/// Rows with fewer cells are layout rows.
const MIN_CELLS: usize = 3;

/// Engine variants from every engine table on a model page, sorted by
/// description.
pub fn extract_engines(html: &str, max: Option<usize>) -> Vec<EngineVariant> {
    let document = Html::parse_document(html);
    let mut engines = Vec::new();

    for (table_idx, table) in tables(&document).enumerate() {
        let headers = header_text(table);
        if !ENGINE_HEADER_KEYWORDS.iter().any(|kw| headers.contains(kw)) {
            continue;
        }

        for (row_idx, row) in rows(table).enumerate().skip(1) {
            let cells = cell_texts(row);
            if cells.len() < MIN_CELLS {
                continue;
            }

            match parse_engine_row(&cells) {
                Ok(Some(engine)) => engines.push(engine),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Skipping engine row {} of table {}: {}", row_idx, table_idx, e);
                }
            }
        }
    }

    tracing::debug!("Found {} engines", engines.len());

    engines.sort_by(|a, b| a.description.cmp(&b.description));
    truncate(&mut engines, max);
    engines
}

/// Normalize one engine table row.
///
/// Columns are type, years, kW, hp, displacement, cylinders, fuel, code;
/// missing trailing columns read as empty. Returns `Ok(None)` for a row
/// with no type, code, power or displacement.
pub fn parse_engine_row(cells: &[String]) -> Result<Option<EngineVariant>, FieldError> {
    let column = |idx: usize| cells.get(idx).map_or("", |c| c.trim());

    let description = column(0);
    let (year_start, year_end) = extract_year_span(column(1));
    let kw = coerce_int(column(2));
    let hp = coerce_int(column(3));
    let ccm = parse_displacement(column(4))?;
    let cylinders = coerce_int(column(5));
    let fuel_type = infer_fuel_type(column(6), description);
    let code = column(7);

    if description.is_empty() && code.is_empty() && kw.is_none() && hp.is_none() && ccm.is_none()
    {
        return Ok(None);
    }
    let code = if code.is_empty() { description } else { code };

    Ok(Some(EngineVariant {
        code: code.to_string(),
        kw,
        hp,
        ccm,
        cylinders,
        fuel_type,
        year_start,
        year_end,
        description: description.to_string(),
    }))
}
