//! Text-to-value conversions for catalog table cells and link labels.
//!
//! Everything here is pure. The country table and diesel keywords are
//! static data; table order decides ties.

use crate::error::FieldError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Country returned when no table key matches.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Fuel label used when a row carries no fuel column and no diesel keyword.
pub const GASOLINE: &str = "Benzina";

/// Fuel label inferred from diesel keywords.
pub const DIESEL: &str = "Diesel";

/// Brand key → country, scanned in order.
pub const COUNTRY_TABLE: &[(&str, &str)] = &[
    ("BMW", "Germany"),
    ("AUDI", "Germany"),
    ("MERCEDES", "Germany"),
    ("VOLKSWAGEN", "Germany"),
    ("OPEL", "Germany"),
    ("PORSCHE", "Germany"),
    ("TOYOTA", "Japan"),
    ("HONDA", "Japan"),
    ("NISSAN", "Japan"),
    ("MAZDA", "Japan"),
    ("SUBARU", "Japan"),
    ("LEXUS", "Japan"),
    ("MITSUBISHI", "Japan"),
    ("FORD", "USA"),
    ("CHEVROLET", "USA"),
    ("DODGE", "USA"),
    ("JEEP", "USA"),
    ("TESLA", "USA"),
    ("RENAULT", "France"),
    ("PEUGEOT", "France"),
    ("CITROEN", "France"),
    ("FIAT", "Italy"),
    ("ALFA ROMEO", "Italy"),
    ("FERRARI", "Italy"),
    ("LAMBORGHINI", "Italy"),
    ("MASERATI", "Italy"),
    ("HYUNDAI", "South Korea"),
    ("KIA", "South Korea"),
    ("VOLVO", "Sweden"),
    ("SAAB", "Sweden"),
    ("DACIA", "Romania"),
    ("LADA", "Russia"),
    ("SEAT", "Spain"),
    ("SKODA", "Czech Republic"),
    ("ROLLS-ROYCE", "United Kingdom"),
    ("BENTLEY", "United Kingdom"),
    ("JAGUAR", "United Kingdom"),
    ("LAND ROVER", "United Kingdom"),
    ("ASTON MARTIN", "United Kingdom"),
];

const DIESEL_KEYWORDS: &[&str] = &["diesel", "di", "tdi", "hdi"];

/// Navigation words that mark a link as site chrome rather than a record.
pub const STOPLIST: &[&str] = &["home", "back", "menu", "catalog", "next", "prev"];

/// `MM/YY` or `YYYY`.
const YEAR_TOKEN: &str = r"\d{2}/\d{2}|\d{4}";

static LABELLED_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(.+?)\s*\(({YEAR_TOKEN})\s*-\s*({YEAR_TOKEN}|-)?\s*\)"
    ))
    .expect("Labelled range regex is hardcoded and valid")
});

static BARE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({YEAR_TOKEN})\s*-\s*({YEAR_TOKEN}|-)?"))
        .expect("Bare range regex is hardcoded and valid")
});

/// A link label split into its name and production range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearRange {
    pub label: String,
    pub start: Option<String>,
    /// `None` for an open-ended range
    pub end: Option<String>,
}

/// Resolve a brand's country by substring match against [`COUNTRY_TABLE`].
pub fn resolve_country(brand_name: &str) -> &'static str {
    let upper = brand_name.to_uppercase();
    COUNTRY_TABLE
        .iter()
        .find(|(key, _)| upper.contains(key))
        .map_or(UNKNOWN_COUNTRY, |(_, country)| country)
}

/// Split `"<label> (<start>-<end>)"` into its parts.
///
/// Text without a parenthesised range comes back unchanged with no years.
pub fn extract_year_range(text: &str) -> YearRange {
    match LABELLED_RANGE.captures(text) {
        Some(caps) => YearRange {
            label: caps[1].trim().to_string(),
            start: Some(caps[2].to_string()),
            end: open_ended(caps.get(3).map(|m| m.as_str())),
        },
        None => YearRange {
            label: text.to_string(),
            start: None,
            end: None,
        },
    }
}

/// Find a bare `<start>-<end>` span, as found in engine table year cells.
pub fn extract_year_span(text: &str) -> (Option<String>, Option<String>) {
    match BARE_RANGE.captures(text) {
        Some(caps) => (
            Some(caps[1].to_string()),
            open_ended(caps.get(2).map(|m| m.as_str())),
        ),
        None => (None, None),
    }
}

fn open_ended(end: Option<&str>) -> Option<String> {
    match end {
        None | Some("-") => None,
        Some(token) => Some(token.to_string()),
    }
}

/// Whether a link label contains a [`STOPLIST`] word (case-insensitive).
pub fn is_navigational(text: &str) -> bool {
    let lower = text.to_lowercase();
    STOPLIST.iter().any(|word| lower.contains(word))
}

/// Integer value of a cell made only of ASCII digits.
///
/// No sign, separators or partial parsing; anything else is absent.
pub fn coerce_int(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Displacement in cubic centimeters.
///
/// Text containing a decimal point is read as liters. Empty text is absent;
/// decimal text that does not parse to a non-negative number is an error.
pub fn parse_displacement(text: &str) -> Result<Option<u32>, FieldError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if !text.contains('.') {
        return Ok(coerce_int(text));
    }

    let liters: f64 = text.parse().map_err(|_| FieldError::Malformed {
        field: "ccm",
        value: text.to_string(),
    })?;
    let ccm = (liters * 1000.0).round();
    if !ccm.is_finite() || ccm < 0.0 || ccm > f64::from(u32::MAX) {
        return Err(FieldError::OutOfRange {
            field: "ccm",
            value: text.to_string(),
        });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let ccm = ccm as u32;
    Ok(Some(ccm))
}

/// Lenient [`parse_displacement`]: malformed text is absent.
pub fn coerce_displacement(text: &str) -> Option<u32> {
    parse_displacement(text).ok().flatten()
}

/// Fuel label for an engine row: the explicit column when present,
/// otherwise inferred from the description.
pub fn infer_fuel_type(explicit: &str, description: &str) -> String {
    let explicit = explicit.trim();
    if !explicit.is_empty() {
        return explicit.to_string();
    }

    let lower = description.to_lowercase();
    if DIESEL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        DIESEL.to_string()
    } else {
        GASOLINE.to_string()
    }
}
