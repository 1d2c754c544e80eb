//! Catalog records shared across autocat.
//!
//! Flat records (`Brand`, `Model`, `EngineVariant`) are what the extractors
//! produce for one page. `Catalog` is the nested brand → model → engine
//! structure assembled by a full walk.

use crate::error::CatalogError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Identifier tokens are single URL path segments.
fn validate_segment(kind: &str, id: &str) -> Result<(), CatalogError> {
    static SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex =
        SEGMENT_REGEX.get_or_init(|| Regex::new(r"^[^\s/;?#]+$").expect("valid regex"));

    if regex.is_match(id) {
        Ok(())
    } else {
        Err(CatalogError::Validation(format!(
            "invalid {kind} ID: must be a non-empty path segment, got '{id}'"
        )))
    }
}

/// Newtype for brand identifiers taken from the brand-detail URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BrandId(String);

impl BrandId {
    /// Create a new `BrandId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains path separators,
    /// parameter markers or whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, CatalogError> {
        let id = id.into();
        validate_segment("brand", &id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for model identifiers taken from the model-detail URL.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelId(String);

impl ModelId {
    /// Create a new `ModelId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not a single path segment.
    pub fn new(id: impl Into<String>) -> Result<Self, CatalogError> {
        let id = id.into();
        validate_segment("model", &id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vehicle manufacturer as listed on the catalog root page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Path token following the brand-detail marker
    pub id: BrandId,
    /// Display name
    pub name: String,
    /// Country of origin, `"Unknown"` when not in the country table
    pub country: String,
}

/// A model line belonging to one brand.
///
/// `year_end == None` together with `year_start == Some(_)` means the model is
/// still in production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Path token following the `<brand id>-` prefix
    pub id: ModelId,
    /// Display name with the production range stripped
    pub name: String,
    /// `MM/YY` or `YYYY`
    pub year_start: Option<String>,
    /// `MM/YY` or `YYYY`
    pub year_end: Option<String>,
    /// Not available on the brand page
    pub body_type: Option<String>,
    /// Not available on the brand page
    pub code: Option<String>,
}

/// One row of a model's engine table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineVariant {
    /// Engine code, or the engine type text when the code column is blank
    pub code: String,
    /// Power in kilowatts
    pub kw: Option<u32>,
    /// Power in horsepower
    pub hp: Option<u32>,
    /// Displacement in cubic centimeters
    pub ccm: Option<u32>,
    /// Cylinder count
    pub cylinders: Option<u32>,
    /// Explicit fuel column, or inferred from the description
    pub fuel_type: String,
    /// `MM/YY` or `YYYY`
    pub year_start: Option<String>,
    /// `MM/YY` or `YYYY`
    pub year_end: Option<String>,
    /// Engine type column text
    pub description: String,
}

/// Country attribute of a catalog brand entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandInfo {
    /// Country of origin
    pub country: String,
}

/// Model attributes kept in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Body style, when known
    pub body_type: Option<String>,
    /// Start of production
    pub year_start: Option<String>,
    /// End of production, absent while still produced
    pub year_end: Option<String>,
}

impl From<&Model> for ModelInfo {
    fn from(model: &Model) -> Self {
        Self {
            body_type: model.body_type.clone(),
            year_start: model.year_start.clone(),
            year_end: model.year_end.clone(),
        }
    }
}

/// A model subtree of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Model attributes
    pub info: ModelInfo,
    /// Engine variants in description order
    pub engines: Vec<EngineVariant>,
}

/// A brand subtree of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandEntry {
    /// Brand attributes
    pub info: BrandInfo,
    /// Models keyed by display name
    pub models: BTreeMap<String, ModelEntry>,
}

impl BrandEntry {
    /// Insert a model with an empty engine list, replacing any entry with the
    /// same display name.
    pub fn insert_model(&mut self, model: &Model) -> &mut ModelEntry {
        let entry = ModelEntry {
            info: ModelInfo::from(model),
            engines: Vec::new(),
        };

        match self.models.entry(model.name.clone()) {
            Entry::Occupied(mut slot) => {
                tracing::warn!(
                    "Model name '{}' appears twice, keeping the later entry (id {})",
                    model.name,
                    model.id
                );
                slot.insert(entry);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(entry),
        }
    }
}

/// Nested brand → model → engine catalog, keyed by display name.
///
/// Two brands (or two models of one brand) sharing a display name collapse
/// into one entry; the later insert wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    brands: BTreeMap<String, BrandEntry>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a brand with an empty model map, replacing any entry with the
    /// same display name.
    pub fn insert_brand(&mut self, brand: &Brand) -> &mut BrandEntry {
        let entry = BrandEntry {
            info: BrandInfo {
                country: brand.country.clone(),
            },
            models: BTreeMap::new(),
        };

        match self.brands.entry(brand.name.clone()) {
            Entry::Occupied(mut slot) => {
                tracing::warn!(
                    "Brand name '{}' appears twice, keeping the later entry (id {})",
                    brand.name,
                    brand.id
                );
                slot.insert(entry);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(entry),
        }
    }

    /// Look up a brand entry by display name.
    #[must_use]
    pub fn brand(&self, name: &str) -> Option<&BrandEntry> {
        self.brands.get(name)
    }

    /// Mutable access to a brand entry by display name.
    pub fn brand_mut(&mut self, name: &str) -> Option<&mut BrandEntry> {
        self.brands.get_mut(name)
    }

    /// Iterate brand entries in name order.
    pub fn brands(&self) -> impl Iterator<Item = (&String, &BrandEntry)> {
        self.brands.iter()
    }

    /// Number of brand entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.brands.len()
    }

    /// Whether the catalog has no brands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}
