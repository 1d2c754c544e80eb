//! Record extractors for the three catalog page kinds.
//!
//! Each extractor takes rendered markup and returns records sorted and
//! truncated to the requested maximum. Candidates that fail the link rules
//! are dropped silently; malformed engine rows are logged and skipped.

mod brand;
mod engine;
mod model;

pub use brand::extract_brands;
pub use engine::{extract_engines, parse_engine_row, ENGINE_HEADER_KEYWORDS};
pub use model::{extract_models, ModelStrategy, MODEL_STRATEGIES};

use crate::normalize::is_navigational;

/// Acceptance rules for a candidate link label.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LinkRules {
    pub min_chars: usize,
    pub max_chars: usize,
    pub reject_all_caps: bool,
}

impl LinkRules {
    pub(crate) fn accepts(&self, text: &str) -> bool {
        let chars = text.chars().count();
        if text.is_empty() || chars < self.min_chars || chars > self.max_chars {
            return false;
        }
        if is_navigational(text) {
            return false;
        }
        !(self.reject_all_caps && is_all_caps(text))
    }
}

/// Has cased letters and none of them lower-case.
fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

pub(crate) fn truncate<T>(records: &mut Vec<T>, max: Option<usize>) {
    if let Some(max) = max {
        records.truncate(max);
    }
}
