#![allow(clippy::must_use_candidate)]

use autocat_core::Brand;

/// Which brands a full walk descends into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BrandFilter {
    #[default]
    All,
    /// Upper-cased names to keep
    Names(Vec<String>),
}

impl BrandFilter {
    /// An allow-list of brand names; an empty list keeps every brand.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_uppercase())
            .filter(|n| !n.is_empty())
            .collect();

        if names.is_empty() {
            BrandFilter::All
        } else {
            BrandFilter::Names(names)
        }
    }

    pub fn matches(&self, brand: &Brand) -> bool {
        match self {
            BrandFilter::All => true,
            BrandFilter::Names(names) => {
                let name = brand.name.to_uppercase();
                names.iter().any(|n| *n == name)
            }
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, BrandFilter::All)
    }
}
