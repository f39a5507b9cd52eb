//! Category/unit catalog loading.
//!
//! The catalog document maps each category name to its ordered unit list:
//!
//! ```json
//! { "Length": [ { "name": "Meter", "conversion": 1.0, "base_unit": true }, ... ] }
//! ```
//!
//! Category order follows document order. The remote-backed category is not
//! part of the built-in document; shells fetch its units from the rate
//! service and parse them with [`parse_units_response`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Category, Unit};
use crate::MIN_UNITS_PER_CATEGORY;

const BUILTIN_CATALOG: &str = include_str!("../assets/regular_units.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("name cannot be empty")]
    EmptyName,

    #[error("unit '{unit}' has invalid conversion factor {factor}")]
    InvalidFactor { unit: String, factor: f64 },

    #[error("category '{category}' has {count} units, at least {min} required", min = MIN_UNITS_PER_CATEGORY)]
    TooFewUnits { category: String, count: usize },

    #[error("duplicate unit '{unit}' in category '{category}'")]
    DuplicateUnit { category: String, unit: String },

    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for category in categories {
            catalog.push(category)?;
        }
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let categories = raw
            .into_iter()
            .map(|(name, units)| {
                let units: Vec<Unit> = serde_json::from_value(units)?;
                Category::new(name, units)
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        Self::new(categories)
    }

    /// The embedded catalog of ratio-backed categories.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn push(&mut self, category: Category) -> Result<(), CatalogError> {
        if self.find(category.name()).is_some() {
            return Err(CatalogError::DuplicateCategory(category.name().to_string()));
        }
        self.categories.push(category);
        Ok(())
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name() == name)
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(Category::name).collect()
    }
}

#[derive(Deserialize)]
struct UnitsResponse {
    units: Vec<Unit>,
}

/// Parses the rate service's unit list (`{"units": [...]}`).
pub fn parse_units_response(body: &[u8]) -> Result<Vec<Unit>, CatalogError> {
    let response: UnitsResponse = serde_json::from_slice(body)?;
    Ok(response.units)
}
