use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::reachability::ReachabilityTracker;
use crate::selection::Selection;
use crate::{ErrorKind, CURRENCY, MIN_UNITS_PER_CATEGORY};

/// A category backed by the remote rate service, identified by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteCategory {
    pub name: &'static str,
    pub route: &'static str,
}

impl RemoteCategory {
    #[must_use]
    pub fn matches(&self, category_name: &str) -> bool {
        self.name == category_name
    }
}

#[derive(Deserialize)]
struct RawUnit {
    name: String,
    #[serde(alias = "conversion")]
    conversion_factor: f64,
}

/// A named unit with a factor relative to its category's base unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnit")]
pub struct Unit {
    name: String,
    conversion_factor: f64,
}

impl Unit {
    pub fn new(name: impl Into<String>, conversion_factor: f64) -> Result<Self, CatalogError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if !conversion_factor.is_finite() || conversion_factor <= 0.0 {
            return Err(CatalogError::InvalidFactor {
                unit: name,
                factor: conversion_factor,
            });
        }
        Ok(Self {
            name,
            conversion_factor,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn conversion_factor(&self) -> f64 {
        self.conversion_factor
    }
}

impl TryFrom<RawUnit> for Unit {
    type Error = CatalogError;

    fn try_from(raw: RawUnit) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.conversion_factor)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unit '{unit}' not found in category '{category}'")]
pub struct UnitNotFound {
    pub category: String,
    pub unit: String,
}

impl UnitNotFound {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::UnitNotFound
    }
}

#[derive(Deserialize)]
struct RawCategory {
    name: String,
    units: Vec<Unit>,
}

/// A measurement category and its ordered units.
///
/// Always holds at least [`MIN_UNITS_PER_CATEGORY`] units with unique names,
/// so the default from/to pair exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCategory")]
pub struct Category {
    name: String,
    units: Vec<Unit>,
    is_remote_backed: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, units: Vec<Unit>) -> Result<Self, CatalogError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if units.len() < MIN_UNITS_PER_CATEGORY {
            return Err(CatalogError::TooFewUnits {
                category: name,
                count: units.len(),
            });
        }
        for (i, unit) in units.iter().enumerate() {
            if units[..i].iter().any(|u| u.name == unit.name) {
                return Err(CatalogError::DuplicateUnit {
                    category: name,
                    unit: unit.name.clone(),
                });
            }
        }

        let is_remote_backed = CURRENCY.matches(&name);
        Ok(Self {
            name,
            units,
            is_remote_backed,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    #[must_use]
    pub const fn is_remote_backed(&self) -> bool {
        self.is_remote_backed
    }

    /// Route on the rate service, present exactly for remote-backed categories.
    #[must_use]
    pub fn remote_route(&self) -> Option<&'static str> {
        self.is_remote_backed.then_some(CURRENCY.route)
    }

    /// Selection defaults: the first two units.
    #[must_use]
    pub fn default_pair(&self) -> (&Unit, &Unit) {
        (&self.units[0], &self.units[1])
    }

    pub fn find_unit(&self, name: &str) -> Result<&Unit, UnitNotFound> {
        self.units
            .iter()
            .find(|u| u.name == name)
            .ok_or_else(|| UnitNotFound {
                category: self.name.clone(),
                unit: name.to_string(),
            })
    }

    #[must_use]
    pub fn unit_names(&self) -> Vec<String> {
        self.units.iter().map(|u| u.name.clone()).collect()
    }
}

impl TryFrom<RawCategory> for Category {
    type Error = CatalogError;

    fn try_from(raw: RawCategory) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.units)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Session {
    #[default]
    NotStarted,
    Running,
    Ended,
}

#[derive(Debug, Default)]
pub struct Model {
    pub session: Session,
    pub reachability: ReachabilityTracker,
    pub selection: Option<Selection>,
}

impl Model {
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.session == Session::Ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length() -> Category {
        Category::new(
            "Length",
            vec![
                Unit::new("Meters", 1.0).unwrap(),
                Unit::new("Feet", 3.28084).unwrap(),
                Unit::new("Inches", 39.3701).unwrap(),
            ],
        )
        .unwrap()
    }

    mod unit_tests {
        use super::*;

        #[test]
        fn test_valid_unit() {
            let unit = Unit::new("Meters", 1.0).unwrap();
            assert_eq!(unit.name(), "Meters");
            assert_eq!(unit.conversion_factor(), 1.0);
        }

        #[test]
        fn test_rejects_non_positive_factor() {
            assert!(matches!(
                Unit::new("Zero", 0.0),
                Err(CatalogError::InvalidFactor { .. })
            ));
            assert!(matches!(
                Unit::new("Negative", -2.0),
                Err(CatalogError::InvalidFactor { .. })
            ));
        }

        #[test]
        fn test_rejects_non_finite_factor() {
            assert!(Unit::new("Nan", f64::NAN).is_err());
            assert!(Unit::new("Inf", f64::INFINITY).is_err());
        }

        #[test]
        fn test_rejects_blank_name() {
            assert!(matches!(Unit::new("  ", 1.0), Err(CatalogError::EmptyName)));
        }

        #[test]
        fn test_deserialize_accepts_conversion_alias() {
            let unit: Unit = serde_json::from_str(r#"{"name":"Foot","conversion":3.28084}"#).unwrap();
            assert_eq!(unit.conversion_factor(), 3.28084);
        }

        #[test]
        fn test_deserialize_validates_factor() {
            let result: Result<Unit, _> = serde_json::from_str(r#"{"name":"Bad","conversion":0}"#);
            assert!(result.is_err());
        }
    }

    mod category_tests {
        use super::*;

        #[test]
        fn test_default_pair_is_first_two_units() {
            let category = length();
            let (from, to) = category.default_pair();
            assert_eq!(from.name(), "Meters");
            assert_eq!(to.name(), "Feet");
        }

        #[test]
        fn test_requires_two_units() {
            let result = Category::new("Length", vec![Unit::new("Meters", 1.0).unwrap()]);
            assert!(matches!(
                result,
                Err(CatalogError::TooFewUnits { count: 1, .. })
            ));
        }

        #[test]
        fn test_rejects_duplicate_unit_names() {
            let result = Category::new(
                "Length",
                vec![
                    Unit::new("Meters", 1.0).unwrap(),
                    Unit::new("Meters", 2.0).unwrap(),
                ],
            );
            assert!(matches!(result, Err(CatalogError::DuplicateUnit { .. })));
        }

        #[test]
        fn test_currency_is_remote_backed() {
            let currency = Category::new(
                "Currency",
                vec![
                    Unit::new("US Dollar", 1.0).unwrap(),
                    Unit::new("Euro", 0.9).unwrap(),
                ],
            )
            .unwrap();
            assert!(currency.is_remote_backed());
            assert_eq!(currency.remote_route(), Some("currency"));
        }

        #[test]
        fn test_remote_match_is_exact() {
            let lowercase = Category::new(
                "currency",
                vec![
                    Unit::new("US Dollar", 1.0).unwrap(),
                    Unit::new("Euro", 0.9).unwrap(),
                ],
            )
            .unwrap();
            assert!(!lowercase.is_remote_backed());
            assert!(!length().is_remote_backed());
            assert_eq!(length().remote_route(), None);
        }

        #[test]
        fn test_find_unit() {
            let category = length();
            assert_eq!(category.find_unit("Feet").unwrap().conversion_factor(), 3.28084);
        }

        #[test]
        fn test_find_unit_missing() {
            let err = length().find_unit("Furlongs").unwrap_err();
            assert_eq!(err.unit, "Furlongs");
            assert_eq!(err.category, "Length");
            assert_eq!(err.kind(), ErrorKind::UnitNotFound);
        }

        #[test]
        fn test_deserialize_category_is_validated() {
            let json = r#"{"name":"Mass","units":[{"name":"Kilogram","conversion":1.0}]}"#;
            let result: Result<Category, _> = serde_json::from_str(json);
            assert!(result.is_err());
        }
    }
}
