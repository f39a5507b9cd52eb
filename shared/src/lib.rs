#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod engine;
pub mod event;
pub mod format;
pub mod model;
pub mod reachability;
pub mod selection;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use catalog::Catalog;
pub use crux_core::{render::Render, App as CruxApp};
pub use engine::{ConversionFailure, ConversionResult};
pub use event::Event;
pub use model::{Category, Model, RemoteCategory, Session, Unit};
pub use reachability::{Reachability, ReachabilityTracker};
pub use selection::{Selection, Step};

pub const SIGNIFICANT_DIGITS: usize = 7;
pub const MIN_UNITS_PER_CATEGORY: usize = 2;
pub const DEFAULT_RATES_BASE_URL: &str = "https://flutter.udacity.com";

/// The one category whose conversions go through the rate service.
pub const CURRENCY: RemoteCategory = RemoteCategory {
    name: "Currency",
    route: "currency",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    RemoteUnavailable,
    NetworkUnreachable,
    UnitNotFound,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::RemoteUnavailable => "REMOTE_UNAVAILABLE",
            Self::NetworkUnreachable => "NETWORK_UNREACHABLE",
            Self::UnitNotFound => "UNIT_NOT_FOUND",
        }
    }

    /// Category-level failures replace the whole converter with an error
    /// presentation. Everything else stays local to its field or is logged.
    #[must_use]
    pub const fn is_category_level(self) -> bool {
        matches!(self, Self::RemoteUnavailable | Self::NetworkUnreachable)
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::RemoteUnavailable | Self::NetworkUnreachable)
    }

    #[must_use]
    pub fn user_facing_message(self) -> String {
        match self {
            Self::InvalidInput => "Invalid number entered".into(),
            Self::RemoteUnavailable => "Oh no! We can't connect right now!".into(),
            Self::NetworkUnreachable => {
                "No network connection. Please check your connection and try again.".into()
            }
            Self::UnitNotFound => "That unit is not available.".into(),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFacingError {
    pub message: String,
    pub error_code: String,
    pub is_retryable: bool,
}

impl From<ErrorKind> for UserFacingError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            message: kind.user_facing_message(),
            error_code: kind.code().to_string(),
            is_retryable: kind.is_retryable(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewState {
    NoCategory,
    Converter {
        category: String,
        units: Vec<String>,
        from_unit: String,
        to_unit: String,
        input_is_valid: bool,
        output: String,
        is_converting: bool,
    },
    Error {
        category: String,
        error: UserFacingError,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub state: ViewState,
    pub reachability: Reachability,
    pub session_active: bool,
}
