//! Sans-IO conversion engine.
//!
//! Ratio-backed categories convert immediately. Remote-backed categories
//! either fail fast on a reachability problem or hand back a [`RateQuery`]
//! for the shell to run; [`finish_remote`] completes them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::RateQuery;
use crate::format::format_value;
use crate::model::{Category, Unit};
use crate::ErrorKind;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionFailure {
    #[error("rate service returned no usable value")]
    RemoteUnavailable,

    #[error("network unreachable")]
    NetworkUnreachable,
}

impl ConversionFailure {
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::RemoteUnavailable => ErrorKind::RemoteUnavailable,
            Self::NetworkUnreachable => ErrorKind::NetworkUnreachable,
        }
    }
}

/// Formatted value on success.
pub type ConversionResult = Result<String, ConversionFailure>;

#[derive(Debug, Clone, Copy)]
pub struct ConversionRequest<'a> {
    pub category: &'a Category,
    pub from: &'a Unit,
    pub to: &'a Unit,
    pub input_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    Ready(ConversionResult),
    Remote(RateQuery),
}

#[must_use]
pub fn convert(request: &ConversionRequest<'_>, reachability_problem: bool) -> Conversion {
    if let Some(route) = request.category.remote_route() {
        if reachability_problem {
            return Conversion::Ready(Err(ConversionFailure::NetworkUnreachable));
        }
        return Conversion::Remote(RateQuery::new(
            route,
            request.input_value,
            request.from.name(),
            request.to.name(),
        ));
    }

    let value = ratio_convert(request.input_value, request.from, request.to);
    Conversion::Ready(Ok(format_value(value)))
}

/// Completes a remote conversion with whatever the rate service returned.
#[must_use]
pub fn finish_remote(rate: Option<f64>) -> ConversionResult {
    match rate {
        Some(value) if value.is_finite() => Ok(format_value(value)),
        _ => Err(ConversionFailure::RemoteUnavailable),
    }
}

#[must_use]
pub fn ratio_convert(value: f64, from: &Unit, to: &Unit) -> f64 {
    value * (to.conversion_factor() / from.conversion_factor())
}
