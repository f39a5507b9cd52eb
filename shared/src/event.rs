use serde::{Deserialize, Serialize};

use crate::capabilities::ConnectivityError;
use crate::model::Category;
use crate::reachability::Reachability;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    Start,
    Teardown,

    // Converter screen
    CategoryChanged(Box<Category>),
    InputChanged(String),
    FromUnitChanged(String),
    ToUnitChanged(String),
    Retry,

    // Capability responses
    ConnectivityChecked(Result<Reachability, ConnectivityError>),
    ConnectivityChanged(Reachability),
    RateResolved { generation: u64, rate: Option<f64> },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Teardown => "teardown",
            Self::CategoryChanged(_) => "category_changed",
            Self::InputChanged(_) => "input_changed",
            Self::FromUnitChanged(_) => "from_unit_changed",
            Self::ToUnitChanged(_) => "to_unit_changed",
            Self::Retry => "retry",
            Self::ConnectivityChecked(_) => "connectivity_checked",
            Self::ConnectivityChanged(_) => "connectivity_changed",
            Self::RateResolved { .. } => "rate_resolved",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::CategoryChanged(_)
                | Self::InputChanged(_)
                | Self::FromUnitChanged(_)
                | Self::ToUnitChanged(_)
                | Self::Retry
        )
    }
}
