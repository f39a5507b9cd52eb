//! Shell-provided effects.
//!
//! We use Crux's built-in Render capability directly because it provides
//! all necessary functionality for triggering view updates. The rate
//! service and the platform connectivity monitor are custom capabilities.

mod connectivity;
mod rates;

pub use self::connectivity::{
    Connectivity, ConnectivityError, ConnectivityOperation, ConnectivityOutput,
};
pub use self::rates::{default_base_url, parse_rate_response, RateQuery, Rates, RatesError};
pub use crux_core::render::Render;

// The Effect derive resolves the app type by the name `App`.
#[allow(unused_imports)]
use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub rates: Rates<Event>,
    pub connectivity: Connectivity<Event>,
}
