use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// One conversion request to the rate service.
///
/// `amount` is the shortest decimal rendering that round-trips to the input
/// value, so no precision is lost on the way to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuery {
    pub route: String,
    pub amount: String,
    pub from: String,
    pub to: String,
}

impl RateQuery {
    #[must_use]
    pub fn new(
        route: impl Into<String>,
        amount: f64,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            route: route.into(),
            amount: amount.to_string(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// `{base}/{route}/convert?amount=..&from=..&to=..`
    pub fn url(&self, base: &Url) -> Result<Url, RatesError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| RatesError::InvalidBaseUrl(base.to_string()))?
            .pop_if_empty()
            .push(&self.route)
            .push("convert");
        url.query_pairs_mut()
            .append_pair("amount", &self.amount)
            .append_pair("from", &self.from)
            .append_pair("to", &self.to);
        Ok(url)
    }
}

impl Operation for RateQuery {
    /// `None` is the only failure signal: transport errors, timeouts and
    /// malformed bodies all collapse into it.
    type Output = Option<f64>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RatesError {
    #[error("base url cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid base url: {0}")]
    Parse(#[from] url::ParseError),
}

pub fn default_base_url() -> Result<Url, RatesError> {
    Ok(Url::parse(crate::DEFAULT_RATES_BASE_URL)?)
}

#[derive(Deserialize)]
struct RateResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    conversion: Option<f64>,
}

/// Reads `{"status": "ok", "conversion": 8.904}` from the rate service.
///
/// A missing status, an `"error"` status, a missing or non-numeric
/// conversion, or an unparseable body all yield `None`.
#[must_use]
pub fn parse_rate_response(body: &[u8]) -> Option<f64> {
    let response: RateResponse = serde_json::from_slice(body).ok()?;
    match response.status.as_deref() {
        None | Some("error") => None,
        Some(_) => response.conversion.filter(|v| v.is_finite()),
    }
}

#[derive(Capability)]
pub struct Rates<Ev> {
    context: CapabilityContext<RateQuery, Ev>,
}

impl<Ev> Rates<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<RateQuery, Ev>) -> Self {
        Self { context }
    }

    pub fn convert<F>(&self, query: RateQuery, make_event: F)
    where
        F: FnOnce(Option<f64>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let rate = context.request_from_shell(query).await;
            context.update_app(make_event(rate));
        });
    }
}
