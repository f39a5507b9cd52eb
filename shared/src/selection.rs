use tracing::{debug, warn};

use crate::capabilities::RateQuery;
use crate::engine::{self, Conversion, ConversionFailure, ConversionRequest, ConversionResult};
use crate::model::{Category, Unit};
use crate::ErrorKind;

/// What the caller has to do after feeding an event to a [`Selection`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// State is final for this event.
    Settled,
    /// Run `query` against the rate service and hand the answer back through
    /// [`Selection::apply_rate`] with the same `generation`.
    FetchRate { generation: u64, query: RateQuery },
}

/// From/to selection, input and output for the current category.
///
/// Every input, unit or category event bumps `generation`; a remote rate is
/// only applied if it was requested by the current generation.
#[derive(Debug, Clone)]
pub struct Selection {
    category: Category,
    from: Unit,
    to: Unit,
    input: Option<f64>,
    input_is_valid: bool,
    output: String,
    last_error: Option<ConversionFailure>,
    generation: u64,
    in_flight: Option<u64>,
}

impl Selection {
    #[must_use]
    pub fn new(category: Category) -> Self {
        let (from, to) = category.default_pair();
        let (from, to) = (from.clone(), to.clone());
        Self {
            category,
            from,
            to,
            input: None,
            input_is_valid: true,
            output: String::new(),
            last_error: None,
            generation: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    #[must_use]
    pub fn from_unit(&self) -> &Unit {
        &self.from
    }

    #[must_use]
    pub fn to_unit(&self) -> &Unit {
        &self.to
    }

    #[must_use]
    pub const fn input_value(&self) -> Option<f64> {
        self.input
    }

    #[must_use]
    pub const fn input_is_valid(&self) -> bool {
        self.input_is_valid
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<ConversionFailure> {
        self.last_error
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn is_converting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn on_input_changed(&mut self, text: &str, reachability_problem: bool) -> Step {
        self.supersede();

        let text = text.trim();
        if text.is_empty() {
            self.input = None;
            self.input_is_valid = true;
            self.output.clear();
            self.last_error = None;
            return Step::Settled;
        }

        match parse_input(text) {
            Some(value) => {
                self.input = Some(value);
                self.input_is_valid = true;
                self.convert(reachability_problem)
            }
            None => {
                // Stale output stays visible while the user fixes the input.
                debug!(code = ErrorKind::InvalidInput.code(), input = text, "rejecting input");
                self.input_is_valid = false;
                Step::Settled
            }
        }
    }

    pub fn on_from_unit_changed(&mut self, name: &str, reachability_problem: bool) -> Step {
        let Some(unit) = self.lookup(name) else {
            return Step::Settled;
        };
        self.from = unit;
        self.supersede();
        self.convert(reachability_problem)
    }

    pub fn on_to_unit_changed(&mut self, name: &str, reachability_problem: bool) -> Step {
        let Some(unit) = self.lookup(name) else {
            return Step::Settled;
        };
        self.to = unit;
        self.supersede();
        self.convert(reachability_problem)
    }

    /// Re-runs the conversion for the last valid input, superseding any
    /// request still in flight.
    pub fn retry(&mut self, reachability_problem: bool) -> Step {
        if self.input.is_none() {
            return Step::Settled;
        }
        self.supersede();
        self.convert(reachability_problem)
    }

    /// Resets to the category's default pair. The generation keeps counting
    /// so a rate requested under the old category is dropped.
    pub fn on_category_changed(&mut self, category: Category) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::new(category)
        };
    }

    /// Applies a rate for `generation`. Returns `false` if the request was
    /// superseded (or cancelled) and the rate was dropped.
    pub fn apply_rate(&mut self, generation: u64, rate: Option<f64>) -> bool {
        if self.in_flight != Some(generation) {
            debug!(
                generation,
                current = self.generation,
                "dropping stale rate"
            );
            return false;
        }
        self.in_flight = None;
        self.apply(engine::finish_remote(rate));
        true
    }

    /// Invalidates any in-flight request.
    pub fn cancel(&mut self) {
        self.supersede();
    }

    fn supersede(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    fn lookup(&self, name: &str) -> Option<Unit> {
        match self.category.find_unit(name) {
            Ok(unit) => Some(unit.clone()),
            Err(e) => {
                warn!(code = e.kind().code(), error = %e, "ignoring unit selection");
                None
            }
        }
    }

    fn convert(&mut self, reachability_problem: bool) -> Step {
        let Some(input_value) = self.input else {
            return Step::Settled;
        };
        let request = ConversionRequest {
            category: &self.category,
            from: &self.from,
            to: &self.to,
            input_value,
        };

        match engine::convert(&request, reachability_problem) {
            Conversion::Ready(result) => {
                self.apply(result);
                Step::Settled
            }
            Conversion::Remote(query) => {
                self.in_flight = Some(self.generation);
                Step::FetchRate {
                    generation: self.generation,
                    query,
                }
            }
        }
    }

    fn apply(&mut self, result: ConversionResult) {
        match result {
            Ok(output) => {
                self.output = output;
                self.last_error = None;
            }
            Err(failure) => {
                debug!(code = failure.kind().code(), "conversion failed");
                self.last_error = Some(failure);
            }
        }
    }
}

fn parse_input(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
