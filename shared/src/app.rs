use tracing::{debug, info};

use crate::capabilities::Capabilities;
use crate::event::Event;
use crate::model::{Model, Session};
use crate::selection::{Selection, Step};
use crate::{UserFacingError, ViewModel, ViewState};

#[derive(Default)]
pub struct App;

impl App {
    fn run_step(step: Step, caps: &Capabilities) {
        if let Step::FetchRate { generation, query } = step {
            debug!(generation, route = %query.route, "requesting rate");
            caps.rates
                .convert(query, move |rate| Event::RateResolved { generation, rate });
        }
    }

    fn build_view_state(selection: &Selection) -> ViewState {
        let category = selection.category().name().to_string();

        if let Some(failure) = selection.last_error() {
            let kind = failure.kind();
            if kind.is_category_level() {
                return ViewState::Error {
                    category,
                    error: UserFacingError::from(kind),
                };
            }
        }

        ViewState::Converter {
            category,
            units: selection.category().unit_names(),
            from_unit: selection.from_unit().name().to_string(),
            to_unit: selection.to_unit().name().to_string(),
            input_is_valid: selection.input_is_valid(),
            output: selection.output().to_string(),
            is_converting: selection.is_converting(),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();

        if model.is_ended() {
            debug!(event = event_name, "session ended, ignoring event");
            return;
        }

        debug!(event = event_name, "update");
        if event.is_user_initiated() {
            info!(event = event_name, "user action");
        }

        let problem = model.reachability.has_problem();

        match event {
            Event::Start => {
                model.session = Session::Running;
                if model.reachability.start() {
                    caps.connectivity.check(Event::ConnectivityChecked);
                    caps.connectivity.watch(Event::ConnectivityChanged);
                }
            }

            Event::Teardown => {
                model.session = Session::Ended;
                if let Some(selection) = model.selection.as_mut() {
                    selection.cancel();
                }
                if model.reachability.release() {
                    caps.connectivity.unwatch();
                }
                info!("session ended");
            }

            Event::CategoryChanged(category) => {
                let category = *category;
                info!(category = category.name(), "category selected");
                match model.selection.as_mut() {
                    Some(selection) => selection.on_category_changed(category),
                    None => model.selection = Some(Selection::new(category)),
                }
            }

            Event::InputChanged(text) => {
                let Some(selection) = model.selection.as_mut() else {
                    debug!("input without a category, ignoring");
                    return;
                };
                let step = selection.on_input_changed(&text, problem);
                Self::run_step(step, caps);
            }

            Event::FromUnitChanged(name) => {
                let Some(selection) = model.selection.as_mut() else {
                    debug!("unit change without a category, ignoring");
                    return;
                };
                let step = selection.on_from_unit_changed(&name, problem);
                Self::run_step(step, caps);
            }

            Event::ToUnitChanged(name) => {
                let Some(selection) = model.selection.as_mut() else {
                    debug!("unit change without a category, ignoring");
                    return;
                };
                let step = selection.on_to_unit_changed(&name, problem);
                Self::run_step(step, caps);
            }

            Event::Retry => {
                let Some(selection) = model.selection.as_mut() else {
                    debug!("retry without a category, ignoring");
                    return;
                };
                let step = selection.retry(problem);
                Self::run_step(step, caps);
            }

            Event::RateResolved { generation, rate } => {
                let applied = model
                    .selection
                    .as_mut()
                    .is_some_and(|selection| selection.apply_rate(generation, rate));
                if !applied {
                    return;
                }
            }

            Event::ConnectivityChecked(result) => {
                model.reachability.apply_initial(result);
            }

            Event::ConnectivityChanged(reachability) => {
                model.reachability.apply(reachability);
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        let state = model
            .selection
            .as_ref()
            .map_or(ViewState::NoCategory, Self::build_view_state);

        ViewModel {
            state,
            reachability: model.reachability.state(),
            session_active: model.session == Session::Running,
        }
    }
}
