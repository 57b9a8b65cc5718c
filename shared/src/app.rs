//! The report-composition state machine.
//!
//! Every transition is a plain function of the current [`Model`] and one
//! [`Event`]. Async work (location lookup, submission, category feed) leaves
//! through capabilities and comes back as another event, so the model only
//! ever changes inside [`App::update`].

use crate::capabilities::Capabilities;
use crate::error::{FieldIssue, FormError, LocationError, ValidationError};
use crate::event::Event;
use crate::model::{FormState, LocationPhase, Model, ReportDraft, SubmissionPhase, UnixTimeMs};
use crate::validation::validate;

#[derive(Default)]
pub struct App;

impl App {
    fn start_submission(model: &mut Model, caps: &Capabilities) {
        if let Err(error) = validate(&model.form, &model.config) {
            model.form.submission_phase = SubmissionPhase::Failed(error.into());
            return;
        }

        // validate() guarantees an image, so this only fails if the two drift apart.
        let Some(draft) = ReportDraft::from_form(&model.form, UnixTimeMs::now()) else {
            model.form.submission_phase = SubmissionPhase::Failed(FormError::Validation(
                ValidationError {
                    issues: vec![FieldIssue::MissingImage],
                },
            ));
            return;
        };

        model.form.submission_phase = SubmissionPhase::Loading;
        caps.reports.submit(draft, Event::SubmissionResolved);
    }

    fn reset_form(form: &mut FormState) {
        let categories = std::mem::take(&mut form.categories);
        let location_phase = if form.location_phase.is_loading() {
            LocationPhase::Loading
        } else {
            LocationPhase::Idle
        };

        *form = FormState {
            categories,
            location_phase,
            ..FormState::default()
        };
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = FormState;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::FormOpened(config) => {
                model.config = config;

                if !model.session_open {
                    model.session_open = true;
                    caps.categories.watch(Event::CategoriesUpdated);
                }

                caps.render.render();
            }

            Event::FormReset => {
                if model.form.submission_phase.is_in_flight() {
                    return;
                }

                Self::reset_form(&mut model.form);
                caps.render.render();
            }

            Event::Edit(edit) => {
                edit.apply(&mut model.form);
                model.form.acknowledge_failure();
                caps.render.render();
            }

            Event::CategoriesUpdated(categories) => {
                model.form.categories = categories;
                caps.render.render();
            }

            Event::RequestCurrentLocation => {
                if model.form.location_phase.is_loading() {
                    return;
                }

                model.form.location_phase = LocationPhase::Loading;
                caps.location.get_current(Event::LocationResolved);
                caps.render.render();
            }

            Event::LocationResolved(result) => {
                if !model.form.location_phase.is_loading() {
                    return;
                }

                model.form.location_phase = match result {
                    Ok(coordinates) if coordinates.is_valid() => {
                        model.form.coordinates = coordinates;
                        LocationPhase::Succeeded
                    }
                    Ok(coordinates) => LocationPhase::Failed(LocationError::Unknown(format!(
                        "invalid coordinates: lat={}, lng={}",
                        coordinates.lat, coordinates.lng
                    ))),
                    Err(error) => LocationPhase::Failed(error),
                };
                caps.render.render();
            }

            Event::SubmitRequested => {
                if model.form.submission_phase.is_in_flight() {
                    return;
                }

                Self::start_submission(model, caps);
                caps.render.render();
            }

            Event::SubmissionResolved(result) => {
                if model.form.submission_phase != SubmissionPhase::Loading {
                    return;
                }

                model.form.submission_phase = match result {
                    Ok(id) => SubmissionPhase::Succeeded(id),
                    Err(error) => SubmissionPhase::Failed(error.into()),
                };
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> FormState {
        model.form.clone()
    }
}
