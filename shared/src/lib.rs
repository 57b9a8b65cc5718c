//! Shared core for composing and submitting damaged-road reports.
//!
//! The state machine lives in [`App`] (a Crux app). Shells either drive it
//! through Crux's effect/request protocol, or host it in-process with
//! [`ReportFormController`] and the traits in [`providers`].

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod model;
pub mod providers;
pub mod store;
pub mod validation;

mod worker;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::{CategoryPolicy, FormConfig};
pub use controller::ReportFormController;
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{
    ConfigError, ControllerError, FieldIssue, FormError, LocationError, SubmissionError,
    ValidationError,
};
pub use event::{Event, FieldEdit};
pub use model::{
    Category, Coordinates, FormState, ImageRef, LocationPhase, Model, ReportDraft, ReportId,
    ReportStatus, SubmissionPhase,
};
pub use store::{StateHolder, Subscription};
