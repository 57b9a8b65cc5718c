mod categories;
mod location;
mod reports;

pub use self::categories::{Categories, CategoryOperation};
pub use self::location::{Location, LocationOperation, LocationResult};
pub use self::reports::{ReportOperation, Reports, SubmissionResult};

// View updates go through the stock render capability.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

/// Effects the report form asks its shell to perform. The derive generates the
/// matching `Effect` enum (`Render`, `Location`, `Reports`, `Categories`).
#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub location: Location<Event>,
    pub reports: Reports<Event>,
    pub categories: Categories<Event>,
}
