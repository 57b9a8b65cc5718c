use serde::{Deserialize, Serialize};

use crate::capabilities::{LocationResult, SubmissionResult};
use crate::config::FormConfig;
use crate::model::{Category, Coordinates, FormState, ImageRef, ReportStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    FormOpened(FormConfig),
    FormReset,

    Edit(FieldEdit),

    RequestCurrentLocation,
    SubmitRequested,

    // capability completions
    CategoriesUpdated(Vec<Category>),
    LocationResolved(LocationResult),
    SubmissionResolved(SubmissionResult),
}

/// A user edit that replaces exactly one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldEdit {
    TitleChanged(String),
    DescriptionChanged(String),
    CategorySelected(String),
    CoordinatesChanged { lat: f64, lng: f64 },
    ImageSelected(ImageRef),
    ImageCleared,
    StatusChanged(ReportStatus),
}

impl FieldEdit {
    pub(crate) fn apply(self, form: &mut FormState) {
        match self {
            Self::TitleChanged(title) => form.title = title,
            Self::DescriptionChanged(description) => form.description = description,
            Self::CategorySelected(category) => form.category = category,
            Self::CoordinatesChanged { lat, lng } => form.coordinates = Coordinates::new(lat, lng),
            Self::ImageSelected(image) => form.image = Some(image),
            Self::ImageCleared => form.image = None,
            Self::StatusChanged(status) => form.status = status,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TitleChanged(_) => "title_changed",
            Self::DescriptionChanged(_) => "description_changed",
            Self::CategorySelected(_) => "category_selected",
            Self::CoordinatesChanged { .. } => "coordinates_changed",
            Self::ImageSelected(_) => "image_selected",
            Self::ImageCleared => "image_cleared",
            Self::StatusChanged(_) => "status_changed",
        }
    }
}

impl From<FieldEdit> for Event {
    fn from(edit: FieldEdit) -> Self {
        Self::Edit(edit)
    }
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FormOpened(_) => "form_opened",
            Self::FormReset => "form_reset",
            Self::Edit(edit) => edit.name(),
            Self::RequestCurrentLocation => "request_current_location",
            Self::SubmitRequested => "submit_requested",
            Self::CategoriesUpdated(_) => "categories_updated",
            Self::LocationResolved(_) => "location_resolved",
            Self::SubmissionResolved(_) => "submission_resolved",
        }
    }
}
