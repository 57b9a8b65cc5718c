use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::FormConfig;
use crate::error::{FormError, LocationError};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(ReportId);
typed_id!(IdempotencyKey);

impl IdempotencyKey {
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    #[must_use]
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self(millis)
    }
}

/// `(0, 0)` doubles as "not set yet".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const UNSET: Self = Self { lat: 0.0, lng: 0.0 };

    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    #[must_use]
    pub fn is_unset(self) -> bool {
        self == Self::UNSET
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (MIN_LATITUDE..=MAX_LATITUDE).contains(&self.lat)
            && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.lng)
    }
}

/// Handle to a picked image (content URI, file path, blob key). Never the bytes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReportStatus {
    #[default]
    New,
    InProgress,
    Fixed,
}

impl ReportStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "InProgress",
            Self::Fixed => "Fixed",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub image_url: String,
}

impl Category {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", content = "error", rename_all = "snake_case")]
pub enum LocationPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(LocationError),
}

impl LocationPhase {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", content = "value", rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Loading,
    Succeeded(ReportId),
    Failed(FormError),
}

impl SubmissionPhase {
    /// A submission attempt has started and not resolved yet.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::Validating | Self::Loading)
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Everything the user has entered so far plus the state of both async
/// resources. This is also the view model handed to the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormState {
    pub title: String,
    pub description: String,
    pub category: String,
    pub coordinates: Coordinates,
    pub image: Option<ImageRef>,
    pub status: ReportStatus,
    pub categories: Vec<Category>,
    pub location_phase: LocationPhase,
    pub submission_phase: SubmissionPhase,
}

impl FormState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.submission_phase, SubmissionPhase::Loading)
    }

    #[must_use]
    pub const fn is_locating(&self) -> bool {
        self.location_phase.is_loading()
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.submission_phase, SubmissionPhase::Succeeded(_))
    }

    #[must_use]
    pub fn submitted_id(&self) -> Option<&ReportId> {
        match &self.submission_phase {
            SubmissionPhase::Succeeded(id) => Some(id),
            _ => None,
        }
    }

    /// Latest error to show, submission first.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        if let SubmissionPhase::Failed(error) = &self.submission_phase {
            return Some(error.user_facing_message());
        }
        match &self.location_phase {
            LocationPhase::Failed(error) => Some(error.user_facing_message()),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// A new edit acknowledges the previous submission error.
    pub(crate) fn acknowledge_failure(&mut self) {
        if self.submission_phase.is_failed() {
            self.submission_phase = SubmissionPhase::Idle;
        }
    }
}

/// Immutable snapshot sent to the report submitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    pub idempotency_key: IdempotencyKey,
    pub title: String,
    pub description: String,
    pub status: ReportStatus,
    pub category: String,
    pub image_ref: ImageRef,
    pub coordinates: Coordinates,
    pub created_at: UnixTimeMs,
    pub updated_at: UnixTimeMs,
}

impl ReportDraft {
    /// `None` when no image is attached; callers validate first.
    #[must_use]
    pub fn from_form(form: &FormState, now: UnixTimeMs) -> Option<Self> {
        let image_ref = form.image.clone()?;

        Some(Self {
            idempotency_key: IdempotencyKey::generate(),
            title: form.title.clone(),
            description: form.description.clone(),
            status: form.status,
            category: form.category.clone(),
            image_ref,
            coordinates: form.coordinates,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Crux model: the form plus session bookkeeping the shell never sees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub form: FormState,
    pub config: FormConfig,
    pub session_open: bool,
}
