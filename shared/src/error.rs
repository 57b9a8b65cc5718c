use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why the current-location lookup failed.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("no location fix available")]
    Unavailable,

    #[error("location lookup failed: {0}")]
    Unknown(String),
}

impl LocationError {
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::PermissionDenied => {
                "Location access is required. Please enable location permissions in Settings."
                    .into()
            }
            Self::Unavailable => {
                "Unable to determine your location. Please check your GPS settings.".into()
            }
            Self::Unknown(message) => format!("Unable to determine your location: {message}"),
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SubmissionError {
    #[error("report submission failed: {0}")]
    Unknown(String),
}

/// A single reason the form cannot be submitted yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FieldIssue {
    BlankTitle,
    BlankDescription,
    BlankCategory,
    UnknownCategory { name: String },
    CoordinatesUnset,
    CoordinatesOutOfRange,
    MissingImage,
}

impl FieldIssue {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::BlankTitle => "Title cannot be empty".into(),
            Self::BlankDescription => "Description cannot be empty".into(),
            Self::BlankCategory => "Please choose a category".into(),
            Self::UnknownCategory { name } => format!("\"{name}\" is not an available category"),
            Self::CoordinatesUnset => "Please set the report location".into(),
            Self::CoordinatesOutOfRange => "The report location is not a valid coordinate".into(),
            Self::MissingImage => "Please add a photo".into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Aggregate validation failure. The form fails as a whole; `issues` is only
/// there so a presentation layer can highlight fields.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("validation failed ({} issue(s))", .issues.len())]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    #[must_use]
    pub fn contains(&self, issue: &FieldIssue) -> bool {
        self.issues.contains(issue)
    }
}

/// Failure recorded on the submission phase.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

impl FormError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Submission(_) => "submission",
        }
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self {
            Self::Validation(_) => "Please fill all fields correctly".into(),
            Self::Submission(SubmissionError::Unknown(message)) if !message.trim().is_empty() => {
                message.clone()
            }
            Self::Submission(_) => "An unknown error occurred. Please try again.".into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid form config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("report form controller needs a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
