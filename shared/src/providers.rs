//! Host-side collaborators used by [`crate::controller::ReportFormController`].
//!
//! A native shell implements these over its platform APIs and repositories;
//! the controller turns the core's effects into calls on them.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;
use std::sync::Arc;

use crate::error::{LocationError, SubmissionError};
use crate::model::{Category, Coordinates, ReportDraft, ReportId};

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolves exactly once. Timeouts are the provider's business.
    async fn current_coordinates(&self) -> Result<Coordinates, LocationError>;
}

#[async_trait]
pub trait ReportSubmitter: Send + Sync {
    async fn submit(&self, draft: ReportDraft) -> Result<ReportId, SubmissionError>;
}

pub trait CategorySource: Send + Sync {
    /// Each item is a full snapshot. The stream may be infinite; it is dropped
    /// when the form session ends.
    fn subscribe_categories(&self) -> BoxStream<'static, Vec<Category>>;
}

#[derive(Clone)]
pub struct Providers {
    pub location: Arc<dyn LocationProvider>,
    pub submitter: Arc<dyn ReportSubmitter>,
    pub categories: Arc<dyn CategorySource>,
}

impl Providers {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        submitter: Arc<dyn ReportSubmitter>,
        categories: Arc<dyn CategorySource>,
    ) -> Self {
        Self {
            location,
            submitter,
            categories,
        }
    }
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Providers { .. }")
    }
}
