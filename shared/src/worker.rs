//! Runs the core's effects as tokio tasks and feeds results back.

use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::capabilities::{LocationResult, SubmissionResult};
use crate::model::{Category, ReportDraft};
use crate::providers::Providers;

/// Work requested by the core.
#[derive(Debug)]
pub(crate) enum Job {
    Locate,
    Submit(ReportDraft),
    WatchCategories,
}

/// Results travelling back to the controller, in arrival order.
#[derive(Debug)]
pub(crate) enum Completion {
    Location(LocationResult),
    Submission(SubmissionResult),
    Categories(Vec<Category>),
}

/// Starts one background task for `job`. Lookups and submissions run to
/// completion; nothing here cancels them.
pub(crate) fn spawn(
    runtime: &Handle,
    job: Job,
    providers: &Providers,
    completions: mpsc::UnboundedSender<Completion>,
) -> JoinHandle<()> {
    match job {
        Job::Locate => {
            let provider = providers.location.clone();
            runtime.spawn(async move {
                tracing::debug!("location lookup started");
                let result = provider.current_coordinates().await;
                if completions.send(Completion::Location(result)).is_err() {
                    tracing::debug!("form closed before location resolved; result dropped");
                }
            })
        }

        Job::Submit(draft) => {
            let submitter = providers.submitter.clone();
            runtime.spawn(async move {
                tracing::debug!(key = %draft.idempotency_key, "report submission started");
                let result = submitter.submit(draft).await;
                match &result {
                    Ok(id) => tracing::debug!(%id, "report submission accepted"),
                    Err(e) => tracing::debug!(error = %e, "report submission rejected"),
                }
                if completions.send(Completion::Submission(result)).is_err() {
                    tracing::debug!("form closed before submission resolved; result dropped");
                }
            })
        }

        Job::WatchCategories => {
            let source = providers.categories.clone();
            runtime.spawn(async move {
                let mut snapshots = source.subscribe_categories();
                while let Some(categories) = snapshots.next().await {
                    tracing::trace!(count = categories.len(), "category snapshot received");
                    if completions.send(Completion::Categories(categories)).is_err() {
                        break;
                    }
                }
                tracing::debug!("category watch ended");
            })
        }
    }
}
