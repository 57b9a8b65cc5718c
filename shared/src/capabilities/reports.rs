use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::error::SubmissionError;
use crate::model::{ReportDraft, ReportId};

pub type SubmissionResult = Result<ReportId, SubmissionError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ReportOperation {
    Submit(ReportDraft),
}

impl Operation for ReportOperation {
    type Output = SubmissionResult;
}

impl ReportOperation {
    #[must_use]
    pub const fn draft(&self) -> &ReportDraft {
        match self {
            Self::Submit(draft) => draft,
        }
    }
}

/// Hands a finished draft to the report repository and reports back the id
/// the backend assigned.
pub struct Reports<Ev> {
    context: CapabilityContext<ReportOperation, Ev>,
}

impl<Ev> Capability<Ev> for Reports<Ev> {
    type Operation = ReportOperation;
    type MappedSelf<MappedEv> = Reports<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Reports::new(self.context.map_event(f))
    }
}

impl<Ev> Reports<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ReportOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn submit<F>(&self, draft: ReportDraft, make_event: F)
    where
        F: FnOnce(SubmissionResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(ReportOperation::Submit(draft))
                .await;
            context.update_app(make_event(result));
        });
    }
}
