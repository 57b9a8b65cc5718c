use crux_core::capability::{Capability, CapabilityContext, Operation};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::model::Category;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryOperation {
    /// Open-ended: the shell resolves this request once per snapshot until the
    /// session ends.
    Subscribe,
}

impl Operation for CategoryOperation {
    type Output = Vec<Category>;
}

pub struct Categories<Ev> {
    context: CapabilityContext<CategoryOperation, Ev>,
}

impl<Ev> Capability<Ev> for Categories<Ev> {
    type Operation = CategoryOperation;
    type MappedSelf<MappedEv> = Categories<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Categories::new(self.context.map_event(f))
    }
}

impl<Ev> Categories<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<CategoryOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn watch<F>(&self, make_event: F)
    where
        F: Fn(Vec<Category>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let mut snapshots = Box::pin(context.stream_from_shell(CategoryOperation::Subscribe));
            while let Some(categories) = snapshots.next().await {
                context.update_app(make_event(categories));
            }
        });
    }
}
