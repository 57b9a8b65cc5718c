//! In-process host for the report form.
//!
//! [`ReportFormController`] owns a Crux [`Core`] and plays the shell's part:
//! it turns effects into provider calls on the tokio runtime and resolves
//! the matching requests when results come back. All state changes happen on
//! the caller's thread, one event at a time.

use crux_core::{Core, Request};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::App;
use crate::capabilities::{
    Capabilities, CategoryOperation, Effect, LocationOperation, ReportOperation,
};
use crate::config::FormConfig;
use crate::error::ControllerError;
use crate::event::Event;
use crate::model::FormState;
use crate::providers::Providers;
use crate::store::{StateHolder, Subscription};
use crate::worker::{self, Completion, Job};

#[derive(Default)]
struct PendingRequests {
    location: Option<Request<LocationOperation>>,
    submission: Option<Request<ReportOperation>>,
    categories: Option<Request<CategoryOperation>>,
}

pub struct ReportFormController {
    core: Core<Effect, App>,
    runtime: Handle,
    providers: Providers,
    state: StateHolder<FormState>,
    pending: PendingRequests,
    // Weak, so the channel closes once no task can still produce a result.
    completions_tx: mpsc::WeakUnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    category_watch: Option<JoinHandle<()>>,
}

impl ReportFormController {
    /// Opens a form session on the current tokio runtime and starts the
    /// category subscription. Background work keeps running on that runtime.
    ///
    /// # Errors
    ///
    /// [`ControllerError::NoRuntime`] when called outside a tokio runtime.
    pub fn new(providers: Providers, config: FormConfig) -> Result<Self, ControllerError> {
        let runtime = Handle::try_current()?;
        let core: Core<Effect, App> = Core::new::<Capabilities>();
        let initial = core.view();
        let (completions_tx, completions) = mpsc::unbounded_channel();

        let mut controller = Self {
            core,
            runtime,
            providers,
            state: StateHolder::new(initial),
            pending: PendingRequests::default(),
            completions_tx: completions_tx.downgrade(),
            completions,
            category_watch: None,
        };
        controller.dispatch(Event::FormOpened(config));
        Ok(controller)
    }

    /// Processes `event` to completion. Never waits on I/O.
    pub fn dispatch(&mut self, event: Event) {
        tracing::trace!(event = event.name(), "dispatch");
        let effects = self.core.process_event(event);
        self.handle_effects(effects);
    }

    #[must_use]
    pub fn current_state(&self) -> &FormState {
        self.state.current()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&FormState) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    /// A location lookup or a submission is still out.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.pending.location.is_some() || self.pending.submission.is_some()
    }

    /// Applies every result that has already arrived, without waiting.
    pub fn process_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Waits for the next result and applies it. Returns `false` once nothing
    /// is in flight and the category stream has ended.
    pub async fn process_next(&mut self) -> bool {
        match self.completions.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Waits until no location lookup or submission is in flight.
    pub async fn settle(&mut self) {
        while self.has_pending_work() {
            if !self.process_next().await {
                break;
            }
        }
    }

    /// Ends the session. Results still in flight are discarded on arrival.
    pub fn close(self) {
        tracing::debug!("report form closed");
    }

    fn apply(&mut self, completion: Completion) {
        let effects = match completion {
            Completion::Location(result) => {
                let Some(mut request) = self.pending.location.take() else {
                    tracing::warn!("location result with no lookup in flight");
                    return;
                };
                self.core.resolve(&mut request, result)
            }

            Completion::Submission(result) => {
                let Some(mut request) = self.pending.submission.take() else {
                    tracing::warn!("submission result with no submission in flight");
                    return;
                };
                self.core.resolve(&mut request, result)
            }

            Completion::Categories(categories) => {
                let Some(request) = self.pending.categories.as_mut() else {
                    tracing::warn!("category snapshot with no subscription");
                    return;
                };
                self.core.resolve(request, categories)
            }
        };
        self.handle_effects(effects);
    }

    fn handle_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Render(_) => {
                    let view = self.core.view();
                    self.state.publish(view);
                }

                Effect::Location(request) => {
                    if self.pending.location.replace(request).is_some() {
                        tracing::warn!("second location lookup requested while one is in flight");
                    }
                    self.start(Job::Locate);
                }

                Effect::Reports(request) => {
                    let draft = request.operation.draft().clone();
                    if self.pending.submission.replace(request).is_some() {
                        tracing::warn!("second submission requested while one is in flight");
                    }
                    self.start(Job::Submit(draft));
                }

                Effect::Categories(request) => {
                    self.pending.categories = Some(request);
                    let completions = self.completion_sender();
                    let handle = worker::spawn(
                        &self.runtime,
                        Job::WatchCategories,
                        &self.providers,
                        completions,
                    );
                    if let Some(previous) = self.category_watch.replace(handle) {
                        previous.abort();
                    }
                }
            }
        }
    }

    fn start(&mut self, job: Job) {
        let completions = self.completion_sender();
        // Detached: lookups and submissions are never cancelled.
        drop(worker::spawn(&self.runtime, job, &self.providers, completions));
    }

    /// A live sender for a new task. Reopens the channel if every earlier
    /// task has finished, carrying over results not yet applied.
    fn completion_sender(&mut self) -> mpsc::UnboundedSender<Completion> {
        if let Some(tx) = self.completions_tx.upgrade() {
            return tx;
        }

        let (tx, completions) = mpsc::unbounded_channel();
        let mut closed = std::mem::replace(&mut self.completions, completions);
        while let Ok(completion) = closed.try_recv() {
            // The receiver was just installed, so this cannot fail.
            let _ = tx.send(completion);
        }
        self.completions_tx = tx.downgrade();
        tx
    }
}

impl Drop for ReportFormController {
    fn drop(&mut self) {
        if let Some(watch) = self.category_watch.take() {
            watch.abort();
        }
    }
}
