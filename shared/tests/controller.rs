use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use road_report::providers::{CategorySource, LocationProvider, Providers, ReportSubmitter};
use road_report::{
    Category, ControllerError, Coordinates, Event, FieldEdit, FormConfig, ImageRef, LocationError,
    LocationPhase, ReportDraft, ReportFormController, ReportId, SubmissionError, SubmissionPhase,
};

struct FixedLocation(Result<Coordinates, LocationError>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_coordinates(&self) -> Result<Coordinates, LocationError> {
        self.0.clone()
    }
}

#[derive(Default)]
struct CountingSubmitter {
    calls: AtomicUsize,
}

#[async_trait]
impl ReportSubmitter for CountingSubmitter {
    async fn submit(&self, draft: ReportDraft) -> Result<ReportId, SubmissionError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if draft.title.is_empty() {
            return Err(SubmissionError::Unknown("empty title".into()));
        }
        Ok(ReportId::new(n.to_string()))
    }
}

struct Snapshots(Vec<Vec<Category>>);

impl CategorySource for Snapshots {
    fn subscribe_categories(&self) -> BoxStream<'static, Vec<Category>> {
        stream::iter(self.0.clone()).boxed()
    }
}

/// Never yields; records when the stream is dropped.
struct HangingSource {
    dropped: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl CategorySource for HangingSource {
    fn subscribe_categories(&self) -> BoxStream<'static, Vec<Category>> {
        let flag = DropFlag(self.dropped.clone());
        stream::pending::<Vec<Category>>()
            .map(move |snapshot| {
                let _keep = &flag;
                snapshot
            })
            .boxed()
    }
}

fn providers(
    location: Result<Coordinates, LocationError>,
    submitter: Arc<CountingSubmitter>,
    categories: Arc<dyn CategorySource>,
) -> Providers {
    Providers::new(Arc::new(FixedLocation(location)), submitter, categories)
}

fn fill(controller: &mut ReportFormController) {
    for event in [
        Event::Edit(FieldEdit::TitleChanged("Pothole".into())),
        Event::Edit(FieldEdit::DescriptionChanged("Large pothole".into())),
        Event::Edit(FieldEdit::CategorySelected("Road".into())),
        Event::Edit(FieldEdit::CoordinatesChanged {
            lat: 33.5,
            lng: -7.6,
        }),
        Event::Edit(FieldEdit::ImageSelected(ImageRef::new("file:///tmp/pothole.jpg"))),
    ] {
        controller.dispatch(event);
    }
}

#[tokio::test]
async fn test_double_submit_reaches_submitter_once() {
    let submitter = Arc::new(CountingSubmitter::default());
    let mut controller = ReportFormController::new(
        providers(
            Err(LocationError::Unavailable),
            submitter.clone(),
            Arc::new(Snapshots(vec![])),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");
    fill(&mut controller);

    controller.dispatch(Event::SubmitRequested);
    controller.dispatch(Event::SubmitRequested);
    assert!(controller.current_state().is_loading());

    controller.settle().await;

    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        controller.current_state().submission_phase,
        SubmissionPhase::Succeeded(ReportId::new("1"))
    );
}

#[tokio::test]
async fn test_invalid_form_never_reaches_submitter() {
    let submitter = Arc::new(CountingSubmitter::default());
    let mut controller = ReportFormController::new(
        providers(
            Err(LocationError::Unavailable),
            submitter.clone(),
            Arc::new(Snapshots(vec![])),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");

    controller.dispatch(Event::SubmitRequested);
    assert!(!controller.has_pending_work());
    assert_eq!(
        controller.current_state().error_message(),
        Some("Please fill all fields correctly".to_string())
    );
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_location_lookup_fills_coordinates() {
    let mut controller = ReportFormController::new(
        providers(
            Ok(Coordinates::new(33.5, -7.6)),
            Arc::new(CountingSubmitter::default()),
            Arc::new(Snapshots(vec![])),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");

    controller.dispatch(Event::RequestCurrentLocation);
    assert!(controller.current_state().is_locating());

    controller.settle().await;

    let state = controller.current_state();
    assert_eq!(state.location_phase, LocationPhase::Succeeded);
    assert_eq!(state.coordinates, Coordinates::new(33.5, -7.6));
}

#[tokio::test]
async fn test_location_denied_is_reported() {
    let mut controller = ReportFormController::new(
        providers(
            Err(LocationError::PermissionDenied),
            Arc::new(CountingSubmitter::default()),
            Arc::new(Snapshots(vec![])),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");

    controller.dispatch(Event::RequestCurrentLocation);
    controller.settle().await;

    let state = controller.current_state();
    assert_eq!(
        state.location_phase,
        LocationPhase::Failed(LocationError::PermissionDenied)
    );
    assert!(state.coordinates.is_unset());
}

#[tokio::test]
async fn test_category_snapshots_are_applied_in_order() {
    let road = Category::new("Road", "https://cdn.example/road.png");
    let bridge = Category::new("Bridge", "https://cdn.example/bridge.png");
    let mut controller = ReportFormController::new(
        providers(
            Err(LocationError::Unavailable),
            Arc::new(CountingSubmitter::default()),
            Arc::new(Snapshots(vec![vec![road.clone()], vec![bridge.clone()]])),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");

    assert!(controller.process_next().await);
    assert_eq!(controller.current_state().categories, vec![road]);

    assert!(controller.process_next().await);
    assert_eq!(controller.current_state().categories, vec![bridge]);

    // Stream finished and nothing else is out.
    assert!(!controller.process_next().await);
}

#[tokio::test]
async fn test_process_next_returns_when_idle() {
    let mut controller = ReportFormController::new(
        providers(
            Err(LocationError::Unavailable),
            Arc::new(CountingSubmitter::default()),
            Arc::new(Snapshots(vec![])),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");

    assert!(!controller.process_next().await);

    // Later work reopens the result channel.
    controller.dispatch(Event::RequestCurrentLocation);
    assert!(controller.process_next().await);
    assert_eq!(
        controller.current_state().location_phase,
        LocationPhase::Failed(LocationError::Unavailable)
    );
    assert!(!controller.process_next().await);
}

#[tokio::test]
async fn test_process_ready_applies_arrived_results() {
    let mut controller = ReportFormController::new(
        providers(
            Ok(Coordinates::new(33.5, -7.6)),
            Arc::new(CountingSubmitter::default()),
            Arc::new(Snapshots(vec![])),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");

    assert_eq!(controller.process_ready(), 0);

    controller.dispatch(Event::RequestCurrentLocation);
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    assert_eq!(controller.process_ready(), 1);
    assert_eq!(
        controller.current_state().location_phase,
        LocationPhase::Succeeded
    );
    assert!(!controller.has_pending_work());
}

#[test]
fn test_new_outside_runtime_is_an_error() {
    let result = ReportFormController::new(
        providers(
            Err(LocationError::Unavailable),
            Arc::new(CountingSubmitter::default()),
            Arc::new(Snapshots(vec![])),
        ),
        FormConfig::default(),
    );
    assert!(matches!(result, Err(ControllerError::NoRuntime(_))));
}

#[tokio::test]
async fn test_subscribers_see_changes_only() {
    let mut controller = ReportFormController::new(
        providers(
            Err(LocationError::Unavailable),
            Arc::new(CountingSubmitter::default()),
            Arc::new(Snapshots(vec![])),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let subscription = controller.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    controller.dispatch(Event::Edit(FieldEdit::TitleChanged("Pothole".into())));
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    // Same value, nothing new to publish.
    controller.dispatch(Event::Edit(FieldEdit::TitleChanged("Pothole".into())));
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    // No lookup in flight, dropped.
    controller.dispatch(Event::LocationResolved(Ok(Coordinates::new(1.0, 1.0))));
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    subscription.unsubscribe();
    controller.dispatch(Event::Edit(FieldEdit::TitleChanged("Crack".into())));
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_closing_stops_category_watch() {
    let dropped = Arc::new(AtomicBool::new(false));
    let controller = ReportFormController::new(
        providers(
            Err(LocationError::Unavailable),
            Arc::new(CountingSubmitter::default()),
            Arc::new(HangingSource {
                dropped: dropped.clone(),
            }),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");

    tokio::task::yield_now().await;
    assert!(!dropped.load(Ordering::SeqCst));

    controller.close();
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    assert!(dropped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_late_submission_result_after_close_is_discarded() {
    let submitter = Arc::new(CountingSubmitter::default());
    let mut controller = ReportFormController::new(
        providers(
            Err(LocationError::Unavailable),
            submitter.clone(),
            Arc::new(Snapshots(vec![])),
        ),
        FormConfig::default(),
    )
    .expect("inside a tokio runtime");
    fill(&mut controller);
    controller.dispatch(Event::SubmitRequested);
    controller.close();

    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
}
