//! Tests for the async panel orchestrator with mock collaborators.

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storystrip_core::{ImageOptions, ImageRequest, PanelImage, ScriptRequest, ScriptScope};
use storystrip_error::{PipelineErrorKind, StripResult};
use storystrip_interface::{ImageGenerator, ScriptGenerator};
use storystrip_pipeline::{PanelOrchestrator, Phase, encode_png};
use tokio::sync::Notify;

const SUMMARY: &str = "A small coastal town loses its fishing fleet to a storm. \
    The residents rebuild the boats together over one long winter. \
    In spring the harbor fills again, and the town celebrates with a festival.";

/// How a mock should answer its next call.
#[derive(Debug, Clone)]
enum Behavior {
    Succeed,
    Fail(PipelineErrorKind),
    Hang,
}

/// Script collaborator that answers with the requested panel's line.
#[derive(Default)]
struct MockScripts {
    requests: Mutex<Vec<ScriptRequest>>,
    behaviors: Mutex<VecDeque<Behavior>>,
    entered: Notify,
}

impl MockScripts {
    fn then(&self, behavior: Behavior) {
        self.behaviors.lock().unwrap().push_back(behavior);
    }

    fn requests(&self) -> Vec<ScriptRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptGenerator for MockScripts {
    async fn generate_script(&self, request: &ScriptRequest) -> StripResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Behavior::Succeed);
        self.entered.notify_one();

        match behavior {
            Behavior::Succeed => Ok(match request.scope() {
                ScriptScope::NextPanel => panel_line(request.panel_number()),
                ScriptScope::FullStrip => (1..=4).map(panel_line).collect::<Vec<_>>().join("\n"),
            }),
            Behavior::Fail(kind) => Err(kind.into()),
            Behavior::Hang => std::future::pending().await,
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-script"
    }
}

/// Image collaborator that answers with a solid PNG per call.
#[derive(Default)]
struct MockImages {
    requests: Mutex<Vec<ImageRequest>>,
    behaviors: Mutex<VecDeque<Behavior>>,
}

impl MockImages {
    fn then(&self, behavior: Behavior) {
        self.behaviors.lock().unwrap().push_back(behavior);
    }

    fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for MockImages {
    async fn generate_image(&self, request: &ImageRequest) -> StripResult<PanelImage> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() as u8
        };
        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Behavior::Succeed);

        match behavior {
            Behavior::Succeed => {
                let (width, height) = request.options().size().dimensions();
                let panel = RgbaImage::from_pixel(width, height, Rgba([call * 40, 0, 0, 255]));
                Ok(PanelImage::new(encode_png(&panel)?))
            }
            Behavior::Fail(kind) => Err(kind.into()),
            Behavior::Hang => std::future::pending().await,
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-image"
    }
}

fn panel_line(n: usize) -> String {
    format!("{n}. Panel {n}: Scene {n} (Caption: \"Line {n}\")")
}

type Orchestrator = PanelOrchestrator<Arc<MockScripts>, Arc<MockImages>>;

fn orchestrator() -> (Orchestrator, Arc<MockScripts>, Arc<MockImages>) {
    let scripts = Arc::new(MockScripts::default());
    let images = Arc::new(MockImages::default());
    let orchestrator = PanelOrchestrator::new(scripts.clone(), images.clone());
    (orchestrator, scripts, images)
}

/// Accepts whatever candidate the pending panel currently has.
async fn accept_pending(orchestrator: &Orchestrator) -> StripResult<storystrip_core::StripState> {
    let state = orchestrator.state().await;
    let index = state.panels().len() - 1;
    let candidate = state.panels()[index]
        .image()
        .clone()
        .expect("pending panel should have a candidate");
    orchestrator.accept_panel_image(index, candidate).await
}

#[tokio::test]
async fn test_start_produces_first_panel_candidate() {
    let (orchestrator, scripts, images) = orchestrator();

    let state = orchestrator.start(SUMMARY, "noir").await.unwrap();

    assert_eq!(orchestrator.phase().await, Phase::AwaitingImage);
    assert_eq!(state.panels().len(), 1);
    assert_eq!(state.panels()[0].visual(), "Scene 1");
    assert_eq!(state.panels()[0].caption(), "Line 1");
    assert!(state.panels()[0].image().is_some());
    assert!(!state.panels()[0].accepted());
    assert_eq!(scripts.requests().len(), 1);
    assert_eq!(images.requests().len(), 1);
    assert!(images.requests()[0].prompt().contains("noir"));
}

#[tokio::test]
async fn test_full_strip_flow_and_assembly() {
    let (orchestrator, _scripts, _images) = orchestrator();
    orchestrator.start(SUMMARY, "editorial").await.unwrap();

    for _ in 0..4 {
        accept_pending(&orchestrator).await.unwrap();
    }
    assert_eq!(orchestrator.phase().await, Phase::Complete);
    assert_eq!(orchestrator.context().await.len(), 4);

    let state = orchestrator.assemble_strip().await.unwrap();
    let strip = state.final_image().clone().expect("final image should be set");
    let decoded = image::load_from_memory_with_format(strip.bytes(), ImageFormat::Png)
        .unwrap()
        .to_rgba8();
    assert_eq!(decoded.dimensions(), (4096, 1024));
    assert_eq!(decoded.get_pixel(0, 0), &Rgba([40, 0, 0, 255]));
    assert_eq!(decoded.get_pixel(3 * 1024 + 5, 1000), &Rgba([160, 0, 0, 255]));
}

#[tokio::test]
async fn test_each_script_request_carries_accepted_context() {
    let (orchestrator, scripts, _images) = orchestrator();
    orchestrator.start(SUMMARY, "noir").await.unwrap();
    for _ in 0..3 {
        accept_pending(&orchestrator).await.unwrap();
    }

    let requests = scripts.requests();
    assert_eq!(requests.len(), 4);
    for (i, request) in requests.iter().enumerate() {
        assert_eq!(request.context().len(), i);
        assert_eq!(request.panel_number(), i + 1);
        for (j, panel) in request.context().iter().enumerate() {
            assert_eq!(panel.visual(), &format!("Scene {}", j + 1));
        }
    }
}

#[tokio::test]
async fn test_assemble_before_complete_is_invalid_state() {
    let (orchestrator, _scripts, _images) = orchestrator();
    orchestrator.start(SUMMARY, "noir").await.unwrap();

    let err = orchestrator.assemble_strip().await.unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::InvalidState { .. })));
}

#[tokio::test]
async fn test_regenerate_replaces_candidate_only() {
    let (orchestrator, _scripts, images) = orchestrator();
    let before = orchestrator.start(SUMMARY, "noir").await.unwrap();

    let after = orchestrator.regenerate_panel_image(0).await.unwrap();
    assert_eq!(after.panels().len(), 1);
    assert_eq!(after.panels()[0].script(), before.panels()[0].script());
    assert_ne!(after.panels()[0].image(), before.panels()[0].image());
    assert_eq!(images.requests().len(), 2);
    assert_eq!(images.requests()[0], images.requests()[1]);
}

#[tokio::test]
async fn test_upstream_failure_keeps_state_and_retry_recovers() {
    let (orchestrator, scripts, _images) = orchestrator();
    scripts.then(Behavior::Fail(PipelineErrorKind::UpstreamFailure(
        "service unavailable".to_string(),
    )));

    let err = orchestrator.start(SUMMARY, "noir").await.unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::UpstreamFailure(_))));
    assert_eq!(orchestrator.phase().await, Phase::AwaitingScript);
    assert!(orchestrator.state().await.panels().is_empty());

    let state = orchestrator.retry().await.unwrap();
    assert_eq!(state.panels().len(), 1);
    assert_eq!(orchestrator.phase().await, Phase::AwaitingImage);
}

#[tokio::test]
async fn test_image_failure_keeps_panel_and_retry_recovers() {
    let (orchestrator, _scripts, images) = orchestrator();
    images.then(Behavior::Fail(PipelineErrorKind::ImageCodec("boom".to_string())));

    let err = orchestrator.start(SUMMARY, "noir").await.unwrap_err();
    // Unclassified collaborator errors surface as upstream failures.
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::UpstreamFailure(_))));
    let state = orchestrator.state().await;
    assert_eq!(state.panels().len(), 1);
    assert!(state.panels()[0].image().is_none());
    assert_eq!(orchestrator.phase().await, Phase::AwaitingImage);

    let state = orchestrator.retry().await.unwrap();
    assert!(state.panels()[0].image().is_some());
}

#[tokio::test]
async fn test_validation_error_from_collaborator_propagates() {
    let (orchestrator, scripts, _images) = orchestrator();
    scripts.then(Behavior::Fail(PipelineErrorKind::Validation(
        "Summary content too short for comic visualization.".to_string(),
    )));

    let err = orchestrator.start("Too short.", "noir").await.unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::Validation(_))));
    assert!(orchestrator.state().await.panels().is_empty());
    assert_eq!(orchestrator.phase().await, Phase::Idle);
}

#[tokio::test]
async fn test_start_again_after_validation_error() {
    let (orchestrator, scripts, _images) = orchestrator();
    scripts.then(Behavior::Fail(PipelineErrorKind::Validation(
        "Summary content too short for comic visualization.".to_string(),
    )));
    orchestrator.start("Too short.", "noir").await.unwrap_err();

    let state = orchestrator.start(SUMMARY, "noir").await.unwrap();
    assert_eq!(state.summary(), SUMMARY);
    assert_eq!(state.panels().len(), 1);
    assert_eq!(orchestrator.phase().await, Phase::AwaitingImage);

    let requests = scripts.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].summary(), SUMMARY);
}

#[tokio::test]
async fn test_retry_refused_while_request_in_flight() {
    let (orchestrator, scripts, _images) = orchestrator();
    let orchestrator = Arc::new(orchestrator);
    scripts.then(Behavior::Hang);

    let running = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.start(SUMMARY, "noir").await })
    };
    scripts.entered.notified().await;

    let err = orchestrator.retry().await.unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::InvalidState { .. })));
    assert_eq!(scripts.requests().len(), 1);

    orchestrator.reset().await;
    running.await.unwrap().unwrap_err();
}

#[tokio::test]
async fn test_malformed_script_is_reported() {
    let (orchestrator, scripts, _images) = orchestrator();
    scripts.then(Behavior::Fail(PipelineErrorKind::MalformedResponse(
        "No comic script generated.".to_string(),
    )));

    let err = orchestrator.start(SUMMARY, "noir").await.unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::MalformedResponse(_))));
    assert_eq!(orchestrator.phase().await, Phase::AwaitingScript);
}

#[tokio::test(start_paused = true)]
async fn test_hung_collaborator_times_out() {
    let scripts = Arc::new(MockScripts::default());
    let images = Arc::new(MockImages::default());
    let orchestrator = PanelOrchestrator::with_options(
        scripts.clone(),
        images,
        ImageOptions::default(),
        Duration::from_secs(30),
    );
    scripts.then(Behavior::Hang);

    let err = orchestrator.start(SUMMARY, "noir").await.unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::UpstreamFailure(_))));
    assert_eq!(orchestrator.phase().await, Phase::AwaitingScript);

    // The session is still usable afterwards.
    orchestrator.retry().await.unwrap();
    assert_eq!(orchestrator.state().await.panels().len(), 1);
}

#[tokio::test]
async fn test_reset_cancels_in_flight_request() {
    let (orchestrator, scripts, _images) = orchestrator();
    let orchestrator = Arc::new(orchestrator);
    scripts.then(Behavior::Hang);

    let running = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.start(SUMMARY, "noir").await })
    };
    scripts.entered.notified().await;

    let state = orchestrator.reset().await;
    assert!(state.panels().is_empty());

    let err = running.await.unwrap().unwrap_err();
    assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::UpstreamFailure(_))));
    assert_eq!(orchestrator.phase().await, Phase::Idle);
    assert!(orchestrator.state().await.panels().is_empty());

    // A fresh strip can start right away.
    let state = orchestrator.start(SUMMARY, "manga").await.unwrap();
    assert_eq!(state.panels().len(), 1);
    assert_eq!(state.style_modifier(), "manga");
}

#[tokio::test]
async fn test_reset_after_completion_clears_everything() {
    let (orchestrator, _scripts, _images) = orchestrator();
    orchestrator.start(SUMMARY, "noir").await.unwrap();
    for _ in 0..4 {
        accept_pending(&orchestrator).await.unwrap();
    }
    orchestrator.assemble_strip().await.unwrap();

    let state = orchestrator.reset().await;
    assert!(state.panels().is_empty());
    assert!(state.final_image().is_none());
    assert_eq!(orchestrator.phase().await, Phase::Idle);
}

#[tokio::test]
async fn test_draft_script_returns_four_panels_without_touching_session() {
    let (orchestrator, scripts, images) = orchestrator();

    let panels = orchestrator.draft_script(SUMMARY, "noir").await.unwrap();

    assert_eq!(panels.len(), 4);
    assert_eq!(panels[3].visual(), "Scene 4");
    assert_eq!(*scripts.requests()[0].scope(), ScriptScope::FullStrip);
    assert!(images.requests().is_empty());
    assert_eq!(orchestrator.phase().await, Phase::Idle);
}
