//! End-to-end strip generation through the facade with canned collaborators.

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use storystrip::{
    ImageGenerator, ImageRequest, PanelImage, PanelOrchestrator, Phase, ScriptGenerator,
    ScriptRequest, StripResult, encode_png,
};

struct CannedScripts;

#[async_trait]
impl ScriptGenerator for CannedScripts {
    async fn generate_script(&self, request: &ScriptRequest) -> StripResult<String> {
        let n = request.panel_number();
        Ok(format!("Panel {n}: A lighthouse, view {n} (Caption: “Beam {n}”)"))
    }

    fn provider_name(&self) -> &'static str {
        "canned"
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

struct CannedImages;

#[async_trait]
impl ImageGenerator for CannedImages {
    async fn generate_image(&self, request: &ImageRequest) -> StripResult<PanelImage> {
        let (width, height) = request.options().size().dimensions();
        let panel = RgbaImage::from_pixel(width, height, Rgba([0, 0, 200, 255]));
        Ok(PanelImage::new(encode_png(&panel)?))
    }

    fn provider_name(&self) -> &'static str {
        "canned"
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

#[tokio::test]
async fn test_strip_written_to_disk() {
    let orchestrator = PanelOrchestrator::new(CannedScripts, CannedImages);
    let mut state = orchestrator
        .start("The lighthouse keeper retires after forty years.", "golden age")
        .await
        .unwrap();

    while orchestrator.phase().await != Phase::Complete {
        let index = state.panels().len() - 1;
        let candidate = state.panels()[index].image().clone().unwrap();
        state = orchestrator.accept_panel_image(index, candidate).await.unwrap();
    }

    let captions: Vec<String> = state
        .panels()
        .iter()
        .map(|p| p.caption().to_string())
        .collect();
    assert_eq!(captions, ["Beam 1", "Beam 2", "Beam 3", "Beam 4"]);

    let state = orchestrator.assemble_strip().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strip.png");
    std::fs::write(&path, state.final_image().as_ref().unwrap().bytes()).unwrap();

    let strip = image::open(&path).unwrap().to_rgba8();
    assert_eq!(strip.dimensions(), (4096, 1024));
}
