//! Panel image generation.

use crate::openai::{ImageGenerationRequest, ImageGenerationResponse, OpenAIClient};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use storystrip_core::{ImageFormat, ImageRequest, PanelImage};
use storystrip_error::{PipelineErrorKind, StripError, StripResult};
use storystrip_interface::ImageGenerator;
use tracing::{debug, instrument, warn};

/// Draws panels with an OpenAI-compatible image model.
#[derive(Debug, Clone)]
pub struct OpenAIImageGenerator {
    client: OpenAIClient,
    model: String,
}

impl OpenAIImageGenerator {
    /// Creates an image generator for `model`.
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn to_api_request(&self, request: &ImageRequest) -> StripResult<ImageGenerationRequest> {
        let options = request.options();
        let compression = match options.output_format() {
            ImageFormat::Jpeg => Some(*options.output_compression()),
            ImageFormat::Png => None,
        };

        ImageGenerationRequest::builder()
            .model(self.model.clone())
            .prompt(request.prompt().clone())
            .size(options.size().to_string())
            .quality(Some(options.quality().to_string()))
            .output_format(Some(options.output_format().to_string()))
            .output_compression(compression)
            .build()
            .map_err(|e| StripError::from(PipelineErrorKind::Validation(e.to_string())))
    }

    async fn extract_image(&self, response: ImageGenerationResponse) -> StripResult<PanelImage> {
        let Some(data) = response.data.into_iter().next() else {
            warn!("Image response carried no data");
            return Err(PipelineErrorKind::MalformedResponse(
                "No image data returned".to_string(),
            )
            .into());
        };

        let bytes = match (data.b64_json, data.url) {
            (Some(b64), _) => STANDARD.decode(b64.trim()).map_err(|e| {
                StripError::from(PipelineErrorKind::MalformedResponse(format!(
                    "Image payload is not valid base64: {}",
                    e
                )))
            })?,
            (None, Some(url)) => {
                debug!("Image returned by reference, downloading");
                self.client.download(&url).await?
            }
            (None, None) => {
                return Err(PipelineErrorKind::MalformedResponse(
                    "Image entry has neither b64_json nor url".to_string(),
                )
                .into());
            }
        };

        if bytes.is_empty() {
            return Err(
                PipelineErrorKind::MalformedResponse("Image payload is empty".to_string()).into(),
            );
        }
        Ok(PanelImage::new(bytes))
    }
}

#[async_trait]
impl ImageGenerator for OpenAIImageGenerator {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate_image(&self, request: &ImageRequest) -> StripResult<PanelImage> {
        let api_request = self.to_api_request(request)?;
        let response = self.client.generate_images(&api_request).await?;
        let image = self.extract_image(response).await?;
        debug!(bytes = image.len(), "Received panel image");
        Ok(image)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
