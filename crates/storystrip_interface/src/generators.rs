//! Text and image collaborator traits.

use async_trait::async_trait;
use std::sync::Arc;
use storystrip_core::{ImageRequest, PanelImage, ScriptRequest};
use storystrip_error::StripResult;

/// Writes panel scripts from a summary, a style and the accepted context.
///
/// Implementations reject summaries below their minimum length with a
/// `Validation` error and return `MalformedResponse` when the backend
/// produces no script text.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Generate free-form script text for the request.
    async fn generate_script(&self, request: &ScriptRequest) -> StripResult<String>;

    /// Provider name, for logging.
    fn provider_name(&self) -> &'static str;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Draws one panel from a prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate encoded image bytes for the request.
    async fn generate_image(&self, request: &ImageRequest) -> StripResult<PanelImage>;

    /// Provider name, for logging.
    fn provider_name(&self) -> &'static str;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: ScriptGenerator + ?Sized> ScriptGenerator for Arc<T> {
    async fn generate_script(&self, request: &ScriptRequest) -> StripResult<String> {
        (**self).generate_script(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: ImageGenerator + ?Sized> ImageGenerator for Arc<T> {
    async fn generate_image(&self, request: &ImageRequest) -> StripResult<PanelImage> {
        (**self).generate_image(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
