//! HTTP client for OpenAI-compatible APIs.

use crate::openai::{ChatRequest, ChatResponse, ImageGenerationRequest, ImageGenerationResponse};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use storystrip_error::{HttpError, PipelineErrorKind, StripResult};
use tracing::{debug, error, instrument};

/// Default base URL of the OpenAI API.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for any API that follows the OpenAI chat and image formats.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Creates a client against the public OpenAI endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom OpenAI-compatible endpoint.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl AsRef<str>) -> Self {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        debug!(url = %base_url, "Created OpenAI-compatible client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url,
        }
    }

    /// Applies a transport-level timeout to every request.
    pub fn with_timeout(mut self, timeout: Duration) -> StripResult<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a non-success
    /// status, or the body is not a chat completion.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn chat(&self, request: &ChatRequest) -> StripResult<ChatResponse> {
        debug!(
            message_count = request.messages().len(),
            "Sending chat completion request"
        );
        self.post_json("chat/completions", request).await
    }

    /// Sends an image generation request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a non-success
    /// status, or the body is not an image generation response.
    #[instrument(skip(self, request), fields(model = %request.model(), size = %request.size()))]
    pub async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> StripResult<ImageGenerationResponse> {
        debug!(prompt_len = request.prompt().len(), "Sending image generation request");
        self.post_json("images/generations", request).await
    }

    /// Downloads the bytes behind a hosted image URL.
    #[instrument(skip(self))]
    pub async fn download(&self, url: &str) -> StripResult<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = ?e, "Image download failed");
            HttpError::new(format!("Image download failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Image download returned an error status");
            return Err(HttpError::new(format!("Image download returned {}", status)).into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read image body: {}", e)))?;
        debug!(bytes = bytes.len(), "Downloaded image");
        Ok(bytes.to_vec())
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> StripResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url = %url, "HTTP request failed");
                HttpError::new(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "API error");
            return Err(
                HttpError::new(format!("API error (status {}): {}", status.as_u16(), error_text))
                    .into(),
            );
        }

        let body = response
            .text()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read response body: {}", e)))?;
        Self::decode_response(&body)
    }

    /// Parses the body of a successful API response.
    ///
    /// # Errors
    ///
    /// `MalformedResponse` if the body is not the expected JSON shape.
    pub fn decode_response<R: DeserializeOwned>(body: &str) -> StripResult<R> {
        serde_json::from_str(body).map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            PipelineErrorKind::MalformedResponse(format!("Failed to parse response JSON: {}", e))
                .into()
        })
    }
}
