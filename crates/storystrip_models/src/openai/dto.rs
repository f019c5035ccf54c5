//! Data transfer objects for OpenAI-compatible APIs.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A message in the OpenAI chat format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// OpenAI chat completion request.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Reasoning effort for reasoning models
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<String>,
    /// Whether the provider may store the completion
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<bool>,
}

impl ChatRequest {
    /// Creates a new builder for ChatRequest.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// A choice in the OpenAI response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The message content
    pub message: ChatChoiceMessage,
    /// Reason for finishing
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message inside a choice. Content may be null.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    /// Message content
    #[serde(default)]
    pub content: Option<String>,
}

/// OpenAI chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response choices
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Trimmed text of the first choice, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// OpenAI image generation request.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ImageGenerationRequest {
    /// Model identifier
    model: String,
    /// Scene prompt
    prompt: String,
    /// Number of images
    #[builder(default = "1")]
    n: u8,
    /// Size, e.g. "1024x1024"
    size: String,
    /// Quality, e.g. "standard"
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<String>,
    /// Encoding, "png" or "jpeg"
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    output_format: Option<String>,
    /// Compression 0..=100 for lossy formats
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    output_compression: Option<u8>,
}

impl ImageGenerationRequest {
    /// Creates a new builder for ImageGenerationRequest.
    pub fn builder() -> ImageGenerationRequestBuilder {
        ImageGenerationRequestBuilder::default()
    }
}

/// One generated image, either inline or by reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageData {
    /// Base64-encoded image
    #[serde(default)]
    pub b64_json: Option<String>,
    /// Hosted image URL
    #[serde(default)]
    pub url: Option<String>,
}

/// OpenAI image generation response.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    /// Generated images
    #[serde(default)]
    pub data: Vec<ImageData>,
}
