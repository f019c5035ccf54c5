//! Panel script generation through chat completions.

use crate::openai::{ChatMessage, ChatRequest, OpenAIClient};
use crate::prompt::{DEFAULT_MIN_SUMMARY_CHARS, script_system_prompt, script_user_prompt};
use async_trait::async_trait;
use derive_builder::Builder;
use storystrip_core::ScriptRequest;
use storystrip_error::{PipelineErrorKind, StripError, StripResult};
use storystrip_interface::ScriptGenerator;
use tracing::{debug, instrument, warn};

/// Writes panel scripts with an OpenAI-compatible chat model.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct OpenAIScriptGenerator {
    /// Shared API client
    client: OpenAIClient,
    /// Chat model identifier
    #[builder(default = "\"o4-mini\".to_string()")]
    model: String,
    /// Reasoning effort for reasoning models
    #[builder(default = "Some(\"medium\".to_string())")]
    reasoning_effort: Option<String>,
    /// Summaries shorter than this many characters are rejected
    #[builder(default = "DEFAULT_MIN_SUMMARY_CHARS")]
    min_summary_chars: usize,
}

impl OpenAIScriptGenerator {
    /// Creates a new builder for OpenAIScriptGenerator.
    pub fn builder() -> OpenAIScriptGeneratorBuilder {
        OpenAIScriptGeneratorBuilder::default()
    }

    fn validate(&self, request: &ScriptRequest) -> StripResult<()> {
        if request.summary().chars().count() < self.min_summary_chars {
            warn!(
                chars = request.summary().chars().count(),
                min = self.min_summary_chars,
                "Summary too short"
            );
            return Err(PipelineErrorKind::Validation(
                "Summary content too short for comic visualization.".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl ScriptGenerator for OpenAIScriptGenerator {
    #[instrument(skip(self, request), fields(model = %self.model, panel = request.panel_number()))]
    async fn generate_script(&self, request: &ScriptRequest) -> StripResult<String> {
        self.validate(request)?;

        let chat = ChatRequest::builder()
            .model(self.model.clone())
            .messages(vec![
                ChatMessage::system(script_system_prompt(request)),
                ChatMessage::user(script_user_prompt(request)),
            ])
            .reasoning_effort(self.reasoning_effort.clone())
            .store(Some(false))
            .build()
            .map_err(|e| StripError::from(PipelineErrorKind::Validation(e.to_string())))?;

        let response = self.client.chat(&chat).await?;
        let script = response.first_text().ok_or_else(|| {
            warn!("Chat response carried no script text");
            StripError::from(PipelineErrorKind::MalformedResponse(
                "No comic script generated.".to_string(),
            ))
        })?;

        debug!(chars = script.len(), "Received script");
        Ok(script.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
