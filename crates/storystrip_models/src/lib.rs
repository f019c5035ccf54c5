//! Text and image model integrations for Storystrip.
//!
//! Provides OpenAI-compatible implementations of the
//! [`ScriptGenerator`](storystrip_interface::ScriptGenerator) and
//! [`ImageGenerator`](storystrip_interface::ImageGenerator) collaborators,
//! along with the prompt that asks a chat model for panel scripts.

#![warn(missing_docs)]

mod openai;
mod prompt;

pub use openai::{
    ChatMessage, ChatRequest, ChatResponse, ImageData, ImageGenerationRequest,
    ImageGenerationResponse, OpenAIClient, OpenAIImageGenerator, OpenAIScriptGenerator,
    OpenAIScriptGeneratorBuilder,
};
pub use prompt::{DEFAULT_MIN_SUMMARY_CHARS, script_system_prompt, script_user_prompt};
