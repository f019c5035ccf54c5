//! OpenAI-compatible API client.
//!
//! Chat completions write panel scripts; image generations draw panels. Any
//! provider that follows the OpenAI request and response shapes works by
//! pointing the client at its base URL.

mod client;
mod dto;
mod images;
mod scripts;

pub use client::OpenAIClient;
pub use dto::{
    ChatMessage, ChatRequest, ChatResponse, ImageData, ImageGenerationRequest,
    ImageGenerationResponse,
};
pub use images::OpenAIImageGenerator;
pub use scripts::{OpenAIScriptGenerator, OpenAIScriptGeneratorBuilder};
