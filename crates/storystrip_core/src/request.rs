//! Requests handed to the text and image collaborators.

use crate::{ImageOptions, PanelScript};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// How much of the strip a script request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScriptScope {
    /// The panel following the accepted context
    #[default]
    NextPanel,
    /// All four panels in one script
    FullStrip,
}

/// A text-generation request.
///
/// `context` holds the accepted panels, in order, at the moment the request
/// was issued.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct ScriptRequest {
    /// Narrative summary supplied by the user
    summary: String,
    /// Art-style modifier, e.g. "noir"
    style_modifier: String,
    /// Accepted panels so far
    #[builder(default)]
    context: Vec<PanelScript>,
    /// Whole strip or next panel only
    #[builder(default)]
    scope: ScriptScope,
}

impl ScriptRequest {
    /// Creates a builder for ScriptRequest.
    pub fn builder() -> ScriptRequestBuilder {
        ScriptRequestBuilder::default()
    }

    /// One-based number of the panel being requested.
    pub fn panel_number(&self) -> usize {
        self.context.len() + 1
    }
}

/// An image-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ImageRequest {
    /// Prompt describing the scene to draw
    prompt: String,
    /// Size, quality and encoding
    options: ImageOptions,
}

impl ImageRequest {
    /// Creates an image request.
    pub fn new(prompt: impl Into<String>, options: ImageOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }
}
