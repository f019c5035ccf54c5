//! Panel scripts and panel descriptors.

use crate::PanelImage;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storystrip_error::{PipelineErrorKind, StripResult};

/// Text of one panel: what it shows and what it says.
///
/// Produced by the script parser and fed back, for accepted panels, as
/// context to the next script request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct PanelScript {
    /// Visual description of the scene
    visual: String,
    /// Caption shown under the panel, empty when the script had none
    caption: String,
}

impl PanelScript {
    /// Creates a panel script.
    pub fn new(visual: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            visual: visual.into(),
            caption: caption.into(),
        }
    }
}

/// One panel of a strip under construction.
///
/// `accepted` implies `image` is present and non-empty; the only way to set
/// `accepted` is [`PanelDescriptor::accept`], which enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PanelDescriptor {
    /// Panel text
    script: PanelScript,
    /// Candidate or accepted image
    image: Option<PanelImage>,
    /// Whether the user accepted the image
    accepted: bool,
}

impl PanelDescriptor {
    /// Creates an unaccepted descriptor without an image.
    pub fn new(script: PanelScript) -> Self {
        Self {
            script,
            image: None,
            accepted: false,
        }
    }

    /// Visual description of the panel.
    pub fn visual(&self) -> &str {
        self.script.visual()
    }

    /// Caption of the panel.
    pub fn caption(&self) -> &str {
        self.script.caption()
    }

    /// Replaces the candidate image of an unaccepted panel.
    pub fn set_candidate(&mut self, image: PanelImage) -> StripResult<()> {
        if self.accepted {
            return Err(PipelineErrorKind::InvalidState {
                operation: "replace the image".to_string(),
                state: "the panel is accepted".to_string(),
            }
            .into());
        }
        self.image = Some(image);
        Ok(())
    }

    /// Attaches `image` and marks the panel accepted.
    pub fn accept(&mut self, image: PanelImage) -> StripResult<()> {
        if self.accepted {
            return Err(PipelineErrorKind::InvalidState {
                operation: "accept".to_string(),
                state: "the panel is already accepted".to_string(),
            }
            .into());
        }
        if image.is_empty() {
            return Err(PipelineErrorKind::Validation(
                "accepted panel image is empty".to_string(),
            )
            .into());
        }
        self.image = Some(image);
        self.accepted = true;
        Ok(())
    }
}
