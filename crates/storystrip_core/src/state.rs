//! Per-session comic strip state.

use crate::{PanelDescriptor, PanelImage, PanelScript};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storystrip_error::{PipelineErrorKind, StripResult};
use tracing::debug;

/// Number of panels in a finished strip.
pub const PANELS_PER_STRIP: usize = 4;

/// Everything one comic-strip session has produced so far.
///
/// The panel list only grows, never beyond [`PANELS_PER_STRIP`], until
/// [`StripState::clear`] empties it. `final_image` is only ever set on a
/// strip whose four panels are all accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct StripState {
    /// Narrative summary
    summary: String,
    /// Art-style modifier
    style_modifier: String,
    /// Panels in strip order
    panels: Vec<PanelDescriptor>,
    /// Composited strip
    final_image: Option<PanelImage>,
}

impl StripState {
    /// Creates an empty strip for a summary and style.
    pub fn new(summary: impl Into<String>, style_modifier: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            style_modifier: style_modifier.into(),
            panels: Vec::new(),
            final_image: None,
        }
    }

    /// Accepted panels' text in strip order.
    ///
    /// Recomputed on every call so it always reflects the latest acceptances.
    pub fn context(&self) -> Vec<PanelScript> {
        self.panels
            .iter()
            .filter(|p| *p.accepted())
            .map(|p| p.script().clone())
            .collect()
    }

    /// Whether all four panels are present and accepted.
    pub fn is_complete(&self) -> bool {
        self.panels.len() == PANELS_PER_STRIP && self.panels.iter().all(|p| *p.accepted())
    }

    /// The last panel, if it has not been accepted yet.
    pub fn pending_panel(&self) -> Option<&PanelDescriptor> {
        self.panels.last().filter(|p| !p.accepted())
    }

    /// Mutable access to a panel by index.
    pub fn panel_mut(&mut self, index: usize) -> Option<&mut PanelDescriptor> {
        self.panels.get_mut(index)
    }

    /// Appends a freshly parsed panel.
    pub fn push_panel(&mut self, script: PanelScript) -> StripResult<usize> {
        if self.panels.len() >= PANELS_PER_STRIP {
            return Err(PipelineErrorKind::InvalidState {
                operation: "append a panel".to_string(),
                state: format!("the strip already has {} panels", PANELS_PER_STRIP),
            }
            .into());
        }
        if self.pending_panel().is_some() {
            return Err(PipelineErrorKind::InvalidState {
                operation: "append a panel".to_string(),
                state: "another panel is still pending".to_string(),
            }
            .into());
        }
        self.panels.push(PanelDescriptor::new(script));
        let index = self.panels.len() - 1;
        debug!(index, "Appended panel");
        Ok(index)
    }

    /// Stores the composited strip.
    pub fn set_final_image(&mut self, image: PanelImage) -> StripResult<()> {
        if !self.is_complete() {
            return Err(PipelineErrorKind::InvalidState {
                operation: "store the final strip".to_string(),
                state: format!(
                    "only {} of {} panels are accepted",
                    self.context().len(),
                    PANELS_PER_STRIP
                ),
            }
            .into());
        }
        self.final_image = Some(image);
        Ok(())
    }

    /// Discards all panels and the final image, keeping nothing.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
