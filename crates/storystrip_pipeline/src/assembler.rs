//! Strip assembly from accepted panel images.

use crate::compositor::{composite, encode_png};
use derive_getters::Getters;
use image::RgbaImage;
use storystrip_core::{PANELS_PER_STRIP, PanelImage, PanelSize};
use storystrip_error::{PipelineErrorKind, StripError, StripResult};
use tracing::{debug, instrument};

/// Decodes accepted panel images and composites them into a PNG strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct StripAssembler {
    panel_width: u32,
    panel_height: u32,
}

impl StripAssembler {
    /// Assembler for panels generated at `size`.
    pub fn new(size: PanelSize) -> Self {
        let (panel_width, panel_height) = size.dimensions();
        Self::with_dimensions(panel_width, panel_height)
    }

    /// Assembler for panels of an explicit size.
    pub fn with_dimensions(panel_width: u32, panel_height: u32) -> Self {
        Self {
            panel_width,
            panel_height,
        }
    }

    /// Assembles four encoded panels into one PNG strip.
    ///
    /// # Errors
    ///
    /// `InvalidPanelCount` unless exactly four images are given, `ImageCodec`
    /// for undecodable input, `PanelDimensions` for wrongly sized panels.
    #[instrument(skip(self, images), fields(count = images.len()))]
    pub fn assemble(&self, images: &[PanelImage]) -> StripResult<PanelImage> {
        if images.len() != PANELS_PER_STRIP {
            return Err(PipelineErrorKind::InvalidPanelCount {
                expected: PANELS_PER_STRIP,
                actual: images.len(),
            }
            .into());
        }

        let panels = images
            .iter()
            .enumerate()
            .map(|(index, image)| decode(index, image))
            .collect::<StripResult<Vec<RgbaImage>>>()?;

        let strip = composite(&panels, self.panel_width, self.panel_height)?;
        let bytes = encode_png(&strip)?;
        debug!(bytes = bytes.len(), "Encoded strip");
        Ok(PanelImage::new(bytes))
    }
}

fn decode(index: usize, image: &PanelImage) -> StripResult<RgbaImage> {
    image::load_from_memory(image.bytes())
        .map(|decoded| decoded.to_rgba8())
        .map_err(|e| {
            StripError::from(PipelineErrorKind::ImageCodec(format!(
                "panel {} could not be decoded: {}",
                index, e
            )))
        })
}
