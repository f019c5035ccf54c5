//! Side-by-side raster compositing.

use image::{Rgba, RgbaImage, imageops};
use std::io::Cursor;
use storystrip_core::PANELS_PER_STRIP;
use storystrip_error::{PipelineErrorKind, StripError, StripResult};
use tracing::debug;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Places four equally sized panels left to right on an opaque white canvas.
///
/// Panel `i` lands with its top-left corner at `(i * panel_width, 0)`; the
/// result is `4 * panel_width` by `panel_height`. Panels are drawn over the
/// white background, so opaque pixels are copied unchanged and transparent
/// ones show white. No panel is scaled or cropped: a panel whose size differs
/// from the declared one is rejected.
///
/// # Errors
///
/// `InvalidPanelCount` unless exactly four panels are given;
/// `PanelDimensions` for a panel of the wrong size.
pub fn composite(
    panels: &[RgbaImage],
    panel_width: u32,
    panel_height: u32,
) -> StripResult<RgbaImage> {
    if panels.len() != PANELS_PER_STRIP {
        return Err(PipelineErrorKind::InvalidPanelCount {
            expected: PANELS_PER_STRIP,
            actual: panels.len(),
        }
        .into());
    }

    for (index, panel) in panels.iter().enumerate() {
        let (actual_width, actual_height) = panel.dimensions();
        if (actual_width, actual_height) != (panel_width, panel_height) {
            return Err(PipelineErrorKind::PanelDimensions {
                index,
                expected_width: panel_width,
                expected_height: panel_height,
                actual_width,
                actual_height,
            }
            .into());
        }
    }

    let strip_width = panel_width * PANELS_PER_STRIP as u32;
    let mut canvas = RgbaImage::from_pixel(strip_width, panel_height, WHITE);
    for (index, panel) in panels.iter().enumerate() {
        let left = i64::from(panel_width) * index as i64;
        imageops::overlay(&mut canvas, panel, left, 0);
    }

    debug!(width = strip_width, height = panel_height, "Composited strip");
    Ok(canvas)
}

/// Encodes a raster as PNG.
///
/// # Errors
///
/// `ImageCodec` if encoding fails.
pub fn encode_png(image: &RgbaImage) -> StripResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| StripError::from(PipelineErrorKind::ImageCodec(e.to_string())))?;
    Ok(bytes)
}
