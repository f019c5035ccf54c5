//! Stitch command handler.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use storystrip_core::{PanelImage, PanelSize};
use storystrip_pipeline::StripAssembler;

/// Composites four panel image files into one PNG strip.
#[tracing::instrument(skip_all, fields(output = %output.display(), size = %size))]
pub fn stitch_panels(panels: &[PathBuf], output: &Path, size: PanelSize) -> Result<()> {
    let images = panels
        .iter()
        .map(|path| {
            std::fs::read(path)
                .map(PanelImage::new)
                .with_context(|| format!("Failed to read panel {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let strip = StripAssembler::new(size).assemble(&images)?;
    std::fs::write(output, strip.bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(bytes = strip.len(), "Strip written");
    println!("Strip written to {}", output.display());
    Ok(())
}
