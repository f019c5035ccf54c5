//! Full-script drafting command handler.

use anyhow::Result;
use storystrip_interface::{ImageGenerator, ScriptGenerator};
use storystrip_pipeline::PanelOrchestrator;

/// Drafts all four panels in one request and prints them.
#[tracing::instrument(skip_all, fields(style = %style))]
pub async fn draft_script<S, I>(
    orchestrator: &PanelOrchestrator<S, I>,
    summary: &str,
    style: &str,
) -> Result<()>
where
    S: ScriptGenerator,
    I: ImageGenerator,
{
    let panels = orchestrator.draft_script(summary, style).await?;
    tracing::info!(count = panels.len(), "Drafted script");

    for (i, panel) in panels.iter().enumerate() {
        println!("Panel {}: {}", i + 1, panel.visual());
        if !panel.caption().is_empty() {
            println!("  Caption: \"{}\"", panel.caption());
        }
    }
    Ok(())
}
