//! Image prompts for panels.

use storystrip_core::PanelScript;

/// Builds the image prompt for one panel.
///
/// The caption clause is dropped when the panel has no caption.
pub fn panel_image_prompt(panel: &PanelScript, style_modifier: &str) -> String {
    let mut prompt = String::new();
    if !style_modifier.trim().is_empty() {
        prompt.push_str(&format!("A {}-style comic panel. ", style_modifier.trim()));
    }
    prompt.push_str(&format!("Draw the following scene: {}.", panel.visual().trim_end_matches('.')));
    if !panel.caption().is_empty() {
        prompt.push_str(&format!(" Caption: \"{}\"", panel.caption()));
    }
    prompt
}
