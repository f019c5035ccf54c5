//! Prompts that ask a chat model for panel scripts.
//!
//! Both scopes describe the same line format the pipeline parser expects:
//! `N. Panel N: <visual description> (Caption: "<caption>")`.

use std::fmt::Write;
use storystrip_core::{PANELS_PER_STRIP, ScriptRequest, ScriptScope};

/// Summaries shorter than this are too thin to illustrate.
pub const DEFAULT_MIN_SUMMARY_CHARS: usize = 125;

/// Builds the system prompt for a script request.
pub fn script_system_prompt(request: &ScriptRequest) -> String {
    let mut prompt = format!(
        "You are a visual storytelling assistant skilled at turning article summaries into \
         visual panel descriptions for a {}-style comic strip. ",
        request.style_modifier()
    );

    prompt.push_str(
        "Given a narrative summary of 2 to 6 sentences, convert it into a four-panel comic strip. \
         Each panel must: Reflect a key moment, scene, or concept from the article. \
         Include a short description of the panel's visuals. \
         Include a caption that summarizes the message or quote from that part of the article. \
         Use a clean, semi-realistic editorial cartoon style with a consistent character design \
         and color palette across all panels. \
         Apply visual metaphors and exaggeration where helpful. ",
    );

    match request.scope() {
        ScriptScope::FullStrip => {
            prompt.push_str("Return the output in the following format:\n");
            for n in 1..=PANELS_PER_STRIP {
                let _ = writeln!(prompt, "{n}. Panel {n}: [Visual description] (Caption: \"...\")");
            }
        }
        ScriptScope::NextPanel => {
            let n = request.panel_number();
            let _ = write!(
                prompt,
                "You are writing the strip one panel at a time. The panels accepted so far are \
                 listed with the summary; keep characters, setting and palette consistent with \
                 them. Write only panel {n} of {PANELS_PER_STRIP}, as a single line in the \
                 following format:\n{n}. Panel {n}: [Visual description] (Caption: \"...\")\n"
            );
        }
    }

    prompt.push_str(
        "Do not add commentary or analysis. Only produce the panel descriptions and captions.",
    );
    prompt
}

/// Builds the user message: the summary, followed by any accepted panels.
pub fn script_user_prompt(request: &ScriptRequest) -> String {
    let mut prompt = request.summary().clone();

    if !request.context().is_empty() {
        prompt.push_str("\n\nPanels accepted so far:\n");
        for (i, panel) in request.context().iter().enumerate() {
            let n = i + 1;
            if panel.caption().is_empty() {
                let _ = writeln!(prompt, "{n}. Panel {n}: {}", panel.visual());
            } else {
                let _ = writeln!(
                    prompt,
                    "{n}. Panel {n}: {} (Caption: \"{}\")",
                    panel.visual(),
                    panel.caption()
                );
            }
        }
    }

    prompt
}
