//! Panel script parser.
//!
//! Turns the free-form text a chat model returns into [`PanelScript`]s. Each
//! line is expected to look like
//!
//! ```text
//! 1. Panel 1: A reporter stares at a wall of screens (Caption: "The news never sleeps.")
//! ```
//!
//! The leading ordinal and the caption clause are optional, and the caption
//! may be wrapped in straight or curly quotes. Lines that do not match are
//! kept whole as the visual description with an empty caption, so parsing
//! never fails.

use std::sync::LazyLock;

use regex::Regex;
use storystrip_core::{PanelScript, ScriptScope};
use tracing::{debug, trace};

/// Captions longer than this many words are truncated.
pub const CAPTION_TOKEN_LIMIT: usize = 20;

/// Appended to truncated captions.
pub const ELLIPSIS: &str = "...";

static PANEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:\d+\s*[.)]\s*)?Panel\s+(\d+)\s*:\s*(.*?)\s*(?:\(\s*Caption\s*:\s*["“”](.*?)["“”]\s*\))?\s*$"#,
    )
    .expect("panel line pattern must compile")
});

/// How many panels to return from a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseMode {
    /// Only the first non-blank line; used by the panel-at-a-time flow
    #[default]
    SinglePanel,
    /// Every non-blank line; used when a whole strip is scripted at once
    FullScript,
}

impl From<ScriptScope> for ParseMode {
    fn from(scope: ScriptScope) -> Self {
        match scope {
            ScriptScope::NextPanel => ParseMode::SinglePanel,
            ScriptScope::FullStrip => ParseMode::FullScript,
        }
    }
}

/// Parses a script into panel records.
///
/// Blank lines are skipped. In [`ParseMode::SinglePanel`] at most one record
/// is returned; an empty result means the script held no text at all.
pub fn parse_script(script: &str, mode: ParseMode) -> Vec<PanelScript> {
    let lines = script.lines().map(str::trim).filter(|l| !l.is_empty());

    let panels: Vec<PanelScript> = match mode {
        ParseMode::SinglePanel => lines.take(1).map(parse_line).collect(),
        ParseMode::FullScript => lines.map(parse_line).collect(),
    };

    debug!(?mode, panels = panels.len(), "Parsed script");
    panels
}

/// Parses one line; never fails.
pub fn parse_line(line: &str) -> PanelScript {
    let line = line.trim();

    let Some(captures) = PANEL_LINE.captures(line) else {
        trace!(line, "Line does not match the panel pattern");
        return PanelScript::new(line, "");
    };

    let visual = captures.get(2).map_or("", |m| m.as_str().trim());
    let caption = captures.get(3).map_or("", |m| m.as_str().trim());
    PanelScript::new(visual, truncate_caption(caption))
}

/// Cuts a caption to [`CAPTION_TOKEN_LIMIT`] whitespace-separated words.
///
/// Captions within the limit are returned unchanged; longer ones keep their
/// first words, joined by single spaces, followed by [`ELLIPSIS`].
pub fn truncate_caption(caption: &str) -> String {
    let tokens: Vec<&str> = caption.split_whitespace().collect();
    if tokens.len() <= CAPTION_TOKEN_LIMIT {
        return caption.to_string();
    }
    format!("{}{}", tokens[..CAPTION_TOKEN_LIMIT].join(" "), ELLIPSIS)
}
