//! Panel orchestration pipeline for Storystrip.
//!
//! Turns a short narrative into a four-panel comic strip:
//!
//! - [`parse_script`] reads a model's panel script into typed [`PanelScript`](storystrip_core::PanelScript)s
//! - [`StripSession`] is the state machine that produces one panel at a time,
//!   feeding accepted panels back as context for the next
//! - [`PanelOrchestrator`] drives a session against real collaborators with
//!   timeouts and reset cancellation
//! - [`composite`] and [`StripAssembler`] lay the four accepted images side by side

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod assembler;
mod compositor;
mod orchestrator;
mod parser;
mod prompt;
mod session;

pub use assembler::StripAssembler;
pub use compositor::{composite, encode_png};
pub use orchestrator::{DEFAULT_REQUEST_TIMEOUT, PanelOrchestrator};
pub use parser::{CAPTION_TOKEN_LIMIT, ELLIPSIS, ParseMode, parse_line, parse_script, truncate_caption};
pub use prompt::panel_image_prompt;
pub use session::{Completion, Issued, PendingCall, Phase, StripSession, Ticket};
