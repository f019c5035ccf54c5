//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storystrip binary.

mod commands;
mod input;
mod run;
mod script;
mod stitch;

pub use commands::{Cli, Commands};
pub use input::read_summary;
pub use run::{RunOptions, run_strip};
pub use script::draft_script;
pub use stitch::stitch_panels;
