//! Storystrip turns a short narrative into a four-panel comic strip.
//!
//! A text model writes one panel at a time, an image model draws it, and once
//! the reader has accepted all four panels they are stitched side by side into
//! a single strip image.
//!
//! This crate re-exports the workspace and adds configuration loading:
//!
//! ```no_run
//! use storystrip::{StripConfig, StripResult};
//!
//! # async fn demo() -> StripResult<()> {
//! let config = StripConfig::load(None)?;
//! let orchestrator = config.orchestrator()?;
//! let state = orchestrator
//!     .start("A long enough summary of the story to illustrate ...", "noir")
//!     .await?;
//! println!("panel 1: {}", state.panels()[0].visual());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;

pub use config::{
    DEFAULT_CONFIG_FILE, OpenAIConfig, OpenAIConfigBuilder, SessionConfig, SessionConfigBuilder,
    StripConfig, StripConfigBuilder,
};

pub use storystrip_core::*;
pub use storystrip_error::*;
pub use storystrip_interface::{ImageGenerator, ScriptGenerator};
pub use storystrip_models::{OpenAIClient, OpenAIImageGenerator, OpenAIScriptGenerator};
pub use storystrip_pipeline::*;
