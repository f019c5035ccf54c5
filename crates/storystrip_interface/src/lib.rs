//! Trait definitions for the Storystrip comic pipeline.
//!
//! The pipeline talks to two external capabilities: a text model that writes
//! panel scripts and an image model that draws them. Both are expressed here
//! as traits so the orchestrator can run against any backend, including the
//! in-memory mocks used in tests.

#![warn(missing_docs)]

mod generators;

pub use generators::{ImageGenerator, ScriptGenerator};
