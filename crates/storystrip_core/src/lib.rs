//! Core data types for the Storystrip comic pipeline.
//!
//! This crate provides the data model shared by every Storystrip crate: panel
//! scripts and descriptors, the per-session strip state, image options, and the
//! request records handed to the text and image collaborators.

#![warn(missing_docs)]

mod image;
mod panel;
mod request;
mod state;
mod style;

pub use image::{ImageFormat, ImageOptions, ImageOptionsBuilder, ImageQuality, PanelImage, PanelSize};
pub use panel::{PanelDescriptor, PanelScript};
pub use request::{ImageRequest, ScriptRequest, ScriptRequestBuilder, ScriptScope};
pub use state::{PANELS_PER_STRIP, StripState};
pub use style::{DEFAULT_STYLE, STYLE_MODIFIERS};
