//! Error types for the Storystrip comic pipeline.
//!
//! This crate provides the foundation error types used throughout the Storystrip workspace.

#![warn(missing_docs)]

mod config;
mod http;
mod pipeline;

pub use config::ConfigError;
pub use http::HttpError;
pub use pipeline::{PipelineError, PipelineErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum StripErrorKind {
    /// HTTP transport error
    #[display("{}", _0)]
    Http(HttpError),
    /// Configuration error
    #[display("{}", _0)]
    Config(ConfigError),
    /// Panel pipeline error
    #[display("{}", _0)]
    Pipeline(PipelineError),
}

/// Storystrip error with kind discrimination.
#[derive(Debug, derive_more::Display)]
#[display("Storystrip Error: {}", _0)]
pub struct StripError(Box<StripErrorKind>);

impl StripError {
    /// Create a new error from a kind.
    pub fn new(kind: StripErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StripErrorKind {
        &self.0
    }

    /// Get the pipeline error kind, if this is a pipeline error.
    ///
    /// # Examples
    ///
    /// ```
    /// use storystrip_error::{PipelineError, PipelineErrorKind, StripError};
    ///
    /// let err = StripError::from(PipelineError::new(PipelineErrorKind::Validation(
    ///     "summary is empty".to_string(),
    /// )));
    /// assert!(matches!(err.pipeline_kind(), Some(PipelineErrorKind::Validation(_))));
    /// ```
    pub fn pipeline_kind(&self) -> Option<&PipelineErrorKind> {
        match self.kind() {
            StripErrorKind::Pipeline(e) => Some(&e.kind),
            _ => None,
        }
    }
}

impl std::error::Error for StripError {}

// Generic From implementation for any type that converts to StripErrorKind
impl<T> From<T> for StripError
where
    T: Into<StripErrorKind>,
{
    #[track_caller]
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl From<PipelineErrorKind> for StripErrorKind {
    #[track_caller]
    fn from(kind: PipelineErrorKind) -> Self {
        StripErrorKind::Pipeline(PipelineError::new(kind))
    }
}

/// Result type for Storystrip operations.
pub type StripResult<T> = std::result::Result<T, StripError>;
