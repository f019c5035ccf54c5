//! Panel pipeline error types.

/// Specific error conditions raised while building a comic strip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Missing or too-short user input
    #[display("Validation failed: {}", _0)]
    Validation(String),
    /// Operation attempted from a state that forbids it
    #[display("Invalid state: cannot {} while {}", operation, state)]
    InvalidState {
        /// Operation that was attempted
        operation: String,
        /// State the session was in
        state: String,
    },
    /// Panel index does not reference the pending panel
    #[display("Invalid panel index {}: {}", index, reason)]
    InvalidIndex {
        /// Index supplied by the caller
        index: usize,
        /// Why the index was rejected
        reason: String,
    },
    /// Text or image collaborator failed, timed out, or was cancelled
    #[display("Upstream failure: {}", _0)]
    UpstreamFailure(String),
    /// Compositing requested with the wrong number of panels
    #[display("Expected {} panel images, got {}", expected, actual)]
    InvalidPanelCount {
        /// Required number of panels
        expected: usize,
        /// Number of panels supplied
        actual: usize,
    },
    /// Collaborator returned no usable script or image payload
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// Panel image does not match the declared panel size
    #[display(
        "Panel {} is {}x{}, expected {}x{}",
        index,
        actual_width,
        actual_height,
        expected_width,
        expected_height
    )]
    PanelDimensions {
        /// Panel position in the strip
        index: usize,
        /// Declared panel width
        expected_width: u32,
        /// Declared panel height
        expected_height: u32,
        /// Decoded image width
        actual_width: u32,
        /// Decoded image height
        actual_height: u32,
    },
    /// Image bytes could not be decoded or the strip could not be encoded
    #[display("Image codec error: {}", _0)]
    ImageCodec(String),
}

impl PipelineErrorKind {
    /// Whether the caller should offer a retry for this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineErrorKind::UpstreamFailure(_))
    }

    /// Whether the error points at a caller-side sequencing bug.
    pub fn is_sequencing_bug(&self) -> bool {
        matches!(
            self,
            PipelineErrorKind::InvalidState { .. } | PipelineErrorKind::InvalidIndex { .. }
        )
    }
}

/// Pipeline error with location tracking.
///
/// # Examples
///
/// ```
/// use storystrip_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::InvalidPanelCount {
///     expected: 4,
///     actual: 3,
/// });
/// assert!(format!("{}", err).contains("Expected 4 panel images, got 3"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
