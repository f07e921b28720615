//! Unified error types for the markup FX pipeline.

/// Main error type for compilation and rendering operations.
///
/// Markup and attribute parse problems are recovered inside the compiler and
/// never show up here; everything below is a real failure for the caller.
#[derive(Debug, thiserror::Error)]
pub enum FxError {
    /// The external transform facility could not be found or run.
    #[error("transform facility unavailable: {facility}")]
    TransformUnavailable { facility: String },

    /// The external transform ran but exited unsuccessfully.
    #[error("transform failed ({status}): {stderr}")]
    TransformFailed { status: String, stderr: String },

    /// Timeout during an external invocation.
    #[error("operation timeout after {ms}ms")]
    Timeout { ms: u64 },

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// WAV container read/write error.
    #[error("wav error: {0}")]
    Wav(String),

    /// Speech synthesis collaborator error.
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with FxError.
pub type FxResult<T> = Result<T, FxError>;

impl FxError {
    /// Create a transform-unavailable error naming the facility.
    pub fn transform_unavailable(facility: impl Into<String>) -> Self {
        Self::TransformUnavailable {
            facility: facility.into(),
        }
    }

    /// Create an invalid input error with message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a WAV error with message.
    pub fn wav(msg: impl Into<String>) -> Self {
        Self::Wav(msg.into())
    }

    /// Create a synthesis error with message.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Create a config error with message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
