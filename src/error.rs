//! Error types for the spreading/despreading pipeline

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, CdmaError>;

/// Errors raised by the pipeline and its collaborators.
///
/// A byte rejected for low confidence is not an error; see
/// [`crate::assembler::ByteOutcome::Dropped`].
#[derive(Error, Debug)]
pub enum CdmaError {
    /// A value outside the domain an operation accepts
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Superposed sequences do not have the same length
    #[error("Length mismatch at sample {position}: source {source_index} ended while others continued")]
    LengthMismatch { position: usize, source_index: usize },

    /// Noise sequence length differs from the signal it is added to
    #[error("Noise length mismatch: expected {expected}, got {actual}")]
    NoiseLengthMismatch { expected: usize, actual: usize },

    /// Run parameters failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to write a plot image
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl CdmaError {
    /// True for the two misalignment kinds raised by the channel
    pub fn is_length_mismatch(&self) -> bool {
        matches!(
            self,
            CdmaError::LengthMismatch { .. } | CdmaError::NoiseLengthMismatch { .. }
        )
    }
}
