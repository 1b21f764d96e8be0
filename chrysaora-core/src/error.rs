//! Structured error types for the Chrysaora ecosystem.

use thiserror::Error;

/// Unified error type for all Chrysaora operations.
#[derive(Debug, Error)]
pub enum ChrysaoraError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Zero-row input where a centroid or decomposition is required
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Mismatched row/column counts between matrices expected to correspond
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Numerically degenerate input (zero-width matrix, zero-variance data)
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the Chrysaora ecosystem.
pub type Result<T> = std::result::Result<T, ChrysaoraError>;
