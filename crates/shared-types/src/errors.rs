//! # Error Types
//!
//! Decode errors for the primitive identifiers.

use thiserror::Error;

/// Errors raised while decoding identifiers from their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The input is not valid hexadecimal.
    #[error("invalid hex in identifier {input:?}: {reason}")]
    InvalidHex { input: String, reason: String },

    /// The decoded bytes have the wrong length.
    #[error("invalid identifier length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
