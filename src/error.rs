//! Standard errors that may occur when decoding convolutional codes.

use thiserror::Error;

/// Decoder runtime errors.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum ViterbiError {
    /// The constraint length or generator set can't describe a code.
    #[error("invalid code parameters: {0}")]
    InvalidCodeParameters(String),
    /// The received bit count isn't a whole number of trellis steps.
    #[error("input of {len} bits is not a multiple of {generators} generators")]
    OddInputLength { len: usize, generators: usize },
    /// Fewer information bits survived tail removal than were requested.
    #[error("only {available} decoded bits available, {requested} requested")]
    InsufficientDecodedBits { available: usize, requested: usize },
}

/// Standard result using `ViterbiError`.
pub type Result<T> = std::result::Result<T, ViterbiError>;
