//! Hard-decision Viterbi decoding of binary convolutional codes, defaulting to the
//! K=7, rate 1/2 CCSDS code.
//!
//! A `Trellis` is built once from a `CodeDescriptor` and shared read-only by every
//! decode. Each decode owns its path metric and backpointer tables, so independent
//! frames can be decoded concurrently.

pub mod bits;
pub mod coding;
pub mod consts;
pub mod decoder;
pub mod error;
pub mod stats;

pub use coding::code::CodeDescriptor;
pub use coding::trellis::{Encoder, Trellis};
pub use coding::viterbi::{Termination, Traceback, ViterbiDecoder};
pub use decoder::{DecoderConfig, FrameDecoder};
pub use error::{Result, ViterbiError};
