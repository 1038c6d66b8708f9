//! Convolutional code description, trellis construction, and Viterbi decoding.

pub mod code;
pub mod trellis;
pub mod viterbi;
