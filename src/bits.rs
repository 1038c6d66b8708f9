//! Conversions between soft symbols, hard bits, packed words, and bytes, along with the
//! framing applied around a decode.
//!
//! Bits are carried one per `u8`, holding 0 or 1.

use num::Float;
use tracing::warn;

use crate::error::{Result, ViterbiError};

/// Slice soft symbols to hard bits, mapping each value at or above zero to 1 and every
/// other value (including NaN) to 0.
pub fn to_hard_bits<F: Float>(soft: &[F]) -> Vec<u8> {
    soft.iter().map(|&v| (v >= F::zero()) as u8).collect()
}

/// Drop the `tail` encoder flush bits from the end of the decoded sequence and return
/// exactly `requested` of the remaining bits, or all of them if `requested` is `None`.
///
/// Extra bits are truncated. A shortfall is an `InsufficientDecodedBits` error rather
/// than padding.
pub fn finalize(decoded: &[u8], tail: usize, requested: Option<usize>) -> Result<Vec<u8>> {
    let body = &decoded[..decoded.len().saturating_sub(tail)];

    let requested = match requested {
        Some(n) => n,
        None => return Ok(body.to_vec()),
    };

    if body.len() < requested {
        warn!(available = body.len(), requested, "decoded frame too short");

        return Err(ViterbiError::InsufficientDecodedBits {
            available: body.len(),
            requested: requested,
        });
    }

    Ok(body[..requested].to_vec())
}

/// Pack the given bits into a word, with the first bit in the MSB. At most 32 bits are
/// significant.
pub fn pack_word(bits: &[u8]) -> u32 {
    bits.iter().fold(0, |word, &bit| word << 1 | (bit & 1) as u32)
}

/// Iterate over the low `width` bits of the given word, MSB first.
pub fn unpack_word(word: u32, width: usize) -> impl Iterator<Item = u8> {
    (0..width).rev().map(move |i| (word >> i & 1) as u8)
}

/// Group bits into bytes, MSB first. A trailing partial byte is padded with zeros in
/// its low bits.
pub fn pack_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| (pack_word(chunk) << (8 - chunk.len())) as u8)
        .collect()
}

/// Split bytes into bits, MSB first.
pub fn unpack_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.iter()
        .flat_map(|&byte| unpack_word(byte as u32, 8))
        .collect()
}
