//! Frame-level decoding: soft symbols in, information bits out.
//!
//! A `FrameDecoder` slices each frame of soft symbols to hard bits, runs the Viterbi
//! decoder over the whole frame, strips the encoder tail, and keeps the configured
//! number of information bits. The trellis is built once per decoder and shared by
//! every clone, so frames can be decoded on several threads at once.

use std::sync::{Arc, Mutex, MutexGuard};

use num::Float;
#[cfg(feature = "ser")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bits;
use crate::coding::code::CodeDescriptor;
use crate::coding::trellis::Trellis;
use crate::coding::viterbi::{Termination, Traceback, ViterbiDecoder};
use crate::consts;
use crate::error::{Result, ViterbiError};
use crate::stats::CodeStats;

/// Decoder parameters, fixed for the life of a `FrameDecoder`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "ser", serde(default))]
pub struct DecoderConfig {
    /// Convolutional code used by the transmitter.
    pub code: CodeDescriptor,
    /// Number of information bits to keep from each frame, or `None` to keep every bit
    /// before the tail.
    pub info_bits: Option<usize>,
    /// Number of tail bits to drop from each frame, or `None` for the encoder memory.
    pub tail_bits: Option<usize>,
    /// Terminal state selection.
    pub termination: Termination,
}

impl DecoderConfig {
    /// Number of tail bits dropped from each frame.
    pub fn tail(&self) -> usize {
        self.tail_bits.unwrap_or_else(|| self.code.memory())
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            code: CodeDescriptor::ccsds(),
            info_bits: Some(consts::FRAME_INFO_BITS),
            tail_bits: None,
            termination: Termination::BestState,
        }
    }
}

/// Decodes frames of soft symbols with a fixed configuration.
#[derive(Clone)]
pub struct FrameDecoder {
    trellis: Arc<Trellis>,
    config: DecoderConfig,
    /// Counters shared between clones.
    stats: Arc<Mutex<CodeStats>>,
}

impl FrameDecoder {
    /// Construct a new `FrameDecoder`, building the trellis for the configured code.
    pub fn new(config: DecoderConfig) -> Result<FrameDecoder> {
        let trellis = Trellis::build(&config.code)?;
        Self::with_trellis(Arc::new(trellis), config)
    }

    /// Construct a new `FrameDecoder` around an already built trellis, which must match
    /// the configured code.
    pub fn with_trellis(trellis: Arc<Trellis>, config: DecoderConfig) -> Result<FrameDecoder> {
        if *trellis.code() != config.code {
            return Err(ViterbiError::InvalidCodeParameters(
                "trellis was built for a different code".to_string()));
        }

        Ok(FrameDecoder {
            trellis: trellis,
            config: config,
            stats: Arc::new(Mutex::new(CodeStats::new())),
        })
    }

    /// Shared trellis.
    pub fn trellis(&self) -> &Arc<Trellis> { &self.trellis }

    /// Decoder parameters.
    pub fn config(&self) -> &DecoderConfig { &self.config }

    /// Decode the given hard bits without any framing, returning every decoded bit
    /// including the tail.
    pub fn decode_hard(&self, hard: &[u8]) -> Result<Traceback> {
        ViterbiDecoder::new(&self.trellis, self.config.termination).decode(hard)
    }

    /// Decode the given frame of soft symbols to its information bits, one per byte.
    ///
    /// An empty frame decodes to no bits. Otherwise a frame with fewer decoded bits
    /// than the configured information length fails with `InsufficientDecodedBits`.
    pub fn decode_soft<F: Float>(&self, soft: &[F]) -> Result<Vec<u8>> {
        if soft.is_empty() {
            return Ok(vec![]);
        }

        let result = self.decode_frame(soft);
        let mut stats = self.lock_stats();

        match result {
            Ok((ref info, metric)) => {
                stats.record_fixes(metric as usize);
                debug!(symbols = soft.len(), info_bits = info.len(), fixed = metric,
                       "decoded frame");
            },
            Err(ref e) => {
                stats.record_err();
                debug!(symbols = soft.len(), error = %e, "dropped frame");
            },
        }

        result.map(|(info, _)| info)
    }

    /// Decode the given frame of soft symbols to its information bits, packed MSB first
    /// into bytes.
    pub fn decode_soft_bytes<F: Float>(&self, soft: &[F]) -> Result<Vec<u8>> {
        self.decode_soft(soft).map(|info| bits::pack_bytes(&info[..]))
    }

    /// Snapshot of the counters accumulated by this decoder and its clones.
    pub fn stats(&self) -> CodeStats { *self.lock_stats() }

    /// Return the accumulated counters and reset them.
    pub fn take_stats(&self) -> CodeStats {
        let mut taken = CodeStats::new();
        taken.merge(&mut self.lock_stats());
        taken
    }

    fn decode_frame<F: Float>(&self, soft: &[F]) -> Result<(Vec<u8>, u32)> {
        let hard = bits::to_hard_bits(soft);
        let tb = self.decode_hard(&hard[..])?;
        let info = bits::finalize(&tb.bits[..], self.config.tail(), self.config.info_bits)?;

        Ok((info, tb.metric))
    }

    fn lock_stats(&self) -> MutexGuard<CodeStats> {
        // Counters stay consistent even if a holder panicked.
        self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }
}
