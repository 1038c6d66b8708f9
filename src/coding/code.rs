//! Parameters of a binary rate 1/n convolutional code.

#[cfg(feature = "ser")]
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::{Result, ViterbiError};

/// Constraint length and generator polynomials of a convolutional code.
///
/// Each generator is a signed integer whose magnitude is the tap mask over the K-bit
/// shift register (newest bit in the LSB) and whose sign marks the output as inverted.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub struct CodeDescriptor {
    /// Constraint length K.
    constraint: usize,
    /// Signed generator polynomials, in output order.
    generators: Vec<i32>,
}

impl CodeDescriptor {
    /// Construct a new `CodeDescriptor` with the given constraint length and
    /// generators, verifying they describe a usable code.
    pub fn new(constraint: usize, generators: Vec<i32>) -> Result<CodeDescriptor> {
        let code = CodeDescriptor {
            constraint: constraint,
            generators: generators,
        };

        code.validate()?;

        Ok(code)
    }

    /// The K=7, rate 1/2 CCSDS code.
    pub fn ccsds() -> CodeDescriptor {
        CodeDescriptor {
            constraint: consts::CCSDS_CONSTRAINT,
            generators: vec![consts::CCSDS_POLY_A, consts::CCSDS_POLY_B],
        }
    }

    /// Verify the parameters are supported. Descriptors built with `new` always pass,
    /// but deserialized ones haven't been checked yet.
    pub fn validate(&self) -> Result<()> {
        if self.constraint < 2 {
            return Err(ViterbiError::InvalidCodeParameters(format!(
                "constraint length {} is less than 2", self.constraint)));
        }

        if self.constraint > consts::MAX_CONSTRAINT {
            return Err(ViterbiError::InvalidCodeParameters(format!(
                "constraint length {} exceeds {}", self.constraint, consts::MAX_CONSTRAINT)));
        }

        if self.generators.is_empty() {
            return Err(ViterbiError::InvalidCodeParameters(
                "no generator polynomials".to_string()));
        }

        if self.generators.len() > consts::MAX_GENERATORS {
            return Err(ViterbiError::InvalidCodeParameters(format!(
                "{} generators exceeds {}", self.generators.len(), consts::MAX_GENERATORS)));
        }

        Ok(())
    }

    /// Constraint length K.
    pub fn constraint(&self) -> usize { self.constraint }

    /// Encoder memory M = K - 1, which is also the number of tail bits needed to flush
    /// the encoder back to the zero state.
    pub fn memory(&self) -> usize { self.constraint - 1 }

    /// Number of trellis states, 2^M.
    pub fn states(&self) -> usize { 1 << self.memory() }

    /// Signed generator polynomials.
    pub fn generators(&self) -> &[i32] { &self.generators[..] }

    /// Number of coded bits emitted per input bit.
    pub fn rate_inverse(&self) -> usize { self.generators.len() }

    /// Mask covering the K-bit shift register.
    pub fn register_mask(&self) -> u32 { ((1u64 << self.constraint) - 1) as u32 }

    /// Mask covering the M-bit state.
    pub fn state_mask(&self) -> u32 { (self.states() - 1) as u32 }
}

impl Default for CodeDescriptor {
    fn default() -> Self { CodeDescriptor::ccsds() }
}
