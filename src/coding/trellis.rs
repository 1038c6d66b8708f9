//! Construction of the state transition tables ("trellis") of a convolutional code, and
//! a reference encoder that walks them.
//!
//! The encoder holds the K most recent input bits in a shift register with the newest
//! bit in the LSB. A state is the M = K - 1 newest bits, so feeding bit `b` in state `s`
//! forms the register `(s << 1 | b)` and moves to the state made of its low M bits.

use binfield_matrix::matrix_mul;
use collect_slice::CollectSlice;
use tracing::trace;

use crate::bits;
use crate::coding::code::CodeDescriptor;
use crate::error::Result;

/// Single edge of the trellis, taken from some state on some input bit.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Transition {
    /// State reached after the edge.
    pub next: usize,
    /// Coded bits emitted on the edge, one per generator with the first generator in
    /// the MSB of the `n`-bit word.
    pub output: u32,
}

/// Immutable state transition tables for a convolutional code.
#[derive(Clone, Debug)]
pub struct Trellis {
    code: CodeDescriptor,
    /// Outgoing edges of each state, indexed by input bit.
    edges: Vec<[Transition; 2]>,
}

impl Trellis {
    /// Compute the transition tables for the given code.
    pub fn build(code: &CodeDescriptor) -> Result<Trellis> {
        code.validate()?;

        let taps: Vec<u32> = code.generators().iter()
            .map(|g| g.unsigned_abs())
            .collect();

        let inverted = code.generators().iter()
            .fold(0u32, |mask, &g| mask << 1 | (g < 0) as u32);

        let edges = (0..code.states()).map(|state| {
            let mut edges = [Transition::default(); 2];

            (0..2u32)
                .map(|bit| {
                    let reg = ((state as u32) << 1 | bit) & code.register_mask();
                    let output: u32 = matrix_mul(reg, &taps[..]);

                    Transition {
                        next: (reg & code.state_mask()) as usize,
                        output: output ^ inverted,
                    }
                })
                .collect_slice_checked(&mut edges[..]);

            edges
        }).collect::<Vec<_>>();

        trace!(constraint = code.constraint(), states = edges.len(),
               generators = code.rate_inverse(), "built trellis");

        Ok(Trellis {
            code: code.clone(),
            edges: edges,
        })
    }

    /// Code the tables were built from.
    pub fn code(&self) -> &CodeDescriptor { &self.code }

    /// Number of states.
    pub fn states(&self) -> usize { self.edges.len() }

    /// Number of coded bits per trellis step.
    pub fn generators(&self) -> usize { self.code.rate_inverse() }

    /// Edge leaving the given state on the given input bit.
    pub fn transition(&self, state: usize, bit: u8) -> Transition {
        self.edges[state][(bit & 1) as usize]
    }

    /// State reached from the given state on the given input bit.
    pub fn next_state(&self, state: usize, bit: u8) -> usize {
        self.transition(state, bit).next
    }

    /// Packed coded bits emitted from the given state on the given input bit.
    pub fn output_word(&self, state: usize, bit: u8) -> u32 {
        self.transition(state, bit).output
    }

    /// Coded bits emitted from the given state on the given input bit, in generator
    /// order.
    pub fn outputs(&self, state: usize, bit: u8) -> Vec<u8> {
        bits::unpack_word(self.output_word(state, bit), self.generators()).collect()
    }
}

/// Convolutional encoder driven by a precomputed trellis, starting in the zero state.
pub struct Encoder<'a> {
    trellis: &'a Trellis,
    /// Current state.
    state: usize,
}

impl<'a> Encoder<'a> {
    /// Construct a new `Encoder` at the initial state.
    pub fn new(trellis: &'a Trellis) -> Encoder<'a> {
        Encoder {
            trellis: trellis,
            state: 0,
        }
    }

    /// Current register state.
    pub fn state(&self) -> usize { self.state }

    /// Apply the given bit to the state machine and return the packed coded bits on the
    /// transition.
    pub fn feed(&mut self, bit: u8) -> u32 {
        let edge = self.trellis.transition(self.state, bit);
        self.state = edge.next;
        edge.output
    }

    /// Code the given information bits, returning one coded bit per generator per input
    /// bit.
    pub fn encode(&mut self, input: &[u8]) -> Vec<u8> {
        let n = self.trellis.generators();
        let mut coded = Vec::with_capacity(input.len() * n);

        for &bit in input {
            coded.extend(bits::unpack_word(self.feed(bit), n));
        }

        coded
    }

    /// Flush the register with K - 1 zero tail bits and return the coded tail, leaving
    /// the encoder in the zero state.
    pub fn finish(&mut self) -> Vec<u8> {
        let tail = vec![0; self.trellis.code().memory()];
        self.encode(&tail[..])
    }

    /// Code the given information bits followed by the zero tail.
    pub fn encode_terminated(&mut self, input: &[u8]) -> Vec<u8> {
        let mut coded = self.encode(input);
        coded.extend(self.finish());
        coded
    }
}
