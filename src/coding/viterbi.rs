//! Hard-decision Viterbi decoding of a complete block of received bits, adapted from
//! the treatment of maximum-likelihood decoding in \[1].
//!
//! The decoder assumes the encoder started in the zero state. A forward pass over the
//! trellis records, for every step and state, the smallest Hamming distance of any path
//! reaching that state along with the edge it arrived on. Traceback then walks those
//! edges backward from a terminal state.
//!
//! \[1]: "Coding Theory and Cryptography: The Essentials", 2nd ed, Hankerson, Hoffman, et
//! al, 2000

#[cfg(feature = "ser")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bits;
use crate::coding::trellis::Trellis;
use crate::error::{Result, ViterbiError};

/// Path metric of a state no path has reached yet.
pub const UNREACHABLE: u32 = u32::MAX;

/// Accumulated Hamming distances, one row of states per step.
#[derive(Clone, Debug)]
pub struct PathMetrics {
    states: usize,
    metrics: Vec<u32>,
}

impl PathMetrics {
    fn new(steps: usize, states: usize) -> PathMetrics {
        PathMetrics {
            states: states,
            metrics: vec![UNREACHABLE; steps * states],
        }
    }

    /// Number of decoded steps.
    pub fn steps(&self) -> usize {
        if self.states == 0 { 0 } else { self.metrics.len() / self.states }
    }

    /// Number of states per step.
    pub fn states(&self) -> usize { self.states }

    /// Metrics of every state after the given step.
    pub fn row(&self, step: usize) -> &[u32] {
        &self.metrics[step * self.states..(step + 1) * self.states]
    }

    /// Metric of the given state after the given step, or `None` if unreachable.
    pub fn get(&self, step: usize, state: usize) -> Option<u32> {
        match self.row(step)[state] {
            UNREACHABLE => None,
            m => Some(m),
        }
    }

    fn row_mut(&mut self, step: usize) -> &mut [u32] {
        &mut self.metrics[step * self.states..(step + 1) * self.states]
    }
}

/// Edge a surviving path took into some state.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Backpointer {
    /// State the path came from.
    pub prev: usize,
    /// Input bit on the edge.
    pub bit: u8,
}

/// Surviving edges, parallel to `PathMetrics`. Entries of unreachable states are left at
/// their default and never followed.
#[derive(Clone, Debug)]
pub struct Backpointers {
    states: usize,
    links: Vec<Backpointer>,
}

impl Backpointers {
    fn new(steps: usize, states: usize) -> Backpointers {
        Backpointers {
            states: states,
            links: vec![Backpointer::default(); steps * states],
        }
    }

    /// Edge taken into the given state at the given step.
    pub fn get(&self, step: usize, state: usize) -> Backpointer {
        self.links[step * self.states + state]
    }

    fn row_mut(&mut self, step: usize) -> &mut [Backpointer] {
        &mut self.links[step * self.states..(step + 1) * self.states]
    }
}

/// Run the forward recursion over the given hard bits, taken `generators` at a time.
///
/// States and input bits are visited in ascending order and a metric is only replaced
/// by a strictly smaller one, so among equal-cost paths the first one found survives.
pub fn forward(trellis: &Trellis, hard: &[u8], generators: usize)
    -> Result<(PathMetrics, Backpointers)>
{
    if generators == 0 || generators != trellis.generators() {
        return Err(ViterbiError::InvalidCodeParameters(format!(
            "{} bits per step given for a code with {} generators",
            generators, trellis.generators())));
    }

    if hard.len() % generators != 0 {
        return Err(ViterbiError::OddInputLength {
            len: hard.len(),
            generators: generators,
        });
    }

    let states = trellis.states();
    let steps = hard.len() / generators;

    let mut metrics = PathMetrics::new(steps, states);
    let mut links = Backpointers::new(steps, states);

    // Metrics before the first step: only the zero state is reachable.
    let mut prev = vec![UNREACHABLE; states];
    prev[0] = 0;

    for (step, group) in hard.chunks(generators).enumerate() {
        let received = bits::pack_word(group);
        let cur = metrics.row_mut(step);
        let edges = links.row_mut(step);

        for (state, &metric) in prev.iter().enumerate() {
            if metric == UNREACHABLE {
                continue;
            }

            for bit in 0..2 {
                let edge = trellis.transition(state, bit);
                let branch = (received ^ edge.output).count_ones();

                match metric.checked_add(branch) {
                    Some(sum) if sum < cur[edge.next] => {
                        cur[edge.next] = sum;
                        edges[edge.next] = Backpointer { prev: state, bit: bit };
                    },
                    _ => {},
                }
            }
        }

        prev.copy_from_slice(cur);
    }

    Ok((metrics, links))
}

/// How the terminal state of the traceback is chosen.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub enum Termination {
    /// Start from the lowest-numbered state with the smallest final metric.
    #[default]
    BestState,
    /// Start from the zero state, for encoders flushed with a zero tail.
    ZeroState,
}

/// Result of a traceback.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Traceback {
    /// Decoded bits, one per step, including any tail bits.
    pub bits: Vec<u8>,
    /// State the path ended in.
    pub state: usize,
    /// Path metric of the decoded sequence: the number of received bits that disagree
    /// with its re-encoding.
    pub metric: u32,
}

/// Reconstruct the decoded bits by walking surviving edges back from the terminal state.
pub fn traceback(metrics: &PathMetrics, links: &Backpointers, term: Termination)
    -> Traceback
{
    let steps = metrics.steps();

    if steps == 0 {
        return Traceback {
            bits: vec![],
            state: 0,
            metric: 0,
        };
    }

    let last = metrics.row(steps - 1);

    // The all-zero path keeps the zero state reachable at every step.
    let (state, metric) = match term {
        Termination::BestState => last.iter().enumerate()
            .fold((0, UNREACHABLE), |(best, min), (s, &m)| {
                if m < min { (s, m) } else { (best, min) }
            }),
        Termination::ZeroState => (0, last[0]),
    };

    let mut bits = Vec::with_capacity(steps);
    let mut cur = state;

    for step in (0..steps).rev() {
        let link = links.get(step, cur);
        bits.push(link.bit);
        cur = link.prev;
    }

    bits.reverse();

    Traceback {
        bits: bits,
        state: state,
        metric: metric,
    }
}

/// Decodes blocks of hard bits against a shared trellis.
#[derive(Copy, Clone)]
pub struct ViterbiDecoder<'a> {
    trellis: &'a Trellis,
    term: Termination,
}

impl<'a> ViterbiDecoder<'a> {
    /// Construct a new `ViterbiDecoder` over the given trellis.
    pub fn new(trellis: &'a Trellis, term: Termination) -> ViterbiDecoder<'a> {
        ViterbiDecoder {
            trellis: trellis,
            term: term,
        }
    }

    /// Decode the given hard bits, which must hold a whole number of steps.
    pub fn decode(&self, hard: &[u8]) -> Result<Traceback> {
        let (metrics, links) = forward(self.trellis, hard, self.trellis.generators())?;
        let tb = traceback(&metrics, &links, self.term);

        debug!(steps = tb.bits.len(), state = tb.state, metric = tb.metric,
               "viterbi decode");

        Ok(tb)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coding::code::CodeDescriptor;
    use crate::coding::trellis::Encoder;

    fn ccsds() -> Trellis { Trellis::build(&CodeDescriptor::ccsds()).unwrap() }

    /// Deterministic pseudorandom bits.
    fn message(len: usize, seed: u32) -> Vec<u8> {
        let mut x = seed;

        (0..len).map(|_| {
            x = x.wrapping_mul(1103515245).wrapping_add(12345);
            (x >> 16 & 1) as u8
        }).collect()
    }

    #[test]
    fn test_forward_init() {
        let t = ccsds();
        let (m, l) = forward(&t, &[0, 1], 2).unwrap();

        assert_eq!(m.steps(), 1);
        assert_eq!(m.states(), 64);
        assert_eq!(m.get(0, 0), Some(0));
        assert_eq!(m.get(0, 1), Some(2));
        assert_eq!(l.get(0, 1), Backpointer { prev: 0, bit: 1 });

        for s in 2..64 {
            assert_eq!(m.get(0, s), None);
        }
    }

    #[test]
    fn test_forward_metrics() {
        // K=2 code with outputs (parity of both bits, newest bit).
        let t = Trellis::build(&CodeDescriptor::new(2, vec![3, 1]).unwrap()).unwrap();
        let (m, l) = forward(&t, &[1, 1, 0, 0], 2).unwrap();

        assert_eq!(m.row(0), &[2, 0]);
        assert_eq!(m.row(1), &[1, 1]);
        assert_eq!(l.get(1, 0), Backpointer { prev: 1, bit: 0 });
        assert_eq!(l.get(1, 1), Backpointer { prev: 1, bit: 1 });

        let tb = traceback(&m, &l, Termination::BestState);
        assert_eq!(tb.bits, vec![1, 0]);
        assert_eq!(tb.state, 0);
        assert_eq!(tb.metric, 1);
    }

    #[test]
    fn test_tie_break() {
        // A generator with no taps makes every path cost the same, so the first path
        // found, all zeros, must survive everywhere.
        let t = Trellis::build(&CodeDescriptor::new(2, vec![0]).unwrap()).unwrap();
        let (m, l) = forward(&t, &[1, 0, 1], 1).unwrap();

        assert_eq!(m.row(2), &[2, 2]);
        assert_eq!(l.get(1, 0), Backpointer { prev: 0, bit: 0 });
        assert_eq!(l.get(2, 1), Backpointer { prev: 0, bit: 1 });

        let tb = traceback(&m, &l, Termination::BestState);
        assert_eq!(tb.bits, vec![0, 0, 0]);
        assert_eq!(tb.state, 0);
    }

    #[test]
    fn test_odd_input() {
        let t = ccsds();

        assert_eq!(forward(&t, &[0, 1, 1], 2).err(), Some(ViterbiError::OddInputLength {
            len: 3,
            generators: 2,
        }));

        match forward(&t, &[0, 1], 1) {
            Err(ViterbiError::InvalidCodeParameters(_)) => {},
            _ => panic!(),
        }

        match forward(&t, &[], 0) {
            Err(ViterbiError::InvalidCodeParameters(_)) => {},
            _ => panic!(),
        }
    }

    #[test]
    fn test_empty() {
        let t = ccsds();
        let (m, l) = forward(&t, &[], 2).unwrap();
        assert_eq!(m.steps(), 0);

        let tb = traceback(&m, &l, Termination::BestState);
        assert_eq!(tb.bits, Vec::<u8>::new());
        assert_eq!(tb.metric, 0);
    }

    #[test]
    fn test_noiseless() {
        let t = ccsds();
        let dec = ViterbiDecoder::new(&t, Termination::BestState);

        let zeros = vec![0; 20];
        let coded = Encoder::new(&t).encode_terminated(&zeros[..]);
        let tb = dec.decode(&coded[..]).unwrap();
        assert_eq!(&tb.bits[..20], &zeros[..]);
        assert_eq!(tb.bits.len(), 26);
        assert_eq!(tb.metric, 0);
        assert_eq!(tb.state, 0);

        let alt = (0..20).map(|i| (i % 2 == 0) as u8).collect::<Vec<_>>();
        let coded = Encoder::new(&t).encode_terminated(&alt[..]);
        let tb = dec.decode(&coded[..]).unwrap();
        assert_eq!(&tb.bits[..20], &alt[..]);
        assert_eq!(&tb.bits[20..], &[0; 6]);
        assert_eq!(tb.metric, 0);
    }

    #[test]
    fn test_corrects_errors() {
        let t = ccsds();
        let msg = message(200, 7);
        let coded = Encoder::new(&t).encode_terminated(&msg[..]);

        let mut single = coded.clone();
        single[101] ^= 1;

        let tb = ViterbiDecoder::new(&t, Termination::BestState).decode(&single[..]).unwrap();
        assert_eq!(&tb.bits[..200], &msg[..]);
        assert_eq!(tb.metric, 1);

        let mut spaced = coded.clone();

        for i in (10..spaced.len()).step_by(60) {
            spaced[i] ^= 1;
        }

        let tb = ViterbiDecoder::new(&t, Termination::ZeroState).decode(&spaced[..]).unwrap();
        assert_eq!(&tb.bits[..200], &msg[..]);
        assert_eq!(tb.state, 0);
    }

    #[test]
    fn test_termination() {
        let t = ccsds();
        let mut msg = message(64, 3);
        msg[63] = 1;

        // Without a tail the encoder ends away from the zero state.
        let mut enc = Encoder::new(&t);
        let coded = enc.encode(&msg[..]);
        let end = enc.state();
        assert!(end != 0);

        let best = ViterbiDecoder::new(&t, Termination::BestState).decode(&coded[..]).unwrap();
        assert_eq!(best.bits, msg);
        assert_eq!(best.state, end);
        assert_eq!(best.metric, 0);

        let zero = ViterbiDecoder::new(&t, Termination::ZeroState).decode(&coded[..]).unwrap();
        assert_eq!(zero.state, 0);
        assert!(zero.metric > 0);

        // With the tail both agree.
        let coded = Encoder::new(&t).encode_terminated(&msg[..]);
        let best = ViterbiDecoder::new(&t, Termination::BestState).decode(&coded[..]).unwrap();
        let zero = ViterbiDecoder::new(&t, Termination::ZeroState).decode(&coded[..]).unwrap();
        assert_eq!(best, zero);
    }

    #[test]
    fn test_deterministic() {
        let t = ccsds();
        let mut coded = Encoder::new(&t).encode_terminated(&message(100, 11)[..]);
        coded[3] ^= 1;
        coded[4] ^= 1;
        coded[5] ^= 1;

        let dec = ViterbiDecoder::new(&t, Termination::BestState);
        assert_eq!(dec.decode(&coded[..]).unwrap(), dec.decode(&coded[..]).unwrap());
    }
}
