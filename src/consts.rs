/// Constraint length of the CCSDS convolutional code.
pub const CCSDS_CONSTRAINT: usize = 7;
/// First CCSDS generator, octal 171 bit-reversed.
pub const CCSDS_POLY_A: i32 = 79;
/// Second CCSDS generator, octal 133 bit-reversed. The negative sign marks the output
/// as inverted.
pub const CCSDS_POLY_B: i32 = -109;
/// Number of encoder tail bits flushed after each CCSDS block.
pub const CCSDS_TAIL_BITS: usize = CCSDS_CONSTRAINT - 1;
/// Number of information bits carried in each decoded frame.
pub const FRAME_INFO_BITS: usize = 2560;
/// Largest supported constraint length.
pub const MAX_CONSTRAINT: usize = 16;
/// Largest supported number of generators, limited by the packed output word.
pub const MAX_GENERATORS: usize = 32;
