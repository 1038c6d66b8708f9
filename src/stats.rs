//! Runtime statistics.

/// Tracks stats for decoded frames.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CodeStats {
    /// Total number of received frames.
    pub frames: usize,
    /// Number of corrected channel bits.
    pub fixed: usize,
    /// Number of frames that couldn't be decoded.
    pub err: usize,
}

impl CodeStats {
    /// Create a new `CodeStats` with empty counters.
    pub fn new() -> Self { CodeStats::default() }

    /// Record that a frame was decoded with the given amount of corrected bits.
    pub fn record_fixes(&mut self, fixed: usize) {
        self.frames += 1;
        self.fixed += fixed;
    }

    /// Record that a frame failed to decode.
    pub fn record_err(&mut self) {
        self.frames += 1;
        self.err += 1;
    }

    /// Merge in the stats from the given object and clear the other stats.
    pub fn merge(&mut self, other: &mut CodeStats) {
        self.frames += other.frames;
        self.err += other.err;
        self.fixed += other.fixed;

        other.clear();
    }

    /// Clear all stats.
    pub fn clear(&mut self) {
        *self = CodeStats::default();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_code_stats() {
        let mut a = CodeStats::new();
        let mut b = CodeStats::new();

        a.record_fixes(13);
        a.record_err();
        assert_eq!(a.frames, 2);
        assert_eq!(a.fixed, 13);
        assert_eq!(a.err, 1);

        b.record_fixes(11);
        b.record_fixes(19);
        b.record_err();
        b.record_err();
        assert_eq!(b.frames, 4);
        assert_eq!(b.fixed, 30);
        assert_eq!(b.err, 2);

        a.merge(&mut b);
        assert_eq!(a.frames, 6);
        assert_eq!(a.fixed, 43);
        assert_eq!(a.err, 3);
        assert_eq!(b, CodeStats::default());

        a.clear();
        assert_eq!(a.frames, 0);
        assert_eq!(a.fixed, 0);
        assert_eq!(a.err, 0);
    }
}
