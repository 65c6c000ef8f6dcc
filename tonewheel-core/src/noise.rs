//! White noise source.
//!
//! A 32-bit xorshift generator reinterpreted as Q31, so one call yields one
//! sample in [-1, 1). No allocation, no global state; each oscillator owns its
//! generator and the sequence is reproducible from the seed.

use crate::dsp::q31_to_f32;

/// Seed used when none is given (any non-zero value works).
pub const DEFAULT_SEED: u32 = 0x2463_5B59;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WhiteNoise {
    state: u32,
}

impl WhiteNoise {
    /// Zero would lock xorshift at zero forever; it is replaced by [`DEFAULT_SEED`].
    #[inline]
    pub fn new(seed: u32) -> Self {
        Self { state: if seed == 0 { DEFAULT_SEED } else { seed } }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next sample in [-1, 1).
    #[inline]
    pub fn next(&mut self) -> f32 {
        q31_to_f32(self.next_u32() as i32)
    }
}

impl Default for WhiteNoise {
    fn default() -> Self { Self::new(DEFAULT_SEED) }
}
