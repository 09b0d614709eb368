//! Seeded input generation.
//!
//! Every implementation of a benchmark must see the same input for a given
//! seed, so the generator is a plain linear congruential generator with the
//! classic `1103515245 / 12345` constants rather than a library RNG whose
//! stream may change between releases.

pub const LCG_MULTIPLIER: u64 = 1_103_515_245;
pub const LCG_INCREMENT: u64 = 12_345;

/// Largest value returned by [`Lcg::next_u31`].
pub const U31_MAX: u32 = 0x7fff_ffff;

#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance and return the full 64-bit state.
    #[inline]
    pub fn next_raw(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// 31 bits taken above the weak low bits of the state.
    #[inline]
    pub fn next_u31(&mut self) -> u32 {
        ((self.next_raw() >> 16) as u32) & U31_MAX
    }

    /// Uniform-ish value in `0..bound`. `bound` must be non-zero.
    #[inline]
    pub fn below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0, "below() needs a non-empty range");
        let hi = u64::from(self.next_u31());
        let lo = u64::from(self.next_u31());
        ((hi << 31) | lo) % bound
    }

    /// Value in `[0.0, 1.0]`.
    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u31()) / f64::from(U31_MAX)
    }
}
