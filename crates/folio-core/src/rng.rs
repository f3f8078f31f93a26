#![forbid(unsafe_code)]

//! Small deterministic PRNG for decorative randomness.
//!
//! Particle clouds, equalizer keyframes and the live counter only need cheap,
//! well-spread values. The host seeds the generator (e.g. from
//! `Math.random()`), so the decoration varies between page loads while tests
//! can pin a seed.

/// xorshift32 generator. The state is never zero.
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Seed the generator. A zero seed is remapped, since xorshift would be
    /// stuck at zero forever.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        // Spread nearby seeds apart before the first draw.
        let mixed = seed.wrapping_mul(2_654_435_761) | 1;
        Self { state: mixed }
    }

    /// Next raw 32-bit value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        // 24 high bits fit exactly in an f32 mantissa.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform value in `[lo, hi)`.
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p.clamp(0.0, 1.0)
    }
}
