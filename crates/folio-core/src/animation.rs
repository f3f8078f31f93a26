#![forbid(unsafe_code)]

//! Time-based animation primitives.
//!
//! Tweens produce normalized `f32` values (0.0–1.0) from accumulated
//! [`Duration`]s; the host decides how often to call [`Animation::tick`].
//! Nothing here reads a clock, so every animation is reproducible from the
//! sequence of deltas it was fed.
//!
//! - [`Fade`]: eased 0→1 tween over a fixed duration.
//! - [`Spin`]: endless constant-speed rotation (scanner sweeps, badges).
//! - [`Delayed`]: holds an inner animation at its start until a delay passes.
//! - [`counter::KineticCounter`]: spring-driven numeric display with live
//!   retargeting.

pub mod counter;

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// The scroll-reveal curve, `cubic-bezier(0.17, 0.55, 0.55, 1)`.
#[inline]
pub fn reveal(t: f32) -> f32 {
    CubicBezier::REVEAL.ease(t)
}

/// A CSS-style cubic Bézier timing curve anchored at (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    /// Curve used by scroll-reveal entrances.
    pub const REVEAL: Self = Self::new(0.17, 0.55, 0.55, 1.0);

    /// Control-point x values are clamped to [0, 1] so the curve stays a
    /// function of time.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let x1 = if x1 < 0.0 { 0.0 } else if x1 > 1.0 { 1.0 } else { x1 };
        let x2 = if x2 < 0.0 { 0.0 } else if x2 > 1.0 { 1.0 } else { x2 };
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    fn slope(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Solve for the curve parameter whose x equals `x`.
    fn solve_t(&self, x: f32) -> f32 {
        // Newton first; it converges in a few steps for typical curves.
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < 1e-6 {
                return t;
            }
            let d = Self::slope(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
        }
        // Bisection fallback for flat regions.
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = x;
        for _ in 0..32 {
            let v = Self::sample(self.x1, self.x2, t);
            if (v - x).abs() < 1e-6 {
                break;
            }
            if v < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Evaluate the curve at time `x` in [0, 1].
    pub fn ease(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);

    /// Time elapsed past completion. [`Delayed`] forwards the overshoot of
    /// its delay into the inner animation.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Eased progression from 0.0 to 1.0 over a duration.
///
/// Elapsed time is accumulated as [`Duration`] so thousands of small ticks
/// do not drift.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress before easing.
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Interpolate between `from` and `to` at the current eased value.
    pub fn interpolate(&self, from: f32, to: f32) -> f32 {
        from + (to - from) * self.value()
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress()).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

// ---------------------------------------------------------------------------
// Spin
// ---------------------------------------------------------------------------

/// Endless constant-speed rotation. Never completes.
///
/// `value()` is the fraction of the current revolution.
#[derive(Debug, Clone, Copy)]
pub struct Spin {
    period: Duration,
    elapsed: Duration,
}

impl Spin {
    /// One revolution every `period`.
    pub fn new(period: Duration) -> Self {
        Self {
            period: if period.is_zero() {
                Duration::from_millis(1)
            } else {
                period
            },
            elapsed: Duration::ZERO,
        }
    }

    /// Current angle in degrees, in [0, 360).
    pub fn degrees(&self) -> f32 {
        self.value() * 360.0
    }

    /// Current angle in radians, in [0, 2π).
    pub fn radians(&self) -> f32 {
        self.value() * std::f32::consts::TAU
    }
}

impl Animation for Spin {
    fn tick(&mut self, dt: Duration) {
        let period = self.period.as_nanos();
        let total = self.elapsed.as_nanos() + dt.as_nanos();
        // Keep elapsed inside one period to avoid precision loss over long runs.
        self.elapsed = Duration::from_nanos((total % period) as u64);
    }

    fn is_complete(&self) -> bool {
        false
    }

    fn value(&self) -> f32 {
        (self.elapsed.as_secs_f64() / self.period.as_secs_f64()) as f32
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Delayed
// ---------------------------------------------------------------------------

/// Hold `A` at its initial value until `delay` has elapsed.
#[derive(Debug, Clone, Copy)]
pub struct Delayed<A> {
    delay: Duration,
    waited: Duration,
    started: bool,
    inner: A,
}

impl<A: Animation> Delayed<A> {
    pub fn new(delay: Duration, inner: A) -> Self {
        Self {
            delay,
            waited: Duration::ZERO,
            started: delay.is_zero(),
            inner,
        }
    }

    /// Whether the delay has passed.
    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Animation> Animation for Delayed<A> {
    fn tick(&mut self, dt: Duration) {
        if self.started {
            self.inner.tick(dt);
            return;
        }
        self.waited = self.waited.saturating_add(dt);
        if self.waited >= self.delay {
            self.started = true;
            let over = self.waited - self.delay;
            if !over.is_zero() {
                self.inner.tick(over);
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.started && self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        self.inner.value()
    }

    fn reset(&mut self) {
        self.waited = Duration::ZERO;
        self.started = self.delay.is_zero();
        self.inner.reset();
    }

    fn overshoot(&self) -> Duration {
        self.inner.overshoot()
    }
}

/// Staggered entry: element `index` starts `base + step * index` after mount.
pub fn stagger(base: Duration, step: Duration, index: usize) -> Duration {
    base.saturating_add(step.saturating_mul(index.min(u32::MAX as usize) as u32))
}
