#![forbid(unsafe_code)]

//! Kinetic counter: a numeric display that springs toward its target.
//!
//! [`KineticCounter`] is a two-state machine:
//!
//! ```text
//!   Idle ──retarget──▶ Converging{from, to, elapsed} ──rest──▶ Idle
//!                        │    ▲
//!                        └────┘ retarget (from = displayed)
//! ```
//!
//! # Invariants
//!
//! 1. `retarget` never changes `displayed`; only `tick` moves it.
//! 2. While converging, `displayed` stays between the value it had at the last
//!    retarget and the current target (no overshoot, no reversal).
//! 3. Any finite target is reached exactly in finite time: the spring rests
//!    once inside the rest band, and `settle_timeout` bounds pathological
//!    configurations.
//! 4. After [`teardown`](KineticCounter::teardown) every call is a no-op.
//!
//! # Failure Modes
//!
//! - Non-finite targets are ignored.
//! - Undrained emissions are capped at [`MAX_PENDING_CHANGES`]; the oldest
//!   are dropped first.
//! - Hitting `settle_timeout` far from the target snaps there and logs a
//!   warning.
//! - Zero or negative mass/stiffness are clamped to a small positive value.

use std::collections::VecDeque;
use std::collections::vec_deque;
use std::time::Duration;

/// Integration substep. Small enough to keep semi-implicit Euler stable for
/// stiffness values far above the defaults.
const SUBSTEP_SECS: f64 = 0.001;

/// Upper bound on substeps simulated per tick; a longer `dt` settles at once.
const MAX_SUBSTEPS: u32 = 10_000;

const MIN_PARAM: f64 = 1e-6;

/// Emitted display values kept for [`KineticCounter::drain_changes`].
pub const MAX_PENDING_CHANGES: usize = 256;

/// Spring parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringConfig {
    /// Spring constant. Default: 50
    pub stiffness: f64,
    /// Damping coefficient. Default: 20 (overdamped at mass 1)
    pub damping: f64,
    /// Default: 1
    pub mass: f64,
    /// Distance from target under which the spring may rest. Default: 0.5
    pub rest_delta: f64,
    /// Speed under which the spring may rest. Default: 0.5 units/s
    pub rest_speed: f64,
    /// Convergence deadline after the last retarget. Default: 10s
    pub settle_timeout: Duration,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 50.0,
            damping: 20.0,
            mass: 1.0,
            rest_delta: 0.5,
            rest_speed: 0.5,
            settle_timeout: Duration::from_secs(10),
        }
    }
}

/// Where the counter is in its animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CounterPhase {
    /// Resting on the target.
    Idle,
    /// Moving toward `to`, having started from `from` `elapsed` ago.
    Converging { from: f64, to: f64, elapsed: Duration },
}

/// Spring-animated counter with live retargeting.
#[derive(Debug, Clone)]
pub struct KineticCounter {
    config: SpringConfig,
    displayed: f64,
    velocity: f64,
    target: f64,
    phase: CounterPhase,
    last_emitted: i64,
    changes: VecDeque<i64>,
    /// Diagnostic: emissions dropped because nobody drained them.
    dropped_changes: u64,
    torn_down: bool,
}

impl KineticCounter {
    /// A counter resting at `start`.
    #[must_use]
    pub fn new(start: f64, config: SpringConfig) -> Self {
        let start = if start.is_finite() { start } else { 0.0 };
        Self {
            config,
            displayed: start,
            velocity: 0.0,
            target: start,
            phase: CounterPhase::Idle,
            last_emitted: start.round() as i64,
            changes: VecDeque::new(),
            dropped_changes: 0,
            torn_down: false,
        }
    }

    /// Start (or redirect) convergence toward `target`.
    ///
    /// The displayed value is kept as the new starting point, so redirecting
    /// mid-flight never jumps. Velocity pointing away from the new target is
    /// dropped, which keeps the motion monotonic.
    pub fn retarget(&mut self, target: f64) {
        if self.torn_down {
            crate::debug!(requested = target, "retarget after teardown ignored");
            return;
        }
        if !target.is_finite() {
            return;
        }
        self.target = target;
        if (target - self.displayed) * self.velocity < 0.0 {
            self.velocity = 0.0;
        }
        if target == self.displayed && self.velocity == 0.0 {
            self.phase = CounterPhase::Idle;
            return;
        }
        self.phase = CounterPhase::Converging {
            from: self.displayed,
            to: target,
            elapsed: Duration::ZERO,
        };
    }

    /// Increment the target by `delta` relative to the current target.
    pub fn bump(&mut self, delta: f64) {
        self.retarget(self.target + delta);
    }

    /// Advance by `dt`. Returns the rounded display value when it changed.
    pub fn tick(&mut self, dt: Duration) -> Option<i64> {
        if self.torn_down {
            return None;
        }
        let CounterPhase::Converging { from, to, elapsed } = self.phase else {
            return None;
        };
        let elapsed = elapsed.saturating_add(dt);

        if elapsed >= self.config.settle_timeout {
            let remaining = to - self.displayed;
            if remaining.abs() >= 1.0 {
                crate::warn!(
                    remaining,
                    timeout_ms = self.config.settle_timeout.as_millis() as u64,
                    "counter settle timeout; snapping to target"
                );
            }
            self.settle(to);
        } else {
            let steps = (dt.as_secs_f64() / SUBSTEP_SECS).ceil() as u64;
            if steps > u64::from(MAX_SUBSTEPS) {
                self.settle(to);
            } else {
                let h = if steps == 0 { 0.0 } else { dt.as_secs_f64() / steps as f64 };
                for _ in 0..steps {
                    if self.step(to, h) {
                        break;
                    }
                }
                if let CounterPhase::Converging { .. } = self.phase {
                    self.phase = CounterPhase::Converging { from, to, elapsed };
                }
            }
        }

        let rounded = self.displayed.round() as i64;
        if rounded != self.last_emitted {
            self.emit(rounded);
            Some(rounded)
        } else {
            None
        }
    }

    fn emit(&mut self, rounded: i64) {
        self.last_emitted = rounded;
        if self.changes.len() >= MAX_PENDING_CHANGES {
            self.changes.pop_front();
            self.dropped_changes += 1;
        }
        self.changes.push_back(rounded);
    }

    /// One semi-implicit Euler step. Returns `true` once at rest.
    fn step(&mut self, to: f64, h: f64) -> bool {
        let k = self.config.stiffness.max(MIN_PARAM);
        let c = self.config.damping.max(0.0);
        let m = self.config.mass.max(MIN_PARAM);

        let before = to - self.displayed;
        let accel = (k * before - c * self.velocity) / m;
        self.velocity += accel * h;
        self.displayed += self.velocity * h;
        let after = to - self.displayed;

        // Crossing the target would be overshoot: land on it instead.
        let crossed = before != 0.0 && before.signum() != after.signum();
        let resting =
            after.abs() < self.config.rest_delta && self.velocity.abs() < self.config.rest_speed;
        if crossed || resting || after == 0.0 {
            self.settle(to);
            return true;
        }
        false
    }

    fn settle(&mut self, to: f64) {
        self.displayed = to;
        self.velocity = 0.0;
        self.phase = CounterPhase::Idle;
    }

    /// Jump to `value` without animating (e.g. restoring a mounted view).
    pub fn set_immediate(&mut self, value: f64) {
        if self.torn_down || !value.is_finite() {
            return;
        }
        self.target = value;
        self.settle(value);
        let rounded = value.round() as i64;
        if rounded != self.last_emitted {
            self.emit(rounded);
        }
    }

    /// Stop for good; later calls do nothing.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.phase = CounterPhase::Idle;
        self.changes.clear();
    }

    /// Take the display values emitted since the last drain.
    pub fn drain_changes(&mut self) -> vec_deque::Drain<'_, i64> {
        self.changes.drain(..)
    }

    /// Emitted values waiting to be drained.
    #[inline]
    pub fn pending_changes(&self) -> usize {
        self.changes.len()
    }

    /// Diagnostic: emissions discarded by the pending cap.
    #[inline]
    pub fn dropped_changes(&self) -> u64 {
        self.dropped_changes
    }

    #[inline]
    #[must_use]
    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    /// Rounded value for rendering.
    #[inline]
    #[must_use]
    pub fn display_value(&self) -> i64 {
        self.displayed.round() as i64
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> CounterPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, CounterPhase::Idle)
    }

    #[inline]
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SpringConfig {
        &self.config
    }
}

impl Default for KineticCounter {
    fn default() -> Self {
        Self::new(0.0, SpringConfig::default())
    }
}
