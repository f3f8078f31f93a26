#![forbid(unsafe_code)]

//! "Hours logged" counter: a kinetic counter that keeps ticking while the
//! page is open.
//!
//! On entering view the counter springs from its start value to the
//! configured total. Every `interval` a small visual ticker advances, and
//! with probability `increment_probability` the total grows by `increment`.

use std::fmt::Write as _;
use std::time::Duration;

use folio_core::animation::counter::{KineticCounter, SpringConfig};
use folio_core::rng::Xorshift32;

/// Live counter policy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LiveCounterConfig {
    /// Default: 0
    pub start: f64,
    /// Value reached after entering view. Default: 14238
    pub target: f64,
    /// Default: 2s
    pub interval: Duration,
    /// Chance per interval that the total grows. Default: 0.3
    pub increment_probability: f32,
    /// Default: 1
    pub increment: f64,
    /// The ticker wraps at this value. Default: 100
    pub ticker_modulus: u32,
    pub spring: SpringConfig,
}

impl Default for LiveCounterConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            target: 14_238.0,
            interval: Duration::from_secs(2),
            increment_probability: 0.3,
            increment: 1.0,
            ticker_modulus: 100,
            spring: SpringConfig::default(),
        }
    }
}

/// Counter plus its live-increment policy.
#[derive(Debug, Clone)]
pub struct LiveCounter {
    config: LiveCounterConfig,
    counter: KineticCounter,
    rng: Xorshift32,
    ticker: u32,
    started: bool,
    /// Diagnostic: live increments applied.
    increments: u64,
}

impl LiveCounter {
    /// `seed` drives the increment coin flips; hosts typically pass a
    /// random value so each visit differs.
    #[must_use]
    pub fn new(config: LiveCounterConfig, seed: u32) -> Self {
        let counter = KineticCounter::new(config.start, config.spring.clone());
        Self {
            config,
            counter,
            rng: Xorshift32::new(seed),
            ticker: 0,
            started: false,
            increments: 0,
        }
    }

    /// Begin the run-up to the target. Only the first call has an effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.counter.retarget(self.config.target);
    }

    /// One interval elapsed. Returns `true` if the total was bumped.
    ///
    /// Before [`LiveCounter::start`] a bump only raises the eventual target;
    /// the spring stays at rest.
    pub fn on_interval(&mut self) -> bool {
        let modulus = self.config.ticker_modulus.max(1);
        self.ticker = (self.ticker + 1) % modulus;
        if !self.rng.chance(self.config.increment_probability) {
            return false;
        }
        if self.started {
            self.counter.bump(self.config.increment);
        } else {
            self.config.target += self.config.increment;
        }
        self.increments += 1;
        true
    }

    /// Advance the spring. Returns the new rounded value on change.
    pub fn tick(&mut self, dt: Duration) -> Option<i64> {
        self.counter.tick(dt)
    }

    /// Drain the counter's emitted values, returning the most recent.
    pub fn take_latest_change(&mut self) -> Option<i64> {
        self.counter.drain_changes().last()
    }

    pub fn teardown(&mut self) {
        self.counter.teardown();
    }

    /// Whether the spring still needs frames.
    pub fn is_animating(&self) -> bool {
        !self.counter.is_idle() && !self.counter.is_torn_down()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn value(&self) -> i64 {
        self.counter.display_value()
    }

    pub fn ticker(&self) -> u32 {
        self.ticker
    }

    /// Grouped display value, e.g. `"14,238"`.
    pub fn label(&self) -> String {
        format_grouped(self.value())
    }

    /// Two-digit ticker, e.g. `"07"`.
    pub fn ticker_label(&self) -> String {
        format!("{:02}", self.ticker)
    }

    pub fn increments(&self) -> u64 {
        self.increments
    }

    pub fn counter(&self) -> &KineticCounter {
        &self.counter
    }

    pub fn counter_mut(&mut self) -> &mut KineticCounter {
        &mut self.counter
    }
}

/// Format with `,` thousands separators.
pub fn format_grouped(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `HH:MM:SS` for a second-of-day (wraps at midnight).
pub fn clock_label(seconds_of_day: u64) -> String {
    let s = seconds_of_day % 86_400;
    let mut out = String::with_capacity(8);
    let _ = write!(out, "{:02}:{:02}:{:02}", s / 3600, (s / 60) % 60, s % 60);
    out
}
