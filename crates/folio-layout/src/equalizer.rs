#![forbid(unsafe_code)]

//! Decorative equalizer bars under the skill chart.
//!
//! Each bar loops linearly through three random heights. Bars start one
//! after another, `0.05 s` apart, and sit at 10% until their turn comes.

use std::time::Duration;

use folio_core::animation::stagger;
use folio_core::rng::Xorshift32;

/// Height of a bar before its loop starts, in percent.
pub const RESTING_HEIGHT: f32 = 10.0;

/// Border alpha keyframes shared by every bar.
const ALPHA_KEYS: [f32; 3] = [0.2, 0.5, 0.2];

/// Number of bars on the panel.
pub const DEFAULT_BARS: usize = 30;

/// One bar's loop parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Height keyframes in percent of the strip height.
    pub keyframes: [f32; 3],
    /// Length of one loop.
    pub cycle: Duration,
    /// Wait before the first loop.
    pub delay: Duration,
}

/// Height and fill alpha of a bar at some instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarFrame {
    pub height_pct: f32,
    pub alpha: f32,
}

impl Bar {
    /// Sample the bar `elapsed` after mount.
    pub fn frame(&self, elapsed: Duration) -> BarFrame {
        let Some(running) = elapsed.checked_sub(self.delay) else {
            return BarFrame {
                height_pct: RESTING_HEIGHT,
                alpha: ALPHA_KEYS[0],
            };
        };
        let cycle = self.cycle.as_secs_f32().max(f32::EPSILON);
        let phase = (running.as_secs_f32() % cycle) / cycle;
        BarFrame {
            height_pct: keyframe_lerp(&self.keyframes, phase),
            alpha: keyframe_lerp(&ALPHA_KEYS, phase),
        }
    }
}

/// Linear interpolation through evenly spaced keyframes at `phase` in [0, 1].
fn keyframe_lerp(keys: &[f32; 3], phase: f32) -> f32 {
    let scaled = phase.clamp(0.0, 1.0) * 2.0;
    let (a, b, t) = if scaled < 1.0 {
        (keys[0], keys[1], scaled)
    } else {
        (keys[1], keys[2], scaled - 1.0)
    };
    a + (b - a) * t
}

/// A row of bars generated from one seed.
#[derive(Debug, Clone)]
pub struct EqualizerBank {
    bars: Vec<Bar>,
}

impl EqualizerBank {
    #[must_use]
    pub fn new(count: usize, seed: u32) -> Self {
        let mut rng = Xorshift32::new(seed);
        let bars = (0..count)
            .map(|i| {
                let keyframes = [
                    rng.range(0.0, 100.0),
                    rng.range(0.0, 100.0),
                    rng.range(0.0, 100.0),
                ];
                let cycle = Duration::from_secs_f32(rng.range(0.5, 1.0));
                Bar {
                    keyframes,
                    cycle,
                    delay: stagger(Duration::ZERO, Duration::from_millis(50), i),
                }
            })
            .collect();
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Every bar's frame `elapsed` after mount.
    pub fn frames(&self, elapsed: Duration) -> Vec<BarFrame> {
        self.bars.iter().map(|b| b.frame(elapsed)).collect()
    }

    /// Just the heights.
    pub fn heights(&self, elapsed: Duration) -> Vec<f32> {
        self.bars.iter().map(|b| b.frame(elapsed).height_pct).collect()
    }
}

impl Default for EqualizerBank {
    fn default() -> Self {
        Self::new(DEFAULT_BARS, 1)
    }
}
