#![forbid(unsafe_code)]

//! Custom cursor tracking: instant dot, lagged trailing ring, hover state.
//!
//! The tracker consumes [`PointerEvent`]s synchronously and is advanced once
//! per rendered frame through [`PointerTracker::on_frame`].
//!
//! # Invariants
//!
//! 1. Before the first coordinate-carrying event the tracker is invisible and
//!    [`PointerTracker::indicator`] returns `None`; nothing is drawn at the
//!    off-screen sentinel.
//! 2. [`PointerTracker::instant`] equals the most recent event coordinate
//!    exactly.
//! 3. The trail only moves on frames and never passes the instant position.
//! 4. The interactive-hover flag changes only on `Over` events.
//!
//! # Failure Modes
//!
//! - Events without coordinates (touch end, empty touch list, NaN) are
//!   dropped without touching position state.
//! - Keyboard-only sessions never produce coordinates; the tracker simply
//!   stays invisible.

use std::time::Duration;

use crate::event::PointerEvent;
use crate::geometry::Point;

/// Reference frame duration the ease factor is expressed against (60 Hz).
const REFERENCE_FRAME_SECS: f32 = 1.0 / 60.0;

/// Trail is snapped onto the target once closer than this (px).
const SNAP_DISTANCE: f32 = 0.01;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the cursor indicator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointerTrackerConfig {
    /// Fraction of the remaining distance the trail covers per 60 Hz frame.
    /// Default: 0.2
    pub trail_ease: f32,

    /// Upper bound on how long the trail may lag behind a stationary pointer.
    /// Once this much time has passed since the last move, the trail snaps.
    /// Default: 300ms
    pub trail_duration: Duration,

    /// Dot diameter in px. Default: 12
    pub dot_size: f32,

    /// Ring diameter in px. Default: 48
    pub ring_size: f32,

    /// Ring scale while hovering an interactive element. Default: 1.5
    pub hover_scale: f32,

    /// Ring rotation while hovering, in degrees. Default: 45
    pub hover_rotation_deg: f32,

    /// Dot scale while pressed or hovering. Default: 0.5
    pub press_scale: f32,
}

impl Default for PointerTrackerConfig {
    fn default() -> Self {
        Self {
            trail_ease: 0.2,
            trail_duration: Duration::from_millis(300),
            dot_size: 12.0,
            ring_size: 48.0,
            hover_scale: 1.5,
            hover_rotation_deg: 45.0,
            press_scale: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Raw pointer state as last reported by input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub is_over_interactive: bool,
    pub is_pressed: bool,
}

impl PointerSample {
    /// The state before any input: parked off-screen, idle.
    pub const OFFSCREEN: Self = Self {
        x: Point::OFFSCREEN.x,
        y: Point::OFFSCREEN.y,
        is_over_interactive: false,
        is_pressed: false,
    };

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A 2D transform for one indicator element: translate, uniform scale, rotate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub translate: Point,
    pub scale: f32,
    pub rotate_deg: f32,
}

impl Transform2D {
    /// CSS `transform` value.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({}) rotate({}deg)",
            self.translate.x, self.translate.y, self.scale, self.rotate_deg
        )
    }
}

/// Shape of the trailing ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingShape {
    Circle,
    /// Rounded square shown over interactive elements.
    Square,
}

/// Everything the renderer needs to draw the custom cursor this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorState {
    /// Small dot that follows the pointer instantly.
    pub dot: Transform2D,
    /// Larger ring that trails behind.
    pub ring: Transform2D,
    pub ring_shape: RingShape,
    /// Ring border width in px (thicker while pressed).
    pub ring_border: f32,
    /// Ring border alpha.
    pub ring_alpha: f32,
    /// Ring fill alpha (only non-zero while pressed).
    pub ring_fill_alpha: f32,
    /// Full-width horizontal crosshair line offset (y) and vertical (x).
    pub crosshair: Point,
    pub crosshair_opacity: f32,
}

// ---------------------------------------------------------------------------
// PointerTracker
// ---------------------------------------------------------------------------

/// Stateful cursor tracker.
///
/// Feed input with [`handle`](PointerTracker::handle), advance the trail with
/// [`on_frame`](PointerTracker::on_frame), and read
/// [`indicator`](PointerTracker::indicator) when drawing.
#[derive(Debug)]
pub struct PointerTracker {
    config: PointerTrackerConfig,
    sample: PointerSample,
    trail: Point,
    visible: bool,
    since_move: Duration,
    /// Diagnostic: events dropped for lacking a coordinate.
    dropped: u64,
    /// Diagnostic: frames advanced.
    frames: u64,
}

impl PointerTracker {
    #[must_use]
    pub fn new(config: PointerTrackerConfig) -> Self {
        Self {
            config,
            sample: PointerSample::OFFSCREEN,
            trail: Point::OFFSCREEN,
            visible: false,
            since_move: Duration::ZERO,
            dropped: 0,
            frames: 0,
        }
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Move { .. } | PointerEvent::TouchMove { .. } => {
                let Some(p) = event.position() else {
                    self.dropped += 1;
                    crate::trace!(dropped = self.dropped, "pointer event without coordinate");
                    return;
                };
                self.sample.x = p.x;
                self.sample.y = p.y;
                self.since_move = Duration::ZERO;
                if !self.visible {
                    // First sighting: start the trail under the pointer
                    // instead of sweeping in from the sentinel.
                    self.trail = p;
                    self.visible = true;
                }
            }
            PointerEvent::Down | PointerEvent::TouchStart => self.sample.is_pressed = true,
            PointerEvent::Up | PointerEvent::TouchEnd => self.sample.is_pressed = false,
            PointerEvent::Over { target } => {
                self.sample.is_over_interactive = target.is_interactive();
            }
        }
    }

    /// Advance the trailing ring by one rendered frame of length `dt`.
    pub fn on_frame(&mut self, dt: Duration) {
        self.frames += 1;
        if !self.visible {
            return;
        }
        self.since_move = self.since_move.saturating_add(dt);
        let target = self.sample.position();

        if self.since_move >= self.config.trail_duration {
            self.trail = target;
            return;
        }

        let ease = self.config.trail_ease.clamp(0.0, 1.0);
        let frames = dt.as_secs_f32() / REFERENCE_FRAME_SECS;
        let t = 1.0 - (1.0 - ease).powf(frames);
        self.trail = self.trail.lerp(target, t.clamp(0.0, 1.0));
        if self.trail.distance(target) < SNAP_DISTANCE {
            self.trail = target;
        }
    }

    /// Latest raw sample.
    #[inline]
    #[must_use]
    pub fn sample(&self) -> PointerSample {
        self.sample
    }

    /// Instant position (exactly the last event coordinate).
    #[inline]
    #[must_use]
    pub fn instant(&self) -> Point {
        self.sample.position()
    }

    /// Lagged trail position.
    #[inline]
    #[must_use]
    pub fn trail(&self) -> Point {
        self.trail
    }

    /// Whether a coordinate has ever been received.
    #[inline]
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[inline]
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.sample.is_over_interactive
    }

    /// Compute indicator transforms, or `None` while invisible.
    #[must_use]
    pub fn indicator(&self) -> Option<IndicatorState> {
        if !self.visible {
            return None;
        }
        let cfg = &self.config;
        let hover = self.sample.is_over_interactive;
        let pressed = self.sample.is_pressed;
        let half_dot = cfg.dot_size / 2.0;
        let half_ring = cfg.ring_size / 2.0;
        let p = self.instant();

        let dot_scale = if hover || pressed { cfg.press_scale } else { 1.0 };
        let dot = Transform2D {
            translate: p.offset(-half_dot, -half_dot),
            scale: dot_scale,
            rotate_deg: 0.0,
        };
        let ring = Transform2D {
            translate: self.trail.offset(-half_ring, -half_ring),
            scale: if hover { cfg.hover_scale } else { 1.0 },
            rotate_deg: if hover { cfg.hover_rotation_deg } else { 0.0 },
        };

        Some(IndicatorState {
            dot,
            ring,
            ring_shape: if hover { RingShape::Square } else { RingShape::Circle },
            ring_border: if pressed { 2.0 } else { 1.0 },
            ring_alpha: if hover { 0.9 } else { 0.3 },
            ring_fill_alpha: if pressed { 0.1 } else { 0.0 },
            crosshair: p,
            crosshair_opacity: if hover { 0.1 } else { 0.05 },
        })
    }

    /// Return to the pre-input state (used on unmount).
    pub fn reset(&mut self) {
        self.sample = PointerSample::OFFSCREEN;
        self.trail = Point::OFFSCREEN;
        self.visible = false;
        self.since_move = Duration::ZERO;
    }

    /// Diagnostic: number of coordinate-free move events ignored.
    #[inline]
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Diagnostic: number of frames advanced.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PointerTrackerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PointerTrackerConfig) {
        self.config = config;
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(PointerTrackerConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
