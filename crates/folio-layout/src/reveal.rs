#![forbid(unsafe_code)]

//! Scroll-triggered entrances and the page scroll indicator.
//!
//! [`RevealTracker`] decides when an element has entered the viewport and
//! drives its fade-and-rise entrance. Visibility is tested against the
//! viewport inflated by `margin`; the default `-50` shrinks it, so an element
//! must be 50 px inside before it counts as visible.
//!
//! # Invariants
//!
//! 1. With `once`, an element that has been revealed never hides again.
//! 2. The entrance only advances while the element is revealed.

use std::time::Duration;

use folio_core::animation::{Animation, Delayed, Fade, reveal};
use folio_core::geometry::{Bounds, Viewport};

/// Visibility policy for one element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RevealConfig {
    /// Root margin in px; negative shrinks the viewport. Default: -50
    pub margin: f32,
    /// Latch after the first reveal. Default: true
    pub once: bool,
    /// Fraction of the element that must be visible; 0 means any overlap.
    /// Default: 0
    pub amount: f32,
    /// Entrance length. Default: 800ms
    pub duration: Duration,
    /// Wait after entering view before the entrance starts. Default: 0
    pub delay: Duration,
    /// Starting downward offset of the entrance, in px. Default: 50
    pub rise: f32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            margin: -50.0,
            once: true,
            amount: 0.0,
            duration: Duration::from_millis(800),
            delay: Duration::ZERO,
            rise: 50.0,
        }
    }
}

/// Whether `element` counts as in view under `config`.
pub fn is_in_view(element: Bounds, viewport: Viewport, config: &RevealConfig) -> bool {
    let root = viewport.bounds().inflate(config.margin);
    let visible = element.overlap_area(&root);
    let area = element.width * element.height;
    if config.amount <= 0.0 || area <= 0.0 {
        visible > 0.0
    } else {
        visible / area >= config.amount.min(1.0)
    }
}

/// Per-element reveal state.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    config: RevealConfig,
    revealed: bool,
    entrance: Delayed<Fade>,
}

impl RevealTracker {
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        let entrance = Delayed::new(config.delay, Fade::new(config.duration).easing(reveal));
        Self {
            config,
            revealed: false,
            entrance,
        }
    }

    /// Re-test visibility after a scroll or resize. Returns `true` on the
    /// transition into view.
    pub fn observe(&mut self, element: Bounds, viewport: Viewport) -> bool {
        if self.revealed && self.config.once {
            return false;
        }
        let in_view = is_in_view(element, viewport, &self.config);
        match (self.revealed, in_view) {
            (false, true) => {
                self.revealed = true;
                true
            }
            (true, false) => {
                self.revealed = false;
                self.entrance.reset();
                false
            }
            _ => false,
        }
    }

    /// Advance the entrance animation.
    pub fn tick(&mut self, dt: Duration) {
        if self.revealed {
            self.entrance.tick(dt);
        }
    }

    #[inline]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Entrance finished (or not started yet, if hidden).
    pub fn is_settled(&self) -> bool {
        !self.revealed || self.entrance.is_complete()
    }

    /// Eased entrance progress in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.revealed { self.entrance.value() } else { 0.0 }
    }

    pub fn opacity(&self) -> f32 {
        self.progress()
    }

    /// Vertical offset in px: `rise` when hidden, 0 once settled.
    pub fn offset_y(&self) -> f32 {
        self.config.rise * (1.0 - self.progress())
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }
}

impl Default for RevealTracker {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

/// Page scroll position as a percentage in `[0, 100]`.
///
/// A document no taller than the viewport cannot scroll and reports 0.
pub fn scroll_progress(scroll_y: f32, document_height: f32, viewport_height: f32) -> f32 {
    let scrollable = document_height - viewport_height;
    if !(scrollable > 0.0) || scroll_y.is_nan() {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}
