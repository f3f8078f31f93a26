#![forbid(unsafe_code)]

//! Pointer-driven card tilt.
//!
//! The pointer position inside a card maps to a percentage in `[-100, 100]`
//! per axis. Those percentages drive a small 3D rotation and a highlight
//! that drifts against the pointer.

use folio_core::geometry::{Bounds, Point};

/// Rotation at full deflection, in degrees.
pub const MAX_TILT_DEG: f32 = 5.0;

/// Highlight offset divisor: the glare moves `-pct / 5` px.
const HIGHLIGHT_DIVISOR: f32 = 5.0;

/// Card transform derived from the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltState {
    /// Pointer x as a percentage of the half-width, in [-100, 100].
    pub pct_x: f32,
    pub pct_y: f32,
    /// Degrees about the horizontal axis: +5 at the top edge, −5 at the bottom.
    pub rotate_x: f32,
    /// Degrees about the vertical axis: −5 at the left edge, +5 at the right.
    pub rotate_y: f32,
    /// Glare translation, opposite to the pointer.
    pub highlight: Point,
}

impl TiltState {
    /// Build from pointer percentages (clamped to [-100, 100]).
    pub fn from_pct(pct_x: f32, pct_y: f32) -> Self {
        let pct_x = clamp_pct(pct_x);
        let pct_y = clamp_pct(pct_y);
        let per_pct = MAX_TILT_DEG / 100.0;
        Self {
            pct_x,
            pct_y,
            rotate_x: unsigned_zero(-pct_y * per_pct),
            rotate_y: unsigned_zero(pct_x * per_pct),
            highlight: Point::new(
                unsigned_zero(-pct_x / HIGHLIGHT_DIVISOR),
                unsigned_zero(-pct_y / HIGHLIGHT_DIVISOR),
            ),
        }
    }

    /// Pointer left the card: back to flat.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// CSS transform for the card.
    pub fn to_css(&self) -> String {
        format!("rotateX({}deg) rotateY({}deg)", self.rotate_x, self.rotate_y)
    }
}

// Keeps `-0` out of the CSS output.
fn unsigned_zero(v: f32) -> f32 {
    if v == 0.0 { 0.0 } else { v }
}

fn clamp_pct(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(-100.0, 100.0) }
}

/// Tilt for `pointer` over a card occupying `bounds`.
pub fn tilt_from_pointer(pointer: Point, bounds: Bounds) -> TiltState {
    let (nx, ny) = bounds.normalized(pointer);
    TiltState::from_pct(nx * 100.0, ny * 100.0)
}
