#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Screen coordinates are CSS pixels with the origin at the top-left corner
//! and `y` growing downward. Angles are radians; `-π/2` points straight up.

use std::f32::consts::FRAC_PI_2;

/// A point (or 2D offset) in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Parked position used before any pointer input has arrived.
    pub const OFFSCREEN: Self = Self::new(-100.0, -100.0);

    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center` along `angle`.
    #[inline]
    pub fn polar(center: Point, radius: f32, angle: f32) -> Self {
        Self::new(
            center.x + angle.cos() * radius,
            center.y + angle.sin() * radius,
        )
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation toward `other` by `t` (unclamped).
    #[inline]
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Offset by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Angle of axis `index` when a circle is split into `count` equal sectors,
/// starting at the top and proceeding clockwise.
///
/// Returns `-π/2` when `count` is zero instead of dividing by zero.
#[inline]
pub fn sector_angle(index: usize, count: usize) -> f32 {
    if count == 0 {
        return -FRAC_PI_2;
    }
    std::f32::consts::TAU * index as f32 / count as f32 - FRAC_PI_2
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero, negative or NaN.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// The visible browser viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Device pixel ratio reported by the host.
    pub pixel_ratio: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Width over height, or `1.0` for a degenerate viewport.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 && self.width > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pixel ratio capped at `max` (and at least 1).
    pub fn clamped_pixel_ratio(&self, max: f32) -> f32 {
        if self.pixel_ratio.is_finite() {
            self.pixel_ratio.clamp(1.0, max.max(1.0))
        } else {
            1.0
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(0.0, 0.0, self.width, self.height)
    }

    /// True if the viewport has no drawable area.
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

/// An axis-aligned rectangle, e.g. an element's bounding client rect.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Half-open containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }

    /// Grow (positive) or shrink (negative) every edge by `margin`.
    pub fn inflate(&self, margin: f32) -> Bounds {
        Bounds::new(
            self.left - margin,
            self.top - margin,
            (self.width + 2.0 * margin).max(0.0),
            (self.height + 2.0 * margin).max(0.0),
        )
    }

    /// Overlap area with `other` (zero when disjoint).
    pub fn overlap_area(&self, other: &Bounds) -> f32 {
        let w = (self.right().min(other.right()) - self.left.max(other.left)).max(0.0);
        let h = (self.bottom().min(other.bottom()) - self.top.max(other.top)).max(0.0);
        w * h
    }

    /// Map `p` into `[-1, 1]` on both axes relative to this rectangle's
    /// center; points outside are clamped. Degenerate bounds map to zero.
    pub fn normalized(&self, p: Point) -> (f32, f32) {
        let nx = if self.width > 0.0 {
            ((p.x - self.left) / self.width) * 2.0 - 1.0
        } else {
            0.0
        };
        let ny = if self.height > 0.0 {
            ((p.y - self.top) / self.height) * 2.0 - 1.0
        } else {
            0.0
        };
        (nx.clamp(-1.0, 1.0), ny.clamp(-1.0, 1.0))
    }
}

/// A 3D vector, used for ornament geometry and Euler rotations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn add(self, o: Vec3) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }

    #[inline]
    pub fn sub(self, o: Vec3) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }

    #[inline]
    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[inline]
    pub fn dot(self, o: Vec3) -> f32 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    #[inline]
    pub fn cross(self, o: Vec3) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    /// Unit vector in the same direction; zero stays zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 { self.scale(1.0 / len) } else { self }
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Rotate about the X axis by `angle` radians.
    pub fn rotate_x(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x, self.y * c - self.z * s, self.y * s + self.z * c)
    }

    /// Rotate about the Y axis by `angle` radians.
    pub fn rotate_y(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }

    /// Apply an X-then-Y Euler rotation.
    pub fn rotate_xy(self, rx: f32, ry: f32) -> Self {
        self.rotate_x(rx).rotate_y(ry)
    }
}
