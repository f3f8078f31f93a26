#![forbid(unsafe_code)]

//! Half-circle arc gauge.
//!
//! The arc runs 180° from the left horizontal, clockwise over the top, to
//! the right horizontal. A progress fraction `f` maps to the angle `φ = π·f`
//! and to the point `(cx − r·cos φ, cy − r·sin φ)`; the indicator dot and the
//! end of the filled arc are both derived from that single angle, so they
//! cannot drift apart.
//!
//! Fractions outside `[0, 1]` are clamped and `NaN` is treated as 0.

use std::f32::consts::PI;

use folio_core::geometry::Point;

/// Fixed arc geometry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaugeGeometry {
    /// Arc center. Default: (100, 100), the bottom middle of a 200×100 box.
    pub center: Point,
    /// Default: 90
    pub radius: f32,
    /// Inner tick radius. Default: 80
    pub tick_inner: f32,
    /// Outer tick radius. Default: 95
    pub tick_outer: f32,
    /// Default: 20
    pub tick_count: usize,
}

impl Default for GaugeGeometry {
    fn default() -> Self {
        Self {
            center: Point::new(100.0, 100.0),
            radius: 90.0,
            tick_inner: 80.0,
            tick_outer: 95.0,
            tick_count: 20,
        }
    }
}

impl GaugeGeometry {
    /// Point on a circle of `radius` at arc angle `phi`.
    #[inline]
    pub fn point_at(&self, radius: f32, phi: f32) -> Point {
        let (sin, cos) = phi.sin_cos();
        Point::new(self.center.x - radius * cos, self.center.y - radius * sin)
    }

    /// Length of the full arc.
    #[inline]
    pub fn arc_length(&self) -> f32 {
        PI * self.radius
    }

    /// Angle of tick `index`. A single tick sits at the midpoint.
    pub fn tick_angle(&self, index: usize) -> f32 {
        match self.tick_count {
            0 | 1 => PI / 2.0,
            t => PI * index as f32 / (t - 1) as f32,
        }
    }
}

/// A tick mark from the inner to the outer tick radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub inner: Point,
    pub outer: Point,
}

/// Output of [`gauge_layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeLayout {
    /// Fraction after clamping.
    pub fraction: f32,
    /// Background arc, start to end.
    pub arc_path: String,
    /// Arc from the start to the indicator.
    pub filled_path: String,
    pub indicator: Point,
    pub ticks: Vec<Tick>,
    pub arc_length: f32,
    /// `stroke-dashoffset` that reveals exactly `fraction` of `arc_path`
    /// when `stroke-dasharray` is `arc_length`.
    pub dash_offset: f32,
}

/// Clamp a progress value into `[0, 1]`, mapping `NaN` to 0.
#[inline]
pub fn clamp_fraction(fraction: f32) -> f32 {
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

/// Lay out the gauge at `fraction`.
pub fn gauge_layout(fraction: f32, geometry: &GaugeGeometry) -> GaugeLayout {
    let fraction = clamp_fraction(fraction);
    let phi = PI * fraction;
    let r = geometry.radius;

    let start = geometry.point_at(r, 0.0);
    let end = geometry.point_at(r, PI);
    let indicator = geometry.point_at(r, phi);

    let ticks = (0..geometry.tick_count)
        .map(|i| {
            let angle = geometry.tick_angle(i);
            Tick {
                inner: geometry.point_at(geometry.tick_inner, angle),
                outer: geometry.point_at(geometry.tick_outer, angle),
            }
        })
        .collect();

    let arc_length = geometry.arc_length();
    GaugeLayout {
        fraction,
        arc_path: arc_path(start, end, r),
        filled_path: arc_path(start, indicator, r),
        indicator,
        ticks,
        arc_length,
        dash_offset: arc_length * (1.0 - fraction),
    }
}

// The arc never exceeds 180°, so the large-arc flag stays 0.
fn arc_path(from: Point, to: Point, r: f32) -> String {
    format!(
        "M {} {} A {r} {r} 0 0 1 {} {}",
        round3(from.x),
        round3(from.y),
        round3(to.x),
        round3(to.y)
    )
}

/// Round to three decimals for path output; trig noise like
/// `189.99998` would otherwise leak into the markup.
fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn default_arc_matches_viewbox_path() {
        let layout = gauge_layout(1.0, &GaugeGeometry::default());
        assert_eq!(layout.arc_path, "M 10 100 A 90 90 0 0 1 190 100");
        assert_eq!(layout.filled_path, layout.arc_path);
    }

    #[test]
    fn endpoints_of_the_arc() {
        let g = GaugeGeometry::default();
        assert!(close(gauge_layout(0.0, &g).indicator, Point::new(10.0, 100.0)));
        assert!(close(gauge_layout(0.5, &g).indicator, Point::new(100.0, 10.0)));
        assert!(close(gauge_layout(1.0, &g).indicator, Point::new(190.0, 100.0)));
    }

    #[test]
    fn out_of_range_fractions_clamp() {
        let g = GaugeGeometry::default();
        assert_eq!(gauge_layout(-0.5, &g), gauge_layout(0.0, &g));
        assert_eq!(gauge_layout(1.5, &g), gauge_layout(1.0, &g));
        assert_eq!(gauge_layout(f32::NAN, &g), gauge_layout(0.0, &g));
    }

    #[test]
    fn dash_offset_tracks_fraction() {
        let g = GaugeGeometry::default();
        assert_eq!(gauge_layout(0.0, &g).dash_offset, g.arc_length());
        assert_eq!(gauge_layout(1.0, &g).dash_offset, 0.0);
        let quarter = gauge_layout(0.25, &g);
        assert!((quarter.dash_offset - 0.75 * quarter.arc_length).abs() < 1e-3);
    }

    #[test]
    fn twenty_ticks_span_the_arc() {
        let layout = gauge_layout(0.3, &GaugeGeometry::default());
        assert_eq!(layout.ticks.len(), 20);
        assert!(close(layout.ticks[0].inner, Point::new(20.0, 100.0)));
        assert!(close(layout.ticks[0].outer, Point::new(5.0, 100.0)));
        assert!(close(layout.ticks[19].outer, Point::new(195.0, 100.0)));
    }

    #[test]
    fn single_tick_sits_at_midpoint() {
        let g = GaugeGeometry {
            tick_count: 1,
            ..GaugeGeometry::default()
        };
        let layout = gauge_layout(0.0, &g);
        assert_eq!(layout.ticks.len(), 1);
        assert!(close(layout.ticks[0].outer, Point::new(100.0, 5.0)));
    }

    #[test]
    fn zero_ticks_is_empty() {
        let g = GaugeGeometry {
            tick_count: 0,
            ..GaugeGeometry::default()
        };
        assert!(gauge_layout(0.5, &g).ticks.is_empty());
    }

    #[test]
    fn indicator_is_on_the_arc() {
        let g = GaugeGeometry::default();
        for i in 0..=10 {
            let p = gauge_layout(i as f32 / 10.0, &g).indicator;
            assert!((p.distance(g.center) - g.radius).abs() < 1e-3);
            assert!(p.y <= g.center.y + 1e-4);
        }
    }
}
