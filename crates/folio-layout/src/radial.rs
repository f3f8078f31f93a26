#![forbid(unsafe_code)]

//! Radial (radar) chart layout.
//!
//! Maps an ordered list of magnitudes onto evenly spaced axes around a
//! center. Axis `i` of `N` sits at `2π·i/N − π/2`: index 0 points straight
//! up and the rest follow clockwise in screen space.
//!
//! # Invariants
//!
//! 1. `N ≥ 1` data points yield exactly `N` outline vertices, `N` axes and
//!    `N` label anchors; every outline vertex lies within `radius` of the
//!    center.
//! 2. An empty data set yields empty outline, axes and labels. Grid rings
//!    are still returned since they do not depend on the data.
//! 3. The layout is a pure function of its inputs: identical calls produce
//!    bit-identical vertex lists.
//!
//! # Failure Modes
//!
//! Magnitudes are clamped to `[0, 100]`; `NaN` is treated as 0. Nothing is
//! rejected.

use std::fmt::Write as _;
use std::time::Duration;

use folio_core::animation::{Animation, Spin, stagger};
use folio_core::geometry::{Point, sector_angle};

/// Full scale of a magnitude.
pub const MAX_MAGNITUDE: f32 = 100.0;

/// One full turn of the scanner sweep.
pub const SCANNER_PERIOD: Duration = Duration::from_secs(4);

/// One full turn of the dashed outer ring.
pub const RING_PERIOD: Duration = Duration::from_secs(10);

/// A named value on one axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadialDatum {
    pub label: String,
    /// Nominally in `[0, 100]`.
    pub magnitude: f32,
}

impl RadialDatum {
    pub fn new(label: impl Into<String>, magnitude: f32) -> Self {
        Self {
            label: label.into(),
            magnitude,
        }
    }

    /// Magnitude clamped into `[0, 100]`, with `NaN` mapped to 0.
    #[inline]
    pub fn clamped_magnitude(&self) -> f32 {
        if self.magnitude.is_nan() {
            0.0
        } else {
            self.magnitude.clamp(0.0, MAX_MAGNITUDE)
        }
    }
}

/// Where an axis label is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    pub label: String,
    pub position: Point,
    /// Axis angle in radians.
    pub angle: f32,
}

/// Chart presentation constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RadialStyle {
    /// Grid ring radii as fractions of the chart radius.
    /// Default: 0.2, 0.4, 0.6, 0.8, 1.0
    pub grid: Vec<f32>,
    /// Label distance as a multiple of the chart radius. Default: 1.1
    pub label_factor: f32,
}

impl Default for RadialStyle {
    fn default() -> Self {
        Self {
            grid: vec![0.2, 0.4, 0.6, 0.8, 1.0],
            label_factor: 1.1,
        }
    }
}

impl RadialStyle {
    /// Quarter rings, as on the skill matrix panel.
    pub fn quarters() -> Self {
        Self {
            grid: vec![0.25, 0.5, 0.75, 1.0],
            ..Self::default()
        }
    }

    /// Persona chart: fifth rings, labels at 95 on an 80 radius.
    pub fn persona() -> Self {
        Self {
            grid: vec![0.2, 0.4, 0.6, 0.8, 1.0],
            label_factor: 95.0 / 80.0,
        }
    }
}

/// Output of [`radial_layout`].
#[derive(Debug, Clone, PartialEq)]
pub struct RadialLayout {
    pub center: Point,
    pub radius: f32,
    /// Data polygon, one vertex per datum.
    pub outline: Vec<Point>,
    /// Full-radius background polygon.
    pub max_outline: Vec<Point>,
    /// `(center, rim)` per axis.
    pub axes: Vec<(Point, Point)>,
    /// Grid ring fractions of `radius`.
    pub grid: Vec<f32>,
    pub labels: Vec<LabelAnchor>,
}

impl RadialLayout {
    /// Grid ring radii in chart units.
    pub fn grid_radii(&self) -> impl Iterator<Item = f32> + '_ {
        self.grid.iter().map(move |f| f * self.radius)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

/// Lay out `data` with the default style.
pub fn radial_layout(data: &[RadialDatum], center: Point, radius: f32) -> RadialLayout {
    radial_layout_with(data, center, radius, &RadialStyle::default())
}

/// Lay out `data` with an explicit style.
pub fn radial_layout_with(
    data: &[RadialDatum],
    center: Point,
    radius: f32,
    style: &RadialStyle,
) -> RadialLayout {
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    let n = data.len();

    let mut outline = Vec::with_capacity(n);
    let mut max_outline = Vec::with_capacity(n);
    let mut axes = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);

    for (i, datum) in data.iter().enumerate() {
        let angle = sector_angle(i, n);
        let rim = Point::polar(center, radius, angle);
        let scaled = radius * datum.clamped_magnitude() / MAX_MAGNITUDE;

        outline.push(Point::polar(center, scaled, angle));
        max_outline.push(rim);
        axes.push((center, rim));
        labels.push(LabelAnchor {
            label: datum.label.clone(),
            position: Point::polar(center, radius * style.label_factor, angle),
            angle,
        });
    }

    RadialLayout {
        center,
        radius,
        outline,
        max_outline,
        axes,
        grid: style.grid.clone(),
        labels,
    }
}

/// SVG `points` attribute: `"x,y x,y ..."`.
pub fn points_attr(points: &[Point]) -> String {
    let mut out = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", p.x, p.y);
    }
    out
}

/// Path of the scanner wedge pointing straight up, `half_width` either side
/// of the vertical axis. Rotate it by [`SCANNER_PERIOD`] to sweep.
pub fn scanner_wedge(center: Point, radius: f32, half_width: f32) -> String {
    let top = center.y - radius;
    format!(
        "M {cx} {cy} L {l} {top} A {r} {r} 0 0 1 {rr} {top} Z",
        cx = center.x,
        cy = center.y,
        l = center.x - half_width,
        r = radius,
        rr = center.x + half_width,
    )
}

/// Continuous rotation of the chart's scanner wedge and outer ring.
///
/// Both turn clockwise at constant speed; the host ticks this once per frame
/// and applies [`ScannerSweep::wedge_transform`] and
/// [`ScannerSweep::ring_transform`] to the wedge and ring.
#[derive(Debug, Clone, Copy)]
pub struct ScannerSweep {
    center: Point,
    wedge: Spin,
    ring: Spin,
}

impl ScannerSweep {
    #[must_use]
    pub fn new(center: Point) -> Self {
        Self::with_periods(center, SCANNER_PERIOD, RING_PERIOD)
    }

    #[must_use]
    pub fn with_periods(center: Point, wedge: Duration, ring: Duration) -> Self {
        Self {
            center,
            wedge: Spin::new(wedge),
            ring: Spin::new(ring),
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.wedge.tick(dt);
        self.ring.tick(dt);
    }

    /// Wedge angle in degrees, in [0, 360).
    pub fn wedge_degrees(&self) -> f32 {
        self.wedge.degrees()
    }

    /// Ring angle in degrees, in [0, 360).
    pub fn ring_degrees(&self) -> f32 {
        self.ring.degrees()
    }

    /// SVG `transform` for the wedge, rotating about the chart center.
    pub fn wedge_transform(&self) -> String {
        rotate_about(self.wedge_degrees(), self.center)
    }

    /// SVG `transform` for the outer ring.
    pub fn ring_transform(&self) -> String {
        rotate_about(self.ring_degrees(), self.center)
    }

    pub fn reset(&mut self) {
        self.wedge.reset();
        self.ring.reset();
    }
}

fn rotate_about(degrees: f32, center: Point) -> String {
    let deg = (degrees * 100.0).round() / 100.0;
    format!("rotate({} {} {})", deg, center.x, center.y)
}

/// Pop-in delay for the node on axis `index`.
pub fn node_entry_delay(index: usize) -> Duration {
    stagger(Duration::from_millis(1500), Duration::from_millis(100), index)
}

/// Grow-in delay for grid ring `index`.
pub fn grid_entry_delay(index: usize) -> Duration {
    stagger(Duration::ZERO, Duration::from_millis(100), index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(mags: &[f32]) -> Vec<RadialDatum> {
        mags.iter()
            .enumerate()
            .map(|(i, &m)| RadialDatum::new(format!("axis{i}"), m))
            .collect()
    }

    const CENTER: Point = Point::new(150.0, 150.0);

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-3
    }

    #[test]
    fn empty_input_gives_empty_layout() {
        let layout = radial_layout(&[], CENTER, 100.0);
        assert!(layout.is_empty());
        assert!(layout.axes.is_empty());
        assert!(layout.labels.is_empty());
        assert_eq!(layout.grid.len(), 5);
    }

    #[test]
    fn first_axis_points_up() {
        let layout = radial_layout(&data(&[100.0, 100.0, 100.0]), CENTER, 100.0);
        assert!(close(layout.outline[0], Point::new(150.0, 50.0)));
    }

    #[test]
    fn axes_proceed_clockwise() {
        let layout = radial_layout(&data(&[100.0; 4]), CENTER, 100.0);
        // Up, right, down, left in screen coordinates.
        assert!(close(layout.outline[1], Point::new(250.0, 150.0)));
        assert!(close(layout.outline[2], Point::new(150.0, 250.0)));
        assert!(close(layout.outline[3], Point::new(50.0, 150.0)));
    }

    #[test]
    fn magnitudes_are_clamped() {
        let layout = radial_layout(&data(&[-20.0, 250.0, f32::NAN]), CENTER, 100.0);
        assert!(close(layout.outline[0], CENTER));
        assert!(close(layout.outline[1], layout.max_outline[1]));
        assert!(close(layout.outline[2], CENTER));
    }

    #[test]
    fn labels_sit_beyond_rim() {
        let layout = radial_layout(&data(&[10.0, 20.0]), CENTER, 100.0);
        for label in &layout.labels {
            let d = label.position.distance(CENTER);
            assert!((d - 110.0).abs() < 1e-3, "{d}");
        }
        assert_eq!(layout.labels[1].label, "axis1");
    }

    #[test]
    fn persona_style_labels_at_95() {
        let layout = radial_layout_with(
            &data(&[50.0; 6]),
            Point::new(100.0, 100.0),
            80.0,
            &RadialStyle::persona(),
        );
        let d = layout.labels[0].position.distance(Point::new(100.0, 100.0));
        assert!((d - 95.0).abs() < 1e-3);
    }

    #[test]
    fn grid_radii_scale_with_radius() {
        let layout = radial_layout_with(&data(&[1.0]), CENTER, 100.0, &RadialStyle::quarters());
        let radii: Vec<f32> = layout.grid_radii().collect();
        assert_eq!(radii, vec![25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn single_datum_is_a_point_on_the_up_axis() {
        let layout = radial_layout(&data(&[50.0]), CENTER, 100.0);
        assert_eq!(layout.outline.len(), 1);
        assert!(close(layout.outline[0], Point::new(150.0, 100.0)));
    }

    #[test]
    fn points_attr_format() {
        let s = points_attr(&[Point::new(1.0, 2.5), Point::new(-3.0, 4.0)]);
        assert_eq!(s, "1,2.5 -3,4");
        assert_eq!(points_attr(&[]), "");
    }

    #[test]
    fn sweep_turns_at_both_periods() {
        let mut sweep = ScannerSweep::new(CENTER);
        assert_eq!(sweep.wedge_transform(), "rotate(0 150 150)");
        sweep.tick(Duration::from_secs(1));
        assert_eq!(sweep.wedge_transform(), "rotate(90 150 150)");
        assert_eq!(sweep.ring_transform(), "rotate(36 150 150)");
        // A full wedge period later the wedge is back where it was.
        sweep.tick(SCANNER_PERIOD);
        assert!((sweep.wedge_degrees() - 90.0).abs() < 1e-3);
        assert!((sweep.ring_degrees() - 180.0).abs() < 1e-3);
        sweep.reset();
        assert_eq!(sweep.wedge_degrees(), 0.0);
    }

    #[test]
    fn sweep_stays_in_range_over_long_runs() {
        let mut sweep = ScannerSweep::new(CENTER);
        for _ in 0..100_000 {
            sweep.tick(Duration::from_millis(16));
        }
        assert!((0.0..360.0).contains(&sweep.wedge_degrees()));
        assert!((0.0..360.0).contains(&sweep.ring_degrees()));
    }

    #[test]
    fn scanner_wedge_matches_panel_path() {
        assert_eq!(
            scanner_wedge(CENTER, 100.0, 35.0),
            "M 150 150 L 115 50 A 100 100 0 0 1 185 50 Z"
        );
    }

    #[test]
    fn entry_delays_stagger() {
        assert_eq!(node_entry_delay(0), Duration::from_millis(1500));
        assert_eq!(node_entry_delay(3), Duration::from_millis(1800));
        assert_eq!(grid_entry_delay(2), Duration::from_millis(200));
    }
}
