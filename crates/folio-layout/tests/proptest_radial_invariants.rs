//! Property-based invariant tests for the radial chart and arc gauge.
//!
//! 1. N data points give N outline vertices, all within the radius.
//! 2. Axes are evenly spaced by 2π/N, starting straight up.
//! 3. Any magnitude, including out-of-range and NaN, lays out without panic.
//! 4. Layout is deterministic.
//! 5. Gauge indicator and filled-arc endpoint coincide.
//! 6. Gauge fractions outside [0, 1] behave like the nearest bound.
//! 7. Gauge ticks lie between the inner and outer tick radii.

use std::f32::consts::{FRAC_PI_2, TAU};

use folio_layout::gauge::{GaugeGeometry, gauge_layout};
use folio_layout::radial::{RadialDatum, radial_layout};
use folio_layout::Point;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn magnitudes() -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(0.0f32..=100.0, 1..24)
}

fn wild_magnitudes() -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(
        prop_oneof![
            any::<f32>(),
            Just(f32::NAN),
            Just(f32::INFINITY),
            Just(f32::NEG_INFINITY),
            -1_000.0f32..1_000.0,
        ],
        0..24,
    )
}

fn to_data(mags: &[f32]) -> Vec<RadialDatum> {
    mags.iter()
        .enumerate()
        .map(|(i, &m)| RadialDatum::new(format!("d{i}"), m))
        .collect()
}

fn center() -> impl Strategy<Value = Point> {
    (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| Point::new(x, y))
}

/// End point of an SVG arc command `... A r r 0 0 1 x y`.
fn path_end(path: &str) -> Point {
    let mut it = path.split_whitespace().rev();
    let y: f32 = it.next().unwrap().parse().unwrap();
    let x: f32 = it.next().unwrap().parse().unwrap();
    Point::new(x, y)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Vertex count and radius bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn outline_has_one_vertex_per_datum(mags in magnitudes(), c in center(), radius in 1.0f32..500.0) {
        let layout = radial_layout(&to_data(&mags), c, radius);
        prop_assert_eq!(layout.outline.len(), mags.len());
        prop_assert_eq!(layout.axes.len(), mags.len());
        prop_assert_eq!(layout.labels.len(), mags.len());
        for v in &layout.outline {
            prop_assert!(v.distance(c) <= radius + 1e-2, "{:?} outside radius {}", v, radius);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Even axis spacing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn axes_evenly_spaced_from_top(n in 1usize..32) {
        let layout = radial_layout(&to_data(&vec![100.0; n]), Point::new(0.0, 0.0), 100.0);
        let step = TAU / n as f32;
        for (i, label) in layout.labels.iter().enumerate() {
            let expected = step * i as f32 - FRAC_PI_2;
            prop_assert!((label.angle - expected).abs() < 1e-4);
            let (_, rim) = layout.axes[i];
            let actual = rim.y.atan2(rim.x);
            let diff = (actual - expected).rem_euclid(TAU);
            prop_assert!(diff < 1e-3 || TAU - diff < 1e-3, "axis {} at {} not {}", i, actual, expected);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Arbitrary magnitudes
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wild_magnitudes_are_clamped(mags in wild_magnitudes()) {
        let c = Point::new(150.0, 150.0);
        let layout = radial_layout(&to_data(&mags), c, 100.0);
        prop_assert_eq!(layout.outline.len(), mags.len());
        for v in &layout.outline {
            prop_assert!(v.is_finite());
            prop_assert!(v.distance(c) <= 100.0 + 1e-2);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_is_deterministic(mags in magnitudes(), c in center()) {
        let data = to_data(&mags);
        let a = radial_layout(&data, c, 120.0);
        let b = radial_layout(&data, c, 120.0);
        let bits = |pts: &[Point]| pts.iter().map(|p| (p.x.to_bits(), p.y.to_bits())).collect::<Vec<_>>();
        prop_assert_eq!(bits(&a.outline), bits(&b.outline));
        prop_assert_eq!(a, b);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Indicator agrees with the filled arc
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn indicator_matches_filled_arc_end(fraction in 0.0f32..=1.0) {
        let layout = gauge_layout(fraction, &GaugeGeometry::default());
        let end = path_end(&layout.filled_path);
        prop_assert!(end.distance(layout.indicator) < 1e-2, "{:?} vs {:?}", end, layout.indicator);
    }
}

#[test]
fn indicator_matches_filled_arc_at_quarters() {
    for fraction in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let layout = gauge_layout(fraction, &GaugeGeometry::default());
        let end = path_end(&layout.filled_path);
        assert!(end.distance(layout.indicator) < 1e-2, "fraction {fraction}");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Clamping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn out_of_range_behaves_like_bounds(below in -1e6f32..0.0, above in 1.0f32..1e6) {
        let g = GaugeGeometry::default();
        prop_assert_eq!(gauge_layout(below, &g), gauge_layout(0.0, &g));
        prop_assert_eq!(gauge_layout(above, &g), gauge_layout(1.0, &g));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Tick radii
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ticks_between_radii(count in 0usize..64) {
        let g = GaugeGeometry { tick_count: count, ..GaugeGeometry::default() };
        let layout = gauge_layout(0.5, &g);
        prop_assert_eq!(layout.ticks.len(), count);
        for t in &layout.ticks {
            prop_assert!((t.inner.distance(g.center) - g.tick_inner).abs() < 1e-3);
            prop_assert!((t.outer.distance(g.center) - g.tick_outer).abs() < 1e-3);
            prop_assert!(t.outer.y <= g.center.y + 1e-4);
        }
    }
}
