//! Golden layouts for the two chart panels.
//!
//! Coordinates are rounded to two decimals before comparison so the goldens
//! stay readable; determinism at the bit level is covered by the property
//! tests.

use folio_layout::gauge::{GaugeGeometry, gauge_layout};
use folio_layout::radial::{RadialDatum, RadialStyle, radial_layout, radial_layout_with};
use folio_layout::Point;
use pretty_assertions::assert_eq;

fn rounded(points: &[Point]) -> Vec<(f32, f32)> {
    points
        .iter()
        .map(|p| ((p.x * 100.0).round() / 100.0, (p.y * 100.0).round() / 100.0))
        .collect()
}

#[test]
fn skill_matrix_square() {
    let data = vec![
        RadialDatum::new("UI", 100.0),
        RadialDatum::new("UX", 50.0),
        RadialDatum::new("3D", 0.0),
        RadialDatum::new("Motion", 75.0),
    ];
    let layout = radial_layout_with(&data, Point::new(150.0, 150.0), 100.0, &RadialStyle::quarters());

    assert_eq!(
        rounded(&layout.outline),
        vec![(150.0, 50.0), (200.0, 150.0), (150.0, 150.0), (75.0, 150.0)]
    );
    assert_eq!(
        rounded(&layout.max_outline),
        vec![(150.0, 50.0), (250.0, 150.0), (150.0, 250.0), (50.0, 150.0)]
    );
    assert_eq!(layout.grid, vec![0.25, 0.5, 0.75, 1.0]);
    let labels: Vec<&str> = layout.labels.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["UI", "UX", "3D", "Motion"]);
}

#[test]
fn persona_hexagon() {
    let data: Vec<RadialDatum> = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0]
        .iter()
        .enumerate()
        .map(|(i, &m)| RadialDatum::new(format!("t{i}"), m))
        .collect();
    let layout = radial_layout_with(&data, Point::new(100.0, 100.0), 80.0, &RadialStyle::persona());

    assert_eq!(
        rounded(&layout.outline),
        vec![
            (100.0, 20.0),
            (169.28, 60.0),
            (169.28, 140.0),
            (100.0, 180.0),
            (30.72, 140.0),
            (30.72, 60.0),
        ]
    );
    let label_positions: Vec<Point> = layout.labels.iter().map(|l| l.position).collect();
    assert_eq!(rounded(&label_positions[..1]), vec![(100.0, 5.0)]);
}

#[test]
fn empty_chart() {
    let layout = radial_layout(&[], Point::new(150.0, 150.0), 100.0);
    assert_eq!(layout.outline, Vec::<Point>::new());
    assert_eq!(layout.grid, vec![0.2, 0.4, 0.6, 0.8, 1.0]);
}

#[test]
fn time_gauge_at_three_quarters() {
    let layout = gauge_layout(0.75, &GaugeGeometry::default());
    assert_eq!(layout.arc_path, "M 10 100 A 90 90 0 0 1 190 100");
    assert_eq!(layout.filled_path, "M 10 100 A 90 90 0 0 1 163.64 36.36");
    assert_eq!(rounded(&[layout.indicator]), vec![(163.64, 36.36)]);
    assert_eq!((layout.arc_length * 100.0).round() / 100.0, 282.74);
    assert_eq!((layout.dash_offset * 100.0).round() / 100.0, 70.69);
}

#[test]
fn time_gauge_ticks() {
    let layout = gauge_layout(0.0, &GaugeGeometry::default());
    let outer: Vec<Point> = layout.ticks.iter().map(|t| t.outer).collect();
    let ends = rounded(&[outer[0], outer[19]]);
    assert_eq!(ends, vec![(5.0, 100.0), (195.0, 100.0)]);
    assert_eq!(layout.filled_path, "M 10 100 A 90 90 0 0 1 10 100");
}
