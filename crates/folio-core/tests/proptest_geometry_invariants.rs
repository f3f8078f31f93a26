//! Property-based invariant tests for geometry primitives and the pointer
//! tracker.
//!
//! 1. Sector angles are evenly spaced and start straight up.
//! 2. Polar points lie exactly `radius` from the center.
//! 3. Normalized pointer coordinates stay in [-1, 1].
//! 4. Rotations preserve vector length.
//! 5. The pointer's instant position equals the last event coordinate.
//! 6. The trail never leaves the segment between where it was and the pointer.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use folio_core::event::PointerEvent;
use folio_core::geometry::{sector_angle, Bounds, Point, Vec3};
use folio_core::pointer::PointerTracker;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn coord() -> impl Strategy<Value = f32> {
    -5_000.0f32..5_000.0
}

fn bounds_strategy() -> impl Strategy<Value = Bounds> {
    (coord(), coord(), 1.0f32..2_000.0, 1.0f32..2_000.0)
        .prop_map(|(l, t, w, h)| Bounds::new(l, t, w, h))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Sector angles
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sector_angles_evenly_spaced(count in 1usize..64) {
        prop_assert!((sector_angle(0, count) + FRAC_PI_2).abs() < 1e-6);
        let step = TAU / count as f32;
        for i in 1..count {
            let gap = sector_angle(i, count) - sector_angle(i - 1, count);
            prop_assert!((gap - step).abs() < 1e-4, "gap {} vs step {}", gap, step);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Polar points
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn polar_point_at_radius(
        cx in coord(),
        cy in coord(),
        radius in 0.0f32..1_000.0,
        angle in -10.0f32..10.0,
    ) {
        let center = Point::new(cx, cy);
        let p = Point::polar(center, radius, angle);
        let d = p.distance(center);
        prop_assert!((d - radius).abs() <= 1e-2, "distance {} vs radius {}", d, radius);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Normalized coordinates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalized_is_bounded(b in bounds_strategy(), x in coord(), y in coord()) {
        let (nx, ny) = b.normalized(Point::new(x, y));
        prop_assert!((-1.0..=1.0).contains(&nx));
        prop_assert!((-1.0..=1.0).contains(&ny));
    }

    #[test]
    fn contained_points_normalize_inside(b in bounds_strategy(), fx in 0.0f32..1.0, fy in 0.0f32..1.0) {
        let p = Point::new(b.left + b.width * fx, b.top + b.height * fy);
        let (nx, ny) = b.normalized(p);
        prop_assert!((nx - (fx * 2.0 - 1.0)).abs() < 1e-2);
        prop_assert!((ny - (fy * 2.0 - 1.0)).abs() < 1e-2);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Rotations preserve length
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rotation_preserves_length(
        x in -10.0f32..10.0,
        y in -10.0f32..10.0,
        z in -10.0f32..10.0,
        rx in -7.0f32..7.0,
        ry in -7.0f32..7.0,
    ) {
        let v = Vec3::new(x, y, z);
        let r = v.rotate_xy(rx, ry);
        prop_assert!((v.length() - r.length()).abs() < 1e-3);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Instant position
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn instant_matches_last_event(moves in proptest::collection::vec((coord(), coord()), 1..30)) {
        let mut tracker = PointerTracker::default();
        prop_assert!(tracker.indicator().is_none());
        for &(x, y) in &moves {
            tracker.handle(&PointerEvent::moved(x, y));
            tracker.on_frame(Duration::from_millis(16));
        }
        let &(lx, ly) = moves.last().unwrap();
        prop_assert_eq!(tracker.instant(), Point::new(lx, ly));
        prop_assert!(tracker.visible());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Trail stays on the segment toward the pointer
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn trail_approaches_without_passing(
        start in (coord(), coord()),
        end in (coord(), coord()),
        frames in 1usize..40,
    ) {
        let mut tracker = PointerTracker::default();
        tracker.handle(&PointerEvent::moved(start.0, start.1));
        tracker.handle(&PointerEvent::moved(end.0, end.1));
        let target = Point::new(end.0, end.1);
        let mut last = tracker.trail().distance(target);
        for _ in 0..frames {
            tracker.on_frame(Duration::from_millis(8));
            let d = tracker.trail().distance(target);
            prop_assert!(d <= last + 1e-2, "trail moved away: {} -> {}", last, d);
            last = d;
        }
    }
}
