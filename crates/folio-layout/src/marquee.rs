#![forbid(unsafe_code)]

//! Seamless horizontal marquee.
//!
//! The strip holds [`COPIES`] identical copies of its content side by side.
//! Scrolling by exactly one copy width lands on a frame identical to the
//! start, so the offset wraps modulo `copy_width` without a visible seam.

use std::time::Duration;

/// Copies rendered so the loop still covers ultrawide viewports.
pub const COPIES: usize = 4;

/// Scroll direction of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarqueeDirection {
    #[default]
    Left,
    Right,
}

/// Horizontal translation of the strip `elapsed` after mount.
///
/// Moving left the offset runs from 0 toward `-copy_width` and wraps; moving
/// right it runs from `-copy_width` toward 0. Either way the result lies in
/// `[-copy_width, 0]`. A non-positive width or speed yields 0.
pub fn marquee_offset(
    elapsed: Duration,
    speed: f32,
    copy_width: f32,
    direction: MarqueeDirection,
) -> f32 {
    if !(copy_width > 0.0) || !(speed > 0.0) {
        return 0.0;
    }
    // f64 keeps long sessions from losing sub-pixel precision.
    let travelled = (elapsed.as_secs_f64() * f64::from(speed)) % f64::from(copy_width);
    let travelled = travelled as f32;
    match direction {
        MarqueeDirection::Left => -travelled,
        MarqueeDirection::Right => travelled - copy_width,
    }
}

/// Seconds for one full loop at `speed` px/s.
pub fn loop_period(speed: f32, copy_width: f32) -> Option<Duration> {
    if speed > 0.0 && copy_width > 0.0 {
        Some(Duration::from_secs_f32(copy_width / speed))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_scroll_wraps_each_copy() {
        let at = |ms| marquee_offset(Duration::from_millis(ms), 100.0, 400.0, MarqueeDirection::Left);
        assert_eq!(at(0), 0.0);
        assert_eq!(at(1000), -100.0);
        assert_eq!(at(4000), 0.0);
        assert_eq!(at(5000), -100.0);
    }

    #[test]
    fn right_scroll_mirrors() {
        let at = |ms| marquee_offset(Duration::from_millis(ms), 100.0, 400.0, MarqueeDirection::Right);
        assert_eq!(at(0), -400.0);
        assert_eq!(at(1000), -300.0);
    }

    #[test]
    fn degenerate_inputs_stand_still() {
        let d = Duration::from_secs(3);
        assert_eq!(marquee_offset(d, 0.0, 400.0, MarqueeDirection::Left), 0.0);
        assert_eq!(marquee_offset(d, 50.0, 0.0, MarqueeDirection::Left), 0.0);
        assert_eq!(marquee_offset(d, f32::NAN, 10.0, MarqueeDirection::Right), 0.0);
    }

    #[test]
    fn period_is_width_over_speed() {
        assert_eq!(loop_period(100.0, 400.0), Some(Duration::from_secs(4)));
        assert_eq!(loop_period(0.0, 400.0), None);
    }
}
