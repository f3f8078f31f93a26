#![forbid(unsafe_code)]

//! Pure layout functions for the Folio motion engine.
//!
//! Everything here is a function of its inputs: no clocks, no global state.
//! Stateful wrappers (timers, frame loops) live in `folio-web`.
//!
//! - [`radial`]: radar chart vertices, axes, grid rings and labels
//! - [`gauge`]: half-circle progress gauge with ticks and indicator
//! - [`equalizer`]: looping decorative bar heights
//! - [`marquee`]: seamless scrolling strip offsets
//! - [`tilt`]: pointer-driven card tilt
//! - [`reveal`]: scroll-triggered entrances and scroll progress

pub mod equalizer;
pub mod gauge;
pub mod marquee;
pub mod radial;
pub mod reveal;
pub mod tilt;

pub use folio_core::geometry::{Bounds, Point, Viewport};
pub use gauge::{GaugeGeometry, GaugeLayout, Tick, gauge_layout};
pub use radial::{
    LabelAnchor, RadialDatum, RadialLayout, RadialStyle, ScannerSweep, radial_layout,
    radial_layout_with,
};
pub use reveal::{RevealConfig, RevealTracker, scroll_progress};
pub use tilt::{TiltState, tilt_from_pointer};
