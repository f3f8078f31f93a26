#![forbid(unsafe_code)]

//! Core: geometry, pointer input, kinetic animation, and host-driven scheduling.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod lifecycle;
pub mod logging;
pub mod pointer;
pub mod rng;
pub mod scheduler;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, warn};
