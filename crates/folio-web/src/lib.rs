#![forbid(unsafe_code)]

//! `folio-web` runs the Folio motion engine inside a host page.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes pointer, resize
//!   and scroll events and calls [`host::ViewHost::step`] once per display
//!   frame.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! Like the rest of the workspace this crate does not bind to `wasm-bindgen`;
//! a thin JS shim forwards DOM events and implements [`surface::SurfaceProvider`]
//! on top of WebGL.

pub mod config;
pub mod host;
pub mod live;
pub mod ornament;
pub mod surface;

use core::time::Duration;

pub use config::{ConfigError, HostConfig};
pub use host::{Component, StepResult, ViewHost};
pub use ornament::{Ornament, OrnamentConfig, OrnamentStatus};
pub use surface::{RenderSurface, SurfaceError, SurfaceProvider};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[inline]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Going backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        if now >= self.now {
            self.now = now;
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances_and_never_rewinds() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(16));
        clock.set(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(16));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }
}
