#![forbid(unsafe_code)]

//! Render-surface seam between the ornament loop and the host's GPU context.
//!
//! The host implements [`SurfaceProvider`] over whatever it has (WebGL,
//! a 2D canvas, nothing at all). The ornament never sees a concrete
//! graphics API: it hands each [`OrnamentFrame`] to a [`RenderSurface`].
//!
//! [`HeadlessProvider`] is an in-memory implementation that records what was
//! presented; it backs server-side previews and the test suite.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use folio_core::geometry::Viewport;

use crate::ornament::OrnamentFrame;

/// Why a surface could not be created or used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The host lacks a required capability (e.g. no WebGL).
    Unsupported(&'static str),
    /// Requested a surface with no drawable area.
    ZeroSize,
    /// The context went away after creation.
    Lost,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(what) => write!(f, "unsupported: {what}"),
            Self::ZeroSize => f.write_str("surface has zero size"),
            Self::Lost => f.write_str("render context lost"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// A live drawing target owned by one ornament.
pub trait RenderSurface {
    /// Draw one frame.
    fn present(&mut self, frame: &OrnamentFrame<'_>) -> Result<(), SurfaceError>;

    /// Resize in place; called on viewport changes.
    fn resize(&mut self, viewport: Viewport, pixel_ratio: f32);

    /// Free GPU resources. Called exactly once, on unmount.
    fn release(&mut self);
}

/// Creates surfaces; implemented by the host.
pub trait SurfaceProvider {
    fn acquire(
        &mut self,
        viewport: Viewport,
        pixel_ratio: f32,
    ) -> Result<Box<dyn RenderSurface>, SurfaceError>;
}

// ---------------------------------------------------------------------------
// Headless implementation
// ---------------------------------------------------------------------------

/// What a [`HeadlessSurface`] has seen. Shared with its provider so callers
/// can inspect it after the surface has been boxed away.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SurfaceStats {
    pub acquired: u32,
    pub presented: u64,
    pub resizes: u32,
    pub released: u32,
    /// Size and pixel ratio after the last acquire or resize.
    pub viewport: Option<(Viewport, f32)>,
    /// Wireframe vertical offset of the last presented frame.
    pub last_offset_y: Option<f32>,
}

/// In-memory surface.
#[derive(Debug)]
pub struct HeadlessSurface {
    stats: Rc<RefCell<SurfaceStats>>,
    /// Fail presents after this many frames, simulating a lost context.
    lose_after: Option<u64>,
}

impl RenderSurface for HeadlessSurface {
    fn present(&mut self, frame: &OrnamentFrame<'_>) -> Result<(), SurfaceError> {
        let mut stats = self.stats.borrow_mut();
        if self.lose_after.is_some_and(|n| stats.presented >= n) {
            return Err(SurfaceError::Lost);
        }
        stats.presented += 1;
        stats.last_offset_y = Some(frame.wire_offset_y);
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport, pixel_ratio: f32) {
        let mut stats = self.stats.borrow_mut();
        stats.resizes += 1;
        stats.viewport = Some((viewport, pixel_ratio));
    }

    fn release(&mut self) {
        self.stats.borrow_mut().released += 1;
    }
}

/// Provider of [`HeadlessSurface`]s.
#[derive(Debug, Default, Clone)]
pub struct HeadlessProvider {
    stats: Rc<RefCell<SurfaceStats>>,
    unsupported: bool,
    lose_after: Option<u64>,
}

impl HeadlessProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that refuses every acquire, like a browser without WebGL.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    /// Surfaces report [`SurfaceError::Lost`] once `frames` have been shown.
    #[must_use]
    pub fn losing_context_after(mut self, frames: u64) -> Self {
        self.lose_after = Some(frames);
        self
    }

    pub fn stats(&self) -> SurfaceStats {
        self.stats.borrow().clone()
    }
}

impl SurfaceProvider for HeadlessProvider {
    fn acquire(
        &mut self,
        viewport: Viewport,
        pixel_ratio: f32,
    ) -> Result<Box<dyn RenderSurface>, SurfaceError> {
        if self.unsupported {
            return Err(SurfaceError::Unsupported("webgl"));
        }
        if viewport.is_empty() {
            return Err(SurfaceError::ZeroSize);
        }
        {
            let mut stats = self.stats.borrow_mut();
            stats.acquired += 1;
            stats.viewport = Some((viewport, pixel_ratio));
        }
        Ok(Box::new(HeadlessSurface {
            stats: Rc::clone(&self.stats),
            lose_after: self.lose_after,
        }))
    }
}
