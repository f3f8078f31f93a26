#![forbid(unsafe_code)]

//! Ambient hero ornament: a slowly spinning torus-knot wireframe with a
//! counter-rotating particle cloud.
//!
//! The ornament owns its render surface and geometry buffers from
//! [`Ornament::mount`] until [`Ornament::unmount`] (or drop). Each display
//! frame the host calls [`Ornament::on_frame`]; pointer moves add a bounded
//! parallax tilt.
//!
//! # Invariants
//!
//! 1. Geometry buffers exist only while the ornament is [`OrnamentStatus::Active`].
//! 2. The surface is released exactly once.
//! 3. A [`OrnamentStatus::Degraded`] ornament presents nothing and never
//!    reports an error to the caller.
//! 4. The accumulated parallax tilt stays within `±parallax_limit` radians.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Provider refuses a surface | `Degraded`, one `warn!` |
//! | Surface reports lost context | release, `Degraded`, one `warn!` |
//! | Zero-sized viewport on resize | projection keeps its last aspect |
//! | Zero-sized viewport at mount | `Degraded` until a resize to a real size re-acquires |

use std::collections::BTreeSet;
use std::f32::consts::TAU;
use std::time::Duration;

use folio_core::geometry::{Point, Vec3, Viewport};
use folio_core::rng::Xorshift32;
use tracing::{debug, info, warn};

use crate::surface::{RenderSurface, SurfaceError, SurfaceProvider};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Torus-knot shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TorusKnotParams {
    /// Default: 1.5
    pub radius: f32,
    /// Default: 0.4
    pub tube: f32,
    /// Segments along the knot. Default: 120
    pub tubular_segments: u32,
    /// Segments around the tube. Default: 20
    pub radial_segments: u32,
    /// Winds around the axis of symmetry. Default: 2
    pub p: u32,
    /// Winds around the interior circle. Default: 3
    pub q: u32,
}

impl Default for TorusKnotParams {
    fn default() -> Self {
        Self {
            radius: 1.5,
            tube: 0.4,
            tubular_segments: 120,
            radial_segments: 20,
            p: 2,
            q: 3,
        }
    }
}

/// Ornament motion and scene constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrnamentConfig {
    /// Wireframe spin per frame about X, radians. Default: 0.001
    pub spin_x: f32,
    /// Wireframe spin per frame about Y, radians. Default: 0.002
    pub spin_y: f32,
    /// Particle spin per frame about X. Default: -0.0005
    pub particle_spin_x: f32,
    /// Particle spin per frame about Y. Default: -0.001
    pub particle_spin_y: f32,
    /// Vertical bob amplitude in scene units. Default: 0.1
    pub bob_amplitude: f32,
    /// Bob angular rate in radians per second. Default: 0.5
    pub bob_rate: f32,
    /// Tilt added per pointer move at full deflection. Default: 0.001
    pub parallax_gain: f32,
    /// Bound on the accumulated tilt. Default: 0.5
    pub parallax_limit: f32,
    /// Default: 200
    pub particle_count: usize,
    /// Edge of the particle cube. Default: 5.0
    pub particle_extent: f32,
    /// Vertical field of view in degrees. Default: 75
    pub fov_deg: f32,
    /// Default: 5
    pub camera_z: f32,
    /// Default: 2
    pub max_pixel_ratio: f32,
    pub knot: TorusKnotParams,
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            spin_x: 0.001,
            spin_y: 0.002,
            particle_spin_x: -0.0005,
            particle_spin_y: -0.001,
            bob_amplitude: 0.1,
            bob_rate: 0.5,
            parallax_gain: 0.001,
            parallax_limit: 0.5,
            particle_count: 200,
            particle_extent: 5.0,
            fov_deg: 75.0,
            camera_z: 5.0,
            max_pixel_ratio: 2.0,
            knot: TorusKnotParams::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * 0.5 * u.sin(),
        radius * qu_over_p.sin() * 0.5,
    )
}

/// Wireframe of a torus knot: a `(tubular+1) × (radial+1)` vertex grid and
/// the unique edges of its triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe {
    pub vertices: Vec<Vec3>,
    pub edges: Vec<(u32, u32)>,
}

impl Wireframe {
    pub fn torus_knot(params: &TorusKnotParams) -> Self {
        let tubular = params.tubular_segments.max(3);
        let radial = params.radial_segments.max(3);
        let p = params.p.max(1) as f32;
        let q = params.q as f32;

        let mut vertices = Vec::with_capacity(((tubular + 1) * (radial + 1)) as usize);
        for j in 0..=tubular {
            let u = j as f32 / tubular as f32 * p * TAU;
            let p1 = knot_curve(u, p, q, params.radius);
            let p2 = knot_curve(u + 0.01, p, q, params.radius);

            // Frenet-style frame around the curve.
            let t = p2.sub(p1);
            let n = p2.add(p1);
            let b = t.cross(n).normalize();
            let n = b.cross(t).normalize();

            for i in 0..=radial {
                let v = i as f32 / radial as f32 * TAU;
                let cx = -params.tube * v.cos();
                let cy = params.tube * v.sin();
                vertices.push(p1.add(n.scale(cx)).add(b.scale(cy)));
            }
        }

        let row = radial + 1;
        let mut edges = BTreeSet::new();
        let mut edge = |a: u32, b: u32| {
            edges.insert((a.min(b), a.max(b)));
        };
        for j in 1..=tubular {
            for i in 1..=radial {
                let a = row * (j - 1) + (i - 1);
                let b = row * j + (i - 1);
                let c = row * j + i;
                let d = row * (j - 1) + i;
                // Triangles (a, b, d) and (b, c, d).
                edge(a, b);
                edge(b, d);
                edge(d, a);
                edge(b, c);
                edge(c, d);
            }
        }

        Self {
            vertices,
            edges: edges.into_iter().collect(),
        }
    }
}

/// Buffers allocated while the ornament is mounted.
#[derive(Debug, Clone)]
pub struct OrnamentGeometry {
    pub wireframe: Wireframe,
    pub particles: Vec<Vec3>,
}

impl OrnamentGeometry {
    pub fn build(config: &OrnamentConfig, seed: u32) -> Self {
        let mut rng = Xorshift32::new(seed);
        let half = config.particle_extent / 2.0;
        let particles = (0..config.particle_count)
            .map(|_| {
                Vec3::new(
                    rng.range(-half, half),
                    rng.range(-half, half),
                    rng.range(-half, half),
                )
            })
            .collect();
        Self {
            wireframe: Wireframe::torus_knot(&config.knot),
            particles,
        }
    }
}

/// Perspective camera parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub camera_z: f32,
}

impl Projection {
    pub fn new(fov_deg: f32, viewport: Viewport, camera_z: f32) -> Self {
        Self {
            fov_deg,
            aspect: viewport.aspect(),
            near: 0.1,
            far: 1000.0,
            camera_z,
        }
    }

    /// Project a world-space point to viewport pixels. `None` when the point
    /// is behind the near plane or past the far plane.
    pub fn project(&self, p: Vec3, viewport: Viewport) -> Option<Point> {
        let depth = self.camera_z - p.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let f = 1.0 / (self.fov_deg.to_radians() / 2.0).tan();
        let ndc_x = p.x * f / (self.aspect * depth);
        let ndc_y = p.y * f / depth;
        Some(Point::new(
            (ndc_x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc_y) * 0.5 * viewport.height,
        ))
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Animated pose of the scene. Angles are radians and grow without bound.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrnamentState {
    /// Constant-spin part of the wireframe rotation.
    pub wire_spin: Vec3,
    /// Pointer parallax part, each axis within `±parallax_limit`.
    pub parallax: Vec3,
    pub wire_offset_y: f32,
    pub particle_rotation: Vec3,
    pub frames: u64,
}

impl OrnamentState {
    /// Total wireframe rotation.
    pub fn wire_rotation(&self) -> Vec3 {
        self.wire_spin.add(self.parallax)
    }
}

/// One frame handed to the render surface.
#[derive(Debug, Clone, Copy)]
pub struct OrnamentFrame<'a> {
    pub geometry: &'a OrnamentGeometry,
    pub wire_rotation: Vec3,
    pub wire_offset_y: f32,
    pub particle_rotation: Vec3,
    pub projection: Projection,
    pub viewport: Viewport,
    pub pixel_ratio: f32,
    pub frame: u64,
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrnamentStatus {
    Active,
    /// No surface available; renders nothing.
    Degraded,
    Unmounted,
}

/// The mounted ornament.
pub struct Ornament {
    config: OrnamentConfig,
    status: OrnamentStatus,
    surface: Option<Box<dyn RenderSurface>>,
    geometry: Option<OrnamentGeometry>,
    state: OrnamentState,
    projection: Projection,
    viewport: Viewport,
    seed: u32,
    /// Mounted into a zero-sized viewport; acquire on the next real size.
    awaiting_size: bool,
}

impl std::fmt::Debug for Ornament {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ornament")
            .field("status", &self.status)
            .field("has_surface", &self.surface.is_some())
            .field("state", &self.state)
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl Ornament {
    /// Acquire a surface and build geometry. Never fails: without a surface
    /// the ornament comes up [`OrnamentStatus::Degraded`].
    pub fn mount(
        config: OrnamentConfig,
        provider: &mut dyn SurfaceProvider,
        viewport: Viewport,
        seed: u32,
    ) -> Self {
        let projection = Projection::new(config.fov_deg, viewport, config.camera_z);
        let mut ornament = Self {
            config,
            status: OrnamentStatus::Degraded,
            surface: None,
            geometry: None,
            state: OrnamentState::default(),
            projection,
            viewport,
            seed,
            awaiting_size: false,
        };
        ornament.acquire(provider);
        ornament
    }

    fn acquire(&mut self, provider: &mut dyn SurfaceProvider) {
        let viewport = self.viewport;
        let pixel_ratio = viewport.clamped_pixel_ratio(self.config.max_pixel_ratio);
        match provider.acquire(viewport, pixel_ratio) {
            Ok(surface) => {
                self.geometry = Some(OrnamentGeometry::build(&self.config, self.seed));
                self.surface = Some(surface);
                self.status = OrnamentStatus::Active;
                self.awaiting_size = false;
                info!(
                    view = "ornament",
                    width = viewport.width,
                    height = viewport.height,
                    pixel_ratio,
                    "ornament mounted"
                );
            }
            Err(SurfaceError::ZeroSize) => {
                self.awaiting_size = true;
                debug!(view = "ornament", "zero-sized viewport; surface deferred until resize");
            }
            Err(err) => {
                warn!(view = "ornament", reason = %err, "render surface unavailable; ornament disabled");
            }
        }
    }

    /// Advance one display frame at monotonic time `now` and present it.
    pub fn on_frame(&mut self, now: Duration) {
        if self.status != OrnamentStatus::Active {
            return;
        }
        let c = &self.config;
        let s = &mut self.state;
        s.wire_spin = s.wire_spin.add(Vec3::new(c.spin_x, c.spin_y, 0.0));
        s.particle_rotation = s
            .particle_rotation
            .add(Vec3::new(c.particle_spin_x, c.particle_spin_y, 0.0));
        s.wire_offset_y = (now.as_secs_f32() * c.bob_rate).sin() * c.bob_amplitude;
        s.frames += 1;

        let (Some(surface), Some(geometry)) = (self.surface.as_mut(), self.geometry.as_ref()) else {
            return;
        };
        let frame = OrnamentFrame {
            geometry,
            wire_rotation: self.state.wire_rotation(),
            wire_offset_y: self.state.wire_offset_y,
            particle_rotation: self.state.particle_rotation,
            projection: self.projection,
            viewport: self.viewport,
            pixel_ratio: self.viewport.clamped_pixel_ratio(self.config.max_pixel_ratio),
            frame: self.state.frames,
        };
        if let Err(err) = surface.present(&frame) {
            warn!(view = "ornament", reason = %err, "present failed; ornament disabled");
            self.degrade();
        }
    }

    /// Pointer moved to `pointer` (viewport pixels).
    pub fn on_pointer(&mut self, pointer: Point) {
        if self.status != OrnamentStatus::Active {
            return;
        }
        let (nx, ny) = self.viewport.bounds().normalized(pointer);
        // Screen y grows downward; the scene's y grows upward.
        let up = -ny;
        let limit = self.config.parallax_limit.abs();
        let gain = self.config.parallax_gain;
        let p = &mut self.state.parallax;
        p.x = (p.x + up * gain).clamp(-limit, limit);
        p.y = (p.y + nx * gain).clamp(-limit, limit);
    }

    /// The viewport changed: update the camera and resize the surface in place.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.status == OrnamentStatus::Unmounted {
            return;
        }
        self.viewport = viewport;
        if !viewport.is_empty() {
            self.projection.aspect = viewport.aspect();
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(viewport, viewport.clamped_pixel_ratio(self.config.max_pixel_ratio));
        }
        debug!(
            view = "ornament",
            width = viewport.width,
            height = viewport.height,
            "ornament resized"
        );
    }

    /// Like [`Ornament::resize`], but an ornament mounted into a zero-sized
    /// viewport also acquires its surface once the new size is drawable.
    pub fn resize_with(&mut self, viewport: Viewport, provider: &mut dyn SurfaceProvider) {
        self.resize(viewport);
        if self.awaiting_size && self.status == OrnamentStatus::Degraded && !viewport.is_empty() {
            self.acquire(provider);
        }
    }

    /// Mounted without a drawable size and waiting for one.
    #[inline]
    pub fn is_awaiting_size(&self) -> bool {
        self.awaiting_size
    }

    /// Release the surface and drop geometry. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if self.status == OrnamentStatus::Unmounted {
            debug!(view = "ornament", "unmount of an unmounted ornament ignored");
            return;
        }
        self.release_surface();
        self.geometry = None;
        self.state = OrnamentState::default();
        self.status = OrnamentStatus::Unmounted;
        info!(view = "ornament", "ornament unmounted");
    }

    fn degrade(&mut self) {
        self.release_surface();
        self.geometry = None;
        self.status = OrnamentStatus::Degraded;
    }

    fn release_surface(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
    }

    #[inline]
    pub fn status(&self) -> OrnamentStatus {
        self.status
    }

    /// Whether frames should keep being scheduled.
    #[inline]
    pub fn wants_frames(&self) -> bool {
        self.status == OrnamentStatus::Active
    }

    pub fn state(&self) -> &OrnamentState {
        &self.state
    }

    pub fn geometry(&self) -> Option<&OrnamentGeometry> {
        self.geometry.as_ref()
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn config(&self) -> &OrnamentConfig {
        &self.config
    }
}

impl Drop for Ornament {
    fn drop(&mut self) {
        if self.status != OrnamentStatus::Unmounted {
            self.release_surface();
        }
    }
}
