#![forbid(unsafe_code)]

//! Host-driven view runtime.
//!
//! [`ViewHost`] owns everything a mounted page view holds on to: frame
//! requests, interval timers, global listeners and the motion components
//! themselves. The embedding environment drives it:
//!
//! 1. Mount components with the `mount_*` methods.
//! 2. Forward DOM events via [`ViewHost::push_event`].
//! 3. Call [`ViewHost::step`] once per display frame with the elapsed time.
//! 4. Read component state for rendering.
//!
//! # Ordering
//!
//! Within one `step`, queued input is applied in arrival order first, then
//! the frame callbacks due this frame run, then interval timers fire. A frame
//! callback that wants another frame re-requests it; the request lands in
//! the next `step`, so no component ever has two frames in flight.
//!
//! # Cancellation
//!
//! Unmounting a component (directly, through [`ViewHost::navigate_away`], or
//! by dropping the host) cancels its pending frame, stops its timers and
//! releases its listeners unconditionally. Nothing runs for it afterwards.

use std::collections::VecDeque;
use std::time::Duration;

use folio_core::event::{HostEvent, PointerEvent};
use folio_core::geometry::{Bounds, Viewport};
use folio_core::lifecycle::{ListenerGuard, ListenerKinds, ListenerRegistry};
use folio_core::pointer::{IndicatorState, PointerTracker};
use folio_core::scheduler::{FrameScheduler, OwnerId, TimerFire, TimerHandle, TimerSet};
use folio_layout::reveal::{RevealTracker, scroll_progress};
use tracing::{debug, info, warn};

use crate::DeterministicClock;
use crate::config::HostConfig;
use crate::live::{LiveCounter, clock_label};
use crate::ornament::Ornament;
use crate::surface::SurfaceProvider;

/// A component a view can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    /// Custom cursor.
    Pointer,
    /// Hero torus knot.
    Ornament,
    /// "Hours logged" counter.
    LiveCounter,
    /// Header wall clock.
    Clock,
    /// Scroll-revealed sections.
    Reveal,
    /// Side scroll-progress bar.
    ScrollIndicator,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Pointer,
        Component::Ornament,
        Component::LiveCounter,
        Component::Clock,
        Component::Reveal,
        Component::ScrollIndicator,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    /// Scheduler owner id.
    #[inline]
    pub const fn owner(self) -> OwnerId {
        self as OwnerId + 1
    }

    fn from_owner(owner: OwnerId) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.owner() == owner)
    }

    /// Global listeners the component needs.
    pub fn listener_kinds(self) -> ListenerKinds {
        match self {
            Self::Pointer => ListenerKinds::POINTER,
            Self::Ornament => ListenerKinds::RESIZE | ListenerKinds::MOUSE_MOVE,
            Self::LiveCounter | Self::Reveal => ListenerKinds::SCROLL | ListenerKinds::RESIZE,
            Self::Clock => ListenerKinds::empty(),
            Self::ScrollIndicator => ListenerKinds::SCROLL | ListenerKinds::RESIZE,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Ornament => "ornament",
            Self::LiveCounter => "live_counter",
            Self::Clock => "clock",
            Self::Reveal => "reveal",
            Self::ScrollIndicator => "scroll_indicator",
        }
    }
}

/// Listener kind that delivers a pointer event.
fn event_kind(event: &PointerEvent) -> ListenerKinds {
    match event {
        PointerEvent::Move { .. } => ListenerKinds::MOUSE_MOVE,
        PointerEvent::TouchMove { .. } => ListenerKinds::TOUCH_MOVE,
        PointerEvent::Down => ListenerKinds::MOUSE_DOWN,
        PointerEvent::Up => ListenerKinds::MOUSE_UP,
        PointerEvent::TouchStart => ListenerKinds::TOUCH_START,
        PointerEvent::TouchEnd => ListenerKinds::TOUCH_END,
        PointerEvent::Over { .. } => ListenerKinds::MOUSE_OVER,
    }
}

/// Result of a single [`ViewHost::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Input events applied during this step.
    pub events_processed: u32,
    /// Frame callbacks run during this step.
    pub frames_run: u32,
    /// Timer fires dispatched during this step.
    pub timers_fired: u32,
    /// Live counter display value emitted this step, if it changed.
    pub live_value: Option<i64>,
    /// Monotonic time after the step.
    pub now: Duration,
}

// ---------------------------------------------------------------------------
// Mounted component slots
// ---------------------------------------------------------------------------

struct Slot<T> {
    inner: T,
    /// Held for the listeners' lifetime; dropping it detaches them.
    _listeners: Option<ListenerGuard>,
    timer: Option<TimerHandle>,
}

struct LiveSlot {
    counter: LiveCounter,
    reveal: RevealTracker,
    /// Document-space bounds of the counter card.
    bounds: Bounds,
}

struct ClockSlot {
    seconds_at_mount: u64,
    mounted_at: Duration,
    label: String,
}

struct RevealSlot {
    tracker: RevealTracker,
    bounds: Bounds,
}

/// Owner of a mounted view's callbacks, timers and listeners.
pub struct ViewHost {
    config: HostConfig,
    clock: DeterministicClock,
    frames: FrameScheduler,
    timers: TimerSet,
    listeners: ListenerRegistry,
    queue: VecDeque<HostEvent>,
    viewport: Viewport,
    scroll_y: f32,
    document_height: f32,

    pointer: Option<Slot<PointerTracker>>,
    ornament: Option<Slot<Ornament>>,
    /// Kept while the ornament is mounted so a resize can re-acquire.
    surface_provider: Option<Box<dyn SurfaceProvider>>,
    live: Option<Slot<LiveSlot>>,
    wall_clock: Option<Slot<ClockSlot>>,
    reveals: Option<Slot<Vec<RevealSlot>>>,
    scroll_indicator: Option<Slot<f32>>,
    /// Latest live counter emission within the current step.
    live_value: Option<i64>,

    /// Diagnostic: frame callbacks run per component.
    frame_invocations: [u64; Component::ALL.len()],
    /// Diagnostic: timer fires dispatched per component.
    timer_invocations: [u64; Component::ALL.len()],
}

impl std::fmt::Debug for ViewHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mounted: Vec<Component> = Component::ALL
            .into_iter()
            .filter(|c| self.is_mounted(*c))
            .collect();
        f.debug_struct("ViewHost")
            .field("now", &self.clock.now())
            .field("viewport", &self.viewport)
            .field("mounted", &mounted)
            .field("pending_frames", &self.frames.pending())
            .field("timers", &self.timers.len())
            .finish()
    }
}

impl ViewHost {
    #[must_use]
    pub fn new(config: HostConfig, viewport: Viewport) -> Self {
        Self::with_listeners(config, viewport, ListenerRegistry::new())
    }

    /// Share an existing listener table (e.g. one that reports missing
    /// touch support).
    #[must_use]
    pub fn with_listeners(
        config: HostConfig,
        viewport: Viewport,
        listeners: ListenerRegistry,
    ) -> Self {
        Self {
            config,
            clock: DeterministicClock::new(),
            frames: FrameScheduler::new(),
            timers: TimerSet::new(),
            listeners,
            queue: VecDeque::new(),
            viewport,
            scroll_y: 0.0,
            document_height: viewport.height,
            pointer: None,
            ornament: None,
            surface_provider: None,
            live: None,
            wall_clock: None,
            reveals: None,
            scroll_indicator: None,
            live_value: None,
            frame_invocations: [0; Component::ALL.len()],
            timer_invocations: [0; Component::ALL.len()],
        }
    }

    // -----------------------------------------------------------------------
    // Mounting
    // -----------------------------------------------------------------------

    /// Attach `component`'s listeners, dropping kinds the host cannot
    /// provide. Returns `None` when nothing could be attached.
    fn acquire_listeners(&self, component: Component) -> Option<ListenerGuard> {
        let mut kinds = component.listener_kinds();
        while !kinds.is_empty() {
            match self.listeners.acquire(component.owner(), kinds) {
                Ok(guard) => return Some(guard),
                Err(err) => {
                    warn!(
                        view = component.name(),
                        reason = %err,
                        "listener unavailable; continuing without it"
                    );
                    kinds.remove(err.kind);
                }
            }
        }
        None
    }

    fn already_mounted(&self, component: Component) -> bool {
        if self.is_mounted(component) {
            debug!(view = component.name(), "mount of a mounted component ignored");
            return true;
        }
        false
    }

    /// Mount the custom cursor.
    pub fn mount_pointer(&mut self) {
        if self.already_mounted(Component::Pointer) {
            return;
        }
        let listeners = self.acquire_listeners(Component::Pointer);
        self.pointer = Some(Slot {
            inner: PointerTracker::new(self.config.pointer.clone()),
            _listeners: listeners,
            timer: None,
        });
        self.frames.request(Component::Pointer.owner());
        info!(view = "pointer", "mounted");
    }

    /// Mount the hero ornament, drawing through `provider`.
    ///
    /// The host keeps the provider until the ornament unmounts: an ornament
    /// mounted into a zero-sized viewport acquires its surface on the first
    /// resize to a drawable size.
    pub fn mount_ornament<P>(&mut self, provider: P, seed: u32)
    where
        P: SurfaceProvider + 'static,
    {
        if self.already_mounted(Component::Ornament) {
            return;
        }
        let mut provider: Box<dyn SurfaceProvider> = Box::new(provider);
        let listeners = self.acquire_listeners(Component::Ornament);
        let ornament = Ornament::mount(
            self.config.ornament.clone(),
            provider.as_mut(),
            self.viewport,
            seed,
        );
        if ornament.wants_frames() {
            self.frames.request(Component::Ornament.owner());
        }
        self.surface_provider = Some(provider);
        self.ornament = Some(Slot {
            inner: ornament,
            _listeners: listeners,
            timer: None,
        });
    }

    /// Mount the live counter card at document-space `bounds`.
    pub fn mount_live_counter(&mut self, bounds: Bounds, seed: u32) {
        if self.already_mounted(Component::LiveCounter) {
            return;
        }
        let listeners = self.acquire_listeners(Component::LiveCounter);
        let timer = self.timers.start(
            Component::LiveCounter.owner(),
            self.config.live.interval,
            self.clock.now(),
        );
        self.live = Some(Slot {
            inner: LiveSlot {
                counter: LiveCounter::new(self.config.live.clone(), seed),
                reveal: RevealTracker::new(self.config.live_reveal.clone()),
                bounds,
            },
            _listeners: listeners,
            timer: Some(timer),
        });
        self.observe_live();
        info!(view = "live_counter", "mounted");
    }

    /// Mount the header clock, starting at `seconds_of_day` local time.
    pub fn mount_clock(&mut self, seconds_of_day: u64) {
        if self.already_mounted(Component::Clock) {
            return;
        }
        let timer = self.timers.start(
            Component::Clock.owner(),
            self.config.clock.interval,
            self.clock.now(),
        );
        self.wall_clock = Some(Slot {
            inner: ClockSlot {
                seconds_at_mount: seconds_of_day,
                mounted_at: self.clock.now(),
                label: clock_label(seconds_of_day),
            },
            _listeners: None,
            timer: Some(timer),
        });
    }

    /// Register a scroll-revealed section at document-space `bounds`.
    /// Returns its index for [`ViewHost::reveal`].
    pub fn mount_reveal(&mut self, bounds: Bounds) -> usize {
        if self.reveals.is_none() {
            let listeners = self.acquire_listeners(Component::Reveal);
            self.reveals = Some(Slot {
                inner: Vec::new(),
                _listeners: listeners,
                timer: None,
            });
        }
        let config = self.config.reveal.clone();
        let index = match self.reveals.as_mut() {
            Some(slot) => {
                slot.inner.push(RevealSlot {
                    tracker: RevealTracker::new(config),
                    bounds,
                });
                slot.inner.len() - 1
            }
            None => 0,
        };
        self.observe_reveals();
        index
    }

    /// Mount the scroll-progress bar.
    pub fn mount_scroll_indicator(&mut self) {
        if self.already_mounted(Component::ScrollIndicator) {
            return;
        }
        let listeners = self.acquire_listeners(Component::ScrollIndicator);
        let progress = scroll_progress(self.scroll_y, self.document_height, self.viewport.height);
        self.scroll_indicator = Some(Slot {
            inner: progress,
            _listeners: listeners,
            timer: None,
        });
    }

    // -----------------------------------------------------------------------
    // Unmounting
    // -----------------------------------------------------------------------

    /// Tear `component` down: cancel its frame, stop its timers, release its
    /// listeners. Unmounting something that is not mounted does nothing.
    pub fn unmount(&mut self, component: Component) {
        if !self.is_mounted(component) {
            debug!(view = component.name(), "unmount of an unmounted component ignored");
            return;
        }
        let owner = component.owner();
        let frames = self.frames.cancel_owner(owner);
        let timers = self.timers.cancel_owner(owner);

        // Dropping the slot releases the listener guard.
        match component {
            Component::Pointer => {
                self.pointer = None;
            }
            Component::Ornament => {
                if let Some(mut slot) = self.ornament.take() {
                    slot.inner.unmount();
                }
                self.surface_provider = None;
            }
            Component::LiveCounter => {
                if let Some(mut slot) = self.live.take() {
                    slot.inner.counter.teardown();
                }
            }
            Component::Clock => {
                self.wall_clock = None;
            }
            Component::Reveal => {
                self.reveals = None;
            }
            Component::ScrollIndicator => {
                self.scroll_indicator = None;
            }
        }
        info!(
            view = component.name(),
            cancelled_frames = frames,
            stopped_timers = timers,
            "unmounted"
        );
    }

    /// Leave the page: unmount every component.
    pub fn navigate_away(&mut self) {
        for component in Component::ALL {
            if self.is_mounted(component) {
                self.unmount(component);
            }
        }
        self.queue.clear();
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Queue an input event for the next [`ViewHost::step`].
    pub fn push_event(&mut self, event: impl Into<HostEvent>) {
        self.queue.push_back(event.into());
    }

    /// Advance time by `dt`: apply queued input, run due frames, fire timers.
    pub fn step(&mut self, dt: Duration) -> StepResult {
        self.clock.advance(dt);
        let now = self.clock.now();
        self.live_value = None;

        let mut events_processed = 0u32;
        while let Some(event) = self.queue.pop_front() {
            self.dispatch_event(event);
            events_processed += 1;
        }

        let mut frames_run = 0u32;
        for handle in self.frames.run_frame() {
            let Some(component) = Component::from_owner(handle.owner()) else {
                continue;
            };
            self.frame_invocations[component.index()] += 1;
            frames_run += 1;
            if self.run_frame_callback(component, dt, now) {
                self.frames.request(handle.owner());
            }
        }

        let fires = self.timers.advance(now);
        let timers_fired = fires.len() as u32;
        for fire in fires {
            self.dispatch_timer(fire);
        }

        StepResult {
            events_processed,
            frames_run,
            timers_fired,
            live_value: self.live_value,
            now,
        }
    }

    fn listening(&self, component: Component, kind: ListenerKinds) -> bool {
        self.listeners.attached(component.owner()).contains(kind)
    }

    fn dispatch_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Pointer(pointer_event) => {
                let kind = event_kind(&pointer_event);
                if self.listening(Component::Pointer, kind) {
                    if let Some(slot) = self.pointer.as_mut() {
                        slot.inner.handle(&pointer_event);
                    }
                }
                if kind == ListenerKinds::MOUSE_MOVE
                    && self.listening(Component::Ornament, kind)
                    && let (Some(slot), Some(p)) = (self.ornament.as_mut(), pointer_event.position())
                {
                    slot.inner.on_pointer(p);
                }
            }
            HostEvent::Resize(viewport) => {
                self.viewport = viewport;
                if self.listening(Component::Ornament, ListenerKinds::RESIZE) {
                    if let (Some(slot), Some(provider)) =
                        (self.ornament.as_mut(), self.surface_provider.as_mut())
                    {
                        let was_active = slot.inner.wants_frames();
                        slot.inner.resize_with(viewport, provider.as_mut());
                        if !was_active && slot.inner.wants_frames() {
                            self.frames.request(Component::Ornament.owner());
                        }
                    }
                }
                self.refresh_scroll_dependents();
            }
            HostEvent::Scroll {
                scroll_y,
                document_height,
            } => {
                self.scroll_y = scroll_y;
                self.document_height = document_height;
                self.refresh_scroll_dependents();
            }
        }
    }

    fn refresh_scroll_dependents(&mut self) {
        self.observe_live();
        self.observe_reveals();
        let progress = scroll_progress(self.scroll_y, self.document_height, self.viewport.height);
        if let Some(slot) = self.scroll_indicator.as_mut() {
            slot.inner = progress;
        }
    }

    /// Element bounds in viewport coordinates.
    fn on_screen(&self, bounds: Bounds) -> Bounds {
        Bounds::new(bounds.left, bounds.top - self.scroll_y, bounds.width, bounds.height)
    }

    fn observe_live(&mut self) {
        let viewport = self.viewport;
        let Some(bounds) = self.live.as_ref().map(|s| self.on_screen(s.inner.bounds)) else {
            return;
        };
        let Some(slot) = self.live.as_mut() else {
            return;
        };
        if slot.inner.reveal.observe(bounds, viewport) {
            slot.inner.counter.start();
            self.frames.request(Component::LiveCounter.owner());
        }
    }

    fn observe_reveals(&mut self) {
        let viewport = self.viewport;
        let scroll_y = self.scroll_y;
        let Some(slot) = self.reveals.as_mut() else {
            return;
        };
        let mut entered = false;
        for reveal in &mut slot.inner {
            let b = reveal.bounds;
            let on_screen = Bounds::new(b.left, b.top - scroll_y, b.width, b.height);
            entered |= reveal.tracker.observe(on_screen, viewport);
        }
        if entered {
            self.frames.request(Component::Reveal.owner());
        }
    }

    /// Run one frame for `component`. Returns whether it wants another.
    fn run_frame_callback(&mut self, component: Component, dt: Duration, now: Duration) -> bool {
        match component {
            Component::Pointer => match self.pointer.as_mut() {
                Some(slot) => {
                    slot.inner.on_frame(dt);
                    true
                }
                None => false,
            },
            Component::Ornament => match self.ornament.as_mut() {
                Some(slot) => {
                    slot.inner.on_frame(now);
                    slot.inner.wants_frames()
                }
                None => false,
            },
            Component::LiveCounter => match self.live.as_mut() {
                Some(slot) => {
                    slot.inner.counter.tick(dt);
                    // Drained every frame so emissions never pile up.
                    if let Some(value) = slot.inner.counter.take_latest_change() {
                        self.live_value = Some(value);
                    }
                    slot.inner.counter.is_animating()
                }
                None => false,
            },
            Component::Reveal => match self.reveals.as_mut() {
                Some(slot) => {
                    for reveal in &mut slot.inner {
                        reveal.tracker.tick(dt);
                    }
                    slot.inner.iter().any(|r| !r.tracker.is_settled())
                }
                None => false,
            },
            Component::Clock | Component::ScrollIndicator => false,
        }
    }

    fn dispatch_timer(&mut self, fire: TimerFire) {
        let Some(component) = Component::from_owner(fire.handle.owner()) else {
            return;
        };
        self.timer_invocations[component.index()] += 1;
        match component {
            Component::LiveCounter => {
                let Some(slot) = self.live.as_mut() else {
                    return;
                };
                if slot.inner.counter.on_interval() {
                    self.frames.request(Component::LiveCounter.owner());
                }
            }
            Component::Clock => {
                if let Some(slot) = self.wall_clock.as_mut() {
                    let c = &mut slot.inner;
                    let since = fire.due.saturating_sub(c.mounted_at).as_secs();
                    c.label = clock_label(c.seconds_at_mount + since);
                }
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn is_mounted(&self, component: Component) -> bool {
        match component {
            Component::Pointer => self.pointer.is_some(),
            Component::Ornament => self.ornament.is_some(),
            Component::LiveCounter => self.live.is_some(),
            Component::Clock => self.wall_clock.is_some(),
            Component::Reveal => self.reveals.is_some(),
            Component::ScrollIndicator => self.scroll_indicator.is_some(),
        }
    }

    /// Frame callbacks run for `component` so far.
    pub fn frame_invocations(&self, component: Component) -> u64 {
        self.frame_invocations[component.index()]
    }

    /// Timer fires dispatched to `component` so far.
    pub fn timer_invocations(&self, component: Component) -> u64 {
        self.timer_invocations[component.index()]
    }

    /// Whether `component` has a frame request outstanding.
    pub fn frame_pending(&self, component: Component) -> bool {
        self.frames.is_pending(component.owner())
    }

    /// Interval timers still running for `component`.
    pub fn active_timers(&self, component: Component) -> usize {
        self.timers.count_for(component.owner())
    }

    /// Handle of `component`'s interval timer, if it has one.
    pub fn timer(&self, component: Component) -> Option<TimerHandle> {
        match component {
            Component::LiveCounter => self.live.as_ref().and_then(|s| s.timer),
            Component::Clock => self.wall_clock.as_ref().and_then(|s| s.timer),
            _ => None,
        }
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn pointer(&self) -> Option<&PointerTracker> {
        self.pointer.as_ref().map(|s| &s.inner)
    }

    /// Cursor drawing state, `None` until the first pointer input.
    pub fn pointer_indicator(&self) -> Option<IndicatorState> {
        self.pointer().and_then(PointerTracker::indicator)
    }

    pub fn ornament(&self) -> Option<&Ornament> {
        self.ornament.as_ref().map(|s| &s.inner)
    }

    pub fn live_counter(&self) -> Option<&LiveCounter> {
        self.live.as_ref().map(|s| &s.inner.counter)
    }

    /// Current `HH:MM:SS` text of the header clock.
    pub fn clock_label(&self) -> Option<&str> {
        self.wall_clock.as_ref().map(|s| s.inner.label.as_str())
    }

    pub fn reveal(&self, index: usize) -> Option<&RevealTracker> {
        self.reveals
            .as_ref()
            .and_then(|s| s.inner.get(index))
            .map(|r| &r.tracker)
    }

    /// Scroll progress in percent, if the indicator is mounted.
    pub fn scroll_progress(&self) -> Option<f32> {
        self.scroll_indicator.as_ref().map(|s| s.inner)
    }
}

impl Drop for ViewHost {
    fn drop(&mut self) {
        self.navigate_away();
    }
}
