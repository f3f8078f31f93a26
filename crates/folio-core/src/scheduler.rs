#![forbid(unsafe_code)]

//! Frame callbacks and fixed-interval timers with cancellable handles.
//!
//! Both schedulers are host-driven: nothing here reads a clock or spawns a
//! thread. The host calls [`FrameScheduler::run_frame`] once per display frame
//! and [`TimerSet::advance`] with its monotonic time, then dispatches the
//! returned handles to their owners.
//!
//! # Invariants
//!
//! 1. At most one frame request per owner is pending; a second request while
//!    one is pending returns the same handle (single flight).
//! 2. `run_frame` drains the pending set before returning, so a callback that
//!    re-requests lands in the *next* frame, never the current one.
//! 3. A cancelled handle is never returned again.
//! 4. Timer fires are returned in deadline order; a timer that fell behind
//!    catches up at most [`MAX_CATCH_UP`] periods per advance.

use std::time::Duration;

/// Identifies the component that owns a frame request or timer.
pub type OwnerId = u32;

/// Most missed periods a single timer replays in one [`TimerSet::advance`].
pub const MAX_CATCH_UP: u32 = 8;

/// Shortest accepted timer interval.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// A pending animation-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle {
    owner: OwnerId,
    seq: u64,
}

impl FrameHandle {
    #[inline]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }
}

/// `requestAnimationFrame` / `cancelAnimationFrame`, host-driven.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Vec<FrameHandle>,
    next_seq: u64,
    frames_run: u64,
    cancelled: u64,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a callback on the next frame for `owner`.
    pub fn request(&mut self, owner: OwnerId) -> FrameHandle {
        if let Some(existing) = self.pending.iter().find(|h| h.owner == owner) {
            return *existing;
        }
        let handle = FrameHandle {
            owner,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.push(handle);
        handle
    }

    /// Take every request due this frame, in request order.
    pub fn run_frame(&mut self) -> Vec<FrameHandle> {
        self.frames_run += 1;
        std::mem::take(&mut self.pending)
    }

    /// Cancel one request. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        let removed = before != self.pending.len();
        if removed {
            self.cancelled += 1;
        }
        removed
    }

    /// Cancel whatever `owner` has pending. Returns the number removed.
    pub fn cancel_owner(&mut self, owner: OwnerId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|h| h.owner != owner);
        let removed = before - self.pending.len();
        self.cancelled += removed as u64;
        removed
    }

    /// Whether `owner` has a request waiting.
    pub fn is_pending(&self, owner: OwnerId) -> bool {
        self.pending.iter().any(|h| h.owner == owner)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Diagnostic: frames executed.
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Diagnostic: requests cancelled before running.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

/// A running interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle {
    owner: OwnerId,
    id: u64,
}

impl TimerHandle {
    #[inline]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }
}

/// One timer expiry returned by [`TimerSet::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFire {
    pub handle: TimerHandle,
    /// Scheduled deadline of this fire (not the time it was observed).
    pub due: Duration,
}

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    interval: Duration,
    next_due: Duration,
}

/// `setInterval` / `clearInterval`, host-driven.
#[derive(Debug, Default)]
pub struct TimerSet {
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer that first fires at `now + interval`.
    pub fn start(&mut self, owner: OwnerId, interval: Duration, now: Duration) -> TimerHandle {
        let interval = interval.max(MIN_INTERVAL);
        let handle = TimerHandle {
            owner,
            id: self.next_id,
        };
        self.next_id += 1;
        self.timers.push(Timer {
            handle,
            interval,
            next_due: now.saturating_add(interval),
        });
        handle
    }

    /// Collect every fire due at or before `now`.
    pub fn advance(&mut self, now: Duration) -> Vec<TimerFire> {
        let mut fires = Vec::new();
        for timer in &mut self.timers {
            let mut replayed = 0;
            while timer.next_due <= now {
                if replayed == MAX_CATCH_UP {
                    // Too far behind: drop the backlog and realign.
                    let behind = now - timer.next_due;
                    let skip = behind.as_nanos() / timer.interval.as_nanos() + 1;
                    let skip = u32::try_from(skip).unwrap_or(u32::MAX);
                    timer.next_due = timer
                        .next_due
                        .saturating_add(timer.interval.saturating_mul(skip));
                    break;
                }
                fires.push(TimerFire {
                    handle: timer.handle,
                    due: timer.next_due,
                });
                timer.next_due = timer.next_due.saturating_add(timer.interval);
                replayed += 1;
            }
        }
        fires.sort_by_key(|f| (f.due, f.handle.id));
        fires
    }

    /// Stop one timer. Returns `false` if it was not running.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        before != self.timers.len()
    }

    /// Stop every timer of `owner`. Returns the number stopped.
    pub fn cancel_owner(&mut self, owner: OwnerId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle.owner != owner);
        before - self.timers.len()
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    /// Timers owned by `owner`.
    pub fn count_for(&self, owner: OwnerId) -> usize {
        self.timers.iter().filter(|t| t.handle.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn request_is_single_flight() {
        let mut s = FrameScheduler::new();
        let a = s.request(1);
        let b = s.request(1);
        assert_eq!(a, b);
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn rerequest_during_frame_lands_next_frame() {
        let mut s = FrameScheduler::new();
        s.request(1);
        let due = s.run_frame();
        assert_eq!(due.len(), 1);
        // Callback re-registers itself.
        let next = s.request(1);
        assert_ne!(due[0], next);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.run_frame(), vec![next]);
    }

    #[test]
    fn cancel_removes_only_matching_handle() {
        let mut s = FrameScheduler::new();
        let a = s.request(1);
        s.request(2);
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert_eq!(s.run_frame().len(), 1);
        assert_eq!(s.cancelled_count(), 1);
    }

    #[test]
    fn cancel_stale_handle_keeps_new_request() {
        let mut s = FrameScheduler::new();
        let old = s.request(1);
        s.run_frame();
        let new = s.request(1);
        assert!(!s.cancel(old));
        assert!(s.is_pending(1));
        assert!(s.cancel(new));
    }

    #[test]
    fn cancel_owner_clears_requests() {
        let mut s = FrameScheduler::new();
        s.request(1);
        s.request(2);
        assert_eq!(s.cancel_owner(1), 1);
        assert!(!s.is_pending(1));
        assert!(s.is_pending(2));
    }

    #[test]
    fn timer_fires_each_interval() {
        let mut t = TimerSet::new();
        let h = t.start(1, SEC, Duration::ZERO);
        assert!(t.advance(Duration::from_millis(999)).is_empty());
        let fires = t.advance(SEC);
        assert_eq!(fires, vec![TimerFire { handle: h, due: SEC }]);
        assert!(t.advance(Duration::from_millis(1500)).is_empty());
        assert_eq!(t.advance(2 * SEC).len(), 1);
    }

    #[test]
    fn timer_catches_up_missed_periods() {
        let mut t = TimerSet::new();
        t.start(1, SEC, Duration::ZERO);
        let fires = t.advance(Duration::from_millis(3500));
        let dues: Vec<_> = fires.iter().map(|f| f.due).collect();
        assert_eq!(dues, vec![SEC, 2 * SEC, 3 * SEC]);
    }

    #[test]
    fn catch_up_is_bounded() {
        let mut t = TimerSet::new();
        t.start(1, SEC, Duration::ZERO);
        let fires = t.advance(Duration::from_secs(100));
        assert_eq!(fires.len(), MAX_CATCH_UP as usize);
        // Realigned: nothing more is due at the same instant.
        assert!(t.advance(Duration::from_secs(100)).is_empty());
        assert_eq!(t.advance(Duration::from_secs(101)).len(), 1);
    }

    #[test]
    fn fires_ordered_by_deadline() {
        let mut t = TimerSet::new();
        let slow = t.start(1, 2 * SEC, Duration::ZERO);
        let fast = t.start(2, SEC, Duration::ZERO);
        let order: Vec<_> = t
            .advance(2 * SEC)
            .into_iter()
            .map(|f| f.handle)
            .collect();
        assert_eq!(order, vec![fast, slow, fast]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut t = TimerSet::new();
        let h = t.start(1, SEC, Duration::ZERO);
        assert!(t.cancel(h));
        assert!(!t.is_active(h));
        assert!(t.advance(10 * SEC).is_empty());
    }

    #[test]
    fn cancel_owner_stops_all_its_timers() {
        let mut t = TimerSet::new();
        t.start(1, SEC, Duration::ZERO);
        t.start(1, 2 * SEC, Duration::ZERO);
        t.start(2, SEC, Duration::ZERO);
        assert_eq!(t.cancel_owner(1), 2);
        assert_eq!(t.count_for(1), 0);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut t = TimerSet::new();
        t.start(1, Duration::ZERO, Duration::ZERO);
        assert_eq!(t.advance(Duration::from_millis(3)).len(), 3);
    }
}
