#![forbid(unsafe_code)]

//! Scoped acquisition of global input listeners.
//!
//! A [`ListenerRegistry`] mirrors the page's global listener table. Components
//! attach through [`ListenerRegistry::acquire`], which returns a
//! [`ListenerGuard`]; the listeners stay attached exactly as long as the guard
//! lives.
//!
//! # Invariants
//!
//! 1. Dropping a guard detaches everything it attached, whether the owner
//!    unmounted normally, bailed out with `?`, or unwound.
//! 2. A failed `acquire` leaves nothing attached: kinds attached before the
//!    failing one are released before the error is returned.
//! 3. `release` is idempotent.
//! 4. Guards are independent: releasing one never detaches listeners held by
//!    another guard, even one of the same owner with overlapping kinds.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::scheduler::OwnerId;

bitflags! {
    /// Global DOM events a component can listen to.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ListenerKinds: u16 {
        const MOUSE_MOVE  = 1 << 0;
        const MOUSE_OVER  = 1 << 1;
        const MOUSE_DOWN  = 1 << 2;
        const MOUSE_UP    = 1 << 3;
        const TOUCH_START = 1 << 4;
        const TOUCH_MOVE  = 1 << 5;
        const TOUCH_END   = 1 << 6;
        const RESIZE      = 1 << 7;
        const SCROLL      = 1 << 8;

        /// Everything the custom cursor needs.
        const POINTER = Self::MOUSE_MOVE.bits()
            | Self::MOUSE_OVER.bits()
            | Self::MOUSE_DOWN.bits()
            | Self::MOUSE_UP.bits()
            | Self::TOUCH_START.bits()
            | Self::TOUCH_MOVE.bits()
            | Self::TOUCH_END.bits();
    }
}

/// A listener kind could not be attached (e.g. no touch support).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachError {
    pub kind: ListenerKinds,
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener not supported by host: {:?}", self.kind)
    }
}

impl std::error::Error for AttachError {}

/// Identifies one [`ListenerGuard`] within its registry.
pub type GuardId = u64;

#[derive(Debug, Default)]
struct RegistryInner {
    /// Live registrations, one entry per guard.
    attached: BTreeMap<GuardId, (OwnerId, ListenerKinds)>,
    next_guard: GuardId,
    unsupported: ListenerKinds,
    attach_calls: u64,
    detach_calls: u64,
}

/// Shared, single-threaded listener table.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark kinds the host cannot provide; attaching them fails.
    pub fn set_unsupported(&self, kinds: ListenerKinds) {
        self.inner.borrow_mut().unsupported = kinds;
    }

    /// Attach `kinds` for `owner`, one kind at a time.
    pub fn acquire(
        &self,
        owner: OwnerId,
        kinds: ListenerKinds,
    ) -> Result<ListenerGuard, AttachError> {
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.next_guard += 1;
            inner.next_guard
        };
        // The guard exists before the first attach so an early return
        // releases whatever was attached so far.
        let mut guard = ListenerGuard {
            registry: self.clone(),
            id,
            owner,
            kinds: ListenerKinds::empty(),
        };
        for kind in kinds.iter() {
            self.attach_one(id, owner, kind)?;
            guard.kinds |= kind;
        }
        Ok(guard)
    }

    fn attach_one(
        &self,
        id: GuardId,
        owner: OwnerId,
        kind: ListenerKinds,
    ) -> Result<(), AttachError> {
        let mut inner = self.inner.borrow_mut();
        if inner.unsupported.intersects(kind) {
            return Err(AttachError { kind });
        }
        inner.attach_calls += 1;
        inner
            .attached
            .entry(id)
            .or_insert((owner, ListenerKinds::empty()))
            .1 |= kind;
        Ok(())
    }

    fn detach(&self, id: GuardId, kinds: ListenerKinds) {
        let mut inner = self.inner.borrow_mut();
        inner.detach_calls += kinds.iter().count() as u64;
        if let Some((_, current)) = inner.attached.get_mut(&id) {
            current.remove(kinds);
            if current.is_empty() {
                inner.attached.remove(&id);
            }
        }
    }

    /// Kinds currently attached for `owner`, across all of its guards.
    pub fn attached(&self, owner: OwnerId) -> ListenerKinds {
        self.inner
            .borrow()
            .attached
            .values()
            .filter(|(o, _)| *o == owner)
            .fold(ListenerKinds::empty(), |acc, (_, k)| acc | *k)
    }

    /// Whether any owner listens to `kind`.
    pub fn is_listening(&self, kind: ListenerKinds) -> bool {
        self.inner
            .borrow()
            .attached
            .values()
            .any(|(_, k)| k.intersects(kind))
    }

    /// Total attached listeners, counting each guard's kinds separately.
    pub fn total_attached(&self) -> usize {
        self.inner
            .borrow()
            .attached
            .values()
            .map(|(_, k)| k.iter().count())
            .sum()
    }

    /// Diagnostic: (attach, detach) call counts.
    pub fn call_counts(&self) -> (u64, u64) {
        let inner = self.inner.borrow();
        (inner.attach_calls, inner.detach_calls)
    }
}

/// Release token for attached listeners.
#[derive(Debug)]
#[must_use = "listeners detach as soon as the guard is dropped"]
pub struct ListenerGuard {
    registry: ListenerRegistry,
    id: GuardId,
    owner: OwnerId,
    kinds: ListenerKinds,
}

impl ListenerGuard {
    /// Detach now. Safe to call more than once.
    pub fn release(&mut self) {
        if !self.kinds.is_empty() {
            self.registry.detach(self.id, self.kinds);
            self.kinds = ListenerKinds::empty();
        }
    }

    /// Kinds still held by this guard.
    pub fn kinds(&self) -> ListenerKinds {
        self.kinds
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn id(&self) -> GuardId {
        self.id
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release();
    }
}
