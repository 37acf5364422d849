//! Owner-scoped one-shot timer registry.
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, trace};

/// Host one-shot delay primitives, e.g. `setTimeout` / `clearTimeout`.
///
/// `clear_timeout` on an id that already fired or was cleared must be a no-op.
pub trait TimerPlatform {
    type Id: Copy + Eq + fmt::Debug + 'static;

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Self::Id;

    fn clear_timeout(&self, id: Self::Id);
}

impl<P: TimerPlatform + ?Sized> TimerPlatform for Rc<P> {
    type Id = P::Id;

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Self::Id {
        (**self).set_timeout(delay, callback)
    }

    fn clear_timeout(&self, id: Self::Id) {
        (**self).clear_timeout(id);
    }
}

/// Opaque handle for a timer scheduled through a [`TimerRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// `None` while the platform call that creates the timer is still in flight.
type ActiveTimers<Id> = Rc<RefCell<BTreeMap<TimerHandle, Option<Id>>>>;

/// Registry of pending one-shot timers scheduled through `P`.
///
/// A timer's entry is removed the moment it fires, before its callback runs,
/// so the callback may freely call [`TimerRegistry::cancel_all`] or reschedule.
/// Dropping the registry cancels everything still pending.
pub struct TimerRegistry<P: TimerPlatform> {
    platform: P,
    next_handle: Cell<u64>,
    active: ActiveTimers<P::Id>,
}

impl<P: TimerPlatform> TimerRegistry<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            next_handle: Cell::new(0),
            active: Rc::new(RefCell::new(BTreeMap::new())),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Run `callback` once after `delay`, unless cancelled first.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + 'static,
    {
        let handle = TimerHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.active.borrow_mut().insert(handle, None);

        let active = Rc::clone(&self.active);
        let fire = Box::new(move || {
            let live = active.borrow_mut().remove(&handle).is_some();
            if live {
                trace!("Timer {:?} fired.", handle);
                callback();
            }
        });
        let id = self.platform.set_timeout(delay, fire);

        // Skipped when the platform fired synchronously and the entry is already gone.
        if let Some(slot) = self.active.borrow_mut().get_mut(&handle) {
            *slot = Some(id);
        }
        trace!("Scheduled timer {:?} in {:?}.", handle, delay);
        handle
    }

    /// Cancel a pending timer. Fired, cancelled or unknown handles are ignored and return `false`.
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        let entry = self.active.borrow_mut().remove(&handle);
        match entry {
            Some(id) => {
                if let Some(id) = id {
                    self.platform.clear_timeout(id);
                }
                trace!("Cancelled timer {:?}.", handle);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer. Safe to call on an empty registry.
    pub fn cancel_all(&self) -> usize {
        let drained = std::mem::take(&mut *self.active.borrow_mut());
        for id in drained.values().flatten() {
            self.platform.clear_timeout(*id);
        }
        if !drained.is_empty() {
            debug!("Cancelled all {} timers.", drained.len());
        }
        drained.len()
    }

    pub fn contains(&self, handle: TimerHandle) -> bool {
        self.active.borrow().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.borrow().is_empty()
    }
}

impl<P: TimerPlatform> Drop for TimerRegistry<P> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl<P: TimerPlatform> fmt::Debug for TimerRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("active", &self.len())
            .finish()
    }
}
