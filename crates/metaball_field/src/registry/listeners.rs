//! Owner-scoped event listener registry.
//!
//! [`EventRegistry`] mirrors every listener it has subscribed on an
//! [`EventPlatform`] so that a single call can release all of them, or only
//! the ones attached to one target.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

/// A shared event callback. Two listeners are equal when they wrap the same closure allocation.
pub struct Listener<E> {
    f: Rc<dyn Fn(&E)>,
}

impl<E> Listener<E> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&E) + 'static,
    {
        Self { f: Rc::new(f) }
    }

    #[inline]
    pub fn call(&self, event: &E) {
        (self.f)(event);
    }

    /// Identity comparison on the closure allocation.
    #[inline]
    pub fn same(&self, other: &Listener<E>) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.f), Rc::as_ptr(&other.f))
    }
}

impl<E> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<E> PartialEq for Listener<E> {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl<E> Eq for Listener<E> {}

impl<E> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.f) as *const ())
    }
}

/// Host subscribe/unsubscribe primitives, e.g. DOM `addEventListener`.
pub trait EventPlatform {
    type Target: Clone + PartialEq + fmt::Debug;
    type Event;

    fn subscribe(&self, target: &Self::Target, kind: &str, listener: &Listener<Self::Event>);

    fn unsubscribe(&self, target: &Self::Target, kind: &str, listener: &Listener<Self::Event>);
}

impl<P: EventPlatform + ?Sized> EventPlatform for Rc<P> {
    type Target = P::Target;
    type Event = P::Event;

    fn subscribe(&self, target: &Self::Target, kind: &str, listener: &Listener<Self::Event>) {
        (**self).subscribe(target, kind, listener);
    }

    fn unsubscribe(&self, target: &Self::Target, kind: &str, listener: &Listener<Self::Event>) {
        (**self).unsubscribe(target, kind, listener);
    }
}

/// One live subscription held by an [`EventRegistry`].
pub struct EventRecord<T, E> {
    pub target: T,
    pub kind: String,
    pub listener: Listener<E>,
}

impl<T: Clone, E> Clone for EventRecord<T, E> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            kind: self.kind.clone(),
            listener: self.listener.clone(),
        }
    }
}

impl<T: fmt::Debug, E> fmt::Debug for EventRecord<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRecord")
            .field("target", &self.target)
            .field("kind", &self.kind)
            .field("listener", &self.listener)
            .finish()
    }
}

impl<T: PartialEq, E> EventRecord<T, E> {
    fn matches(&self, target: &T, kind: &str, listener: &Listener<E>) -> bool {
        self.target == *target && self.kind == kind && self.listener.same(listener)
    }
}

/// Registry of event listeners subscribed through `P`.
///
/// Every record corresponds to exactly one platform subscription. Identical
/// `(target, kind, listener)` tuples are recorded once. Bookkeeping is never
/// borrowed while the platform is called, so listeners and platforms may call
/// back into the registry. Dropping the registry unsubscribes everything it holds.
pub struct EventRegistry<P: EventPlatform> {
    platform: P,
    records: RefCell<Vec<EventRecord<P::Target, P::Event>>>,
}

impl<P: EventPlatform> EventRegistry<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            records: RefCell::new(Vec::new()),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Subscribe `listener` for `kind` events on `target`.
    ///
    /// Returns `false` without touching the platform if the identical tuple is already registered.
    pub fn add(&self, target: &P::Target, kind: &str, listener: &Listener<P::Event>) -> bool {
        if self.contains(target, kind, listener) {
            trace!("Listener for '{}' on {:?} already registered.", kind, target);
            return false;
        }
        self.platform.subscribe(target, kind, listener);
        self.records.borrow_mut().push(EventRecord {
            target: target.clone(),
            kind: kind.to_owned(),
            listener: listener.clone(),
        });
        trace!("Added listener for '{}' on {:?}.", kind, target);
        true
    }

    /// Unsubscribe one listener. Unknown tuples are ignored and return `false`.
    pub fn remove(&self, target: &P::Target, kind: &str, listener: &Listener<P::Event>) -> bool {
        let removed = {
            let mut records = self.records.borrow_mut();
            let idx = records
                .iter()
                .position(|r| r.matches(target, kind, listener));
            idx.map(|idx| records.remove(idx))
        };
        match removed {
            Some(record) => {
                self.release(&record);
                trace!("Removed listener for '{}' on {:?}.", kind, target);
                true
            }
            None => false,
        }
    }

    /// Unsubscribe every listener attached to `target`, leaving all others in place.
    pub fn remove_all_for_target(&self, target: &P::Target) -> usize {
        let drained: Vec<_> = {
            let mut records = self.records.borrow_mut();
            let (drained, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *records)
                .into_iter()
                .partition(|r| r.target == *target);
            *records = kept;
            drained
        };
        for record in &drained {
            self.release(record);
        }
        if !drained.is_empty() {
            debug!("Removed {} listeners from {:?}.", drained.len(), target);
        }
        drained.len()
    }

    /// Unsubscribe every listener. Safe to call on an empty registry.
    pub fn remove_all(&self) -> usize {
        let drained = std::mem::take(&mut *self.records.borrow_mut());
        for record in &drained {
            self.release(record);
        }
        if !drained.is_empty() {
            debug!("Removed all {} listeners.", drained.len());
        }
        drained.len()
    }

    pub fn contains(&self, target: &P::Target, kind: &str, listener: &Listener<P::Event>) -> bool {
        self.records
            .borrow()
            .iter()
            .any(|r| r.matches(target, kind, listener))
    }

    /// Number of records attached to `target`.
    pub fn len_for_target(&self, target: &P::Target) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.target == *target)
            .count()
    }

    /// Snapshot of the current records.
    pub fn records(&self) -> Vec<EventRecord<P::Target, P::Event>> {
        self.records.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn release(&self, record: &EventRecord<P::Target, P::Event>) {
        self.platform
            .unsubscribe(&record.target, &record.kind, &record.listener);
    }
}

impl<P: EventPlatform> Drop for EventRegistry<P> {
    fn drop(&mut self) {
        self.remove_all();
    }
}

impl<P: EventPlatform> fmt::Debug for EventRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("records", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    /// Platform that counts calls and keeps the set of live subscriptions.
    #[derive(Default)]
    struct CountingPlatform {
        subscribes: Cell<usize>,
        unsubscribes: Cell<usize>,
        live: RefCell<Vec<(&'static str, String, Listener<u32>)>>,
    }

    impl EventPlatform for CountingPlatform {
        type Target = &'static str;
        type Event = u32;

        fn subscribe(&self, target: &&'static str, kind: &str, listener: &Listener<u32>) {
            self.subscribes.set(self.subscribes.get() + 1);
            self.live
                .borrow_mut()
                .push((*target, kind.to_owned(), listener.clone()));
        }

        fn unsubscribe(&self, target: &&'static str, kind: &str, listener: &Listener<u32>) {
            self.unsubscribes.set(self.unsubscribes.get() + 1);
            self.live
                .borrow_mut()
                .retain(|(t, k, l)| !(t == target && k == kind && l.same(listener)));
        }
    }

    fn noop() -> Listener<u32> {
        Listener::new(|_| {})
    }

    #[test]
    fn listener_identity_is_allocation_identity() {
        let a = noop();
        let b = noop();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn add_then_remove_round_trips() {
        let registry = EventRegistry::new(Rc::new(CountingPlatform::default()));
        let before = registry.len();
        let listener = noop();

        assert!(registry.add(&"window", "resize", &listener));
        assert_eq!(registry.len(), before + 1);
        assert!(registry.remove(&"window", "resize", &listener));

        assert_eq!(registry.len(), before);
        assert_eq!(registry.platform().subscribes.get(), 1);
        assert_eq!(registry.platform().unsubscribes.get(), 1);
        assert!(registry.platform().live.borrow().is_empty());
    }

    #[test]
    fn duplicate_add_is_recorded_once() {
        let registry = EventRegistry::new(Rc::new(CountingPlatform::default()));
        let listener = noop();
        assert!(registry.add(&"window", "resize", &listener));
        assert!(!registry.add(&"window", "resize", &listener));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.platform().subscribes.get(), 1);

        // Same closure on another kind is a distinct subscription.
        assert!(registry.add(&"window", "load", &listener));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn removing_unknown_listener_is_a_silent_no_op() {
        let registry = EventRegistry::new(Rc::new(CountingPlatform::default()));
        let listener = noop();
        assert!(!registry.remove(&"window", "resize", &listener));

        registry.add(&"window", "resize", &listener);
        assert!(registry.remove(&"window", "resize", &listener));
        assert!(!registry.remove(&"window", "resize", &listener));
        assert_eq!(registry.platform().unsubscribes.get(), 1);
    }

    #[test]
    fn remove_all_for_target_only_touches_that_target() {
        let registry = EventRegistry::new(Rc::new(CountingPlatform::default()));
        let a = noop();
        let b = noop();
        registry.add(&"window", "resize", &a);
        registry.add(&"window", "scroll", &b);
        registry.add(&"document", "DOMContentLoaded", &a);

        assert_eq!(registry.remove_all_for_target(&"window"), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.len_for_target(&"window"), 0);
        assert_eq!(registry.len_for_target(&"document"), 1);
        assert!(registry.contains(&"document", "DOMContentLoaded", &a));

        let live = registry.platform().live.borrow();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].0, "document");
    }

    #[test]
    fn remove_all_is_idempotent() {
        let registry = EventRegistry::new(Rc::new(CountingPlatform::default()));
        registry.add(&"window", "resize", &noop());
        registry.add(&"document", "click", &noop());

        assert_eq!(registry.remove_all(), 2);
        assert!(registry.is_empty());
        assert_eq!(registry.remove_all(), 0);
        assert!(registry.is_empty());
        assert_eq!(registry.platform().unsubscribes.get(), 2);
    }

    #[test]
    fn drop_releases_platform_subscriptions() {
        let platform = Rc::new(CountingPlatform::default());
        {
            let registry = EventRegistry::new(Rc::clone(&platform));
            registry.add(&"window", "resize", &noop());
            registry.add(&"window", "load", &noop());
        }
        assert_eq!(platform.unsubscribes.get(), 2);
        assert!(platform.live.borrow().is_empty());
    }

    #[test]
    fn records_snapshot_reflects_bookkeeping() {
        let registry = EventRegistry::new(Rc::new(CountingPlatform::default()));
        let listener = noop();
        registry.add(&"canvas", "pointermove", &listener);
        let records = registry.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, "canvas");
        assert_eq!(records[0].kind, "pointermove");
        assert!(records[0].listener.same(&listener));
    }
}
