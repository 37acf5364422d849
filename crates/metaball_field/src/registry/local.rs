//! In-process event and timer platforms.
//!
//! [`LocalEventBus`] and [`ManualTimers`] implement the platform traits without
//! a host environment: events are dispatched explicitly and time only moves
//! when [`ManualTimers::advance`] is called. Both are cheap `Rc` handles, so the
//! same platform can be shared between a registry and the code driving it.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::registry::listeners::{EventPlatform, Listener};
use crate::registry::timers::TimerPlatform;

struct Subscription<T, E> {
    target: T,
    kind: String,
    listener: Listener<E>,
}

impl<T: PartialEq, E> Subscription<T, E> {
    fn matches(&self, target: &T, kind: &str, listener: &Listener<E>) -> bool {
        self.target == *target && self.kind == kind && self.listener.same(listener)
    }
}

/// A synchronous event bus with DOM-like listener semantics.
///
/// Subscribing an identical `(target, kind, listener)` tuple twice has no effect.
/// [`LocalEventBus::dispatch`] snapshots the matching listeners before calling
/// any of them; listeners removed by an earlier listener in the same dispatch
/// are skipped, listeners added during dispatch wait for the next one.
pub struct LocalEventBus<T, E> {
    subscriptions: Rc<RefCell<Vec<Subscription<T, E>>>>,
}

impl<T, E> LocalEventBus<T, E> {
    pub fn new() -> Self {
        Self {
            subscriptions: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Total number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }
}

impl<T: PartialEq, E> LocalEventBus<T, E> {
    /// Number of live subscriptions for `kind` on `target`.
    pub fn listener_count_for(&self, target: &T, kind: &str) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.target == *target && s.kind == kind)
            .count()
    }

    /// Deliver `event` to every listener subscribed for `kind` on `target`. Returns how many ran.
    pub fn dispatch(&self, target: &T, kind: &str, event: &E) -> usize {
        let snapshot: Vec<Listener<E>> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.target == *target && s.kind == kind)
            .map(|s| s.listener.clone())
            .collect();

        let mut invoked = 0;
        for listener in snapshot {
            let still_subscribed = self
                .subscriptions
                .borrow()
                .iter()
                .any(|s| s.matches(target, kind, &listener));
            if still_subscribed {
                listener.call(event);
                invoked += 1;
            }
        }
        invoked
    }
}

impl<T, E> Clone for LocalEventBus<T, E> {
    fn clone(&self) -> Self {
        Self {
            subscriptions: Rc::clone(&self.subscriptions),
        }
    }
}

impl<T, E> Default for LocalEventBus<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for LocalEventBus<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<T, E> EventPlatform for LocalEventBus<T, E>
where
    T: Clone + PartialEq + fmt::Debug,
{
    type Target = T;
    type Event = E;

    fn subscribe(&self, target: &T, kind: &str, listener: &Listener<E>) {
        let mut subs = self.subscriptions.borrow_mut();
        if subs.iter().any(|s| s.matches(target, kind, listener)) {
            return;
        }
        subs.push(Subscription {
            target: target.clone(),
            kind: kind.to_owned(),
            listener: listener.clone(),
        });
    }

    fn unsubscribe(&self, target: &T, kind: &str, listener: &Listener<E>) {
        // Dropped after the borrow ends; a listener may own the last handle to a registry.
        let removed: Vec<Subscription<T, E>> = {
            let mut subs = self.subscriptions.borrow_mut();
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *subs)
                .into_iter()
                .partition(|s| s.matches(target, kind, listener));
            *subs = kept;
            removed
        };
        drop(removed);
    }
}

/// Identifier of a timer queued on [`ManualTimers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManualTimerId(u64);

struct QueuedTimer {
    id: ManualTimerId,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    queue: Vec<QueuedTimer>,
}

/// A timer platform driven by a virtual clock.
#[derive(Clone, Default)]
pub struct ManualTimers {
    state: Rc<RefCell<ManualState>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Move the clock forward by `by`, firing every timer that falls due.
    ///
    /// Timers fire in order of due time, then scheduling order. Only timers queued
    /// before this call are eligible; timers scheduled by a callback wait for the
    /// next `advance`, even with a zero delay. The clock never moves backwards,
    /// including when a callback calls `advance` itself.
    pub fn advance(&self, by: Duration) -> usize {
        let (target, queued_before) = {
            let state = self.state.borrow();
            (state.now + by, state.next_id)
        };
        let mut fired = 0;
        while let Some(timer) = self.pop_due(target, queued_before) {
            (timer.callback)();
            fired += 1;
        }
        let mut state = self.state.borrow_mut();
        state.now = state.now.max(target);
        fired
    }

    fn pop_due(&self, target: Duration, queued_before: u64) -> Option<QueuedTimer> {
        let mut state = self.state.borrow_mut();
        let idx = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= target && t.id.0 < queued_before)
            .min_by_key(|(_, t)| (t.due, t.id.0))
            .map(|(idx, _)| idx)?;
        let timer = state.queue.remove(idx);
        state.now = state.now.max(timer.due);
        Some(timer)
    }
}

impl fmt::Debug for ManualTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTimers")
            .field("now", &self.now())
            .field("pending", &self.pending())
            .finish()
    }
}

impl TimerPlatform for ManualTimers {
    type Id = ManualTimerId;

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> ManualTimerId {
        let mut state = self.state.borrow_mut();
        let id = ManualTimerId(state.next_id);
        state.next_id += 1;
        let due = state.now + delay;
        state.queue.push(QueuedTimer { id, due, callback });
        id
    }

    fn clear_timeout(&self, id: ManualTimerId) {
        // Dropped after the borrow ends, as in `LocalEventBus::unsubscribe`.
        let removed: Vec<QueuedTimer> = {
            let mut state = self.state.borrow_mut();
            let (removed, kept): (Vec<_>, Vec<_>) =
                std::mem::take(&mut state.queue).into_iter().partition(|t| t.id == id);
            state.queue = kept;
            removed
        };
        drop(removed);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::registry::listeners::EventRegistry;

    #[test]
    fn subscribe_is_idempotent_for_identical_tuples() {
        let bus: LocalEventBus<&str, ()> = LocalEventBus::new();
        let listener = Listener::new(|_: &()| {});
        bus.subscribe(&"window", "resize", &listener);
        bus.subscribe(&"window", "resize", &listener);
        assert_eq!(bus.listener_count(), 1);

        bus.unsubscribe(&"window", "resize", &listener);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn dispatch_reaches_only_matching_listeners() {
        let bus: LocalEventBus<&str, u32> = LocalEventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = Rc::clone(&seen);
        let on_window = Listener::new(move |e: &u32| s.borrow_mut().push(*e));
        let s = Rc::clone(&seen);
        let on_document = Listener::new(move |e: &u32| s.borrow_mut().push(*e + 100));
        bus.subscribe(&"window", "resize", &on_window);
        bus.subscribe(&"document", "resize", &on_document);

        assert_eq!(bus.listener_count_for(&"window", "resize"), 1);
        assert_eq!(bus.listener_count_for(&"window", "scroll"), 0);
        assert_eq!(bus.dispatch(&"window", "resize", &7), 1);
        assert_eq!(bus.dispatch(&"window", "scroll", &8), 0);
        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn listener_removing_another_during_dispatch_skips_it() {
        let bus: LocalEventBus<&str, ()> = LocalEventBus::new();
        let registry = Rc::new(EventRegistry::new(bus.clone()));
        let second_ran = Rc::new(Cell::new(false));

        let r = Rc::clone(&second_ran);
        let second = Listener::new(move |_: &()| r.set(true));

        let reg = Rc::clone(&registry);
        let victim = second.clone();
        let first = Listener::new(move |_: &()| {
            reg.remove(&"window", "resize", &victim);
        });

        registry.add(&"window", "resize", &first);
        registry.add(&"window", "resize", &second);

        assert_eq!(bus.dispatch(&"window", "resize", &()), 1);
        assert!(!second_ran.get());
        assert_eq!(registry.len(), 1);
        assert_eq!(bus.listener_count(), 1);

        // Break the registry <-> listener cycle.
        registry.remove_all();
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn listener_tearing_down_its_registry_mid_dispatch() {
        let bus: LocalEventBus<&str, ()> = LocalEventBus::new();
        let registry = Rc::new(EventRegistry::new(bus.clone()));
        let hits = Rc::new(Cell::new(0));

        let reg = Rc::clone(&registry);
        let h = Rc::clone(&hits);
        let teardown = Listener::new(move |_: &()| {
            h.set(h.get() + 1);
            reg.remove_all();
        });
        let h = Rc::clone(&hits);
        let other = Listener::new(move |_: &()| h.set(h.get() + 10));

        registry.add(&"window", "beforeunload", &teardown);
        registry.add(&"window", "beforeunload", &other);

        assert_eq!(bus.dispatch(&"window", "beforeunload", &()), 1);
        assert_eq!(hits.get(), 1);
        assert!(registry.is_empty());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn manual_timers_fire_in_due_order() {
        let timers = ManualTimers::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (label, ms) in [("c", 30u64), ("a", 10), ("b", 10)] {
            let o = Rc::clone(&order);
            timers.set_timeout(
                Duration::from_millis(ms),
                Box::new(move || o.borrow_mut().push(label)),
            );
        }

        assert_eq!(timers.advance(Duration::from_millis(20)), 2);
        assert_eq!(*order.borrow(), vec!["a", "b"]);
        assert_eq!(timers.now(), Duration::from_millis(20));
        assert_eq!(timers.pending(), 1);

        assert_eq!(timers.advance(Duration::from_millis(20)), 1);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn clear_timeout_on_unknown_id_is_ignored() {
        let timers = ManualTimers::new();
        let id = timers.set_timeout(Duration::from_millis(1), Box::new(|| {}));
        timers.advance(Duration::from_millis(1));
        timers.clear_timeout(id);
        timers.clear_timeout(id);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn callback_sees_its_own_due_time() {
        let timers = ManualTimers::new();
        let seen = Rc::new(Cell::new(Duration::ZERO));
        let t = timers.clone();
        let s = Rc::clone(&seen);
        timers.set_timeout(Duration::from_millis(15), Box::new(move || s.set(t.now())));
        timers.advance(Duration::from_millis(100));
        assert_eq!(seen.get(), Duration::from_millis(15));
        assert_eq!(timers.now(), Duration::from_millis(100));
    }

    #[test]
    fn zero_delay_reschedule_waits_for_next_advance() {
        let timers = ManualTimers::new();
        let hits = Rc::new(Cell::new(0));

        fn reschedule(timers: ManualTimers, hits: Rc<Cell<u32>>) {
            hits.set(hits.get() + 1);
            let t = timers.clone();
            timers.set_timeout(Duration::ZERO, Box::new(move || reschedule(t, hits)));
        }
        let t = timers.clone();
        let h = Rc::clone(&hits);
        timers.set_timeout(Duration::ZERO, Box::new(move || reschedule(t, h)));

        assert_eq!(timers.advance(Duration::ZERO), 1);
        assert_eq!(timers.pending(), 1);
        assert_eq!(timers.advance(Duration::from_millis(5)), 1);
        assert_eq!(hits.get(), 2);
        assert_eq!(timers.pending(), 1);

        // Drop the self-rescheduling chain.
        timers.state.borrow_mut().queue.clear();
    }

    #[test]
    fn nested_advance_does_not_rewind_the_clock() {
        let timers = ManualTimers::new();
        let t = timers.clone();
        timers.set_timeout(
            Duration::from_millis(10),
            Box::new(move || {
                t.advance(Duration::from_millis(100));
            }),
        );

        timers.advance(Duration::from_millis(20));
        assert_eq!(timers.now(), Duration::from_millis(110));
    }
}
