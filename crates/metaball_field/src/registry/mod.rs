//! Owner-scoped registries for event listeners and one-shot timers.
//!
//! Registries are plain instances: construct one per owner (page, scene,
//! component) and pass it to whatever needs to subscribe. Tearing the owner down
//! is a single [`Scope::teardown`] call, or simply dropping the registries.
use std::fmt;

use tracing::debug;

pub mod listeners;
pub mod local;
pub mod timers;

use listeners::{EventPlatform, EventRegistry};
use timers::{TimerPlatform, TimerRegistry};

/// One event registry and one timer registry sharing an owner's lifetime.
pub struct Scope<EP: EventPlatform, TP: TimerPlatform> {
    listeners: EventRegistry<EP>,
    timers: TimerRegistry<TP>,
}

impl<EP: EventPlatform, TP: TimerPlatform> Scope<EP, TP> {
    pub fn new(events: EP, timers: TP) -> Self {
        Self {
            listeners: EventRegistry::new(events),
            timers: TimerRegistry::new(timers),
        }
    }

    pub fn listeners(&self) -> &EventRegistry<EP> {
        &self.listeners
    }

    pub fn timers(&self) -> &TimerRegistry<TP> {
        &self.timers
    }

    /// Release every listener and cancel every pending timer. Returns how many were released.
    pub fn teardown(&self) -> usize {
        let listeners = self.listeners.remove_all();
        let timers = self.timers.cancel_all();
        if listeners + timers > 0 {
            debug!(
                "Scope teardown released {} listeners and {} timers.",
                listeners, timers
            );
        }
        listeners + timers
    }

    /// True when nothing is subscribed or pending.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.timers.is_empty()
    }
}

impl<EP: EventPlatform, TP: TimerPlatform> fmt::Debug for Scope<EP, TP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("listeners", &self.listeners.len())
            .field("timers", &self.timers.len())
            .finish()
    }
}
