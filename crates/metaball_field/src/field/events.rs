//! Event types and sinks for observing the frame loop.
//!
//! This module defines [`FrameEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while driving frames via
//! [`crate::field::animator::FieldAnimator::advance_with_events`] or
//! [`crate::scene::FieldScene::tick_with_events`].

/// Describes events emitted while animating the field.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// Emitted after a frame was computed from a finite elapsed time.
    FrameComputed {
        /// Sequence number of the computed frame, starting at 0.
        frame: u64,
        /// Elapsed time the frame was computed for.
        elapsed_millis: f64,
        /// Number of generators in the frame.
        generator_count: usize,
    },

    /// Emitted when a frame was skipped because the elapsed time was not finite.
    FrameSkipped {
        /// The rejected elapsed time.
        elapsed_millis: f64,
        /// Number of generators re-used from the previous frame.
        reused: usize,
    },

    /// Emitted when the scene accepted a new field configuration.
    ConfigChanged {
        /// Generator count of the new configuration.
        generator_count: usize,
        /// Per-generator strength derived for the new configuration.
        strength: f32,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. property name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`FrameEvent`], used by sinks to filter what they receive.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameEventKind {
    FrameComputed,
    FrameSkipped,
    ConfigChanged,
    Warning,
}

impl FrameEvent {
    pub fn kind(&self) -> FrameEventKind {
        match self {
            FrameEvent::FrameComputed { .. } => FrameEventKind::FrameComputed,
            FrameEvent::FrameSkipped { .. } => FrameEventKind::FrameSkipped,
            FrameEvent::ConfigChanged { .. } => FrameEventKind::ConfigChanged,
            FrameEvent::Warning { .. } => FrameEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`FrameEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: FrameEvent);

    /// Whether this sink cares about `kind`; emitters skip building unwanted events.
    #[inline]
    fn wants(&self, _kind: FrameEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = FrameEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: FrameEvent) {}

    #[inline]
    fn wants(&self, _kind: FrameEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(FrameEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(FrameEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(FrameEvent),
{
    #[inline]
    fn send(&mut self, event: FrameEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally filtered by kind.
#[derive(Default)]
pub struct VecSink {
    events: Vec<FrameEvent>,
    only: Option<Vec<FrameEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect only events whose kind is listed.
    pub fn only(kinds: &[FrameEventKind]) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.to_vec()),
        }
    }

    pub fn into_inner(self) -> Vec<FrameEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[FrameEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: FrameEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: FrameEventKind) -> bool {
        match &self.only {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn sinks(&self) -> &[S] {
        &self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: FrameEvent) {
        let kind = event.kind();
        for sink in self.sinks.iter_mut().filter(|s| s.wants(kind)) {
            sink.send(event.clone());
        }
    }

    fn wants(&self, kind: FrameEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
