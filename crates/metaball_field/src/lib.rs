#![forbid(unsafe_code)]
//! metaball_field: noise-driven metaball animation with scoped listener and timer lifecycles.
//!
//! Modules:
//! - field: configuration, noise sources, the per-frame animator, mesh engine seam, frame events
//! - registry: owner-scoped event listener and timer registries plus in-process platforms
//! - tweak: named, described properties with change observers for debug panels
//! - scene: frame clock and a per-frame controller tying the pieces together
//!
//! For examples, see the `metaball_field_examples` crate.
pub mod error;
pub mod field;
pub mod registry;
pub mod scene;
pub mod tweak;

/// Convenient re-exports for common types. Import with `use metaball_field::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::animator::{compute_frame, FieldAnimator};
    pub use crate::field::config::{generator_strength, Amplitudes, FieldConfig};
    pub use crate::field::engine::{apply_frame, EngineCall, MeshEngine, RecordingEngine};
    pub use crate::field::events::{
        EventSink, FnSink, FrameEvent, FrameEventKind, MultiSink, VecSink,
    };
    pub use crate::field::noise::{ConstantNoise, FnNoise, NoiseSource, PerlinNoise, SimplexNoise};
    pub use crate::field::Generator;
    pub use crate::registry::listeners::{EventPlatform, EventRegistry, Listener};
    pub use crate::registry::local::{LocalEventBus, ManualTimers};
    pub use crate::registry::timers::{TimerHandle, TimerPlatform, TimerRegistry};
    pub use crate::registry::Scope;
    pub use crate::scene::clock::FrameClock;
    pub use crate::scene::FieldScene;
    pub use crate::tweak::{
        ChangeObserver, FnObserver, PropertyDescriptor, PropertyKind, PropertyMeta, PropertyValue,
        TweakRegistrar,
    };
}
