//! Per-frame controller: clock, animator and mesh engine behind one `tick`.
//!
//! [`FieldScene`] also owns a [`TweakRegistrar`] describing its live-tweakable
//! parameters, so a debug panel can list and change them without knowing the
//! field types.
use tracing::{info, warn};

use crate::error::Result;
use crate::field::animator::FieldAnimator;
use crate::field::config::FieldConfig;
use crate::field::engine::{apply_frame, MeshEngine};
use crate::field::events::{EventSink, FrameEvent, FrameEventKind};
use crate::field::noise::NoiseSource;
use crate::tweak::{ChangeObserver, PropertyMeta, PropertyValue, TweakRegistrar};

pub mod clock;

use clock::FrameClock;

/// Property names exposed by [`FieldScene::tweaks`].
pub mod props {
    pub const GENERATOR_COUNT: &str = "generator_count";
    pub const BASE_STRENGTH: &str = "base_strength";
    pub const BASE_FALLOFF: &str = "base_falloff";
    pub const TIME_SCALE: &str = "time_scale";
    pub const STOPPED: &str = "stopped";
}

const MAX_GENERATORS: f64 = 400.0;
const MAX_BASE_STRENGTH: f64 = 10.0;
const MAX_BASE_FALLOFF: f64 = 100.0;
/// Fastest panel speed: one unit of noise phase per 100ms.
const MAX_TIME_SCALE: f64 = 0.01;

/// Drives a [`MeshEngine`] from host frame timestamps.
pub struct FieldScene<E: MeshEngine, N: NoiseSource> {
    animator: FieldAnimator<N>,
    clock: FrameClock,
    engine: E,
    tweaks: TweakRegistrar,
}

impl<E: MeshEngine, N: NoiseSource> FieldScene<E, N> {
    /// Creates a scene after validating `config`. The clock starts without an offset.
    pub fn try_new(config: FieldConfig, noise: N, engine: E) -> Result<Self> {
        let tweaks = scene_tweaks(&config)?;
        let animator = FieldAnimator::try_new(config, noise)?;
        Ok(Self {
            animator,
            clock: FrameClock::new(),
            engine,
            tweaks,
        })
    }

    /// Replaces the frame clock, e.g. with [`FrameClock::with_random_offset`].
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn animator(&self) -> &FieldAnimator<N> {
        &self.animator
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn tweaks(&self) -> &TweakRegistrar {
        &self.tweaks
    }

    /// Register an observer for property changes made through [`FieldScene::set_property`].
    pub fn observe(&mut self, observer: impl ChangeObserver + 'static) {
        self.tweaks.observe(observer);
    }

    pub fn is_stopped(&self) -> bool {
        self.tweaks.flag(props::STOPPED).unwrap_or(false)
    }

    /// Advance one frame for host timestamp `now_millis`. Returns whether the engine was updated.
    pub fn tick(&mut self, now_millis: f64) -> bool {
        self.tick_with_events(now_millis, &mut ())
    }

    pub fn tick_with_events(&mut self, now_millis: f64, sink: &mut dyn EventSink) -> bool {
        if self.is_stopped() {
            return false;
        }
        let elapsed = self.clock.elapsed(now_millis);
        let before = self.animator.frames_computed();
        self.animator.advance_with_events(elapsed, sink);
        if self.animator.frames_computed() == before {
            return false;
        }
        apply_frame(&mut self.engine, self.animator.last_frame());
        true
    }

    /// Change a scene property. Returns `Ok(false)` when the value was already set.
    pub fn set_property(&mut self, name: &str, value: impl Into<PropertyValue>) -> Result<bool> {
        self.set_property_with_events(name, value, &mut ())
    }

    /// Like [`FieldScene::set_property`], reporting accepted configurations to `sink`.
    ///
    /// The resulting configuration is validated before anything is stored: an
    /// invalid value leaves the tweak table untouched, never reaches observers
    /// and is returned as an error.
    pub fn set_property_with_events(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
        sink: &mut dyn EventSink,
    ) -> Result<bool> {
        let mut value = self.tweaks.resolve(name, value)?;
        if name == props::GENERATOR_COUNT {
            if let PropertyValue::Number(count) = &mut value {
                *count = count.round();
            }
        }
        if self.tweaks.get(name) == Some(&value) {
            return Ok(false);
        }
        if name == props::STOPPED {
            self.tweaks.set(name, value)?;
            info!("Scene {}.", if self.is_stopped() { "stopped" } else { "resumed" });
            return Ok(true);
        }

        let config = self.config_with(name, &value);
        if let Err(err) = config.validate() {
            warn!("Ignoring change to '{}': {}", name, err);
            if sink.wants(FrameEventKind::Warning) {
                sink.send(FrameEvent::Warning {
                    context: name.into(),
                    message: err.to_string(),
                });
            }
            return Err(err);
        }
        self.animator.set_config(config)?;
        self.tweaks.set(name, value)?;

        let config = self.animator.config();
        info!(
            "Scene configuration changed: {} generators, strength {}, falloff {}.",
            config.generator_count,
            self.animator.strength(),
            config.base_falloff
        );
        if sink.wants(FrameEventKind::ConfigChanged) {
            sink.send(FrameEvent::ConfigChanged {
                generator_count: config.generator_count,
                strength: self.animator.strength(),
            });
        }
        Ok(true)
    }

    /// Current configuration with `name` replaced by `value`.
    fn config_with(&self, name: &str, value: &PropertyValue) -> FieldConfig {
        let config = self.animator.config().clone();
        let Some(v) = value.as_number() else {
            return config;
        };
        match name {
            props::GENERATOR_COUNT => config.with_generator_count(v as usize),
            props::BASE_STRENGTH => config.with_base_strength(v as f32),
            props::BASE_FALLOFF => config.with_base_falloff(v as f32),
            props::TIME_SCALE => config.with_time_scale(v),
            _ => config,
        }
    }
}

impl<E: MeshEngine, N: NoiseSource> std::fmt::Debug for FieldScene<E, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldScene")
            .field("config", self.animator.config())
            .field("clock", &self.clock)
            .field("tweaks", &self.tweaks)
            .finish()
    }
}

fn scene_tweaks(config: &FieldConfig) -> Result<TweakRegistrar> {
    let mut tweaks = TweakRegistrar::new();
    tweaks.setup_prop(
        props::GENERATOR_COUNT,
        config.generator_count as f64,
        PropertyMeta::number()
            .with_range(0.0, MAX_GENERATORS.max(config.generator_count as f64))
            .with_label("Generators")
            .with_format(|v| format!("{v:.0}")),
    )?;
    tweaks.setup_prop(
        props::BASE_STRENGTH,
        config.base_strength as f64,
        PropertyMeta::number()
            .with_range(0.0, MAX_BASE_STRENGTH.max(config.base_strength as f64))
            .with_label("Strength"),
    )?;
    tweaks.setup_prop(
        props::BASE_FALLOFF,
        config.base_falloff as f64,
        PropertyMeta::number()
            .with_range(0.0, MAX_BASE_FALLOFF.max(config.base_falloff as f64))
            .with_label("Falloff"),
    )?;
    tweaks.setup_prop(
        props::TIME_SCALE,
        config.time_scale,
        PropertyMeta::number()
            .with_range(
                config.time_scale.min(0.0),
                MAX_TIME_SCALE.max(config.time_scale),
            )
            .with_label("Speed")
            .with_format(|v| format!("{v:.6}")),
    )?;
    tweaks.setup_prop(props::STOPPED, false, PropertyMeta::boolean().with_label("Stop"))?;
    Ok(tweaks)
}
