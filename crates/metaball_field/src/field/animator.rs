//! Per-frame generator computation from coherent noise and elapsed time.
//!
//! [`compute_frame`] is the pure core: the same configuration, noise source and
//! elapsed time always give a bit-identical generator sequence. Positions follow
//! a continuous noise field indexed by (generator index, time), so motion is
//! smooth without keeping velocities or previous positions around.
//!
//! [`FieldAnimator`] wraps it for a frame loop: it validates the configuration
//! up front, caches the derived strength and keeps the last good frame so a
//! non-finite clock reading never reaches the mesh engine.
use glam::Vec3;
use tracing::warn;

use crate::error::Result;
use crate::field::config::FieldConfig;
use crate::field::events::{EventSink, FrameEvent, FrameEventKind};
use crate::field::noise::NoiseSource;
use crate::field::{Generator, DOMAIN_CENTER};

/// Compute the generators for one frame.
///
/// Returns exactly `config.generator_count` generators with indices in order.
/// No validation is performed: NaN input yields NaN positions.
pub fn compute_frame(
    elapsed_millis: f64,
    config: &FieldConfig,
    noise: &dyn NoiseSource,
) -> Vec<Generator> {
    let mut out = Vec::with_capacity(config.generator_count);
    fill_frame(
        elapsed_millis,
        config,
        config.generator_strength(),
        noise,
        &mut out,
    );
    out
}

fn fill_frame<N: NoiseSource + ?Sized>(
    elapsed_millis: f64,
    config: &FieldConfig,
    strength: f32,
    noise: &N,
    out: &mut Vec<Generator>,
) {
    out.clear();
    let t = elapsed_millis * config.time_scale;
    let amp = config.amplitudes;

    for i in 0..config.generator_count {
        let fi = i as f64;
        let pxy = fi * config.frequency_xy + t;
        let pz = fi * config.frequency_z + t;
        // x and y share one sample; only their amplitudes differ.
        let nxy = noise.noise(pxy, pxy) as f32;
        let nz = noise.noise(pz, pz) as f32;

        let position = Vec3::new(
            DOMAIN_CENTER + nxy * amp.x,
            DOMAIN_CENTER + nxy * amp.y,
            DOMAIN_CENTER + nz * amp.z,
        );
        out.push(Generator::new(i, position, strength, config.base_falloff));
    }
}

/// Stateful frame driver around [`compute_frame`].
pub struct FieldAnimator<N: NoiseSource> {
    config: FieldConfig,
    noise: N,
    strength: f32,
    frame: Vec<Generator>,
    scratch: Vec<Generator>,
    frames_computed: u64,
}

impl<N: NoiseSource> FieldAnimator<N> {
    /// Creates an animator after validating `config`.
    pub fn try_new(config: FieldConfig, noise: N) -> Result<Self> {
        config.validate()?;
        Ok(Self::new_unchecked(config, noise))
    }

    pub fn new(config: FieldConfig, noise: N) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "field configuration must validate"
        );
        Self::new_unchecked(config, noise)
    }

    fn new_unchecked(config: FieldConfig, noise: N) -> Self {
        let strength = config.generator_strength();
        Self {
            strength,
            frame: Vec::with_capacity(config.generator_count),
            scratch: Vec::with_capacity(config.generator_count),
            config,
            noise,
            frames_computed: 0,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    /// Strength shared by every generator, derived once per configuration.
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// The most recent good frame; empty before the first one.
    pub fn last_frame(&self) -> &[Generator] {
        &self.frame
    }

    /// Number of frames successfully computed so far.
    pub fn frames_computed(&self) -> u64 {
        self.frames_computed
    }

    /// Replace the configuration. The previous frame is kept until the next `advance`.
    pub fn set_config(&mut self, config: FieldConfig) -> Result<()> {
        config.validate()?;
        self.strength = config.generator_strength();
        self.config = config;
        Ok(())
    }

    /// Compute the frame for `elapsed_millis`, or re-use the last one if that time is not finite.
    pub fn advance(&mut self, elapsed_millis: f64) -> &[Generator] {
        self.advance_with_events(elapsed_millis, &mut ())
    }

    pub fn advance_with_events(
        &mut self,
        elapsed_millis: f64,
        sink: &mut dyn EventSink,
    ) -> &[Generator] {
        if !elapsed_millis.is_finite() {
            warn!(
                "Non-finite elapsed time {}; re-using {} generators from the previous frame.",
                elapsed_millis,
                self.frame.len()
            );
            self.emit_skipped(elapsed_millis, sink);
            return &self.frame;
        }

        fill_frame(
            elapsed_millis,
            &self.config,
            self.strength,
            &self.noise,
            &mut self.scratch,
        );
        if let Some(bad) = self.scratch.iter().find(|g| !g.is_finite()) {
            warn!(
                "Generator {} is not finite at t={}ms; re-using the previous frame.",
                bad.index, elapsed_millis
            );
            self.emit_skipped(elapsed_millis, sink);
            return &self.frame;
        }

        std::mem::swap(&mut self.frame, &mut self.scratch);
        if sink.wants(FrameEventKind::FrameComputed) {
            sink.send(FrameEvent::FrameComputed {
                frame: self.frames_computed,
                elapsed_millis,
                generator_count: self.frame.len(),
            });
        }
        self.frames_computed += 1;
        &self.frame
    }

    fn emit_skipped(&self, elapsed_millis: f64, sink: &mut dyn EventSink) {
        if sink.wants(FrameEventKind::FrameSkipped) {
            sink.send(FrameEvent::FrameSkipped {
                elapsed_millis,
                reused: self.frame.len(),
            });
        }
    }
}
