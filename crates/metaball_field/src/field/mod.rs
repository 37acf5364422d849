//! Procedural metaball field: configuration, noise, per-frame generator computation.
use glam::Vec3;

pub mod animator;
pub mod config;
pub mod engine;
pub mod events;
pub mod noise;

/// Center of the normalised working domain on every axis.
pub const DOMAIN_CENTER: f32 = 0.5;

/// One metaball influence source for a single reconstruction pass.
///
/// Generators carry no identity across frames; `index` is only stable within the
/// batch returned by [`animator::compute_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Generator {
    /// Position in the batch, `0..generator_count`.
    pub index: usize,
    /// Position in the engine's normalised domain (nominally [0, 1] per axis).
    pub position: Vec3,
    /// Influence magnitude.
    pub strength: f32,
    /// Influence subtracted from the field; larger values shrink the radius.
    pub falloff: f32,
}

impl Generator {
    pub fn new(index: usize, position: Vec3, strength: f32, falloff: f32) -> Self {
        Self {
            index,
            position,
            strength,
            falloff,
        }
    }

    /// True when every component is a finite float.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.strength.is_finite() && self.falloff.is_finite()
    }
}
