//! Field configuration for one animator instance.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_GENERATOR_COUNT: usize = 5;
pub const DEFAULT_BASE_STRENGTH: f32 = 1.2;
pub const DEFAULT_BASE_FALLOFF: f32 = 12.0;
pub const DEFAULT_FREQUENCY_XY: f64 = 0.2;
pub const DEFAULT_FREQUENCY_Z: f64 = 0.3;
/// Milliseconds to noise phase: one unit of phase every 15 seconds.
pub const DEFAULT_TIME_SCALE: f64 = 0.2 / 3000.0;

/// Per-axis displacement applied to the noise sample around the domain center.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amplitudes {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Amplitudes {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Amplitudes {
    fn default() -> Self {
        Self {
            x: 0.2,
            y: 0.2,
            z: 0.4,
        }
    }
}

/// Parameters driving [`crate::field::animator::compute_frame`].
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Number of generators emitted per frame.
    pub generator_count: usize,
    /// Strength before normalisation by generator count.
    pub base_strength: f32,
    /// Falloff applied unchanged to every generator.
    pub base_falloff: f32,
    /// Noise frequency across generator indices for the x/y axes.
    pub frequency_xy: f64,
    /// Noise frequency across generator indices for the z axis.
    pub frequency_z: f64,
    /// Multiplier converting elapsed milliseconds into noise phase.
    pub time_scale: f64,
    /// Displacement amplitudes around the domain center.
    pub amplitudes: Amplitudes,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            generator_count: DEFAULT_GENERATOR_COUNT,
            base_strength: DEFAULT_BASE_STRENGTH,
            base_falloff: DEFAULT_BASE_FALLOFF,
            frequency_xy: DEFAULT_FREQUENCY_XY,
            frequency_z: DEFAULT_FREQUENCY_Z,
            time_scale: DEFAULT_TIME_SCALE,
            amplitudes: Amplitudes::default(),
        }
    }
}

impl FieldConfig {
    /// Creates a new [`FieldConfig`] with default constants and the given generator count.
    pub fn new(generator_count: usize) -> Self {
        Self {
            generator_count,
            ..Default::default()
        }
    }

    /// Sets the generator count.
    pub fn with_generator_count(mut self, generator_count: usize) -> Self {
        self.generator_count = generator_count;
        self
    }

    /// Sets the base strength.
    pub fn with_base_strength(mut self, base_strength: f32) -> Self {
        self.base_strength = base_strength;
        self
    }

    /// Sets the base falloff.
    pub fn with_base_falloff(mut self, base_falloff: f32) -> Self {
        self.base_falloff = base_falloff;
        self
    }

    /// Sets both noise frequencies.
    pub fn with_frequencies(mut self, frequency_xy: f64, frequency_z: f64) -> Self {
        self.frequency_xy = frequency_xy;
        self.frequency_z = frequency_z;
        self
    }

    /// Sets the time scale.
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Sets the displacement amplitudes.
    pub fn with_amplitudes(mut self, amplitudes: Amplitudes) -> Self {
        self.amplitudes = amplitudes;
        self
    }

    /// Per-generator strength for this configuration.
    pub fn generator_strength(&self) -> f32 {
        generator_strength(self.base_strength, self.generator_count)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.base_strength.is_finite() || self.base_strength <= 0.0 {
            return Err(Error::InvalidConfig(
                "base_strength must be finite and > 0".into(),
            ));
        }
        if !self.base_falloff.is_finite() || self.base_falloff <= 0.0 {
            return Err(Error::InvalidConfig(
                "base_falloff must be finite and > 0".into(),
            ));
        }
        if !self.frequency_xy.is_finite() || !self.frequency_z.is_finite() {
            return Err(Error::InvalidConfig("noise frequencies must be finite".into()));
        }
        if !self.time_scale.is_finite() {
            return Err(Error::InvalidConfig("time_scale must be finite".into()));
        }
        if !self.amplitudes.is_finite() {
            return Err(Error::InvalidConfig(
                "amplitudes must be finite in every component".into(),
            ));
        }

        Ok(())
    }
}

/// Strength per generator so the summed field stays visually stable as the count grows.
///
/// `base / ((sqrt(count) - 1) / 4 + 1)`: one generator keeps the base strength,
/// 25 generators get half of it.
#[inline]
pub fn generator_strength(base_strength: f32, generator_count: usize) -> f32 {
    let count = generator_count as f32;
    base_strength / ((count.sqrt() - 1.0) / 4.0 + 1.0)
}
