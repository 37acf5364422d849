//! Coherent 2D noise sources for animating generator positions.
//!
//! All implementations are deterministic: the same seed and inputs always
//! produce the same output, and every output lies in [-1, 1]. The seeded
//! adapters return NaN for inputs outside [`MAX_NOISE_INPUT`] instead of
//! handing them to the `noise` crate, which panics on them.
use std::fmt;

use noise::{NoiseFn, OpenSimplex, Perlin};
use rand::Rng;

/// Largest input magnitude the seeded adapters evaluate.
pub const MAX_NOISE_INPUT: f64 = 1e15;

/// A deterministic 2D coherent noise function with output in [-1, 1].
pub trait NoiseSource {
    fn noise(&self, a: f64, b: f64) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &N {
    #[inline]
    fn noise(&self, a: f64, b: f64) -> f64 {
        (**self).noise(a, b)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    #[inline]
    fn noise(&self, a: f64, b: f64) -> f64 {
        (**self).noise(a, b)
    }
}

/// Seeded OpenSimplex noise.
#[derive(Clone)]
pub struct SimplexNoise {
    seed: u32,
    inner: OpenSimplex,
}

impl SimplexNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            inner: OpenSimplex::new(seed),
        }
    }

    /// Draw the seed from `rng`.
    pub fn from_rng(rng: &mut dyn Rng) -> Self {
        Self::new(rng.next_u32())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl fmt::Debug for SimplexNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplexNoise")
            .field("seed", &self.seed)
            .finish()
    }
}

impl NoiseSource for SimplexNoise {
    #[inline]
    fn noise(&self, a: f64, b: f64) -> f64 {
        guarded(a, b, |p| self.inner.get(p))
    }
}

/// Seeded Perlin noise.
#[derive(Clone)]
pub struct PerlinNoise {
    seed: u32,
    inner: Perlin,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            inner: Perlin::new(seed),
        }
    }

    /// Draw the seed from `rng`.
    pub fn from_rng(rng: &mut dyn Rng) -> Self {
        Self::new(rng.next_u32())
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl fmt::Debug for PerlinNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerlinNoise")
            .field("seed", &self.seed)
            .finish()
    }
}

impl NoiseSource for PerlinNoise {
    #[inline]
    fn noise(&self, a: f64, b: f64) -> f64 {
        guarded(a, b, |p| self.inner.get(p))
    }
}

/// Degenerate noise that returns the same value everywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstantNoise(pub f64);

impl NoiseSource for ConstantNoise {
    #[inline]
    fn noise(&self, _a: f64, _b: f64) -> f64 {
        self.0
    }
}

/// Noise backed by a user-provided closure.
pub struct FnNoise<F>
where
    F: Fn(f64, f64) -> f64,
{
    f: F,
}

impl<F> FnNoise<F>
where
    F: Fn(f64, f64) -> f64,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> NoiseSource for FnNoise<F>
where
    F: Fn(f64, f64) -> f64,
{
    #[inline]
    fn noise(&self, a: f64, b: f64) -> f64 {
        (self.f)(a, b)
    }
}

/// Evaluate `f` on in-range input, NaN otherwise.
#[inline]
fn guarded(a: f64, b: f64, f: impl FnOnce([f64; 2]) -> f64) -> f64 {
    if a.abs() <= MAX_NOISE_INPUT && b.abs() <= MAX_NOISE_INPUT {
        clamp_unit(f([a, b]))
    } else {
        f64::NAN
    }
}

/// Clamp into [-1, 1], leaving NaN untouched so bad input stays visible.
#[inline]
fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}
