use std::path::Path;

use glam::{Vec2, Vec3};
use image::{Rgb, RgbImage};
use metaball_field::prelude::MeshEngine;
use mint::Vector3;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// How a [`SliceEngine`] samples and shades the field.
#[derive(Debug, Clone)]
pub struct SliceConfig {
    /// Output image size in pixels.
    pub size: (u32, u32),
    /// Depth of the sampled plane in the unit cube.
    pub z: f32,
    /// Field value at which the surface sits.
    pub isolation: f32,
    pub background: [u8; 3],
    pub inside: [u8; 3],
}

impl SliceConfig {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            z: 0.5,
            isolation: 80.0,
            background: [18, 18, 24],
            inside: [240, 140, 60],
        }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    pub fn with_isolation(mut self, isolation: f32) -> Self {
        self.isolation = isolation;
        self
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Ball {
    position: Vec3,
    strength: f32,
    falloff: f32,
}

/// Stand-in mesh engine: evaluates one z-slice of the metaball field on `update`.
///
/// Each generator contributes `strength / (1e-6 + d²) - falloff` where positive,
/// `d` being the distance in unit-cube coordinates.
#[derive(Debug, Clone)]
pub struct SliceEngine {
    config: SliceConfig,
    pending: Vec<Ball>,
    values: Vec<f32>,
    updates: usize,
}

impl SliceEngine {
    pub fn new(config: SliceConfig) -> Self {
        let (w, h) = config.size;
        Self {
            values: vec![0.0; (w * h) as usize],
            config,
            pending: Vec::new(),
            updates: 0,
        }
    }

    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    /// Field values of the last update, row-major.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Share of pixels inside the surface.
    pub fn coverage(&self) -> f32 {
        let inside = self
            .values
            .iter()
            .filter(|&&v| v >= self.config.isolation)
            .count();
        inside as f32 / self.values.len().max(1) as f32
    }

    fn sample(&self, p: Vec3) -> f32 {
        self.pending
            .iter()
            .map(|b| (b.strength / (1e-6 + p.distance_squared(b.position)) - b.falloff).max(0.0))
            .sum()
    }
}

impl MeshEngine for SliceEngine {
    fn reset(&mut self) {
        self.pending.clear();
    }

    fn add_generator(&mut self, position: Vector3<f32>, strength: f32, falloff: f32) {
        self.pending.push(Ball {
            position: Vec3::from(position),
            strength,
            falloff,
        });
    }

    fn update(&mut self) {
        let (w, h) = self.config.size;
        let scale = Vec2::new(w.max(1) as f32, h.max(1) as f32);
        let z = self.config.z;
        let mut values = std::mem::take(&mut self.values);
        values.resize((w * h) as usize, 0.0);
        for y in 0..h {
            for x in 0..w {
                let uv = (Vec2::new(x as f32, y as f32) + 0.5) / scale;
                values[(y * w + x) as usize] = self.sample(uv.extend(z));
            }
        }
        self.values = values;
        self.updates += 1;
    }
}

/// Writes the last slice as a PNG: background outside, shaded by field value inside.
pub fn render_slice_to_png(engine: &SliceEngine, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let config = engine.config();
    let (w, h) = config.size;
    let bg = Vec3::from_array(config.background.map(f32::from));
    let fg = Vec3::from_array(config.inside.map(f32::from));
    let iso = config.isolation.max(f32::EPSILON);

    let img = RgbImage::from_fn(w, h, |x, y| {
        let v = engine.values()[(y * w + x) as usize];
        let c = if v >= iso {
            // Brighter towards generator centres.
            let t = (iso / v).clamp(0.0, 1.0);
            fg.lerp(Vec3::splat(255.0), (1.0 - t) * 0.5)
        } else {
            bg.lerp(fg, (v / iso).clamp(0.0, 1.0) * 0.25)
        };
        Rgb(c.to_array().map(|c| c.round().clamp(0.0, 255.0) as u8))
    });
    img.save(path.as_ref())?;
    Ok(())
}
