use std::path::PathBuf;

use anyhow::Context;
use metaball_field::prelude::*;
use metaball_field_examples::init_tracing;
use tracing::info;

const DEFAULT_CONFIG: &str = r#"(
    generator_count: 9,
    base_strength: 1.2,
    base_falloff: 12.0,
    frequency_xy: 0.2,
    frequency_z: 0.3,
    time_scale: 0.0001,
    amplitudes: (x: 0.25, y: 0.15, z: 0.4),
)"#;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Pass a path to a RON file to override the built-in configuration.
    let text = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?,
        None => DEFAULT_CONFIG.to_owned(),
    };
    let config: FieldConfig = ron::from_str(&text).context("parse RON field config")?;
    config.validate()?;

    info!(
        "{} generators at strength {:.4}.",
        config.generator_count,
        config.generator_strength()
    );

    let mut animator = FieldAnimator::try_new(config, PerlinNoise::new(11))?;
    for now in [0.0, 5_000.0, 10_000.0] {
        for g in animator.advance(now) {
            info!(
                "t={:>6}ms #{} at ({:.3}, {:.3}, {:.3})",
                now, g.index, g.position.x, g.position.y, g.position.z
            );
        }
    }
    Ok(())
}
