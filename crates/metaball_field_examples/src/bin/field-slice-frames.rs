use metaball_field::prelude::*;
use metaball_field::scene::clock::DEFAULT_START_OFFSET_MILLIS;
use metaball_field_examples::{init_tracing, render_slice_to_png, SliceConfig, SliceEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(2025);

    // Seeded noise and a random start phase, as a page would pick on load.
    let noise = SimplexNoise::from_rng(&mut rng);
    let clock = FrameClock::with_random_offset(&mut rng, DEFAULT_START_OFFSET_MILLIS);
    let slice = SliceConfig::new((512, 512))
        .with_z(0.5)
        .with_isolation(60.0)
        .with_background([12, 12, 20]);
    let engine = SliceEngine::new(slice);

    let mut scene = FieldScene::try_new(FieldConfig::default(), noise, engine)?.with_clock(clock);
    let mut events = VecSink::only(&[FrameEventKind::FrameComputed]);

    // Time-lapse: one frame every two seconds of animation time.
    for i in 0..6 {
        scene.tick_with_events(i as f64 * 2_000.0, &mut events);
        let out = format!("field-slice-frame-{i}.png");
        render_slice_to_png(scene.engine(), &out)?;
        info!(
            "Wrote {} (elapsed {:.0}ms, coverage {:.1}%).",
            out,
            scene.clock().last(),
            scene.engine().coverage() * 100.0
        );
    }

    // Denser field through the tweak table: more generators, each weaker.
    scene.set_property("generator_count", 25.0)?;
    scene.tick_with_events(14_000.0, &mut events);
    render_slice_to_png(scene.engine(), "field-slice-dense.png")?;

    info!("Computed {} frames.", events.len());
    Ok(())
}
