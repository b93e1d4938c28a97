use anyhow::{Context, Result};
use lumen2d::sim::sources::Lamp;
use lumen2d::{RoomBuilder, TraceConfig, Tracer};

/// Traces a simple scene and prints the full output as JSON, for
/// feeding into an external renderer.
fn main() -> Result<()> {
    env_logger::init();

    let mut builder = RoomBuilder::new();
    let [_, _, ceiling, _] = builder.border(600.0, 600.0);
    builder.obstacle(220.0, 200.0, 160.0, 60.0);
    let room = builder.finish()?;

    let lamp = Lamp::on_surface(
        room.get(ceiling).context("ceiling surface missing")?,
        std::f64::consts::FRAC_PI_2,
        1.0,
    );

    let mut config = TraceConfig::new();
    config.collect_rays = true;
    let output = Tracer::new(config).trace(&room, &[&lamp], 2);

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
