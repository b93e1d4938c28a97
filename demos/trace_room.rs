use anyhow::{Context, Result};
use lumen2d::sim::sources::Lamp;
use lumen2d::{LineSegment, Point, Room, RoomBuilder, TraceConfig, Tracer, Vector};

/// Build a 600x600 room with three obstacles and a ceiling fixture.
/// Returns the room and the fixture's surface id.
fn build_room() -> Result<(Room, usize)> {
    let mut builder = RoomBuilder::new();
    builder.border(600.0, 600.0);
    builder.obstacle(120.0, 320.0, 90.0, 40.0);
    builder.obstacle(420.0, 180.0, 60.0, 120.0);
    builder.obstacle(250.0, 80.0, 140.0, 30.0);

    // Fixture hangs just below the ceiling, emitting downward.
    let fixture = builder.wall(
        LineSegment::new(Point::new(330.0, 560.0), Point::new(270.0, 560.0)),
        Vector::new(0.0, -1.0),
    );

    Ok((builder.finish()?, fixture))
}

fn main() -> Result<()> {
    env_logger::init();

    let (room, fixture) = build_room()?;
    let lamp = Lamp::on_surface(
        room.get(fixture).context("fixture surface missing")?,
        std::f64::consts::FRAC_PI_2,
        1.0,
    );

    let config = TraceConfig::new();
    let depth = 3;

    println!("Tracing room illumination...");
    println!("  Surfaces: {}", room.len());
    println!("  Falloff range: {}", config.falloff_range);
    println!("  Max depth: {depth}");
    println!();

    let tracer = Tracer::new(config);
    let output = tracer.trace(&room, &[&lamp], depth);

    println!("Trace summary:");
    println!("{:-<50}", "");
    for (generation, result) in output.generations.iter().enumerate() {
        println!(
            "  Generation {generation}: {:>3} polygons, {:>3} bounced sources, {:>5} rays",
            result.lit_polygons.len(),
            result.light_sources.len(),
            result.total_rays,
        );
    }
    println!("  Total rays cast: {}", output.total_rays());
    println!("{:-<50}", "");
    println!();

    println!("Lit polygons:");
    for (i, polygon) in output.lit_polygons().enumerate() {
        println!(
            "  #{i:<3} {:>2} vertices, intensity {:.3} at {} down to {:.3} at {}",
            polygon.points.len(),
            polygon.max_intensity.value,
            polygon.max_intensity.location,
            polygon.min_intensity.value,
            polygon.min_intensity.location,
        );
    }

    Ok(())
}
