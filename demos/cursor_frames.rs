use anyhow::Result;
use lumen2d::{Point, Room, TraceConfig, TrackedLight, Tracer};

const FRAME_MILLIS: f64 = 16.0;
const NUM_FRAMES: usize = 60;

fn main() -> Result<()> {
    env_logger::init();

    let mut room = Room::from_box(600.0, 600.0)?;
    let mut light = TrackedLight::new(
        &mut room,
        Point::new(300.0, 300.0),
        12.0,
        -std::f64::consts::FRAC_PI_2,
        std::f64::consts::FRAC_PI_2,
        1.0,
    )?;
    // Half a turn per second.
    light.set_rotation(std::f64::consts::PI / 1000.0);

    let tracer = Tracer::new(TraceConfig::new());

    println!("Animating a tracked light over {NUM_FRAMES} frames...");
    println!("{:-<60}", "");
    println!(
        "{:>5}  {:>16}  {:>9}  {:>8}  {:>6}",
        "frame", "position", "cone", "polygons", "rays"
    );

    for frame in 0..NUM_FRAMES {
        // Drift along a slow circle around the room center.
        let t = frame as f64 / NUM_FRAMES as f64 * std::f64::consts::TAU;
        let x = 300.0 + 120.0 * t.cos();
        let y = 300.0 + 120.0 * t.sin();
        light.update_position(&mut room, x, y)?;

        let output = tracer.trace(&room, &[&light], 2);
        println!(
            "{:>5}  {:>16}  {:>9.3}  {:>8}  {:>6}",
            frame,
            format!("{}", light.position()),
            light.cone_angle(),
            output.lit_polygons().count(),
            output.total_rays(),
        );

        light.advance(FRAME_MILLIS);
    }
    println!("{:-<60}", "");

    Ok(())
}
