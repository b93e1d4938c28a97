pub mod geom;
pub mod room;
pub mod sim;

// Prelude
pub use geom::angle::AngularSpan;
pub use geom::point::Point;
pub use geom::ray::Ray;
pub use geom::segment::LineSegment;
pub use geom::vector::Vector;
pub use room::Room;
pub use room::builder::RoomBuilder;
pub use room::surface::Surface;
pub use sim::config::TraceConfig;
pub use sim::falloff::Falloff;
pub use sim::result::{IntensityAnchor, LitPolygon, RayHit, TraceOutput, TraceResult};
pub use sim::simulation::Tracer;
pub use sim::sources::{Emitter, Lamp, LightSource, TrackedLight};
