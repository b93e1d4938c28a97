//! Light emitters.
//!
//! Every emitter boils down to one or more [`LightSource`] records: a
//! segment-shaped aperture with an emission direction at each endpoint.
//! [`Lamp`] wraps a fixed source; [`TrackedLight`] owns a small housing
//! of room surfaces and moves and rotates between frames.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::geom::angle::{self, AngularSpan};
use crate::geom::point::Point;
use crate::geom::segment::LineSegment;
use crate::geom::vector::Vector;
use crate::room::Room;
use crate::room::surface::Surface;

/// An emitting edge: the unit the tracer consumes.
///
/// Light leaves the segment through the cone spanned by the two
/// endpoint angles. A source bound to a surface never tests that
/// surface during its own trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub segment: LineSegment,
    /// Emission direction at `segment.p1`, radians.
    pub p1_angle: f64,
    /// Emission direction at `segment.p2`, radians.
    pub p2_angle: f64,
    /// Brightness in `[0, 1]`.
    pub intensity: f64,
    /// Surface this source emits from, if any.
    pub emission_surface_id: Option<usize>,
}

impl LightSource {
    pub fn new(
        segment: LineSegment,
        p1_angle: f64,
        p2_angle: f64,
        intensity: f64,
        emission_surface_id: Option<usize>,
    ) -> Self {
        Self {
            segment,
            p1_angle: angle::normalize_angle(p1_angle),
            p2_angle: angle::normalize_angle(p2_angle),
            intensity: intensity.clamp(0.0, 1.0),
            emission_surface_id,
        }
    }

    /// Angular interval swept when tracing this source, from the
    /// `p1` boundary to the `p2` boundary.
    pub fn span(&self) -> AngularSpan {
        AngularSpan::from_angles(self.p1_angle, self.p2_angle)
    }
}

/// Anything that can emit light into a room.
pub trait Emitter {
    /// Emission records for the current frame. Pure: the same emitter
    /// state always yields the same sources.
    fn generate_sources(&self) -> Vec<LightSource>;
}

/// Boundary angles of an emission cone centered on `center_angle`,
/// assigned to the segment's endpoints so that the reversed boundary
/// rays converge behind the segment.
fn cone_about(
    segment: &LineSegment,
    normal: &Vector,
    center_angle: f64,
    spread: f64,
) -> (f64, f64) {
    let half = spread.abs() / 2.0;
    // The p1 boundary leans toward p1's side of the cone, which is the
    // counterclockwise side exactly when the normal is the segment's
    // left perpendicular.
    let sign = if segment.direction().perp_dot(*normal) >= 0.0 {
        1.0
    } else {
        -1.0
    };
    (
        angle::normalize_angle(center_angle + sign * half),
        angle::normalize_angle(center_angle - sign * half),
    )
}

/// A stationary lamp emitting a fixed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lamp {
    source: LightSource,
}

impl Lamp {
    pub fn new(source: LightSource) -> Self {
        Self { source }
    }

    /// A lamp mounted on a surface, its cone symmetric about the
    /// surface normal and bound to the surface's id.
    pub fn on_surface(surface: &Surface, spread: f64, intensity: f64) -> Self {
        let (p1_angle, p2_angle) = cone_about(
            &surface.segment,
            &surface.normal,
            surface.normal_angle(),
            spread,
        );
        Self {
            source: LightSource::new(
                surface.segment,
                p1_angle,
                p2_angle,
                intensity,
                Some(surface.id),
            ),
        }
    }

    pub fn source(&self) -> &LightSource {
        &self.source
    }
}

impl Emitter for Lamp {
    fn generate_sources(&self) -> Vec<LightSource> {
        vec![self.source.clone()]
    }
}

/// A movable light owning a square housing of room surfaces.
///
/// The four housing faces are appended to the room once, at
/// construction, and keep their ids for the lifetime of the room.
/// Moving the light rewrites those segments in place; every other
/// surface is untouched. One face, the one most aligned with
/// `base_angle`, emits; its cone rotates when the light is advanced.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedLight {
    position: Point,
    half_extent: f64,
    base_angle: f64,
    spread: f64,
    intensity: f64,
    /// Cone rotation speed, radians per millisecond.
    rotation_speed: f64,
    /// Accumulated rotation away from `base_angle`.
    phase: f64,
    /// Room ids of the housing faces: left, top, right, bottom.
    face_ids: [usize; 4],
    /// Index into `face_ids` of the emitting face.
    emitting_face: usize,
}

impl TrackedLight {
    /// Appends a housing centered at `position` to the room and picks
    /// the face whose outward normal best matches `base_angle` as the
    /// emitting face.
    pub fn new(
        room: &mut Room,
        position: Point,
        half_extent: f64,
        base_angle: f64,
        spread: f64,
        intensity: f64,
    ) -> Result<Self> {
        if half_extent <= 0.0 {
            bail!("housing half extent must be positive, got {half_extent}");
        }
        let segments = Self::housing_segments(position, half_extent);
        let normals = Self::face_normals();
        let mut face_ids = [0usize; 4];
        for (id, (segment, normal)) in face_ids.iter_mut().zip(segments.iter().zip(&normals)) {
            *id = room.push(*segment, *normal)?;
        }

        let dir = Vector::from_angle(base_angle);
        let mut emitting_face = 0;
        let mut best = f64::NEG_INFINITY;
        for (i, normal) in normals.iter().enumerate() {
            let alignment = normal.dot(dir);
            if alignment > best {
                best = alignment;
                emitting_face = i;
            }
        }

        Ok(Self {
            position,
            half_extent,
            base_angle: angle::normalize_angle(base_angle),
            spread,
            intensity,
            rotation_speed: 0.0,
            phase: 0.0,
            face_ids,
            emitting_face,
        })
    }

    fn face_normals() -> [Vector; 4] {
        [
            Vector::new(-1.0, 0.0),
            Vector::new(0.0, 1.0),
            Vector::new(1.0, 0.0),
            Vector::new(0.0, -1.0),
        ]
    }

    /// Housing faces in `face_ids` order, wound so each outward normal
    /// is the face's left perpendicular.
    fn housing_segments(position: Point, half_extent: f64) -> [LineSegment; 4] {
        let e = half_extent;
        let c0 = Point::new(position.x - e, position.y - e);
        let c1 = Point::new(position.x - e, position.y + e);
        let c2 = Point::new(position.x + e, position.y + e);
        let c3 = Point::new(position.x + e, position.y - e);
        [
            LineSegment::new(c0, c1),
            LineSegment::new(c1, c2),
            LineSegment::new(c2, c3),
            LineSegment::new(c3, c0),
        ]
    }

    /// Moves the housing, rewriting its room surfaces in place.
    pub fn update_position(&mut self, room: &mut Room, x: f64, y: f64) -> Result<()> {
        self.position = Point::new(x, y);
        let segments = Self::housing_segments(self.position, self.half_extent);
        for (id, segment) in self.face_ids.iter().zip(segments) {
            room.update_segment(*id, segment)?;
        }
        Ok(())
    }

    /// Rotates the emission cone by the elapsed time.
    pub fn advance(&mut self, dt_millis: f64) {
        self.phase = angle::normalize_angle(self.phase + self.rotation_speed * dt_millis);
    }

    pub fn set_rotation(&mut self, radians_per_milli: f64) {
        self.rotation_speed = radians_per_milli;
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn face_ids(&self) -> [usize; 4] {
        self.face_ids
    }

    pub fn emitting_surface_id(&self) -> usize {
        self.face_ids[self.emitting_face]
    }

    /// Current cone center direction.
    pub fn cone_angle(&self) -> f64 {
        angle::normalize_angle(self.base_angle + self.phase)
    }
}

impl Emitter for TrackedLight {
    fn generate_sources(&self) -> Vec<LightSource> {
        let segments = Self::housing_segments(self.position, self.half_extent);
        let normals = Self::face_normals();
        let segment = segments[self.emitting_face];
        let (p1_angle, p2_angle) = cone_about(
            &segment,
            &normals[self.emitting_face],
            self.cone_angle(),
            self.spread,
        );
        vec![LightSource::new(
            segment,
            p1_angle,
            p2_angle,
            self.intensity,
            Some(self.emitting_surface_id()),
        )]
    }
}
