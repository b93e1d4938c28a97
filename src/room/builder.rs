//! Room construction helpers: border walls, obstacles, visibility sets.

use anyhow::{Context, Result};

use crate::geom::EPS;
use crate::{LineSegment, Point, Room, Surface, Vector};

/// Incremental builder for rooms.
///
/// Surfaces are appended in id order. Each surface may receive an
/// author-supplied visibility set; surfaces without one get a
/// conservative derived set at `finish` (every surface not lying wholly
/// behind the emitting surface's line).
#[derive(Debug, Default)]
pub struct RoomBuilder {
    walls: Vec<(LineSegment, Vector)>,
    visibility: Vec<Option<Vec<usize>>>,
}

impl RoomBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one wall with an explicit lit-side normal. Returns its id.
    pub fn wall(&mut self, segment: LineSegment, normal: Vector) -> usize {
        let id = self.walls.len();
        self.walls.push((segment, normal));
        self.visibility.push(None);
        id
    }

    /// Appends the four border walls of a `width` x `height` room, wound
    /// counterclockwise so their normals point inward. Returns the ids of
    /// (floor, right, ceiling, left).
    pub fn border(&mut self, width: f64, height: f64) -> [usize; 4] {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
        ];
        self.ring(&corners)
    }

    /// Appends an axis-aligned rectangular obstacle, wound clockwise so
    /// its normals point outward. Returns the ids of
    /// (left, top, right, bottom) faces.
    pub fn obstacle(&mut self, x: f64, y: f64, width: f64, height: f64) -> [usize; 4] {
        let corners = [
            Point::new(x, y),
            Point::new(x, y + height),
            Point::new(x + width, y + height),
            Point::new(x + width, y),
        ];
        self.ring(&corners)
    }

    /// Overrides the visibility set for one surface id.
    pub fn visibility(&mut self, id: usize, ids: Vec<usize>) {
        if let Some(slot) = self.visibility.get_mut(id) {
            *slot = Some(ids);
        }
    }

    fn ring(&mut self, corners: &[Point; 4]) -> [usize; 4] {
        let mut ids = [0usize; 4];
        for i in 0..4 {
            let seg = LineSegment::new(corners[i], corners[(i + 1) % 4]);
            let normal = seg.direction().perpendicular();
            ids[i] = self.wall(seg, normal);
        }
        ids
    }

    /// Builds the room. Missing visibility sets are derived: surface `j`
    /// is a candidate for rays leaving surface `i` unless `j` lies wholly
    /// behind `i`'s line (both endpoints on the dark side), since emitted
    /// rays only ever travel into the lit half-plane.
    pub fn finish(self) -> Result<Room> {
        let mut surfaces = Vec::with_capacity(self.walls.len());
        for (id, (segment, normal)) in self.walls.iter().enumerate() {
            surfaces.push(
                Surface::new(id, *segment, *normal, Vec::new())
                    .with_context(|| format!("building surface {id}"))?,
            );
        }

        for i in 0..surfaces.len() {
            let vis = match &self.visibility[i] {
                Some(ids) => ids.clone(),
                None => derived_visibility(&surfaces, i),
            };
            surfaces[i].visible_surface_ids = vis;
        }

        Room::new(surfaces)
    }
}

/// Conservative candidate set for rays emitted from surface `idx`.
fn derived_visibility(surfaces: &[Surface], idx: usize) -> Vec<usize> {
    let emitter = &surfaces[idx];
    let anchor = emitter.segment.p1;
    surfaces
        .iter()
        .filter(|other| other.id != idx)
        .filter(|other| {
            let d1 = (other.segment.p1 - anchor).dot(emitter.normal);
            let d2 = (other.segment.p2 - anchor).dot(emitter.normal);
            // Keep unless wholly behind the emitting line.
            !(d1 < -EPS && d2 < -EPS)
        })
        .map(|other| other.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_normals_point_inward() {
        let mut builder = RoomBuilder::new();
        let [floor, right, ceiling, left] = builder.border(600.0, 600.0);
        let room = builder.finish().unwrap();

        assert!(room.get(floor).unwrap().normal.is_close(&Vector::new(0., 1.)));
        assert!(room.get(right).unwrap().normal.is_close(&Vector::new(-1., 0.)));
        assert!(room.get(ceiling).unwrap().normal.is_close(&Vector::new(0., -1.)));
        assert!(room.get(left).unwrap().normal.is_close(&Vector::new(1., 0.)));
    }

    #[test]
    fn test_obstacle_normals_point_outward() {
        let mut builder = RoomBuilder::new();
        builder.border(600.0, 600.0);
        let [left, top, right, bottom] = builder.obstacle(100.0, 100.0, 50.0, 30.0);
        let room = builder.finish().unwrap();

        assert!(room.get(left).unwrap().normal.is_close(&Vector::new(-1., 0.)));
        assert!(room.get(top).unwrap().normal.is_close(&Vector::new(0., 1.)));
        assert!(room.get(right).unwrap().normal.is_close(&Vector::new(1., 0.)));
        assert!(room.get(bottom).unwrap().normal.is_close(&Vector::new(0., -1.)));
    }

    #[test]
    fn test_derived_visibility_prunes_behind() {
        let mut builder = RoomBuilder::new();
        let [floor, _, ceiling, _] = builder.border(600.0, 600.0);
        let [_, obs_top, _, obs_bottom] = builder.obstacle(200.0, 200.0, 100.0, 40.0);
        let room = builder.finish().unwrap();

        // The obstacle's top face looks up: the floor is wholly behind it.
        let top_vis = &room.get(obs_top).unwrap().visible_surface_ids;
        assert!(!top_vis.contains(&floor));
        assert!(top_vis.contains(&ceiling));

        // The bottom face looks down: the ceiling is wholly behind it.
        let bottom_vis = &room.get(obs_bottom).unwrap().visible_surface_ids;
        assert!(bottom_vis.contains(&floor));
        assert!(!bottom_vis.contains(&ceiling));

        // Border walls never see themselves.
        let floor_vis = &room.get(floor).unwrap().visible_surface_ids;
        assert!(!floor_vis.contains(&floor));
    }

    #[test]
    fn test_visibility_override() {
        let mut builder = RoomBuilder::new();
        let [floor, right, ceiling, _] = builder.border(100.0, 100.0);
        builder.visibility(floor, vec![ceiling]);
        let room = builder.finish().unwrap();

        assert_eq!(room.get(floor).unwrap().visible_surface_ids, vec![ceiling]);
        // Others still derived.
        assert_eq!(room.get(right).unwrap().visible_surface_ids.len(), 3);
    }
}
