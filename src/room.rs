//! The environment: an ordered list of surfaces with stable ids.

pub mod builder;
pub mod surface;

use anyhow::{Context, Result, bail};

use crate::{LineSegment, Point, Surface, Vector};

/// A closed 2D environment: an outer border plus interior obstacles.
///
/// Surfaces are immutable after construction except for in-place segment
/// updates of surfaces owned by movable lights (`update_segment`), which
/// keep the id space stable.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    surfaces: Vec<Surface>,
}

impl Room {
    /// Creates a room from an externally built surface list.
    ///
    /// Every surface id must equal its index, and every visibility entry
    /// must reference another existing surface.
    pub fn new(surfaces: Vec<Surface>) -> Result<Self> {
        for (idx, srf) in surfaces.iter().enumerate() {
            if srf.id != idx {
                bail!("surface id {} does not match its index {}", srf.id, idx);
            }
            for &vis in &srf.visible_surface_ids {
                if vis >= surfaces.len() {
                    bail!("surface {} references unknown surface {}", srf.id, vis);
                }
                if vis == srf.id {
                    bail!("surface {} lists itself as visible", srf.id);
                }
            }
        }
        Ok(Self { surfaces })
    }

    /// A closed box room: 4 border walls wound counterclockwise so the
    /// inward normals face the interior, each wall seeing the other three.
    pub fn from_box(width: f64, height: f64) -> Result<Self> {
        if width <= 0.0 || height <= 0.0 {
            bail!("box dimensions must be positive: {width} x {height}");
        }
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
        ];
        let mut surfaces = Vec::with_capacity(4);
        for i in 0..4 {
            let seg = LineSegment::new(corners[i], corners[(i + 1) % 4]);
            let normal = seg
                .left_normal()
                .context("box wall has no normal")?;
            let visible = (0..4).filter(|&j| j != i).collect();
            surfaces.push(Surface::new(i, seg, normal, visible)?);
        }
        Self::new(surfaces)
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn get(&self, id: usize) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Appends a surface and returns its id. The visibility list defaults
    /// to every other existing surface, and every existing surface gains
    /// the new id (movable-light housings are appended exactly once, at
    /// construction of the light).
    pub fn push(&mut self, segment: LineSegment, normal: Vector) -> Result<usize> {
        let id = self.surfaces.len();
        let visible = (0..id).collect();
        let srf = Surface::new(id, segment, normal, visible)?;
        for existing in &mut self.surfaces {
            existing.visible_surface_ids.push(id);
        }
        self.surfaces.push(srf);
        Ok(id)
    }

    /// Replaces the segment of an existing surface in place (same id, same
    /// normal). Used by movable lights to relocate their owned surfaces.
    pub fn update_segment(&mut self, id: usize, segment: LineSegment) -> Result<()> {
        if segment.length() < crate::geom::EPS {
            bail!("surface {id} update has a zero-length segment");
        }
        match self.surfaces.get_mut(id) {
            Some(srf) => {
                srf.segment = segment;
                Ok(())
            }
            None => bail!("no surface with id {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_box() {
        let room = Room::from_box(600.0, 600.0).unwrap();
        assert_eq!(room.len(), 4);
        // Floor normal points up into the room.
        let floor = room.get(0).unwrap();
        assert!(floor.normal.is_close(&Vector::new(0., 1.)));
        // Ceiling normal points down into the room.
        let ceiling = room.get(2).unwrap();
        assert!(ceiling.normal.is_close(&Vector::new(0., -1.)));
        for srf in room.surfaces() {
            assert_eq!(srf.visible_surface_ids.len(), 3);
            assert!(!srf.visible_surface_ids.contains(&srf.id));
        }
    }

    #[test]
    fn test_new_validates_ids() {
        let seg = LineSegment::new(Point::new(0., 0.), Point::new(1., 0.));
        let bad = Surface::new(5, seg, Vector::new(0., 1.), vec![]).unwrap();
        assert!(Room::new(vec![bad]).is_err());

        let self_ref = Surface::new(0, seg, Vector::new(0., 1.), vec![0]).unwrap();
        assert!(Room::new(vec![self_ref]).is_err());

        let dangling = Surface::new(0, seg, Vector::new(0., 1.), vec![7]).unwrap();
        assert!(Room::new(vec![dangling]).is_err());
    }

    #[test]
    fn test_push_extends_visibility() {
        let mut room = Room::from_box(100.0, 100.0).unwrap();
        let seg = LineSegment::new(Point::new(40., 50.), Point::new(60., 50.));
        let id = room.push(seg, Vector::new(0., -1.)).unwrap();
        assert_eq!(id, 4);
        assert_eq!(room.len(), 5);
        for srf in room.surfaces().iter().take(4) {
            assert!(srf.visible_surface_ids.contains(&id));
        }
        assert_eq!(room.get(id).unwrap().visible_surface_ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_update_segment() {
        let mut room = Room::from_box(100.0, 100.0).unwrap();
        let seg = LineSegment::new(Point::new(40., 50.), Point::new(60., 50.));
        let id = room.push(seg, Vector::new(0., -1.)).unwrap();

        let moved = LineSegment::new(Point::new(10., 20.), Point::new(30., 20.));
        room.update_segment(id, moved).unwrap();
        assert!(room.get(id).unwrap().segment.is_close(&moved));
        // Normal untouched.
        assert!(room.get(id).unwrap().normal.is_close(&Vector::new(0., -1.)));

        assert!(room.update_segment(99, moved).is_err());
    }
}
