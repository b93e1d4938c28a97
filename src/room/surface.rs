use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::{LineSegment, Vector};

/// A boundary segment of the environment.
///
/// The normal points toward the side the surface can be lit from; rays
/// arriving against the normal are front hits, rays arriving along it see
/// the dark back side. `visible_surface_ids` is a coarse author-supplied
/// list bounding which surfaces rays emitted from this one need to test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Stable index into the room's surface list.
    pub id: usize,
    pub segment: LineSegment,
    /// Unit normal of the lit side.
    pub normal: Vector,
    /// Ids of surfaces worth testing for rays emitted from this surface.
    pub visible_surface_ids: Vec<usize>,
}

impl Surface {
    /// Creates a surface, normalizing the supplied normal.
    pub fn new(
        id: usize,
        segment: LineSegment,
        normal: Vector,
        visible_surface_ids: Vec<usize>,
    ) -> Result<Self> {
        if segment.length() < crate::geom::EPS {
            bail!("surface {id} has a zero-length segment");
        }
        let normal = match normal.normalize() {
            Some(n) => n,
            None => bail!("surface {id} has a zero-length normal"),
        };
        Ok(Self {
            id,
            segment,
            normal,
            visible_surface_ids,
        })
    }

    /// Direction angle of the lit-side normal.
    pub fn normal_angle(&self) -> f64 {
        self.normal.angle()
    }
}
