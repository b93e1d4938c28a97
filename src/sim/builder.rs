//! Visibility polygon construction for a single light source.
//!
//! A source is traced from its apex: the meeting point of the two
//! boundary rays run backwards through the segment endpoints. From the
//! apex, rays are cast at both span boundaries and at every candidate
//! surface endpoint inside the span; endpoint hits survive only when
//! the surface faces the apex and a cast from the endpoint back toward
//! the apex confirms nothing occludes it.
//!
//! The confirmed hits, sorted by sweep order, are then reconciled into
//! a single polygon loop. Adjacent hits on different surfaces form a
//! clean corner when their locations coincide, get the shared corner
//! vertex inserted when their surfaces connect, and are otherwise
//! bridged by extending whichever ray skimmed a silhouette edge, or by
//! bisecting the sweep between them. Each maximal run of hits on one
//! surface becomes a fan, and every front-facing fan bounces a
//! secondary source for the next generation.

use std::collections::VecDeque;

use log::warn;

use crate::geom::angle::{self, AngularSpan};
use crate::geom::point::Point;
use crate::geom::ray::Ray;
use crate::geom::segment::LineSegment;
use crate::geom::vector::Vector;
use crate::room::Room;
use crate::sim::config::TraceConfig;
use crate::sim::falloff::Falloff;
use crate::sim::result::{IntensityAnchor, LitPolygon, RayHit, TraceResult};
use crate::sim::sources::LightSource;

/// Angular tolerance for span membership and near-tie hit ordering.
const ANGLE_EPS: f64 = 1e-9;

/// Traces a single light source through the room.
///
/// Returns an empty result when the reversed boundary rays never
/// converge (no apex exists) or when the source is below the
/// configured intensity floor.
pub fn trace_source(room: &Room, source: &LightSource, config: &TraceConfig) -> TraceResult {
    match SourceSweep::begin(room, source, config) {
        Some(sweep) => sweep.run(),
        None => TraceResult::new(),
    }
}

/// A maximal run of consecutive hits on one surface.
struct Fan {
    first: RayHit,
    last: RayHit,
    samples: Vec<f64>,
}

impl Fan {
    fn start(hit: RayHit, sample: f64) -> Self {
        Self {
            first: hit,
            last: hit,
            samples: vec![sample],
        }
    }

    fn extend(&mut self, hit: RayHit, sample: f64) {
        self.last = hit;
        self.samples.push(sample);
    }

    fn average(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

/// Closest forward intersection of a ray with a set of surfaces.
fn cast_among(
    room: &Room,
    eps: f64,
    ray: &Ray,
    ids: &[usize],
    skip: Option<usize>,
    total_rays: &mut usize,
) -> Option<(f64, Point, usize)> {
    *total_rays += 1;
    let mut closest: Option<(f64, Point, usize)> = None;
    for &id in ids {
        if skip == Some(id) {
            continue;
        }
        let Some(surface) = room.get(id) else { continue };
        if let Some((t, location)) = ray.intersect_segment(&surface.segment, eps) {
            match closest {
                None => closest = Some((t, location, id)),
                Some((best, _, _)) if t < best => closest = Some((t, location, id)),
                _ => {}
            }
        }
    }
    closest
}

/// One source's sweep through the room.
struct SourceSweep<'a> {
    room: &'a Room,
    config: &'a TraceConfig,
    falloff: Falloff,
    source: &'a LightSource,
    apex: Point,
    span: AngularSpan,
    /// Surfaces this source may hit.
    candidate_ids: Vec<usize>,
    /// Polygon loop under construction, starting at the source's p1.
    polygon: Vec<Point>,
    secondaries: Vec<LightSource>,
    rays: Vec<LineSegment>,
    total_rays: usize,
    corrections: usize,
    budget_warned: bool,
    max_hit_distance: f64,
}

impl<'a> SourceSweep<'a> {
    fn begin(room: &'a Room, source: &'a LightSource, config: &'a TraceConfig) -> Option<Self> {
        if source.intensity < config.min_intensity {
            return None;
        }
        let r1 = Ray::new(source.segment.p1, angle::reverse_angle(source.p1_angle));
        let r2 = Ray::new(source.segment.p2, angle::reverse_angle(source.p2_angle));
        let apex = r1.intersect_ray(&r2, config.epsilon)?;

        // A bound source never tests its own surface.
        let candidate_ids: Vec<usize> = match source.emission_surface_id {
            Some(id) => match room.get(id) {
                Some(surface) => surface.visible_surface_ids.clone(),
                None => (0..room.len()).filter(|&other| other != id).collect(),
            },
            None => (0..room.len()).collect(),
        };

        Some(Self {
            room,
            config,
            falloff: Falloff::new(config.falloff_range),
            source,
            apex,
            span: source.span(),
            candidate_ids,
            polygon: vec![source.segment.p1],
            secondaries: Vec::new(),
            rays: Vec::new(),
            total_rays: 0,
            corrections: 0,
            budget_warned: false,
            max_hit_distance: 0.0,
        })
    }

    fn run(mut self) -> TraceResult {
        let mut hits = self.collect_hits();
        self.sort_hits(&mut hits);
        if self.config.collect_rays {
            self.rays
                .extend(hits.iter().map(|h| LineSegment::new(h.origin, h.location)));
        }

        let mut queue: VecDeque<RayHit> = hits.into();
        let Some(first) = queue.pop_front() else {
            return self.finish(None);
        };
        self.max_hit_distance = first.distance;
        let mut fan = Fan::start(first, self.sample(&first));
        self.push_vertex(first.location);

        while let Some(hit) = queue.pop_front() {
            self.max_hit_distance = self.max_hit_distance.max(hit.distance);
            let sample = self.sample(&hit);
            if fan.last.surface_id == hit.surface_id {
                fan.extend(hit, sample);
                self.push_vertex(hit.location);
                continue;
            }
            fan = self.transition(fan, hit, sample, &mut queue);
        }
        self.finish(Some(fan))
    }

    /// Falloff-attenuated intensity arriving at a hit.
    fn sample(&self, hit: &RayHit) -> f64 {
        self.falloff.apply(self.source.intensity, hit.distance)
    }

    fn cast_candidates(&mut self, ray: &Ray, skip: Option<usize>) -> Option<(f64, Point, usize)> {
        cast_among(
            self.room,
            self.config.epsilon,
            ray,
            &self.candidate_ids,
            skip,
            &mut self.total_rays,
        )
    }

    fn make_hit(
        &self,
        origin: Point,
        location: Point,
        cast_angle: f64,
        distance: f64,
        surface_id: usize,
    ) -> RayHit {
        let bounce_angle = match self.room.get(surface_id) {
            Some(surface) => angle::reflect_angle(cast_angle, surface.normal_angle()),
            None => cast_angle,
        };
        RayHit {
            origin,
            location,
            cast_angle,
            bounce_angle,
            distance,
            surface_id,
        }
    }

    fn collect_hits(&mut self) -> Vec<RayHit> {
        let mut hits = Vec::new();

        // Boundary rays bracket the sweep; they are the only way to see
        // a surface crossing the cone without an endpoint inside it.
        for boundary in [self.span.start, self.span.end()] {
            let ray = Ray::new(self.apex, boundary);
            if let Some((t, location, surface_id)) = self.cast_candidates(&ray, None) {
                hits.push(self.make_hit(self.apex, location, boundary, t, surface_id));
            }
        }

        // Surface endpoints inside the span, kept when they face the
        // apex and the back cast confirms nothing occludes them.
        for idx in 0..self.candidate_ids.len() {
            let id = self.candidate_ids[idx];
            let Some(surface) = self.room.get(id) else { continue };
            let segment = surface.segment;
            let normal_angle = surface.normal_angle();
            for endpoint in [segment.p1, segment.p2] {
                let Some(to_endpoint) = Ray::from_points(self.apex, endpoint) else {
                    continue;
                };
                let cast_angle = to_endpoint.angle;
                if !self.span.contains(cast_angle, ANGLE_EPS) {
                    continue;
                }
                if angle::is_back_facing(cast_angle, normal_angle, self.config.epsilon) {
                    continue;
                }
                let distance = self.apex.distance(&endpoint);
                if !self.confirm_endpoint(endpoint, cast_angle, distance, id) {
                    continue;
                }
                hits.push(self.make_hit(self.apex, endpoint, cast_angle, distance, id));
            }
        }
        hits
    }

    /// Casts from the endpoint back toward the apex. A bound source
    /// must find its own emitting surface first; an unbound source only
    /// requires that nothing sits strictly between endpoint and apex.
    fn confirm_endpoint(
        &mut self,
        endpoint: Point,
        cast_angle: f64,
        distance: f64,
        surface_id: usize,
    ) -> bool {
        let back = Ray::new(endpoint, angle::reverse_angle(cast_angle));
        let hit = {
            let Some(surface) = self.room.get(surface_id) else {
                return false;
            };
            cast_among(
                self.room,
                self.config.epsilon,
                &back,
                &surface.visible_surface_ids,
                None,
                &mut self.total_rays,
            )
        };
        match self.source.emission_surface_id {
            Some(emitter_id) => matches!(hit, Some((_, _, id)) if id == emitter_id),
            None => match hit {
                Some((t, _, _)) => t >= distance - self.config.epsilon,
                None => true,
            },
        }
    }

    fn sort_hits(&self, hits: &mut [RayHit]) {
        hits.sort_by(|a, b| {
            self.span
                .sort_key(a.cast_angle)
                .total_cmp(&self.span.sort_key(b.cast_angle))
        });
        // Hits this close in angle have no reliable order of their own;
        // fall back to the surfaces' midpoint directions.
        for i in 1..hits.len() {
            let (a, b) = (hits[i - 1], hits[i]);
            if a.surface_id == b.surface_id {
                continue;
            }
            let gap = self.span.sort_key(b.cast_angle) - self.span.sort_key(a.cast_angle);
            if gap.abs() > ANGLE_EPS {
                continue;
            }
            if self.surface_mid_key(a.surface_id) > self.surface_mid_key(b.surface_id) {
                hits.swap(i - 1, i);
            }
        }
    }

    /// Sort key of the direction from the apex to a surface's midpoint.
    fn surface_mid_key(&self, surface_id: usize) -> f64 {
        let Some(surface) = self.room.get(surface_id) else {
            return 0.0;
        };
        let mid = surface.segment.midpoint();
        if mid.is_close_within(&self.apex, self.config.epsilon) {
            return 0.0;
        }
        self.span.sort_key((mid - self.apex).angle())
    }

    /// Handles a hit landing on a different surface than the open fan.
    fn transition(
        &mut self,
        fan: Fan,
        hit: RayHit,
        sample: f64,
        queue: &mut VecDeque<RayHit>,
    ) -> Fan {
        let prev = fan.last;

        // Coincident locations: the surfaces meet exactly where both
        // rays landed.
        if prev.location.is_close_within(&hit.location, self.config.epsilon) {
            self.close_fan(fan);
            self.push_vertex(hit.location);
            return Fan::start(hit, sample);
        }

        // Connected surfaces: insert their shared corner between the
        // two locations.
        if let Some(corner) = self.shared_corner(prev.surface_id, hit.surface_id) {
            if let Some(to_corner) = Ray::from_points(self.apex, corner) {
                let corner_angle = to_corner.angle;
                let corner_distance = self.apex.distance(&corner);
                let closing =
                    self.make_hit(self.apex, corner, corner_angle, corner_distance, prev.surface_id);
                let corner_sample = self.sample(&closing);
                let mut fan = fan;
                fan.extend(closing, corner_sample);
                self.push_vertex(corner);
                self.close_fan(fan);

                let opening =
                    self.make_hit(self.apex, corner, corner_angle, corner_distance, hit.surface_id);
                let mut next = Fan::start(opening, corner_sample);
                next.extend(hit, sample);
                self.push_vertex(hit.location);
                return next;
            }
        }

        self.reconcile(fan, hit, sample, queue)
    }

    /// Bridges a discontinuity between the fan's last hit and the next
    /// one. One of the two rays skimmed a silhouette edge: extend it
    /// past that edge and let the corrected geometry rejoin the walk.
    /// When neither ray extends cleanly, bisect the sweep between them;
    /// once the correction budget is spent, fall back to plain seams.
    fn reconcile(
        &mut self,
        fan: Fan,
        hit: RayHit,
        sample: f64,
        queue: &mut VecDeque<RayHit>,
    ) -> Fan {
        let prev = fan.last;
        if self.corrections >= self.config.max_corrections {
            if !self.budget_warned {
                warn!(
                    "correction budget ({}) exhausted tracing source at {}; emitting plain seams",
                    self.config.max_corrections,
                    self.source.segment.midpoint(),
                );
                self.budget_warned = true;
            }
            return self.seam(fan, hit, sample);
        }

        // The earlier ray may have skimmed its surface's far edge and
        // continued to a surface revealed behind it. The incoming hit
        // goes back on the queue: the corrected fan may relate to it
        // differently.
        if let Some(extended) = self.extend_past(&prev) {
            if !self.visited(extended.location) && !self.hit_back_facing(&extended) {
                self.close_fan(fan);
                self.push_vertex(extended.location);
                if self.config.collect_rays {
                    self.rays
                        .push(LineSegment::new(extended.origin, extended.location));
                }
                self.corrections += 1;
                queue.push_front(hit);
                let extended_sample = self.sample(&extended);
                return Fan::start(extended, extended_sample);
            }
        }

        // Or the later ray skimmed its near edge, with the fan's
        // surface continuing behind it.
        if let Some(extended) = self.extend_past(&hit) {
            if extended.surface_id == prev.surface_id && !self.visited(extended.location) {
                let extended_sample = self.sample(&extended);
                let mut fan = fan;
                fan.extend(extended, extended_sample);
                self.push_vertex(extended.location);
                if self.config.collect_rays {
                    self.rays
                        .push(LineSegment::new(extended.origin, extended.location));
                }
                self.close_fan(fan);
                self.corrections += 1;
                self.push_vertex(hit.location);
                return Fan::start(hit, sample);
            }
        }

        // Neither hit sits on a silhouette endpoint; hunt the occlusion
        // boundary between the two surfaces instead.
        if let Some((closing, opening)) = self.bisect(prev, hit) {
            let closing_sample = self.sample(&closing);
            let mut fan = fan;
            fan.extend(closing, closing_sample);
            self.push_vertex(closing.location);
            self.close_fan(fan);

            let opening_sample = self.sample(&opening);
            let mut next = Fan::start(opening, opening_sample);
            self.push_vertex(opening.location);
            next.extend(hit, sample);
            self.push_vertex(hit.location);
            return next;
        }

        self.seam(fan, hit, sample)
    }

    /// Closes the fan and starts a new one with no bridging vertices.
    fn seam(&mut self, fan: Fan, hit: RayHit, sample: f64) -> Fan {
        self.close_fan(fan);
        self.push_vertex(hit.location);
        Fan::start(hit, sample)
    }

    /// Continues a hit's ray past its surface. Only hits landing on one
    /// of their surface's endpoints can be silhouette edges; anything
    /// else gets no extension.
    fn extend_past(&mut self, hit: &RayHit) -> Option<RayHit> {
        let segment = self.room.get(hit.surface_id)?.segment;
        if !hit.location.is_close_within(&segment.p1, self.config.epsilon)
            && !hit.location.is_close_within(&segment.p2, self.config.epsilon)
        {
            return None;
        }
        let ray = Ray::new(hit.location, hit.cast_angle);
        let (t, location, surface_id) = self.cast_candidates(&ray, Some(hit.surface_id))?;
        Some(self.make_hit(hit.location, location, hit.cast_angle, hit.distance + t, surface_id))
    }

    fn hit_back_facing(&self, hit: &RayHit) -> bool {
        match self.room.get(hit.surface_id) {
            Some(surface) => {
                angle::is_back_facing(hit.cast_angle, surface.normal_angle(), self.config.epsilon)
            }
            None => true,
        }
    }

    /// Narrows the angular bracket between a hit on the fan's surface
    /// and one on the next until both land within tolerance of each
    /// other or the depth budget runs out. Gives up when a probe lands
    /// on a third surface or on nothing.
    fn bisect(&mut self, mut lo: RayHit, mut hi: RayHit) -> Option<(RayHit, RayHit)> {
        for _ in 0..self.config.max_bisections {
            if lo.location.is_close_within(&hi.location, self.config.epsilon) {
                break;
            }
            let mid_key =
                (self.span.sort_key(lo.cast_angle) + self.span.sort_key(hi.cast_angle)) / 2.0;
            let mid_angle =
                angle::normalize_angle(self.span.start + mid_key * self.span.sweep.signum());
            let ray = Ray::new(self.apex, mid_angle);
            let (t, location, surface_id) = self.cast_candidates(&ray, None)?;
            let probe = self.make_hit(self.apex, location, mid_angle, t, surface_id);
            if surface_id == lo.surface_id {
                lo = probe;
            } else if surface_id == hi.surface_id {
                hi = probe;
            } else {
                return None;
            }
        }
        if self.config.collect_rays {
            self.rays.push(LineSegment::new(self.apex, lo.location));
            self.rays.push(LineSegment::new(self.apex, hi.location));
        }
        Some((lo, hi))
    }

    fn shared_corner(&self, a: usize, b: usize) -> Option<Point> {
        let sa = self.room.get(a)?;
        let sb = self.room.get(b)?;
        sa.segment.connection_point(&sb.segment, self.config.epsilon)
    }

    /// Turns a finished fan into a secondary source, unless the lit run
    /// faces away from the apex or the bounce is too dim to matter.
    fn close_fan(&mut self, fan: Fan) {
        let Some(surface) = self.room.get(fan.first.surface_id) else {
            return;
        };
        if angle::is_back_facing(
            fan.first.cast_angle,
            surface.normal_angle(),
            self.config.epsilon,
        ) {
            return;
        }
        let intensity = self.falloff.apply(fan.average(), fan.first.distance);
        if intensity < self.config.min_intensity {
            return;
        }
        self.secondaries.push(LightSource::new(
            LineSegment::new(fan.first.location, fan.last.location),
            fan.first.bounce_angle,
            fan.last.bounce_angle,
            intensity,
            Some(fan.first.surface_id),
        ));
    }

    fn push_vertex(&mut self, point: Point) {
        if let Some(last) = self.polygon.last() {
            if last.is_close_within(&point, self.config.epsilon) {
                return;
            }
        }
        self.polygon.push(point);
    }

    fn visited(&self, point: Point) -> bool {
        self.polygon
            .iter()
            .any(|p| p.is_close_within(&point, self.config.epsilon))
    }

    fn finish(mut self, fan: Option<Fan>) -> TraceResult {
        if let Some(fan) = fan {
            self.close_fan(fan);
        }
        self.push_vertex(self.source.segment.p2);

        let mut result = TraceResult::new();
        if self.polygon.len() >= 3 {
            let mid = self.source.segment.midpoint();
            let reach = self.max_hit_distance;
            let dim = mid + Vector::from_angle(self.span.midpoint()) * reach;
            result.lit_polygons.push(LitPolygon {
                points: self.polygon,
                max_intensity: IntensityAnchor {
                    location: mid,
                    value: self.source.intensity,
                },
                min_intensity: IntensityAnchor {
                    location: dim,
                    value: self.falloff.apply(self.source.intensity, reach),
                },
            });
        }
        result.light_sources = self.secondaries;
        result.visible_rays = self.rays;
        result.total_rays = self.total_rays;
        result
    }
}
