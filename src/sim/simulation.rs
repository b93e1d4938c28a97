//! Multi-bounce trace driver.
//!
//! One trace runs in generations: generation 0 traces the emitters'
//! primary sources, and each following generation traces the secondary
//! sources bounced by the one before it. The run stops at the depth
//! limit or as soon as a generation spawns nothing bright enough to
//! trace.

use log::debug;

use crate::room::Room;
use crate::sim::builder;
use crate::sim::config::TraceConfig;
use crate::sim::result::{TraceOutput, TraceResult};
use crate::sim::sources::{Emitter, LightSource};

/// Drives tracing across bounce generations.
#[derive(Debug, Clone)]
pub struct Tracer {
    pub config: TraceConfig,
}

impl Tracer {
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    /// Traces the emitters' current sources through up to `depth`
    /// generations: the primary one plus one per bounce.
    pub fn trace(&self, room: &Room, emitters: &[&dyn Emitter], depth: usize) -> TraceOutput {
        let sources = emitters
            .iter()
            .flat_map(|emitter| emitter.generate_sources())
            .collect();
        self.trace_sources(room, sources, depth)
    }

    /// Traces explicit source records, following bounces until `depth`
    /// generations have run or the light dies out.
    pub fn trace_sources(
        &self,
        room: &Room,
        sources: Vec<LightSource>,
        depth: usize,
    ) -> TraceOutput {
        let mut output = TraceOutput::new();
        let mut current = sources;
        for generation in 0..depth {
            current.retain(|source| source.intensity >= self.config.min_intensity);
            if current.is_empty() {
                break;
            }
            let mut result = TraceResult::new();
            for source in &current {
                result.merge(builder::trace_source(room, source, &self.config));
            }
            debug!(
                "generation {generation}: {} sources -> {} polygons, {} secondaries, {} rays",
                current.len(),
                result.lit_polygons.len(),
                result.light_sources.len(),
                result.total_rays,
            );
            current = result.light_sources.clone();
            output.generations.push(result);
        }
        output
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(TraceConfig::default())
    }
}
