//! Procedural level generation split into one submodule per pipeline stage.

mod area;
mod autosize;
mod corridors;
mod doors;
mod fixed;
mod gates;
mod graph;
mod partition;
mod pipeline;
mod raster;
mod rooms;
mod trunk;
mod validate;

use log::{debug, warn};

use crate::context::GenContext;
use crate::map::Map;
use crate::settings::{Settings, normalize};

pub use area::build_area;
pub use doors::{DoorCandidate, door_candidates};
pub use graph::extra_edge_limit;
pub use validate::reachable_rooms;

/// Cells kept free between the map edge and the partitioned interior.
pub const MAP_MARGIN: i32 = 2;

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationResult {
    pub map: Map,
    pub warnings: Vec<String>,
}

/// Generates one map. `seed` overrides `settings.seed` when given.
///
/// Never fails: out-of-range settings are clamped and every quality issue is
/// reported through `warnings`.
pub fn generate(settings: &Settings, seed: Option<u64>) -> GenerationResult {
    let (settings, mut warnings) = normalize(settings);
    for warning in &warnings {
        warn!("{warning}");
    }

    let seed = seed.unwrap_or(settings.seed);
    let mut context = GenContext::new(seed);
    debug!(
        "generating seed={seed} fixed_layout={} auto_size={}",
        settings.fixed_layout, settings.auto_size
    );

    let map = if settings.fixed_layout {
        fixed::build_fixed_layout(&mut context, &settings, &mut warnings)
    } else if settings.auto_size {
        autosize::generate_auto_sized(&mut context, &settings, &mut warnings)
    } else {
        pipeline::build_map(&mut context, &settings, settings.width, settings.height, &mut warnings)
    };

    GenerationResult { map, warnings }
}

pub(crate) fn report(warnings: &mut Vec<String>, message: String) {
    warn!("{message}");
    warnings.push(message);
}
