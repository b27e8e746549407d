//! Block-boundary access points.

use crate::context::GenContext;
use crate::map::{Gate, Map};
use crate::settings::Settings;
use crate::types::{CellType, GateKind, Point};

/// Scatters gates on each block's boundary. Gates overwrite whatever cell they
/// land on and are not guaranteed to connect to anything.
pub(super) fn place_gates(context: &mut GenContext, map: &mut Map, settings: &Settings) {
    for block_index in 0..map.blocks.len() {
        let rect = map.blocks[block_index].rect;
        let block_id = map.blocks[block_index].id;
        let count = context.range_i32(settings.gates_per_block_min, settings.gates_per_block_max);
        for _ in 0..count {
            let pos = match context.below(4) {
                0 => Point { x: context.range_i32(rect.x, rect.right()), y: rect.y },
                1 => Point { x: rect.right(), y: context.range_i32(rect.y, rect.bottom()) },
                2 => Point { x: context.range_i32(rect.x, rect.right()), y: rect.bottom() },
                _ => Point { x: rect.x, y: context.range_i32(rect.y, rect.bottom()) },
            };
            map.cells.set(pos, CellType::Gate);
            map.blocks[block_index].gates.push(map.gates.len());
            map.gates.push(Gate { block: block_id, pos, kind: GateKind::Block });
        }
    }
}
