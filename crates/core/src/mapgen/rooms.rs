//! Randomized retry-based room packing inside blocks.

use log::debug;

use crate::context::GenContext;
use crate::map::{Map, Room};
use crate::settings::Settings;
use crate::types::{CellType, Rect, RoomKind};

const MIN_ROOM_SIDE: i32 = 4;
const MAX_ROOM_WIDTH: i32 = 14;
const MAX_ROOM_HEIGHT: i32 = 12;

/// Places rooms in rounds over a shuffled block order, one attempt per block
/// per round, until the target is met or a whole round places nothing.
pub(super) fn pack_rooms(context: &mut GenContext, map: &mut Map, settings: &Settings) {
    let target = settings.rooms_count.max(0) as usize;
    let tech_target =
        context.range_i32(settings.tech_rooms_min, settings.tech_rooms_max).max(0) as usize;
    let tech_target = tech_target.min(target);

    let mut order: Vec<usize> = (0..map.blocks.len()).collect();
    context.shuffle(&mut order);

    while map.rooms.len() < target {
        let mut placed_this_round = 0;
        for &block_index in &order {
            if map.rooms.len() >= target {
                break;
            }
            let tech = map.rooms.len() < tech_target;
            if place_room_in_block(context, map, block_index, settings, tech) {
                placed_this_round += 1;
            }
        }
        if placed_this_round == 0 {
            break;
        }
    }
    debug!("packed {} of {target} rooms ({tech_target} tech)", map.rooms.len());
}

fn place_room_in_block(
    context: &mut GenContext,
    map: &mut Map,
    block_index: usize,
    settings: &Settings,
    tech: bool,
) -> bool {
    let block = map.blocks[block_index].rect;
    let max_width = MAX_ROOM_WIDTH.min(block.width - 2);
    let max_height = MAX_ROOM_HEIGHT.min(block.height - 2);
    if max_width < MIN_ROOM_SIDE || max_height < MIN_ROOM_SIDE {
        return false;
    }
    let inner = Rect::new(block.x + 1, block.y + 1, block.width - 2, block.height - 2);

    for _ in 0..settings.attempts_per_room {
        let width = context.range_i32(MIN_ROOM_SIDE, max_width);
        let height = context.range_i32(MIN_ROOM_SIDE, max_height);
        let x = context.range_i32(inner.x, inner.x + inner.width - width);
        let y = context.range_i32(inner.y, inner.y + inner.height - height);
        let candidate = Rect::new(x, y, width, height);

        if map
            .rooms
            .iter()
            .any(|room| room.rect.expanded(settings.padding_units).intersects(&candidate))
        {
            continue;
        }
        if candidate
            .cells()
            .any(|cell| matches!(map.cell(cell), Some(CellType::Corridor | CellType::Gate)))
        {
            continue;
        }

        let id = context.next_room_id();
        let uid = context.next_uid();
        for cell in candidate.cells() {
            map.cells.set(cell, CellType::Floor);
        }
        let block_id = map.blocks[block_index].id;
        map.blocks[block_index].rooms.push(id);
        map.rooms.push(Room {
            id,
            uid,
            rect: candidate,
            kind: if tech { RoomKind::TechRoom } else { RoomKind::Generic },
            block: block_id,
            doors: Vec::new(),
        });
        return true;
    }
    false
}
