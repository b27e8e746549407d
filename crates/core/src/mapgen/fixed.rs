//! Fixed topology: one block, one straight trunk with vestibule gates at both
//! ends, and a row of equal rooms opening straight onto it.

use log::debug;

use crate::context::GenContext;
use crate::map::{Block, Corridor, Door, Gate, Map, Room};
use crate::settings::Settings;
use crate::types::{BlockId, CellType, Direction, GateKind, Point, Rect, RoomKind};

use super::area::build_area;
use super::partition::interior;
use super::raster::{polyline_cells, radius_for_width, square};
use super::validate::validate_connectivity;
use super::{MAP_MARGIN, report};

const ROOM_WIDTH: i32 = 8;
const ROOM_HEIGHT: i32 = 6;
const MIN_ROOM_HEIGHT: i32 = 3;
const ROOM_SPACING: i32 = 2;
const TECH_ROOM_CHANCE: f32 = 0.2;

pub(super) fn build_fixed_layout(
    context: &mut GenContext,
    settings: &Settings,
    warnings: &mut Vec<String>,
) -> Map {
    context.begin_map();
    let mut map = build_area(settings.width, settings.height, settings.grid_step);
    let block_id = BlockId(0);
    map.blocks.push(Block {
        id: block_id,
        rect: interior(map.width, map.height),
        gates: Vec::new(),
        rooms: Vec::new(),
    });

    let trunk_y = map.height / 2;
    let trunk_radius = radius_for_width(settings.trunk_width_units);
    let west = Point { x: MAP_MARGIN, y: trunk_y };
    let east = Point { x: map.width - 1 - MAP_MARGIN, y: trunk_y };
    for cell in polyline_cells(&[west, east]) {
        for stamped in square(cell, trunk_radius) {
            map.cells.set(stamped, CellType::Corridor);
        }
    }
    map.corridors.push(Corridor {
        points: vec![west, east],
        width: settings.trunk_width_units,
        is_tech: false,
    });
    for pos in [west, east] {
        map.cells.set(pos, CellType::Gate);
        map.blocks[0].gates.push(map.gates.len());
        map.gates.push(Gate { block: block_id, pos, kind: GateKind::Vestibule });
    }

    let door_y = trunk_y - trunk_radius - 1;
    let bottom = door_y - 1;
    let top = (bottom - ROOM_HEIGHT + 1).max(MAP_MARGIN + 1);
    let room_height = bottom - top + 1;
    if room_height < MIN_ROOM_HEIGHT {
        report(
            warnings,
            format!("fixed layout: {room_height} rows above the trunk, no rooms placed"),
        );
        return map;
    }

    let first_x = MAP_MARGIN + 2;
    let last_x = east.x - 2;
    let fit = ((last_x - first_x + 1 + ROOM_SPACING) / (ROOM_WIDTH + ROOM_SPACING)).max(0);
    let count = settings.rooms_count.clamp(0, fit);
    for slot in 0..count {
        let x = first_x + slot * (ROOM_WIDTH + ROOM_SPACING);
        let rect = Rect::new(x, top, ROOM_WIDTH, room_height);
        let id = context.next_room_id();
        let uid = context.next_uid();
        let kind =
            if context.chance(TECH_ROOM_CHANCE) { RoomKind::TechRoom } else { RoomKind::Generic };
        for cell in rect.cells() {
            map.cells.set(cell, CellType::Floor);
        }

        let pos = Point { x: rect.center().x, y: door_y };
        map.cells.set(pos, CellType::Door);
        map.doors.push(Door { room: id, block: block_id, pos, facing: Direction::South });
        let doors = vec![map.doors.len() - 1];
        map.rooms.push(Room { id, uid, rect, kind, block: block_id, doors });
        map.blocks[0].rooms.push(id);
    }
    if count < settings.rooms_count {
        debug!("fixed layout fits {count} of {} rooms", settings.rooms_count);
    }

    if settings.validate_connectivity {
        validate_connectivity(&mut map, None, warnings);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::validate::reachable_rooms;

    fn fixed(settings: &Settings) -> (Map, Vec<String>) {
        let mut context = GenContext::new(settings.seed);
        let mut warnings = Vec::new();
        let map = build_fixed_layout(&mut context, settings, &mut warnings);
        (map, warnings)
    }

    #[test]
    fn row_of_rooms_opens_onto_the_trunk() {
        let settings = Settings {
            fixed_layout: true,
            width: 96,
            height: 40,
            rooms_count: 6,
            ..Settings::default()
        };
        let (map, warnings) = fixed(&settings);

        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(map.blocks.len(), 1);
        assert_eq!(map.gates.len(), 2);
        assert!(map.gates.iter().all(|gate| gate.kind == GateKind::Vestibule));
        assert_eq!(map.rooms.len(), 6);
        for pair in map.rooms.windows(2) {
            assert!(pair[0].rect.x < pair[1].rect.x);
            assert!(!pair[0].rect.intersects(&pair[1].rect));
        }
        for door in &map.doors {
            assert_eq!(map.cell(door.pos.step(door.facing)), Some(CellType::Corridor));
        }
        assert_eq!(reachable_rooms(&map).len(), 6);
    }

    #[test]
    fn room_count_is_capped_by_map_width() {
        let settings = Settings { width: 40, height: 30, rooms_count: 50, ..Settings::default() };
        let (map, _) = fixed(&settings);
        // Slots start at x=4 and must end by x=35.
        assert_eq!(map.rooms.len(), 3);
        assert!(map.rooms.iter().all(|room| room.rect.right() <= 35));
    }

    #[test]
    fn wide_trunk_on_a_short_map_places_no_rooms() {
        // Wider than normalized settings allow.
        let settings =
            Settings { width: 60, height: 20, trunk_width_units: 9, ..Settings::default() };
        let (map, warnings) = fixed(&settings);
        assert!(map.rooms.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(map.gates.len(), 2);
    }
}
