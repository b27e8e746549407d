//! Footprint checks and painting for a routed corridor.

use std::collections::BTreeSet;

use crate::map::Map;
use crate::types::{CellType, Point};

use super::super::doors::DoorCandidate;
use super::super::raster::square;
use super::{Approach, CorridorRouter};

/// Cells a corridor of the router's width would cover along `core`, door cells
/// excluded. `Ok` carries the cells to paint; `Err` carries the same set when
/// any cell cannot be carved.
pub(super) fn check_footprint(
    map: &Map,
    router: &CorridorRouter,
    approach: &Approach,
    core: &[Point],
) -> Result<Vec<Point>, Vec<Point>> {
    let mut seen = BTreeSet::new();
    let mut footprint = Vec::new();
    for &cell in core {
        for covered in square(cell, approach.radius_at(cell, router.radius)) {
            if !approach.doors.contains(&covered) && seen.insert(covered) {
                footprint.push(covered);
            }
        }
    }

    let doors_ok = approach.doors.iter().all(|&door| {
        matches!(map.cell(door), Some(CellType::Empty | CellType::Corridor | CellType::Door))
    });
    let cells_ok = footprint.iter().all(|&cell| carvable(map, router, approach, cell));
    if doors_ok && cells_ok { Ok(footprint) } else { Err(footprint) }
}

/// Whether a corridor centred on `cell` could be carved without touching
/// anything it must not cover.
pub(super) fn has_clearance(
    map: &Map,
    router: &CorridorRouter,
    approach: &Approach,
    cell: Point,
) -> bool {
    square(cell, approach.radius_at(cell, router.radius)).all(|covered| {
        approach.doors.contains(&covered) || carvable(map, router, approach, covered)
    })
}

/// A door can only open a corridor when its exit cell is free and the
/// narrowest footprint there stays off floor, walls, gates and the map edge.
pub(super) fn exit_is_open(map: &Map, router: &CorridorRouter, door: DoorCandidate) -> bool {
    let exit = door.pos.step(door.facing);
    if !matches!(map.cell(exit), Some(CellType::Empty | CellType::Corridor)) {
        return false;
    }
    square(exit, router.radius.min(1)).all(|covered| {
        covered == door.pos
            || matches!(
                map.cell(covered),
                Some(CellType::Empty | CellType::Corridor | CellType::Door)
            )
    })
}

fn carvable(map: &Map, router: &CorridorRouter, approach: &Approach, cell: Point) -> bool {
    match map.cell(cell) {
        None | Some(CellType::Floor | CellType::Wall | CellType::Gate | CellType::Door) => false,
        Some(CellType::Empty | CellType::Corridor) => {
            !router.in_carve_buffer(map, cell) || approach.zone.contains(&cell)
        }
    }
}

pub(super) fn paint_footprint(map: &mut Map, footprint: &[Point]) {
    for &cell in footprint {
        map.cells.set(cell, CellType::Corridor);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::map::Room;
    use crate::mapgen::area::build_area;
    use crate::settings::Settings;
    use crate::types::{BlockId, Direction, Rect, RoomId, RoomKind};

    fn map_with_room(rect: Rect) -> Map {
        let mut map = build_area(30, 20, 1.0);
        for cell in rect.cells() {
            map.cells.set(cell, CellType::Floor);
        }
        map.rooms.push(Room {
            id: RoomId(0),
            uid: String::new(),
            rect,
            kind: RoomKind::Generic,
            block: BlockId(0),
            doors: Vec::new(),
        });
        map
    }

    fn width_settings(width: i32) -> Settings {
        Settings { corridor_width_units: width, padding_units: 1, ..Settings::default() }
    }

    fn without_lanes(doors: [Point; 2]) -> Approach {
        Approach { doors, lanes: BTreeMap::new(), zone: BTreeSet::new() }
    }

    #[test]
    fn wide_footprint_covers_the_radius_square_once() {
        let map = build_area(30, 20, 1.0);
        let router = CorridorRouter::new(&map, &width_settings(3));
        let approach = without_lanes([Point::new(0, 0), Point::new(29, 19)]);
        let core = [Point::new(10, 10), Point::new(11, 10)];

        let footprint = check_footprint(&map, &router, &approach, &core).expect("carvable");
        assert_eq!(footprint.len(), 12);
    }

    #[test]
    fn footprint_touching_a_room_buffer_fails_outside_the_approach_zone() {
        let map = map_with_room(Rect::new(10, 5, 5, 5));
        let router = CorridorRouter::new(&map, &width_settings(3));
        let door = DoorCandidate { pos: Point::new(12, 10), facing: Direction::South };
        let far = DoorCandidate { pos: Point::new(28, 18), facing: Direction::East };
        let approach = Approach::new([door, far], router.lane_length(), router.radius);

        // Straight down from the door stays inside the approach zone.
        let straight: Vec<Point> = (11..=14).map(|y| Point::new(12, y)).collect();
        assert!(check_footprint(&map, &router, &approach, &straight).is_ok());

        // Running along the room's side clips the padding ring.
        let sideways: Vec<Point> = (16..=18).map(|x| Point::new(x, 7)).collect();
        assert!(check_footprint(&map, &router, &approach, &sideways).is_err());
    }

    #[test]
    fn lane_footprint_narrows_next_to_the_door() {
        let map = map_with_room(Rect::new(10, 2, 5, 5));
        let router = CorridorRouter::new(&map, &width_settings(5));
        let door = DoorCandidate { pos: Point::new(12, 7), facing: Direction::South };
        let far = DoorCandidate { pos: Point::new(28, 18), facing: Direction::East };
        let approach = Approach::new([door, far], router.lane_length(), router.radius);

        assert_eq!(approach.radius_at(Point::new(12, 8), router.radius), 1);
        assert_eq!(approach.radius_at(Point::new(12, 9), router.radius), 2);
        assert_eq!(approach.radius_at(Point::new(20, 15), router.radius), 2);

        let straight: Vec<Point> = (8..=12).map(|y| Point::new(12, y)).collect();
        let footprint = check_footprint(&map, &router, &approach, &straight).expect("carvable");
        assert!(footprint.iter().all(|cell| cell.y >= 7));
        assert!(footprint.contains(&Point::new(10, 9)));
    }

    #[test]
    fn clearance_rejects_cells_whose_footprint_meets_a_gate() {
        let mut map = build_area(30, 20, 1.0);
        map.cells.set(Point::new(15, 10), CellType::Gate);
        let router = CorridorRouter::new(&map, &width_settings(3));
        let approach = without_lanes([Point::new(0, 0), Point::new(29, 19)]);

        assert!(!has_clearance(&map, &router, &approach, Point::new(14, 11)));
        assert!(has_clearance(&map, &router, &approach, Point::new(13, 11)));
        assert!(!has_clearance(&map, &router, &approach, Point::new(0, 5)));
    }

    #[test]
    fn exits_against_floor_are_closed() {
        let map = map_with_room(Rect::new(10, 5, 5, 5));
        let router = CorridorRouter::new(&map, &width_settings(3));

        let open = DoorCandidate { pos: Point::new(12, 10), facing: Direction::South };
        assert!(exit_is_open(&map, &router, open));
        // Facing back into the room from a cell two rows below it.
        let reversed = DoorCandidate { pos: Point::new(12, 11), facing: Direction::North };
        assert!(!exit_is_open(&map, &router, reversed));
        let edge = DoorCandidate { pos: Point::new(1, 3), facing: Direction::West };
        assert!(!exit_is_open(&map, &router, edge));
    }

    #[test]
    fn gates_and_map_edges_block_carving() {
        let mut map = build_area(30, 20, 1.0);
        map.cells.set(Point::new(5, 5), CellType::Gate);
        let router = CorridorRouter::new(&map, &width_settings(1));
        let approach = without_lanes([Point::new(20, 0), Point::new(20, 19)]);

        assert!(check_footprint(&map, &router, &approach, &[Point::new(5, 5)]).is_err());
        let wide = CorridorRouter::new(&map, &width_settings(3));
        assert!(check_footprint(&map, &wide, &approach, &[Point::new(0, 10)]).is_err());
    }

    #[test]
    fn walled_door_cell_fails() {
        let mut map = build_area(30, 20, 1.0);
        map.cells.set(Point::new(3, 3), CellType::Wall);
        let router = CorridorRouter::new(&map, &width_settings(1));
        let approach = without_lanes([Point::new(3, 3), Point::new(9, 3)]);
        let core: Vec<Point> = (4..=8).map(|x| Point::new(x, 3)).collect();

        assert!(check_footprint(&map, &router, &approach, &core).is_err());
    }

    #[test]
    fn painting_marks_every_cell_as_corridor() {
        let mut map = build_area(30, 20, 1.0);
        let cells = [Point::new(1, 1), Point::new(2, 1)];
        paint_footprint(&mut map, &cells);
        assert_eq!(map.cells.count(CellType::Corridor), 2);
    }
}
