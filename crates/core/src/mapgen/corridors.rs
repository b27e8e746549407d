//! Door-to-door corridor routing and carving for connectivity-graph edges.

mod carve;
mod routing;

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::map::{Corridor, Door, Map};
use crate::settings::Settings;
use crate::types::{CellType, Point, RoomKind};

use super::doors::{DoorCandidate, door_candidates};
use super::raster::{radius_for_width, simplify, square};
use carve::{check_footprint, exit_is_open, paint_footprint};
use routing::{Walkability, astar_route, route_between};

/// Door pairs tried per edge, closest first.
const MAX_DOOR_PAIRS: usize = 16;

/// Room buffers and corridor geometry shared by every connection on one map.
/// Rooms never move after packing, so the buffers are built once.
pub(super) struct CorridorRouter {
    width: i32,
    radius: i32,
    padding: i32,
    route_buffer: Vec<bool>,
    carve_buffer: Vec<bool>,
}

impl CorridorRouter {
    pub(super) fn new(map: &Map, settings: &Settings) -> Self {
        let width = settings.corridor_width_units.max(1);
        let radius = radius_for_width(width);
        let padding = settings.padding_units.max(0);
        Self {
            width,
            radius,
            padding,
            route_buffer: buffer_mask(map, padding + radius),
            carve_buffer: buffer_mask(map, padding),
        }
    }

    fn in_route_buffer(&self, map: &Map, point: Point) -> bool {
        map.cells.index(point).is_some_and(|index| self.route_buffer[index])
    }

    fn in_carve_buffer(&self, map: &Map, point: Point) -> bool {
        map.cells.index(point).is_some_and(|index| self.carve_buffer[index])
    }

    fn lane_length(&self) -> i32 {
        self.padding + self.radius
    }
}

fn buffer_mask(map: &Map, margin: i32) -> Vec<bool> {
    let mut mask = vec![false; map.cells.cells().len()];
    for room in &map.rooms {
        for cell in room.rect.expanded(margin).cells() {
            if let Some(index) = map.cells.index(cell) {
                mask[index] = true;
            }
        }
    }
    mask
}

/// Straight runs leading out of each door through the room buffers, and the
/// cells a corridor may cover around them. The footprint narrows towards the
/// door so it never reaches back over the room floor.
pub(super) struct Approach {
    doors: [Point; 2],
    lanes: BTreeMap<Point, i32>,
    zone: BTreeSet<Point>,
}

impl Approach {
    fn new(doors: [DoorCandidate; 2], lane_length: i32, radius: i32) -> Self {
        let mut lanes = BTreeMap::new();
        for door in doors {
            for distance in 1..=lane_length.max(1) {
                let lane_radius = radius.min(distance);
                lanes
                    .entry(door.pos.offset(door.facing, distance))
                    .and_modify(|kept: &mut i32| *kept = (*kept).min(lane_radius))
                    .or_insert(lane_radius);
            }
        }
        let zone =
            lanes.iter().flat_map(|(&lane, &lane_radius)| square(lane, lane_radius)).collect();
        Self { doors: doors.map(|door| door.pos), lanes, zone }
    }

    fn is_lane(&self, point: Point) -> bool {
        self.lanes.contains_key(&point)
    }

    fn radius_at(&self, point: Point, radius: i32) -> i32 {
        self.lanes.get(&point).map_or(radius, |&lane_radius| lane_radius.min(radius))
    }
}

/// Routes and carves one corridor per edge; edges whose door pairs all fail
/// are dropped. Returns the number of edges carved.
pub(super) fn carve_room_graph(
    map: &mut Map,
    router: &CorridorRouter,
    edges: &[(usize, usize)],
    settings: &Settings,
) -> usize {
    let mut carved = 0;
    for &(left, right) in edges {
        if connect_rooms(map, router, left, right) {
            carved += 1;
        } else {
            debug!("dropped edge between rooms {left} and {right}");
        }
    }
    debug!("carved {carved} of {} edges at width {}", edges.len(), settings.corridor_width_units);
    carved
}

/// Tries the closest door pairs between two rooms until one routes and carves.
/// Doors whose exit is boxed in by floor, walls or gates are never paired.
pub(super) fn connect_rooms(
    map: &mut Map,
    router: &CorridorRouter,
    left: usize,
    right: usize,
) -> bool {
    let left_doors = open_doors(map, router, left);
    let right_doors = open_doors(map, router, right);

    let mut pairs = Vec::with_capacity(left_doors.len() * right_doors.len());
    for (left_index, left_door) in left_doors.iter().enumerate() {
        for (right_index, right_door) in right_doors.iter().enumerate() {
            pairs.push((left_door.pos.manhattan(right_door.pos), left_index, right_index));
        }
    }
    pairs.sort_unstable();
    pairs.truncate(MAX_DOOR_PAIRS);

    pairs.into_iter().any(|(_, left_index, right_index)| {
        let left_door = (left, left_doors[left_index]);
        let right_door = (right, right_doors[right_index]);
        connect_doors(map, router, left_door, right_door)
    })
}

fn open_doors(map: &Map, router: &CorridorRouter, room_index: usize) -> Vec<DoorCandidate> {
    door_candidates(map, room_index)
        .into_iter()
        .filter(|&door| exit_is_open(map, router, door))
        .collect()
}

fn connect_doors(
    map: &mut Map,
    router: &CorridorRouter,
    (left, left_door): (usize, DoorCandidate),
    (right, right_door): (usize, DoorCandidate),
) -> bool {
    if left_door.pos == right_door.pos {
        return false;
    }
    let start = left_door.pos.step(left_door.facing);
    let goal = right_door.pos.step(right_door.facing);
    if !map.in_bounds(start) || !map.in_bounds(goal) {
        return false;
    }

    let approach = Approach::new([left_door, right_door], router.lane_length(), router.radius);
    let Some((core, footprint)) = plan_route(map, router, &approach, start, goal) else {
        return false;
    };

    paint_footprint(map, &footprint);
    register_door(map, left, left_door);
    register_door(map, right, right_door);

    let mut route = Vec::with_capacity(core.len() + 2);
    route.push(left_door.pos);
    route.extend_from_slice(&core);
    route.push(right_door.pos);
    let is_tech = map.rooms[left].kind == RoomKind::TechRoom
        || map.rooms[right].kind == RoomKind::TechRoom;
    map.corridors.push(Corridor { points: simplify(&route), width: router.width, is_tech });
    true
}

/// Routes between the two exit cells and checks the carve footprint. A failed
/// footprint gets one A* retry that only steps on cells with room for the
/// whole footprint, which keeps it clear of every cell that failed.
fn plan_route(
    map: &Map,
    router: &CorridorRouter,
    approach: &Approach,
    start: Point,
    goal: Point,
) -> Option<(Vec<Point>, Vec<Point>)> {
    let walk = Walkability { map, router, approach, clearance: false };
    let core = route_between(&walk, start, goal)?;
    if let Ok(footprint) = check_footprint(map, router, approach, &core) {
        return Some((core, footprint));
    }

    let walk = Walkability { clearance: true, ..walk };
    let rerouted = astar_route(&walk, start, goal)?;
    let footprint = check_footprint(map, router, approach, &rerouted).ok()?;
    Some((rerouted, footprint))
}

/// Adds a door unless the same room already has one on that exact cell.
fn register_door(map: &mut Map, room_index: usize, candidate: DoorCandidate) {
    map.cells.set(candidate.pos, CellType::Door);
    let room = &map.rooms[room_index];
    let exists = room.doors.iter().any(|&door_index| map.doors[door_index].pos == candidate.pos);
    if exists {
        return;
    }
    let door =
        Door { room: room.id, block: room.block, pos: candidate.pos, facing: candidate.facing };
    map.rooms[room_index].doors.push(map.doors.len());
    map.doors.push(door);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Room;
    use crate::mapgen::area::build_area;
    use crate::types::{BlockId, Rect, RoomId};

    fn map_with_rooms(width: i32, height: i32, rects: &[(Rect, RoomKind)]) -> Map {
        let mut map = build_area(width, height, 1.0);
        for (index, (rect, kind)) in rects.iter().enumerate() {
            for cell in rect.cells() {
                map.cells.set(cell, CellType::Floor);
            }
            map.rooms.push(Room {
                id: RoomId(index as u32),
                uid: format!("{index:032x}"),
                rect: *rect,
                kind: *kind,
                block: BlockId(0),
                doors: Vec::new(),
            });
        }
        map
    }

    fn assert_doors_open_onto_corridors(map: &Map) {
        for door in &map.doors {
            assert_eq!(map.cell(door.pos), Some(CellType::Door));
            let outward = door.pos.step(door.facing);
            assert!(
                matches!(
                    map.cell(outward),
                    Some(CellType::Corridor | CellType::Door | CellType::Gate)
                ),
                "door {door:?} opens onto {:?}",
                map.cell(outward)
            );
        }
    }

    #[test]
    fn side_by_side_rooms_connect_with_a_straight_corridor() {
        let mut map = map_with_rooms(
            40,
            20,
            &[
                (Rect::new(3, 6, 6, 5), RoomKind::Generic),
                (Rect::new(25, 6, 6, 5), RoomKind::TechRoom),
            ],
        );
        let router = CorridorRouter::new(&map, &Settings::default());
        assert!(connect_rooms(&mut map, &router, 0, 1));

        assert_eq!(map.doors.len(), 2);
        assert_eq!(map.corridors.len(), 1);
        assert!(map.corridors[0].is_tech);
        assert_eq!(map.rooms[0].doors, vec![0]);
        assert_eq!(map.rooms[1].doors, vec![1]);
        assert_doors_open_onto_corridors(&map);
        for room in &map.rooms {
            for cell in room.rect.cells() {
                assert_eq!(map.cell(cell), Some(CellType::Floor));
            }
        }
    }

    #[test]
    fn offset_rooms_connect_around_a_corner() {
        let mut map = map_with_rooms(
            50,
            40,
            &[
                (Rect::new(3, 3, 5, 5), RoomKind::Generic),
                (Rect::new(30, 25, 5, 5), RoomKind::Generic),
            ],
        );
        let settings = Settings { corridor_width_units: 3, ..Settings::default() };
        let router = CorridorRouter::new(&map, &settings);
        assert!(connect_rooms(&mut map, &router, 0, 1));
        assert_doors_open_onto_corridors(&map);
        assert_eq!(map.corridors[0].width, 3);
        assert!(!map.corridors[0].is_tech);
    }

    #[test]
    fn wall_barrier_forces_a_detour() {
        let mut map = map_with_rooms(
            40,
            30,
            &[
                (Rect::new(3, 12, 5, 5), RoomKind::Generic),
                (Rect::new(30, 12, 5, 5), RoomKind::Generic),
            ],
        );
        for y in 0..24 {
            map.cells.set(Point::new(19, y), CellType::Wall);
        }
        let router = CorridorRouter::new(&map, &Settings::default());
        assert!(connect_rooms(&mut map, &router, 0, 1));

        let corridor = &map.corridors[0];
        assert!(corridor.points.len() > 2, "detour should bend: {:?}", corridor.points);
        assert!(corridor.points.iter().any(|point| point.y >= 24));
        assert_doors_open_onto_corridors(&map);
    }

    #[test]
    fn fully_walled_rooms_cannot_connect() {
        let mut map = map_with_rooms(
            40,
            20,
            &[
                (Rect::new(3, 6, 6, 5), RoomKind::Generic),
                (Rect::new(25, 6, 6, 5), RoomKind::Generic),
            ],
        );
        for y in 0..20 {
            map.cells.set(Point::new(19, y), CellType::Wall);
        }
        let router = CorridorRouter::new(&map, &Settings::default());
        assert!(!connect_rooms(&mut map, &router, 0, 1));
        assert!(map.doors.is_empty());
        assert!(map.corridors.is_empty());
        assert_eq!(map.cells.count(CellType::Corridor), 0);
    }

    #[test]
    fn widest_corridor_narrows_at_the_doors_and_keeps_full_width_between() {
        let mut map = map_with_rooms(
            50,
            24,
            &[
                (Rect::new(3, 8, 6, 6), RoomKind::Generic),
                (Rect::new(35, 8, 6, 6), RoomKind::Generic),
            ],
        );
        let settings = Settings { corridor_width_units: 5, ..Settings::default() };
        let router = CorridorRouter::new(&map, &settings);
        assert!(connect_rooms(&mut map, &router, 0, 1));

        assert_eq!(map.doors[0].pos, Point::new(9, 8));
        assert_eq!(map.doors[1].pos, Point::new(34, 8));
        assert_doors_open_onto_corridors(&map);
        let middle: Vec<i32> = (0..24)
            .filter(|&y| map.cell(Point::new(22, y)) == Some(CellType::Corridor))
            .collect();
        assert_eq!(middle, vec![6, 7, 8, 9, 10]);
        for room in &map.rooms {
            assert!(room.rect.cells().all(|cell| map.cell(cell) == Some(CellType::Floor)));
        }
    }

    #[test]
    fn doors_facing_a_close_neighbour_are_skipped() {
        // A two-cell gap leaves no room for a width-3 corridor between the rooms.
        let map = map_with_rooms(
            40,
            30,
            &[
                (Rect::new(5, 10, 6, 6), RoomKind::Generic),
                (Rect::new(13, 10, 6, 6), RoomKind::Generic),
            ],
        );
        let settings = Settings { corridor_width_units: 3, ..Settings::default() };
        let router = CorridorRouter::new(&map, &settings);

        let open = open_doors(&map, &router, 0);
        assert!(!open.is_empty());
        assert!(open.iter().all(|door| door.pos.x != 11));
        assert!(open.iter().any(|door| door.pos.x == 4));
    }

    #[test]
    fn rooms_behind_a_narrow_gap_connect_around_it() {
        let mut map = map_with_rooms(
            40,
            30,
            &[
                (Rect::new(5, 10, 6, 6), RoomKind::Generic),
                (Rect::new(13, 10, 6, 6), RoomKind::Generic),
            ],
        );
        let settings = Settings { corridor_width_units: 3, ..Settings::default() };
        let router = CorridorRouter::new(&map, &settings);
        assert!(connect_rooms(&mut map, &router, 0, 1));

        assert_doors_open_onto_corridors(&map);
        assert!(map.doors.iter().all(|door| door.pos.x != 11 && door.pos.x != 12));
        for room in &map.rooms {
            assert!(room.rect.cells().all(|cell| map.cell(cell) == Some(CellType::Floor)));
        }
    }

    #[test]
    fn reconnecting_reuses_corridors_without_duplicating_doors_on_one_cell() {
        let mut map = map_with_rooms(
            40,
            20,
            &[
                (Rect::new(3, 6, 6, 5), RoomKind::Generic),
                (Rect::new(25, 6, 6, 5), RoomKind::Generic),
            ],
        );
        let router = CorridorRouter::new(&map, &Settings::default());
        assert!(connect_rooms(&mut map, &router, 0, 1));
        let first_doors = map.doors.clone();
        assert!(connect_rooms(&mut map, &router, 0, 1));

        let mut cells: Vec<(u32, Point)> =
            map.doors.iter().map(|door| (door.room.0, door.pos)).collect();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), map.doors.len());
        assert!(map.doors.len() >= first_doors.len());
        assert_doors_open_onto_corridors(&map);
    }
}
