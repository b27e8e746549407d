//! Reachability check over carved cells and best-effort repair.

use std::collections::{BTreeSet, VecDeque};

use log::debug;

use crate::map::Map;
use crate::types::{CellType, Point, RoomId};

use super::corridors::{CorridorRouter, connect_rooms};
use super::report;

/// Rooms reachable from the first registered door by walking 4-connected
/// corridor, door and gate cells. Entering a room through one of its doors
/// continues the walk from every other door of that room. With no doors at all
/// only the first room counts as reached.
pub fn reachable_rooms(map: &Map) -> BTreeSet<RoomId> {
    let mut reached = BTreeSet::new();
    let Some(first_door) = map.doors.first() else {
        reached.extend(map.rooms.first().map(|room| room.id));
        return reached;
    };

    let mut visited = vec![false; map.cells.cells().len()];
    let mut queue = VecDeque::new();
    enqueue(map, first_door.pos, &mut visited, &mut queue);

    while let Some(point) = queue.pop_front() {
        if map.cell(point) == Some(CellType::Door) {
            for door in map.doors.iter().filter(|door| door.pos == point) {
                if !reached.insert(door.room) {
                    continue;
                }
                for sibling in map.doors.iter().filter(|other| other.room == door.room) {
                    enqueue(map, sibling.pos, &mut visited, &mut queue);
                }
            }
        }
        for neighbor in point.neighbors() {
            if matches!(
                map.cell(neighbor),
                Some(CellType::Corridor | CellType::Door | CellType::Gate)
            ) {
                enqueue(map, neighbor, &mut visited, &mut queue);
            }
        }
    }
    reached
}

fn enqueue(map: &Map, point: Point, visited: &mut [bool], queue: &mut VecDeque<Point>) {
    let Some(index) = map.cells.index(point) else {
        return;
    };
    if !visited[index] {
        visited[index] = true;
        queue.push_back(point);
    }
}

/// Reached rooms tried, nearest first, for each unreachable room.
const REPAIR_TARGETS: usize = 4;

/// Warns when some rooms are unreachable and, given a router, tries to join
/// each one to one of its nearest reached rooms. Passes repeat while they keep
/// joining rooms. Returns whether every room ends up reachable.
pub(super) fn validate_connectivity(
    map: &mut Map,
    repair: Option<&CorridorRouter>,
    warnings: &mut Vec<String>,
) -> bool {
    if map.rooms.is_empty() {
        return true;
    }
    let reached = reachable_rooms(map);
    let total = map.rooms.len();
    if reached.len() == total {
        debug!("all {total} rooms reachable");
        return true;
    }
    report(
        warnings,
        format!(
            "connectivity: {} of {total} rooms reachable, unreachable {}",
            reached.len(),
            unreachable_ids(map, &reached)
        ),
    );

    let Some(router) = repair else {
        return false;
    };
    let mut reached_flags: Vec<bool> =
        map.rooms.iter().map(|room| reached.contains(&room.id)).collect();
    let mut repaired = 0;
    loop {
        let before = repaired;
        for pending in 0..total {
            if reached_flags[pending] {
                continue;
            }
            let targets = nearest_reached(map, &reached_flags, pending);
            if targets.into_iter().any(|target| connect_rooms(map, router, pending, target)) {
                repaired += 1;
                let reached = reachable_rooms(map);
                for (flag, room) in reached_flags.iter_mut().zip(&map.rooms) {
                    *flag = reached.contains(&room.id);
                }
                reached_flags[pending] = true;
            }
        }
        if repaired == before || reached_flags.iter().all(|&flag| flag) {
            break;
        }
    }

    let reached = reachable_rooms(map);
    if reached.len() == total {
        debug!("connectivity repair joined {repaired} rooms");
        return true;
    }
    report(
        warnings,
        format!(
            "connectivity repair joined {repaired} rooms, still unreachable {}",
            unreachable_ids(map, &reached)
        ),
    );
    false
}

fn nearest_reached(map: &Map, reached_flags: &[bool], pending: usize) -> Vec<usize> {
    let center = map.rooms[pending].rect.center();
    let mut targets: Vec<(u32, usize)> = map
        .rooms
        .iter()
        .enumerate()
        .filter(|&(index, _)| reached_flags[index])
        .map(|(index, room)| (room.rect.center().manhattan(center), index))
        .collect();
    targets.sort_unstable();
    targets.into_iter().take(REPAIR_TARGETS).map(|(_, index)| index).collect()
}

fn unreachable_ids(map: &Map, reached: &BTreeSet<RoomId>) -> String {
    let ids: Vec<String> = map
        .rooms
        .iter()
        .filter(|room| !reached.contains(&room.id))
        .map(|room| room.id.0.to_string())
        .collect();
    format!("[{}]", ids.join(", "))
}
