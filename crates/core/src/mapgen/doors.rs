//! Legal door cells on a room's boundary.

use crate::map::Map;
use crate::types::{CellType, Direction, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorCandidate {
    pub pos: Point,
    pub facing: Direction,
}

/// Cells one step outside each side of `map.rooms[room_index]` that lie inside
/// the map, outside every room footprint, and are not walls.
pub fn door_candidates(map: &Map, room_index: usize) -> Vec<DoorCandidate> {
    let rect = map.rooms[room_index].rect;
    let mut candidates: Vec<DoorCandidate> = Vec::new();

    let row = |y: i32| (rect.x..=rect.right()).map(move |x| Point { x, y }).collect::<Vec<_>>();
    let column = |x: i32| (rect.y..=rect.bottom()).map(move |y| Point { x, y }).collect::<Vec<_>>();
    let sides = [
        (Direction::North, row(rect.y - 1)),
        (Direction::East, column(rect.right() + 1)),
        (Direction::South, row(rect.bottom() + 1)),
        (Direction::West, column(rect.x - 1)),
    ];

    for (facing, cells) in sides {
        for pos in cells {
            if !map.in_bounds(pos) || rect.contains(pos) {
                continue;
            }
            if map.cell(pos) == Some(CellType::Wall) {
                continue;
            }
            if map.rooms.iter().any(|room| room.rect.contains(pos)) {
                continue;
            }
            if candidates.iter().any(|candidate| candidate.pos == pos) {
                continue;
            }
            candidates.push(DoorCandidate { pos, facing });
        }
    }
    candidates
}
