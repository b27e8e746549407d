//! Base grid allocation.

use crate::map::{CellGrid, Map};
use crate::settings::{MAP_SIZE_MAX, MAP_SIZE_MIN};
use crate::types::Point;

/// Empty map of the given size (each side clamped to the legal range) with the
/// entrance at the left edge's vertical midpoint.
pub fn build_area(width: i32, height: i32, grid_step: f32) -> Map {
    let width = width.clamp(MAP_SIZE_MIN, MAP_SIZE_MAX);
    let height = height.clamp(MAP_SIZE_MIN, MAP_SIZE_MAX);
    Map {
        width,
        height,
        grid_step,
        cells: CellGrid::new(width as usize, height as usize),
        blocks: Vec::new(),
        rooms: Vec::new(),
        corridors: Vec::new(),
        gates: Vec::new(),
        doors: Vec::new(),
        entrance: Point { x: 0, y: height / 2 },
    }
}
