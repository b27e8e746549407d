//! Random-walk primary corridor laid down before blocks are populated.

use log::debug;

use crate::context::GenContext;
use crate::map::{Corridor, Map};
use crate::settings::Settings;
use crate::types::{CellType, Point};

use super::raster::{polyline_cells, radius_for_width, square};

/// Run lengths are drawn from `[min_segment_len, min_segment_len + SEGMENT_SPREAD)`.
const SEGMENT_SPREAD: i32 = 8;

pub(super) fn route_trunks(context: &mut GenContext, map: &mut Map, settings: &Settings) {
    let trunk_count = settings.trunks_count.clamp(0, 1);
    for trunk_index in 0..trunk_count {
        let points = walk_trunk(context, map.width, map.height, trunk_index, settings);
        if points.len() < 2 {
            continue;
        }
        paint_trunk(map, &points, settings.trunk_width_units);
        debug!("trunk {trunk_index}: {} vertices", points.len());
        map.corridors.push(Corridor {
            points,
            width: settings.trunk_width_units,
            is_tech: false,
        });
    }
}

fn walk_trunk(
    context: &mut GenContext,
    width: i32,
    height: i32,
    trunk_index: i32,
    settings: &Settings,
) -> Vec<Point> {
    let top = 2;
    let bottom = height - 3;
    let right_stop = width - 3;
    let stagger = if trunk_index % 2 == 0 { trunk_index * 4 } else { -trunk_index * 4 };

    let mut current = Point { x: 1, y: (height / 2 + stagger).clamp(top, bottom) };
    let mut points = vec![current];
    let mut turns = 0;
    let min_len = settings.min_segment_len;
    let max_len = min_len + SEGMENT_SPREAD - 1;

    while current.x < right_stop {
        let run = context.range_i32(min_len, max_len);
        current = Point { x: (current.x + run).min(right_stop), y: current.y };
        points.push(current);
        if current.x >= right_stop {
            break;
        }

        if turns < settings.max_turns && context.chance(1.0 - settings.turn_penalty) {
            let jog = context.range_i32(min_len, max_len);
            let sign = if context.chance(0.5) { 1 } else { -1 };
            let target = current.y + sign * jog;
            let y = target.clamp(top, bottom);
            if y != current.y {
                current = Point { x: current.x, y };
                points.push(current);
                turns += 1;
            }
            if y != target {
                debug!("trunk {trunk_index} stopped at row {y}");
                break;
            }
        }
    }
    points
}

fn paint_trunk(map: &mut Map, points: &[Point], width: i32) {
    let radius = radius_for_width(width);
    for cell in polyline_cells(points) {
        for stamped in square(cell, radius) {
            if map.cells.get(stamped).is_some_and(|existing| existing != CellType::Floor) {
                map.cells.set(stamped, CellType::Corridor);
            }
        }
    }
}
