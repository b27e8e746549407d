//! Recursive rectangle splitting of the map interior into blocks.

use crate::context::GenContext;
use crate::map::Block;
use crate::types::{BlockId, Rect};

use super::MAP_MARGIN;

pub(super) fn interior(width: i32, height: i32) -> Rect {
    Rect::new(MAP_MARGIN, MAP_MARGIN, width - 2 * MAP_MARGIN, height - 2 * MAP_MARGIN)
}

/// Splits the interior until `target` rectangles exist or nothing is large
/// enough to split again. Fewer blocks than requested is accepted.
pub(super) fn partition_blocks(
    context: &mut GenContext,
    width: i32,
    height: i32,
    target: i32,
    min_size: i32,
    split_bias: f32,
) -> Vec<Block> {
    if target <= 0 {
        return Vec::new();
    }
    let target = target as usize;
    let mut rects = vec![interior(width, height)];

    while rects.len() < target {
        let Some(index) = rects
            .iter()
            .position(|rect| rect.width >= 2 * min_size || rect.height >= 2 * min_size)
        else {
            break;
        };
        let rect = rects[index];
        let can_split_vertically = rect.width >= 2 * min_size;
        let can_split_horizontally = rect.height >= 2 * min_size;
        let vertical = if can_split_vertically && can_split_horizontally {
            context.chance(split_bias)
        } else {
            can_split_vertically
        };

        let (first, second) = if vertical {
            let offset = context.range_i32(min_size, rect.width - min_size);
            (
                Rect::new(rect.x, rect.y, offset, rect.height),
                Rect::new(rect.x + offset, rect.y, rect.width - offset, rect.height),
            )
        } else {
            let offset = context.range_i32(min_size, rect.height - min_size);
            (
                Rect::new(rect.x, rect.y, rect.width, offset),
                Rect::new(rect.x, rect.y + offset, rect.width, rect.height - offset),
            )
        };
        rects[index] = first;
        rects.push(second);
    }

    rects
        .into_iter()
        .enumerate()
        .map(|(index, rect)| Block {
            id: BlockId(index as u32),
            rect,
            gates: Vec::new(),
            rooms: Vec::new(),
        })
        .collect()
}
