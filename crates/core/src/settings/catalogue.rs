//! Static editor metadata for every settings field.
//!
//! Editors and inspectors read this table to build their forms. The generator
//! itself never consults it.

use serde::Serialize;

use super::normalize::{MAP_SIZE_MAX, MAP_SIZE_MIN, bounds};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Category {
    Layout,
    Blocks,
    Trunk,
    Gates,
    Rooms,
    Connectivity,
    Corridors,
    AutoSize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Importance {
    Primary,
    Advanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SettingMeta {
    pub field: &'static str,
    pub label: &'static str,
    pub category: Category,
    pub importance: Importance,
    pub min: f64,
    pub max: f64,
}

const fn int(
    field: &'static str,
    label: &'static str,
    category: Category,
    importance: Importance,
    (min, max): (i32, i32),
) -> SettingMeta {
    SettingMeta { field, label, category, importance, min: min as f64, max: max as f64 }
}

const fn float(
    field: &'static str,
    label: &'static str,
    category: Category,
    importance: Importance,
    (min, max): (f32, f32),
) -> SettingMeta {
    SettingMeta { field, label, category, importance, min: min as f64, max: max as f64 }
}

const FLAG: (i32, i32) = (0, 1);
const MAP_SIZE: (i32, i32) = (MAP_SIZE_MIN, MAP_SIZE_MAX);

use Category::*;
use Importance::*;

pub const CATALOGUE: &[SettingMeta] = &[
    SettingMeta {
        field: "seed",
        label: "Seed",
        category: Layout,
        importance: Primary,
        min: 0.0,
        max: u64::MAX as f64,
    },
    float("grid_step", "Grid step", Layout, Primary, (0.5, 2.5)),
    int("width", "Width", Layout, Primary, MAP_SIZE),
    int("height", "Height", Layout, Primary, MAP_SIZE),
    int("fixed_layout", "Fixed corridor layout", Layout, Advanced, FLAG),
    int("blocks_count", "Blocks", Blocks, Primary, bounds::BLOCKS_COUNT),
    int("block_min_size", "Minimum block size", Blocks, Advanced, bounds::BLOCK_MIN_SIZE),
    float("split_bias", "Vertical split bias", Blocks, Advanced, bounds::UNIT_FRACTION),
    int("trunks_count", "Trunks", Trunk, Primary, bounds::TRUNKS_COUNT),
    int("trunk_width_units", "Trunk width", Trunk, Advanced, bounds::TRUNK_WIDTH_UNITS),
    int("min_segment_len", "Minimum segment length", Trunk, Advanced, bounds::MIN_SEGMENT_LEN),
    int("max_turns", "Maximum turns", Trunk, Advanced, bounds::MAX_TURNS),
    float("turn_penalty", "Turn penalty", Trunk, Advanced, bounds::UNIT_FRACTION),
    int("gates_per_block_min", "Gates per block (min)", Gates, Advanced, bounds::GATES_PER_BLOCK),
    int("gates_per_block_max", "Gates per block (max)", Gates, Advanced, bounds::GATES_PER_BLOCK),
    int("rooms_count", "Rooms", Rooms, Primary, bounds::ROOMS_COUNT),
    int("tech_rooms_min", "Tech rooms (min)", Rooms, Advanced, bounds::TECH_ROOMS),
    int("tech_rooms_max", "Tech rooms (max)", Rooms, Advanced, bounds::TECH_ROOMS),
    int("attempts_per_room", "Attempts per room", Rooms, Advanced, bounds::ATTEMPTS_PER_ROOM),
    int("padding_units", "Room padding", Rooms, Advanced, bounds::PADDING_UNITS),
    int("max_room_degree", "Maximum room degree", Connectivity, Advanced, bounds::MAX_ROOM_DEGREE),
    float(
        "extra_connection_percent",
        "Extra connections",
        Connectivity,
        Advanced,
        bounds::UNIT_FRACTION,
    ),
    int("validate_connectivity", "Validate connectivity", Connectivity, Primary, FLAG),
    int("auto_fix_connectivity", "Repair connectivity", Connectivity, Advanced, FLAG),
    int(
        "corridor_width_units",
        "Corridor width",
        Corridors,
        Primary,
        bounds::CORRIDOR_WIDTH_UNITS,
    ),
    int("auto_size", "Auto size", AutoSize, Primary, FLAG),
    float("target_occupancy_min", "Occupancy (min)", AutoSize, Advanced, bounds::TARGET_OCCUPANCY),
    float("target_occupancy_max", "Occupancy (max)", AutoSize, Advanced, bounds::TARGET_OCCUPANCY),
    float("aspect_ratio", "Aspect ratio", AutoSize, Advanced, bounds::ASPECT_RATIO),
    int(
        "auto_size_max_attempts",
        "Auto size attempts",
        AutoSize,
        Advanced,
        bounds::AUTO_SIZE_MAX_ATTEMPTS,
    ),
];

pub fn lookup(field: &str) -> Option<&'static SettingMeta> {
    CATALOGUE.iter().find(|meta| meta.field == field)
}
