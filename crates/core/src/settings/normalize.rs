//! Clamps raw settings into their legal ranges.
//!
//! The normalizer is pure: it returns a new value plus one warning per field it
//! had to change, and running it on its own output changes nothing.

use std::fmt::Display;

use super::Settings;

pub const MAP_SIZE_MIN: i32 = 20;
pub const MAP_SIZE_MAX: i32 = 500;
pub const GRID_STEPS: [f32; 5] = [0.5, 1.0, 1.5, 2.0, 2.5];

pub(super) mod bounds {
    pub const BLOCKS_COUNT: (i32, i32) = (0, 64);
    pub const BLOCK_MIN_SIZE: (i32, i32) = (6, 100);
    pub const UNIT_FRACTION: (f32, f32) = (0.0, 1.0);
    pub const TRUNKS_COUNT: (i32, i32) = (0, 4);
    pub const TRUNK_WIDTH_UNITS: (i32, i32) = (1, 7);
    pub const MIN_SEGMENT_LEN: (i32, i32) = (2, 32);
    pub const MAX_TURNS: (i32, i32) = (0, 32);
    pub const GATES_PER_BLOCK: (i32, i32) = (0, 8);
    pub const ROOMS_COUNT: (i32, i32) = (1, 200);
    pub const TECH_ROOMS: (i32, i32) = (0, 50);
    pub const ATTEMPTS_PER_ROOM: (i32, i32) = (1, 500);
    pub const PADDING_UNITS: (i32, i32) = (1, 2);
    pub const MAX_ROOM_DEGREE: (i32, i32) = (1, 8);
    pub const CORRIDOR_WIDTH_UNITS: (i32, i32) = (1, 5);
    pub const TARGET_OCCUPANCY: (f32, f32) = (0.05, 0.9);
    pub const ASPECT_RATIO: (f32, f32) = (0.25, 4.0);
    pub const AUTO_SIZE_MAX_ATTEMPTS: (i32, i32) = (1, 20);
}

pub fn normalize(raw: &Settings) -> (Settings, Vec<String>) {
    let defaults = Settings::default();
    let mut warnings = Vec::new();
    let mut out = raw.clone();

    out.grid_step = snap_grid_step(raw.grid_step, defaults.grid_step, &mut warnings);

    clamp_int(&mut out.width, "width", (MAP_SIZE_MIN, MAP_SIZE_MAX), &mut warnings);
    clamp_int(&mut out.height, "height", (MAP_SIZE_MIN, MAP_SIZE_MAX), &mut warnings);
    clamp_int(&mut out.blocks_count, "blocks_count", bounds::BLOCKS_COUNT, &mut warnings);
    clamp_int(&mut out.block_min_size, "block_min_size", bounds::BLOCK_MIN_SIZE, &mut warnings);
    clamp_float(
        &mut out.split_bias,
        "split_bias",
        bounds::UNIT_FRACTION,
        defaults.split_bias,
        &mut warnings,
    );

    clamp_int(&mut out.trunks_count, "trunks_count", bounds::TRUNKS_COUNT, &mut warnings);
    clamp_int(
        &mut out.trunk_width_units,
        "trunk_width_units",
        bounds::TRUNK_WIDTH_UNITS,
        &mut warnings,
    );
    clamp_int(&mut out.min_segment_len, "min_segment_len", bounds::MIN_SEGMENT_LEN, &mut warnings);
    clamp_int(&mut out.max_turns, "max_turns", bounds::MAX_TURNS, &mut warnings);
    clamp_float(
        &mut out.turn_penalty,
        "turn_penalty",
        bounds::UNIT_FRACTION,
        defaults.turn_penalty,
        &mut warnings,
    );

    clamp_int(
        &mut out.gates_per_block_min,
        "gates_per_block_min",
        bounds::GATES_PER_BLOCK,
        &mut warnings,
    );
    clamp_int(
        &mut out.gates_per_block_max,
        "gates_per_block_max",
        bounds::GATES_PER_BLOCK,
        &mut warnings,
    );
    raise_max(
        out.gates_per_block_min,
        &mut out.gates_per_block_max,
        "gates_per_block_max",
        &mut warnings,
    );

    clamp_int(&mut out.rooms_count, "rooms_count", bounds::ROOMS_COUNT, &mut warnings);
    clamp_int(&mut out.tech_rooms_min, "tech_rooms_min", bounds::TECH_ROOMS, &mut warnings);
    clamp_int(&mut out.tech_rooms_max, "tech_rooms_max", bounds::TECH_ROOMS, &mut warnings);
    raise_max(out.tech_rooms_min, &mut out.tech_rooms_max, "tech_rooms_max", &mut warnings);
    clamp_int(
        &mut out.attempts_per_room,
        "attempts_per_room",
        bounds::ATTEMPTS_PER_ROOM,
        &mut warnings,
    );
    clamp_int(&mut out.padding_units, "padding_units", bounds::PADDING_UNITS, &mut warnings);

    clamp_int(&mut out.max_room_degree, "max_room_degree", bounds::MAX_ROOM_DEGREE, &mut warnings);
    clamp_float(
        &mut out.extra_connection_percent,
        "extra_connection_percent",
        bounds::UNIT_FRACTION,
        defaults.extra_connection_percent,
        &mut warnings,
    );
    clamp_int(
        &mut out.corridor_width_units,
        "corridor_width_units",
        bounds::CORRIDOR_WIDTH_UNITS,
        &mut warnings,
    );

    clamp_float(
        &mut out.target_occupancy_min,
        "target_occupancy_min",
        bounds::TARGET_OCCUPANCY,
        defaults.target_occupancy_min,
        &mut warnings,
    );
    clamp_float(
        &mut out.target_occupancy_max,
        "target_occupancy_max",
        bounds::TARGET_OCCUPANCY,
        defaults.target_occupancy_max,
        &mut warnings,
    );
    raise_max(
        out.target_occupancy_min,
        &mut out.target_occupancy_max,
        "target_occupancy_max",
        &mut warnings,
    );
    clamp_float(
        &mut out.aspect_ratio,
        "aspect_ratio",
        bounds::ASPECT_RATIO,
        defaults.aspect_ratio,
        &mut warnings,
    );
    clamp_int(
        &mut out.auto_size_max_attempts,
        "auto_size_max_attempts",
        bounds::AUTO_SIZE_MAX_ATTEMPTS,
        &mut warnings,
    );

    (out, warnings)
}

/// Nearest allowed grid step; ties resolve toward the smaller step.
pub fn nearest_grid_step(value: f32) -> f32 {
    let mut best = GRID_STEPS[0];
    for step in GRID_STEPS {
        if (step - value).abs() < (best - value).abs() {
            best = step;
        }
    }
    best
}

fn snap_grid_step(value: f32, fallback: f32, warnings: &mut Vec<String>) -> f32 {
    if !value.is_finite() {
        warnings.push(format!("grid_step {value} is not a number, using {fallback}"));
        return fallback;
    }
    let snapped = nearest_grid_step(value);
    if snapped != value {
        warnings.push(format!("grid_step {value} snapped to {snapped}"));
    }
    snapped
}

fn clamp_int(value: &mut i32, field: &str, (min, max): (i32, i32), warnings: &mut Vec<String>) {
    let clamped = (*value).clamp(min, max);
    note_change(field, *value, clamped, warnings);
    *value = clamped;
}

fn clamp_float(
    value: &mut f32,
    field: &str,
    (min, max): (f32, f32),
    fallback: f32,
    warnings: &mut Vec<String>,
) {
    if !value.is_finite() {
        warnings.push(format!("{field} {value} is not a number, using {fallback}"));
        *value = fallback;
        return;
    }
    let clamped = value.clamp(min, max);
    note_change(field, *value, clamped, warnings);
    *value = clamped;
}

fn raise_max<T: PartialOrd + Copy + Display>(
    min: T,
    max: &mut T,
    field: &str,
    warnings: &mut Vec<String>,
) {
    if *max < min {
        warnings.push(format!("{field} raised to {min}"));
        *max = min;
    }
}

fn note_change<T: PartialEq + Display>(field: &str, old: T, new: T, warnings: &mut Vec<String>) {
    if old != new {
        warnings.push(format!("{field} {old} clamped to {new}"));
    }
}
