//! Occupancy-driven outer loop that resizes the map until room density lands
//! inside the target band.

use log::info;

use crate::context::GenContext;
use crate::map::Map;
use crate::settings::{MAP_SIZE_MAX, MAP_SIZE_MIN, Settings};

use super::area::build_area;
use super::pipeline::build_map;
use super::report;
use super::validate::reachable_rooms;

const GROW_FACTOR: f32 = 1.15;
const SHRINK_FACTOR: f32 = 0.9;
/// Expected footprint of an average room plus its padding ring.
const ROOM_AREA_ESTIMATE: f32 = 72.0;
/// Expected corridor cells per room per unit of corridor width.
const CORRIDOR_AREA_PER_WIDTH: f32 = 8.0;

struct Attempt {
    index: i32,
    score: f32,
    /// Rooms without a door plus rooms the validator could not reach.
    shortfall: usize,
    occupancy: f32,
    map: Map,
    warnings: Vec<String>,
}

impl Attempt {
    fn beats(&self, kept: &Self) -> bool {
        (self.score, self.shortfall) < (kept.score, kept.shortfall)
    }
}

/// Runs the pipeline at growing or shrinking sizes. An attempt inside the band
/// whose rooms all have a door, and are all reachable when validation is on,
/// ends the loop and is returned as is; otherwise the closest attempt wins,
/// ties going to the one with fewer doorless or unreachable rooms.
pub(super) fn generate_auto_sized(
    context: &mut GenContext,
    settings: &Settings,
    warnings: &mut Vec<String>,
) -> Map {
    let (mut width, mut height) = initial_size(settings);
    let mut best: Option<Attempt> = None;
    let mut last_index = 0;

    for index in 1..=settings.auto_size_max_attempts {
        last_index = index;
        let mut attempt_warnings = Vec::new();
        let map = build_map(context, settings, width, height, &mut attempt_warnings);
        let occupancy = map.occupancy();
        let score = band_distance(occupancy, settings);
        let doorless = map.rooms.iter().filter(|room| room.doors.is_empty()).count();
        let unreachable = if settings.validate_connectivity && !map.rooms.is_empty() {
            map.rooms.len().saturating_sub(reachable_rooms(&map).len())
        } else {
            0
        };
        info!(
            "auto-size attempt {index}: {width}x{height} occupancy {occupancy:.3} score {score:.3} \
             rooms {} doorless {doorless} unreachable {unreachable}",
            map.rooms.len()
        );

        let done = score == 0.0 && doorless == 0 && unreachable == 0;
        let attempt = Attempt {
            index,
            score,
            shortfall: doorless + unreachable,
            occupancy,
            map,
            warnings: attempt_warnings,
        };
        if done || best.as_ref().is_none_or(|kept| attempt.beats(kept)) {
            best = Some(attempt);
        }
        if done || index == settings.auto_size_max_attempts {
            break;
        }

        let factor =
            if occupancy < settings.target_occupancy_min { SHRINK_FACTOR } else { GROW_FACTOR };
        let (next_width, next_height) = (scale(width, factor), scale(height, factor));
        let reason = if occupancy > settings.target_occupancy_max {
            "too dense"
        } else if occupancy < settings.target_occupancy_min {
            "too sparse"
        } else if doorless > 0 {
            "rooms without doors"
        } else {
            "unreachable rooms"
        };
        report(
            warnings,
            format!(
                "auto-size attempt {index}: {width}x{height} occupancy {occupancy:.2} {reason}, \
                 resizing to {next_width}x{next_height}"
            ),
        );
        width = next_width;
        height = next_height;
    }

    let Some(best) = best else {
        report(warnings, "auto-size produced no map, using an empty base map".to_string());
        return build_area(width, height, settings.grid_step);
    };
    if best.score > 0.0 {
        report(
            warnings,
            format!(
                "auto-size kept attempt {} at {}x{} with occupancy {:.2} outside [{:.2}, {:.2}]",
                best.index,
                best.map.width,
                best.map.height,
                best.occupancy,
                settings.target_occupancy_min,
                settings.target_occupancy_max
            ),
        );
    } else if best.index != last_index {
        report(
            warnings,
            format!(
                "auto-size kept attempt {} at {}x{} with {} rooms lacking a door or a route",
                best.index, best.map.width, best.map.height, best.shortfall
            ),
        );
    }
    warnings.extend(best.warnings);
    best.map
}

/// Map size whose area fits the expected room and corridor cells at the middle
/// of the occupancy band, shaped by the aspect ratio.
pub(super) fn initial_size(settings: &Settings) -> (i32, i32) {
    let band_mid = (settings.target_occupancy_min + settings.target_occupancy_max) / 2.0;
    let per_room =
        ROOM_AREA_ESTIMATE + CORRIDOR_AREA_PER_WIDTH * settings.corridor_width_units as f32;
    let area = settings.rooms_count.max(1) as f32 * per_room / band_mid.max(0.01);
    let width = (area * settings.aspect_ratio).sqrt();
    let height = area / width.max(1.0);
    (clamp_side(width), clamp_side(height))
}

/// Distance from `occupancy` to the target band; zero inside it.
pub(super) fn band_distance(occupancy: f32, settings: &Settings) -> f32 {
    if occupancy < settings.target_occupancy_min {
        settings.target_occupancy_min - occupancy
    } else if occupancy > settings.target_occupancy_max {
        occupancy - settings.target_occupancy_max
    } else {
        0.0
    }
}

fn scale(side: i32, factor: f32) -> i32 {
    clamp_side(side as f32 * factor)
}

fn clamp_side(value: f32) -> i32 {
    (value.round() as i32).clamp(MAP_SIZE_MIN, MAP_SIZE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resized_to(warning: &str) -> Option<(i32, i32)> {
        let size = warning.split("resizing to ").nth(1)?;
        let (width, height) = size.split_once('x')?;
        Some((width.parse().ok()?, height.parse().ok()?))
    }

    #[test]
    fn initial_size_follows_room_budget_and_aspect() {
        let settings = Settings {
            rooms_count: 12,
            corridor_width_units: 1,
            aspect_ratio: 1.5,
            ..Settings::default()
        };
        let (width, height) = initial_size(&settings);
        // 12 * 80 / 0.35 = 2742.9 cells.
        assert_eq!((width, height), (64, 43));
    }

    #[test]
    fn initial_size_is_clamped_to_map_limits() {
        let tiny = Settings { rooms_count: 1, ..Settings::default() };
        let (width, height) = initial_size(&tiny);
        assert!(width >= MAP_SIZE_MIN && height >= MAP_SIZE_MIN);

        let huge = Settings {
            rooms_count: 200,
            corridor_width_units: 5,
            target_occupancy_min: 0.05,
            target_occupancy_max: 0.05,
            aspect_ratio: 4.0,
            ..Settings::default()
        };
        assert_eq!(initial_size(&huge).0, MAP_SIZE_MAX);
    }

    #[test]
    fn band_distance_is_zero_inside_the_band() {
        let settings = Settings::default();
        assert_eq!(band_distance(0.3, &settings), 0.0);
        assert!((band_distance(0.2, &settings) - 0.05).abs() < 1e-6);
        assert!((band_distance(0.5, &settings) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn resizing_stays_inside_map_limits() {
        assert_eq!(scale(490, GROW_FACTOR), MAP_SIZE_MAX);
        assert_eq!(scale(21, SHRINK_FACTOR), MAP_SIZE_MIN);
        assert_eq!(scale(100, SHRINK_FACTOR), 90);
    }

    #[test]
    fn single_attempt_keeps_its_map_and_validator_warnings_come_last() {
        let settings = Settings { auto_size_max_attempts: 1, ..Settings::default() };
        let mut context = GenContext::new(11);
        let mut warnings = vec!["from normalize".to_string()];
        let map = generate_auto_sized(&mut context, &settings, &mut warnings);

        assert_eq!((map.width, map.height), initial_size(&settings));
        assert_eq!(warnings.first().map(String::as_str), Some("from normalize"));
        assert!(!warnings.iter().any(|warning| warning.contains("resizing")));
    }

    #[test]
    fn occupancy_band_misses_trigger_resize_warnings() {
        // An unreachable band forces every attempt to resize.
        let settings = Settings {
            target_occupancy_min: 0.9,
            target_occupancy_max: 0.9,
            auto_size_max_attempts: 3,
            ..Settings::default()
        };
        let mut context = GenContext::new(3);
        let mut warnings = Vec::new();
        generate_auto_sized(&mut context, &settings, &mut warnings);

        let resizes = warnings.iter().filter(|warning| warning.contains("too sparse")).count();
        assert_eq!(resizes, 2);
        assert!(warnings.iter().any(|warning| warning.starts_with("auto-size kept attempt")));
    }

    #[test]
    fn returned_map_is_the_attempt_the_warnings_describe() {
        let settings = Settings { rooms_count: 16, ..Settings::default() };
        let mut early_stops = 0;
        for seed in 0..12 {
            let mut context = GenContext::new(seed);
            let mut warnings = Vec::new();
            let map = generate_auto_sized(&mut context, &settings, &mut warnings);

            let resizes: Vec<(i32, i32)> =
                warnings.iter().filter_map(|warning| resized_to(warning)).collect();
            let kept_earlier =
                warnings.iter().any(|warning| warning.starts_with("auto-size kept attempt"));
            if !kept_earlier {
                let expected = resizes.last().copied().unwrap_or_else(|| initial_size(&settings));
                assert_eq!((map.width, map.height), expected, "seed {seed}: {warnings:?}");
            }

            if (resizes.len() as i32) < settings.auto_size_max_attempts - 1 {
                early_stops += 1;
                assert!(!kept_earlier, "seed {seed}: {warnings:?}");
                assert_eq!(band_distance(map.occupancy(), &settings), 0.0);
                assert!(map.rooms.iter().all(|room| !room.doors.is_empty()), "seed {seed}");
                assert_eq!(reachable_rooms(&map).len(), map.rooms.len(), "seed {seed}");
            }
        }
        assert!(early_stops > 0);
    }

    #[test]
    fn stopping_attempt_replaces_an_equally_scored_one() {
        let shortfall = |shortfall| Attempt {
            index: 1,
            score: 0.0,
            shortfall,
            occupancy: 0.3,
            map: build_area(20, 20, 1.0),
            warnings: Vec::new(),
        };
        assert!(shortfall(0).beats(&shortfall(2)));
        assert!(!shortfall(2).beats(&shortfall(2)));
        let farther = Attempt { score: 0.01, ..shortfall(0) };
        assert!(!farther.beats(&shortfall(3)));
    }
}
