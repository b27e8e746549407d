use anyhow::{Result, bail};
use clap::Parser;
use levelgen::mapgen::reachable_rooms;
use levelgen::{CellType, Map, Settings, generate};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn pick(rng: &mut ChaCha8Rng, min: i32, max: i32) -> i32 {
    min + (rng.next_u64() % (max - min + 1) as u64) as i32
}

fn random_settings(rng: &mut ChaCha8Rng) -> Settings {
    Settings {
        seed: rng.next_u64(),
        width: pick(rng, 20, 160),
        height: pick(rng, 20, 120),
        blocks_count: pick(rng, 0, 12),
        block_min_size: pick(rng, 6, 24),
        trunks_count: pick(rng, 0, 1),
        trunk_width_units: pick(rng, 1, 5),
        rooms_count: pick(rng, 1, 40),
        padding_units: pick(rng, 1, 2),
        max_room_degree: pick(rng, 1, 6),
        corridor_width_units: pick(rng, 1, 5),
        auto_size: rng.next_u64() % 2 == 0,
        fixed_layout: rng.next_u64() % 8 == 0,
        auto_size_max_attempts: pick(rng, 1, 4),
        ..Settings::default()
    }
}

fn check_invariants(map: &Map, warnings: &[String]) -> Result<(), String> {
    for door in &map.doors {
        let outward = map.cell(door.pos.step(door.facing));
        if !matches!(outward, Some(CellType::Corridor | CellType::Door | CellType::Gate)) {
            return Err(format!("door at {:?} opens onto {outward:?}", door.pos));
        }
    }
    for room in &map.rooms {
        let mut cells = room.rect.cells();
        if let Some(cell) = cells.find(|&cell| map.cell(cell) != Some(CellType::Floor)) {
            return Err(format!("room {:?} cell {cell:?} is {:?}", room.id, map.cell(cell)));
        }
    }
    let reached = reachable_rooms(map);
    let reported = warnings.iter().any(|warning| warning.contains("unreachable"));
    if reached.len() < map.rooms.len() && !reported {
        let (reached, total) = (reached.len(), map.rooms.len());
        return Err(format!("{reached} of {total} rooms reachable without a warning"));
    }
    Ok(())
}

fn run_once(settings: &Settings) -> Result<(), String> {
    let first = generate(settings, None);
    check_invariants(&first.map, &first.warnings)?;
    let second = generate(settings, None);
    if first.map.fingerprint() != second.map.fingerprint() {
        return Err("regenerating with the same seed changed the map".to_string());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Fuzzing {} maps from seed {}...", args.runs, args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for run in 0..args.runs {
        let settings = random_settings(&mut rng);
        if let Err(failure) = run_once(&settings) {
            bail!("run {run} failed: {failure}\nsettings: {settings:?}");
        }
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{
        arbitrary::any,
        test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
    };

    #[test]
    fn drawn_settings_preserve_invariants() {
        let mut runner = TestRunner::new(ProptestConfig::with_cases(16));
        runner
            .run(&any::<u64>(), |seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                run_once(&random_settings(&mut rng)).map_err(TestCaseError::fail)?;
                Ok(())
            })
            .expect("fuzzed settings should preserve map invariants");
    }
}
