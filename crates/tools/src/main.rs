use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use levelgen::{Settings, generate};
use log::info;
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Ascii,
    Json,
    Summary,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (.toml or .json); defaults are used when omitted
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Overrides the seed from the settings
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    rooms: Option<i32>,
    #[arg(long)]
    corridor_width: Option<i32>,
    #[arg(long)]
    fixed_layout: bool,
    #[arg(long)]
    no_auto_size: bool,
    #[arg(short, long, value_enum, default_value_t = Format::Ascii)]
    format: Format,
    /// Output file; stdout when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(rooms) = args.rooms {
        settings.rooms_count = rooms;
    }
    if let Some(width) = args.corridor_width {
        settings.corridor_width_units = width;
    }
    settings.fixed_layout |= args.fixed_layout;
    if args.no_auto_size {
        settings.auto_size = false;
    }

    let result = generate(&settings, args.seed);
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
    info!("map fingerprint {:016x}", result.map.fingerprint());

    let rendered = match args.format {
        Format::Ascii => result.map.to_ascii(),
        Format::Json => serde_json::to_string_pretty(&result.map)
            .with_context(|| "Failed to serialize map as JSON")?,
        Format::Summary => {
            let mut text = serde_json::to_string_pretty(&result.map.summary())
                .with_context(|| "Failed to serialize map summary")?;
            text.push('\n');
            text.push_str(&format!("occupancy: {:.3}\n", result.map.occupancy()));
            text.push_str(&format!("fingerprint: {:016x}\n", result.map.fingerprint()));
            text
        }
    };

    match &args.out {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output to {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
