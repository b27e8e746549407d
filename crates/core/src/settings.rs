//! Generation settings: the immutable input value, its file loaders, the
//! normalizer that clamps it into legal ranges, and the editor catalogue.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod catalogue;
mod normalize;

pub use catalogue::{CATALOGUE, Category, Importance, SettingMeta, lookup};
pub use normalize::{GRID_STEPS, MAP_SIZE_MAX, MAP_SIZE_MIN, normalize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub seed: u64,
    pub grid_step: f32,
    pub width: i32,
    pub height: i32,

    pub blocks_count: i32,
    pub block_min_size: i32,
    pub split_bias: f32,

    pub trunks_count: i32,
    pub trunk_width_units: i32,
    pub min_segment_len: i32,
    pub max_turns: i32,
    pub turn_penalty: f32,

    pub gates_per_block_min: i32,
    pub gates_per_block_max: i32,

    pub rooms_count: i32,
    pub tech_rooms_min: i32,
    pub tech_rooms_max: i32,
    pub attempts_per_room: i32,
    pub padding_units: i32,

    pub max_room_degree: i32,
    pub extra_connection_percent: f32,
    pub corridor_width_units: i32,
    pub validate_connectivity: bool,
    pub auto_fix_connectivity: bool,

    pub auto_size: bool,
    pub target_occupancy_min: f32,
    pub target_occupancy_max: f32,
    pub aspect_ratio: f32,
    pub auto_size_max_attempts: i32,

    pub fixed_layout: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 1337,
            grid_step: 1.0,
            width: 96,
            height: 64,
            blocks_count: 6,
            block_min_size: 12,
            split_bias: 0.5,
            trunks_count: 1,
            trunk_width_units: 3,
            min_segment_len: 4,
            max_turns: 6,
            turn_penalty: 0.5,
            gates_per_block_min: 1,
            gates_per_block_max: 2,
            rooms_count: 12,
            tech_rooms_min: 1,
            tech_rooms_max: 3,
            attempts_per_room: 40,
            padding_units: 1,
            max_room_degree: 4,
            extra_connection_percent: 0.15,
            corridor_width_units: 1,
            validate_connectivity: true,
            auto_fix_connectivity: true,
            auto_size: true,
            target_occupancy_min: 0.25,
            target_occupancy_max: 0.45,
            aspect_ratio: 1.5,
            auto_size_max_attempts: 6,
            fixed_layout: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported settings file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads settings from a `.toml` or `.json` file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let extension =
            path.extension().and_then(|extension| extension.to_str()).map(str::to_ascii_lowercase);
        let read = || {
            fs::read_to_string(path)
                .map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })
        };
        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&read()?),
            Some("json") => Self::from_json_str(&read()?),
            _ => Err(SettingsError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Copy with a different seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self { seed, ..self.clone() }
    }
}
