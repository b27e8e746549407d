pub mod context;
pub mod map;
pub mod mapgen;
pub mod settings;
pub mod types;

pub use map::{Block, CellGrid, Corridor, Door, Gate, Map, MapSummary, Room};
pub use mapgen::{GenerationResult, generate};
pub use settings::{Settings, SettingsError};
pub use types::*;
