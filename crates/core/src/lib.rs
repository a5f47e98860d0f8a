pub mod config;
pub mod error;
pub mod mapgen;
pub mod types;

pub use config::{GeneratorConfig, LevelPreset};
pub use error::{ConfigError, GenerationFailure};
pub use mapgen::{Corridor, DungeonLayout, GenerationRecord, Generator, Grid, Rect, Room, generate};
pub use types::*;
