//! Error types for configuration loading and dungeon generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("level dimensions must be positive and fit in i32, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("room count range is invalid: min {min}, max {max} (need 0 < min <= max)")]
    InvalidRoomCount { min: usize, max: usize },

    #[error("room size range is invalid: min {min:?}, max {max:?} (need 0 < min <= max per axis)")]
    InvalidRoomSize { min: (i32, i32), max: (i32, i32) },

    #[error("{name} must be greater than zero")]
    ZeroBudget { name: &'static str },

    #[error("{name} must lie in [0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f32 },

    #[error("noise scale must be positive and finite, got {0}")]
    InvalidNoiseScale(f64),

    #[error("could not read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum GenerationFailure {
    /// Fewer rooms than the configured minimum fit inside the placement budget.
    /// Recovered inside the generator by reseeding.
    #[error("placed {placed} rooms, need at least {required}")]
    InsufficientRooms { placed: usize, required: usize },

    #[error("generation failed after {attempts} attempts (last seed {last_seed})")]
    GenerationExhausted { attempts: u32, last_seed: u64 },

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
