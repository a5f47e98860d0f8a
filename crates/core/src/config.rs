//! Generator configuration, presets, validation, and file loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Size;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub level_width: usize,
    pub level_height: usize,
    pub min_rooms: usize,
    pub max_rooms: usize,
    pub min_room_size: Size,
    pub max_room_size: Size,
    /// Rejection-sampling budget for room placement within one attempt.
    pub max_placement_attempts: u32,
    /// Full-pipeline attempts before giving up.
    pub max_generation_attempts: u32,

    pub use_organic_generation: bool,
    pub noise_threshold: f32,
    pub noise_scale: f64,
    pub random_walk_steps: u32,
    pub random_walk_turn_chance: f32,
    pub organic_blend_iterations: u32,

    pub seed: u64,
    pub use_random_seed: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            level_width: 50,
            level_height: 50,
            min_rooms: 8,
            max_rooms: 15,
            min_room_size: Size::new(4, 4),
            max_room_size: Size::new(10, 10),
            max_placement_attempts: 100,
            max_generation_attempts: 10,
            use_organic_generation: true,
            noise_threshold: 0.5,
            noise_scale: 0.1,
            random_walk_steps: 1000,
            random_walk_turn_chance: 0.3,
            organic_blend_iterations: 3,
            seed: 0,
            use_random_seed: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPreset {
    Small,
    Medium,
    Large,
}

impl LevelPreset {
    /// Grid side length and room count range.
    pub fn dimensions(self) -> (usize, usize, usize) {
        match self {
            Self::Small => (30, 5, 8),
            Self::Medium => (50, 8, 12),
            Self::Large => (80, 12, 20),
        }
    }
}

impl GeneratorConfig {
    pub fn with_preset(mut self, preset: LevelPreset) -> Self {
        let (side, min_rooms, max_rooms) = preset.dimensions();
        self.level_width = side;
        self.level_height = side;
        self.min_rooms = min_rooms;
        self.max_rooms = max_rooms;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fits_i32 = |side: usize| i32::try_from(side).is_ok();
        if self.level_width == 0
            || self.level_height == 0
            || !fits_i32(self.level_width)
            || !fits_i32(self.level_height)
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.level_width,
                height: self.level_height,
            });
        }
        if self.min_rooms == 0 || self.min_rooms > self.max_rooms {
            return Err(ConfigError::InvalidRoomCount { min: self.min_rooms, max: self.max_rooms });
        }
        let (min, max) = (self.min_room_size, self.max_room_size);
        if min.width <= 0
            || min.height <= 0
            || min.width > max.width
            || min.height > max.height
            || max.width == i32::MAX
            || max.height == i32::MAX
        {
            return Err(ConfigError::InvalidRoomSize {
                min: (min.width, min.height),
                max: (max.width, max.height),
            });
        }
        if self.max_placement_attempts == 0 {
            return Err(ConfigError::ZeroBudget { name: "max_placement_attempts" });
        }
        if self.max_generation_attempts == 0 {
            return Err(ConfigError::ZeroBudget { name: "max_generation_attempts" });
        }
        check_fraction("noise_threshold", self.noise_threshold)?;
        check_fraction("random_walk_turn_chance", self.random_walk_turn_chance)?;
        if !(self.noise_scale.is_finite() && self.noise_scale > 0.0) {
            return Err(ConfigError::InvalidNoiseScale(self.noise_scale));
        }
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a `.json` file as JSON and anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let is_json =
            path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        if is_json { Self::from_json_str(&text) } else { Self::from_toml_str(&text) }
    }
}

fn check_fraction(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { name, value })
    }
}
