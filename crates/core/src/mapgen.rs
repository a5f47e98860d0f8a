//! Procedural dungeon generation split into coherent submodules.

pub mod model;

mod connector;
mod corridor;
mod generator;
mod grid;
mod organic;
mod placer;
mod room;
mod seed;

pub use corridor::Corridor;
pub use generator::{GenerationRecord, Generator};
pub use grid::{Grid, derive_walls, rasterize};
pub use model::DungeonLayout;
pub use room::{Rect, Room};
pub use seed::{RANDOM_SEED_RANGE, generate_runtime_seed};

use crate::config::GeneratorConfig;
use crate::error::GenerationFailure;

/// Generates one dungeon from `config` in a fresh session.
pub fn generate(config: &GeneratorConfig) -> Result<DungeonLayout, GenerationFailure> {
    Generator::new(config.clone()).generate_level()
}
