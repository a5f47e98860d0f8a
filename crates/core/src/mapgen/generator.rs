//! Generation session: runs the placement → connection → organic → rasterization
//! pipeline and retries it under a reseed policy.

use slotmap::SlotMap;

use crate::config::GeneratorConfig;
use crate::error::GenerationFailure;
use crate::types::{GenerationState, RoomId};

use super::connector::connect_rooms;
use super::corridor::Corridor;
use super::grid::{Grid, rasterize};
use super::model::DungeonLayout;
use super::organic::apply_organic_layer;
use super::placer::place_rooms;
use super::room::Room;
use super::seed::{GenRng, generate_runtime_seed};

/// Rooms and corridors of one successful generation, kept for inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRecord {
    pub seed: u64,
    pub attempts: u32,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
}

pub struct Generator {
    config: GeneratorConfig,
    state: GenerationState,
    seed: u64,
    attempts: u32,
    grid: Grid,
    rooms: SlotMap<RoomId, Room>,
    corridors: Vec<Corridor>,
    start_room: Option<RoomId>,
    history: Vec<GenerationRecord>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let grid = Grid::new(config.level_width, config.level_height);
        let seed = config.seed;
        Self {
            config,
            state: GenerationState::Idle,
            seed,
            attempts: 0,
            grid,
            rooms: SlotMap::with_key(),
            corridors: Vec::new(),
            start_room: None,
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Current seed. After a failed attempt this is already the reseeded value.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Drops the current layout and returns to `Idle`. History is kept.
    pub fn clear(&mut self) {
        self.clear_generation_data();
        self.attempts = 0;
        self.state = GenerationState::Idle;
    }

    /// Runs attempts until one succeeds or the attempt budget is spent.
    ///
    /// Each call starts from a clean session; nothing from a previous call or
    /// a failed attempt leaks into the next attempt.
    pub fn generate_level(&mut self) -> Result<DungeonLayout, GenerationFailure> {
        self.clear();
        if let Err(err) = self.config.validate() {
            self.state = GenerationState::Failed;
            return Err(err.into());
        }

        self.seed = if self.config.use_random_seed { generate_runtime_seed() } else { self.config.seed };

        let mut last_failed_seed = self.seed;
        while self.attempts < self.config.max_generation_attempts {
            self.attempts += 1;
            self.state = GenerationState::Attempting { attempt: self.attempts };

            let mut rng = GenRng::from_seed(self.seed);
            match self.try_generate(&mut rng) {
                Ok(start_room) => return Ok(self.finish(start_room)),
                Err(err) => {
                    last_failed_seed = self.seed;
                    self.seed = if self.config.use_random_seed {
                        rng.next_seed()
                    } else {
                        self.seed.wrapping_add(1)
                    };
                    log::debug!(
                        "attempt {} with seed {} failed: {}; retrying with seed {}",
                        self.attempts,
                        last_failed_seed,
                        err,
                        self.seed
                    );
                    self.clear_generation_data();
                }
            }
        }

        self.state = GenerationState::Failed;
        log::warn!("failed to generate dungeon after {} attempts", self.attempts);
        Err(GenerationFailure::GenerationExhausted {
            attempts: self.attempts,
            last_seed: last_failed_seed,
        })
    }

    fn try_generate(&mut self, rng: &mut GenRng) -> Result<RoomId, GenerationFailure> {
        let start_room = place_rooms(&self.config, rng, &mut self.rooms)?;
        self.start_room = Some(start_room);

        connect_rooms(&self.rooms, &mut self.corridors, rng);

        let organic = self.config.use_organic_generation;
        if organic {
            apply_organic_layer(&self.config, &mut self.grid, &mut self.rooms, &mut self.corridors, rng);
        }

        rasterize(&mut self.grid, self.rooms.values(), &self.corridors, organic);
        Ok(start_room)
    }

    fn finish(&mut self, start_room: RoomId) -> DungeonLayout {
        self.state = GenerationState::Succeeded;
        log::info!(
            "dungeon generated with {} rooms and {} corridors (seed {}, {} attempts)",
            self.rooms.len(),
            self.corridors.len(),
            self.seed,
            self.attempts
        );

        self.history.push(GenerationRecord {
            seed: self.seed,
            attempts: self.attempts,
            rooms: self.rooms.values().cloned().collect(),
            corridors: self.corridors.clone(),
        });

        DungeonLayout {
            grid: self.grid.clone(),
            rooms: self.rooms.clone(),
            corridors: self.corridors.clone(),
            start_room,
            seed: self.seed,
            attempts: self.attempts,
        }
    }

    fn clear_generation_data(&mut self) {
        self.grid.reset_to(self.config.level_width, self.config.level_height);
        // A fresh arena hands out slots in insertion order; `clear` would reuse them in reverse.
        self.rooms = SlotMap::with_key();
        self.corridors.clear();
        self.start_room = None;
    }
}
