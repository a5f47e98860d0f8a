//! Seeded random streams, coherent noise, and runtime seed derivation for map generation.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use noise::{NoiseFn, Perlin};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

/// Exclusive upper bound for seeds drawn at runtime or on reseed.
pub const RANDOM_SEED_RANGE: u64 = 10_000;

/// Uniform sampler driving one generation attempt.
pub struct GenRng {
    inner: ChaCha8Rng,
}

impl GenRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Uniform integer in `[min_value, max_exclusive)`. An empty range yields `min_value`.
    pub fn range_i32(&mut self, min_value: i32, max_exclusive: i32) -> i32 {
        if max_exclusive <= min_value {
            return min_value;
        }
        let span = (i64::from(max_exclusive) - i64::from(min_value)) as u64;
        let offset = self.inner.next_u64() % span;
        (i64::from(min_value) + offset as i64) as i32
    }

    pub fn range_inclusive(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value);
        let range_size = (max_value - min_value) as u64 + 1;
        min_value + (self.inner.next_u64() % range_size) as usize
    }

    /// Uniform float in `[0, 1)` with 24 bits of precision.
    pub fn value(&mut self) -> f32 {
        (self.inner.next_u32() >> 8) as f32 / (1_u32 << 24) as f32
    }

    pub fn range_f64(&mut self, min_value: f64, max_exclusive: f64) -> f64 {
        let unit = (self.inner.next_u64() >> 11) as f64 / (1_u64 << 53) as f64;
        min_value + unit * (max_exclusive - min_value)
    }

    pub fn coin_flip(&mut self) -> bool {
        self.inner.next_u32() & 1 == 0
    }

    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    pub fn next_seed(&mut self) -> u64 {
        self.inner.next_u64() % RANDOM_SEED_RANGE
    }
}

/// 2D Perlin noise remapped to `[0, 1]`.
pub struct CoherentNoise {
    perlin: Perlin,
}

impl CoherentNoise {
    pub fn new(seed: u32) -> Self {
        Self { perlin: Perlin::new(seed) }
    }

    pub fn sample(&self, x: f64, y: f64) -> f32 {
        let raw = self.perlin.get([x, y]);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }
}

static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Seed in `[0, RANDOM_SEED_RANGE)` drawn from process entropy.
pub fn generate_runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy) % RANDOM_SEED_RANGE
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
