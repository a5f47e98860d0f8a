use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::{CellState, DungeonLayout, GenerationFailure, GeneratorConfig, Pos, RoomType};
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

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_config(rng: &mut ChaCha8Rng) -> GeneratorConfig {
    let side = choose(rng, &[30_usize, 40, 50, 64]);
    GeneratorConfig {
        level_width: side,
        level_height: side,
        min_rooms: choose(rng, &[2_usize, 3, 4]),
        max_rooms: choose(rng, &[5_usize, 6, 8]),
        use_organic_generation: choose(rng, &[true, false]),
        noise_threshold: choose(rng, &[0.45_f32, 0.55, 0.65]),
        random_walk_steps: choose(rng, &[0_u32, 200, 1000]),
        organic_blend_iterations: choose(rng, &[0_u32, 1, 3]),
        seed: rng.next_u64() % 100_000,
        use_random_seed: false,
        ..GeneratorConfig::default()
    }
}

fn check_invariants(config: &GeneratorConfig, layout: &DungeonLayout) -> Result<()> {
    let room_count = layout.rooms.len();
    if room_count < config.min_rooms || room_count > config.max_rooms {
        bail!("room count {} outside [{}, {}]", room_count, config.min_rooms, config.max_rooms);
    }

    let starts = layout.rooms().filter(|(_, room)| room.room_type == RoomType::Start).count();
    if starts != 1 {
        bail!("expected exactly one start room, found {starts}");
    }
    if layout.attempts > 1 {
        let replay = GeneratorConfig { seed: layout.seed, ..config.clone() };
        let fresh = dungeon_core::generate(&replay)?;
        if fresh.layout_hash() != layout.layout_hash() {
            bail!("retried layout differs from a fresh run on seed {}", layout.seed);
        }
    }

    for (_, room) in layout.rooms() {
        if let Some(pos) = room.bounds().cells().find(|&pos| layout.cell(pos) != CellState::Floor) {
            bail!("room cell {pos:?} is {:?}, not floor", layout.cell(pos));
        }
    }

    for y in 0..layout.height() as i32 {
        for x in 0..layout.width() as i32 {
            let pos = Pos { y, x };
            if !layout.cell(pos).is_walkable() {
                continue;
            }
            let open_edge = (-1..=1)
                .flat_map(|dy| (-1..=1).map(move |dx| pos.offset(dx, dy)))
                .filter(|n| n.x >= 0 && n.y >= 0)
                .filter(|n| (n.x as usize) < layout.width() && (n.y as usize) < layout.height())
                .find(|&n| layout.cell(n) == CellState::Empty);
            if let Some(n) = open_edge {
                bail!("walkable cell {pos:?} touches unwalled empty cell {n:?}");
            }
        }
    }

    if !config.use_organic_generation {
        let rooms: Vec<_> = layout.rooms().map(|(_, room)| room).collect();
        for (i, a) in rooms.iter().enumerate() {
            for b in &rooms[i + 1..] {
                if a.overlaps(b, 2) {
                    bail!("rooms at {:?} and {:?} break spacing", a.position, b.position);
                }
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let (mut generated, mut exhausted) = (0_u32, 0_u32);
    for run in 0..args.runs {
        let config = random_config(&mut rng);
        match dungeon_core::generate(&config) {
            Ok(layout) => {
                if let Err(err) = check_invariants(&config, &layout) {
                    bail!("run {} (seed {}): invariant failed: {}", run, layout.seed, err);
                }
                generated += 1;
            }
            Err(GenerationFailure::GenerationExhausted { .. }) => exhausted += 1,
            Err(err) => bail!("run {run}: unexpected failure: {err}"),
        }
    }

    println!("Fuzzing completed: {generated} layouts checked, {exhausted} exhausted.");
    Ok(())
}
