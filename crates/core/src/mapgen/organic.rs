//! Organic terrain: noise seeding, random-walk carving, and blending into rooms and corridors.
//!
//! All three passes write `Floor` only, onto the grid before rooms and corridors
//! are rasterized. Blending reads that layer back to grow rooms and extend
//! corridor paths so structured and organic regions merge.

use std::collections::HashSet;

use slotmap::SlotMap;

use crate::config::GeneratorConfig;
use crate::types::{CellState, Pos, RoomId};

use super::corridor::Corridor;
use super::grid::{Grid, NEIGHBORS_8};
use super::room::Room;
use super::seed::{CoherentNoise, GenRng};

const NOISE_OFFSET_RANGE: f64 = 1000.0;
const CARDINAL_STEPS: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

pub(super) fn apply_organic_layer(
    config: &GeneratorConfig,
    grid: &mut Grid,
    rooms: &mut SlotMap<RoomId, Room>,
    corridors: &mut [Corridor],
    rng: &mut GenRng,
) {
    seed_noise_floor(grid, config.noise_scale, config.noise_threshold, rng);
    let noise_floor = grid.count(CellState::Floor);
    carve_random_walk(grid, config.random_walk_steps, config.random_walk_turn_chance, rng);
    log::trace!(
        "organic layer: {} noise cells, {} after random walk",
        noise_floor,
        grid.count(CellState::Floor)
    );

    for _ in 0..config.organic_blend_iterations {
        blend_organic_floor(grid, rooms, corridors);
    }
}

/// Marks every cell whose noise sample exceeds `threshold` as `Floor`.
pub(super) fn seed_noise_floor(grid: &mut Grid, scale: f64, threshold: f32, rng: &mut GenRng) {
    let offset_x = rng.range_f64(0.0, NOISE_OFFSET_RANGE);
    let offset_y = rng.range_f64(0.0, NOISE_OFFSET_RANGE);
    let noise = CoherentNoise::new(rng.next_u32());

    for pos in grid.positions() {
        let value =
            noise.sample(offset_x + f64::from(pos.x) * scale, offset_y + f64::from(pos.y) * scale);
        if value > threshold {
            grid.set(pos, CellState::Floor);
        }
    }
}

/// Walks a single carver over the interior, marking visited cells `Floor`.
///
/// Both the "turn" and the "continue" branch draw a fresh cardinal step; the
/// walker keeps no heading between steps. The turn roll is still consumed on
/// every step.
pub(super) fn carve_random_walk(grid: &mut Grid, steps: u32, turn_chance: f32, rng: &mut GenRng) {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    if width < 3 || height < 3 {
        return;
    }

    let mut walker = Pos { y: rng.range_i32(1, height - 1), x: rng.range_i32(1, width - 1) };
    for _ in 0..steps {
        grid.set(walker, CellState::Floor);

        walker = if rng.value() < turn_chance {
            next_random_position(walker, width, height, rng)
        } else {
            let (dx, dy) = heading(walker, width, height, rng);
            walker.offset(dx, dy)
        };

        walker.x = walker.x.clamp(1, width - 2);
        walker.y = walker.y.clamp(1, height - 2);
    }
}

fn next_random_position(current: Pos, width: i32, height: i32, rng: &mut GenRng) -> Pos {
    let candidates: Vec<Pos> = CARDINAL_STEPS
        .iter()
        .map(|&(dx, dy)| current.offset(dx, dy))
        .filter(|next| next.x > 0 && next.x < width - 1 && next.y > 0 && next.y < height - 1)
        .collect();
    if candidates.is_empty() {
        return current;
    }
    candidates[rng.range_i32(0, candidates.len() as i32) as usize]
}

fn heading(current: Pos, width: i32, height: i32, rng: &mut GenRng) -> (i32, i32) {
    let next = next_random_position(current, width, height, rng);
    (next.x - current.x, next.y - current.y)
}

/// One blend pass: grows rooms over adjacent `Floor` and extends corridor paths onto it.
pub(super) fn blend_organic_floor(
    grid: &Grid,
    rooms: &mut SlotMap<RoomId, Room>,
    corridors: &mut [Corridor],
) {
    for room in rooms.values_mut() {
        let scan = room.expanded_bounds(1);
        let absorbed: Vec<Pos> =
            scan.cells().filter(|&pos| grid.get(pos) == CellState::Floor).collect();
        for cell in absorbed {
            room.grow_to_include(cell);
        }
    }

    for corridor in corridors.iter_mut() {
        let mut on_path: HashSet<Pos> = corridor.path.iter().copied().collect();
        let mut added = Vec::new();
        for &point in &corridor.path {
            for (dx, dy) in NEIGHBORS_8 {
                let neighbor = point.offset(dx, dy);
                if grid.get(neighbor) == CellState::Floor && on_path.insert(neighbor) {
                    added.push(neighbor);
                }
            }
        }
        corridor.path.extend(added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Size;

    fn interior_positions(grid: &Grid) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (grid.width() as i32, grid.height() as i32);
        (1..width - 1).flat_map(move |x| (1..height - 1).map(move |y| Pos::new(x, y)))
    }

    #[test]
    fn threshold_of_one_seeds_nothing() {
        let mut grid = Grid::new(30, 30);
        seed_noise_floor(&mut grid, 0.1, 1.0, &mut GenRng::from_seed(4));
        assert_eq!(grid.count(CellState::Floor), 0);
    }

    #[test]
    fn lower_threshold_seeds_more_floor() {
        let mut sparse = Grid::new(40, 40);
        let mut dense = Grid::new(40, 40);
        seed_noise_floor(&mut sparse, 0.1, 0.6, &mut GenRng::from_seed(9));
        seed_noise_floor(&mut dense, 0.1, 0.4, &mut GenRng::from_seed(9));
        assert!(dense.count(CellState::Floor) >= sparse.count(CellState::Floor));
        assert!(dense.count(CellState::Floor) > 0);
    }

    #[test]
    fn random_walk_stays_off_the_border() {
        let mut grid = Grid::new(12, 9);
        carve_random_walk(&mut grid, 2000, 0.3, &mut GenRng::from_seed(21));

        assert!(grid.count(CellState::Floor) > 1);
        for pos in grid.positions() {
            let on_border = pos.x == 0 || pos.y == 0 || pos.x == 11 || pos.y == 8;
            if on_border {
                assert_eq!(grid.get(pos), CellState::Empty, "walker touched border at {pos:?}");
            }
        }
    }

    #[test]
    fn random_walk_moves_one_cardinal_step_at_a_time() {
        let mut grid = Grid::new(20, 20);
        carve_random_walk(&mut grid, 50, 1.0, &mut GenRng::from_seed(2));
        let floor: Vec<Pos> =
            interior_positions(&grid).filter(|&pos| grid.get(pos) == CellState::Floor).collect();
        // A connected trail: every carved cell except a lone start has a carved cardinal neighbour.
        for pos in &floor {
            let linked = CARDINAL_STEPS
                .iter()
                .any(|&(dx, dy)| grid.get(pos.offset(dx, dy)) == CellState::Floor);
            assert!(linked || floor.len() == 1, "isolated carved cell {pos:?}");
        }
    }

    #[test]
    fn random_walk_skips_degenerate_grids() {
        let mut grid = Grid::new(2, 10);
        carve_random_walk(&mut grid, 100, 0.5, &mut GenRng::from_seed(1));
        assert_eq!(grid.count(CellState::Floor), 0);
    }

    #[test]
    fn blending_grows_rooms_and_corridors_monotonically() {
        let mut grid = Grid::new(30, 30);
        let mut rooms = SlotMap::with_key();
        let room_a = rooms.insert(Room::new(Pos::new(5, 5), Size::new(4, 4)));
        let room_b = rooms.insert(Room::new(Pos::new(18, 5), Size::new(4, 4)));
        let path: Vec<Pos> = (9..18).map(|x| Pos::new(x, 6)).collect();
        let mut corridors = vec![Corridor { path, room_a, room_b }];

        // Organic floor touching room A's far corner and the corridor's side.
        grid.set(Pos::new(9, 9), CellState::Floor);
        grid.set(Pos::new(10, 10), CellState::Floor);
        grid.set(Pos::new(12, 7), CellState::Floor);
        grid.set(Pos::new(12, 8), CellState::Floor);

        let mut previous_sizes: Vec<Size> = rooms.values().map(|room| room.size).collect();
        let mut previous_path = corridors[0].path.clone();
        for _ in 0..3 {
            blend_organic_floor(&grid, &mut rooms, &mut corridors);
            for (room, previous) in rooms.values().zip(&previous_sizes) {
                assert!(room.size.width >= previous.width && room.size.height >= previous.height);
            }
            assert!(corridors[0].path.starts_with(&previous_path));
            previous_sizes = rooms.values().map(|room| room.size).collect();
            previous_path = corridors[0].path.clone();
        }

        assert_eq!(rooms[room_a].position, Pos::new(5, 5));
        assert_eq!(rooms[room_a].size, Size::new(6, 6));
        assert_eq!(rooms[room_b].size, Size::new(4, 4));
        assert!(corridors[0].path.contains(&Pos::new(12, 7)));
        assert!(corridors[0].path.contains(&Pos::new(12, 8)));
    }

    #[test]
    fn blending_never_duplicates_path_cells() {
        let mut grid = Grid::new(16, 16);
        for x in 3..12 {
            grid.set(Pos::new(x, 5), CellState::Floor);
            grid.set(Pos::new(x, 6), CellState::Floor);
        }
        let mut rooms = SlotMap::with_key();
        let room_a = rooms.insert(Room::new(Pos::new(1, 1), Size::new(1, 1)));
        let room_b = rooms.insert(Room::new(Pos::new(14, 14), Size::new(1, 1)));
        let path: Vec<Pos> = (3..12).map(|x| Pos::new(x, 4)).collect();
        let mut corridors = vec![Corridor { path, room_a, room_b }];

        for _ in 0..2 {
            blend_organic_floor(&grid, &mut rooms, &mut corridors);
        }
        let unique: HashSet<Pos> = corridors[0].path.iter().copied().collect();
        assert_eq!(unique.len(), corridors[0].path.len());
        assert_eq!(corridors[0].path.len(), 9 + 18);
    }

    #[test]
    fn walls_are_never_absorbed() {
        let mut grid = Grid::new(12, 12);
        grid.set(Pos::new(6, 6), CellState::Wall);
        let mut rooms = SlotMap::with_key();
        let room = rooms.insert(Room::new(Pos::new(3, 3), Size::new(3, 3)));
        blend_organic_floor(&grid, &mut rooms, &mut []);
        assert_eq!(rooms[room].size, Size::new(3, 3));
    }
}
