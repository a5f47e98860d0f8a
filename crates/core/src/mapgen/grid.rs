//! Cell-state grid plus rasterization of rooms, corridors, and derived walls.

use serde::{Deserialize, Serialize};

use crate::types::{CellState, Pos};

use super::corridor::Corridor;
use super::room::Room;

/// Offsets of the eight cells surrounding a position.
pub(super) const NEIGHBORS_8: [(i32, i32); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

/// Row-major `width × height` buffer of cell states.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![CellState::Empty; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Fills every cell with `Empty`, keeping the allocation.
    pub fn reset(&mut self) {
        self.cells.fill(CellState::Empty);
    }

    /// Reallocates only when the dimensions change.
    pub fn reset_to(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        } else {
            self.reset();
        }
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Out-of-bounds reads are `Empty`.
    pub fn get(&self, pos: Pos) -> CellState {
        if !self.in_bounds(pos) {
            return CellState::Empty;
        }
        self.cells[self.index(pos)]
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Pos, state: CellState) {
        if self.in_bounds(pos) {
            let index = self.index(pos);
            self.cells[index] = state;
        }
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..width).flat_map(move |x| (0..height).map(move |y| Pos { y, x }))
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

/// Paints rooms and corridors, then derives walls around them.
///
/// With `preserve_base` set the grid keeps its current contents (the organic
/// noise/walk layer); otherwise it is cleared first.
pub fn rasterize<'a>(
    grid: &mut Grid,
    rooms: impl IntoIterator<Item = &'a Room>,
    corridors: &[Corridor],
    preserve_base: bool,
) {
    if !preserve_base {
        grid.reset();
    }

    for room in rooms {
        for pos in room.bounds().cells() {
            grid.set(pos, CellState::Floor);
        }
    }

    for corridor in corridors {
        for &pos in &corridor.path {
            if grid.in_bounds(pos) && grid.get(pos) == CellState::Empty {
                grid.set(pos, CellState::Corridor);
            }
        }
    }

    derive_walls(grid);
}

/// Marks every `Empty` 8-neighbour of a floor or corridor cell as `Wall`.
pub fn derive_walls(grid: &mut Grid) {
    let walkable: Vec<Pos> = grid.positions().filter(|&pos| grid.get(pos).is_walkable()).collect();
    for pos in walkable {
        for (dx, dy) in NEIGHBORS_8 {
            let neighbor = pos.offset(dx, dy);
            if grid.in_bounds(neighbor) && grid.get(neighbor) == CellState::Empty {
                grid.set(neighbor, CellState::Wall);
            }
        }
    }
}
