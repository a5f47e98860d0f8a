//! The finished dungeon artifact handed to renderers and other consumers.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use xxhash_rust::xxh3::Xxh3;

use crate::types::{CellState, Pos, RoomId, RoomType};

use super::corridor::Corridor;
use super::grid::Grid;
use super::room::Room;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub grid: Grid,
    pub rooms: SlotMap<RoomId, Room>,
    pub corridors: Vec<Corridor>,
    pub start_room: RoomId,
    /// Seed of the attempt that succeeded.
    pub seed: u64,
    /// Attempts used, including the successful one.
    pub attempts: u32,
}

// `SlotMap` has no `PartialEq`; rooms compare pairwise in placement order.
impl PartialEq for DungeonLayout {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid
            && self.rooms.iter().eq(other.rooms.iter())
            && self.corridors == other.corridors
            && self.start_room == other.start_room
            && self.seed == other.seed
            && self.attempts == other.attempts
    }
}

impl Eq for DungeonLayout {}

impl DungeonLayout {
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn cell(&self, pos: Pos) -> CellState {
        self.grid.get(pos)
    }

    /// Rooms in placement order; the start room comes first.
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.rooms.iter()
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// `None` only for a hand-built layout whose `start_room` key is stale.
    pub fn start_room(&self) -> Option<&Room> {
        self.rooms.get(self.start_room)
    }

    pub fn count(&self, state: CellState) -> usize {
        self.grid.count(state)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let room_order: Vec<RoomId> = self.rooms.keys().collect();
        let room_index = |id: RoomId| -> u32 {
            room_order.iter().position(|&candidate| candidate == id).map_or(u32::MAX, |i| i as u32)
        };

        let mut bytes = Vec::new();
        bytes.extend((self.width() as u32).to_le_bytes());
        bytes.extend((self.height() as u32).to_le_bytes());
        for cell in self.grid.cells() {
            bytes.push(match cell {
                CellState::Empty => 0,
                CellState::Floor => 1,
                CellState::Wall => 2,
                CellState::Corridor => 3,
            });
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in self.rooms.values() {
            bytes.extend(room.position.x.to_le_bytes());
            bytes.extend(room.position.y.to_le_bytes());
            bytes.extend(room.size.width.to_le_bytes());
            bytes.extend(room.size.height.to_le_bytes());
            bytes.push(match room.room_type {
                RoomType::Normal => 0,
                RoomType::Start => 1,
            });
        }

        bytes.extend((self.corridors.len() as u32).to_le_bytes());
        for corridor in &self.corridors {
            bytes.extend(room_index(corridor.room_a).to_le_bytes());
            bytes.extend(room_index(corridor.room_b).to_le_bytes());
            bytes.extend((corridor.path.len() as u32).to_le_bytes());
            for point in &corridor.path {
                bytes.extend(point.x.to_le_bytes());
                bytes.extend(point.y.to_le_bytes());
            }
        }
        bytes
    }

    /// Stable hash of `canonical_bytes`, for determinism checks.
    pub fn layout_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write(&self.canonical_bytes());
        hasher.finish()
    }

    /// One character per cell: blank empty, `.` floor, `#` wall, `,` corridor, `S` start-room center.
    pub fn render_ascii(&self) -> String {
        let start_center = self.start_room().map(Room::center);
        let mut text = String::with_capacity((self.width() + 1) * self.height());
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let pos = Pos { y, x };
                let c = if Some(pos) == start_center {
                    'S'
                } else {
                    match self.cell(pos) {
                        CellState::Empty => ' ',
                        CellState::Floor => '.',
                        CellState::Wall => '#',
                        CellState::Corridor => ',',
                    }
                };
                text.push(c);
            }
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::grid::rasterize;
    use crate::types::Size;

    fn tiny_layout() -> DungeonLayout {
        let mut rooms: SlotMap<RoomId, Room> = SlotMap::with_key();
        let mut start = Room::new(Pos::new(2, 2), Size::new(3, 3));
        start.room_type = RoomType::Start;
        let start_room = rooms.insert(start);
        let other = rooms.insert(Room::new(Pos::new(8, 2), Size::new(2, 3)));
        let path = (4..=8).map(|x| Pos::new(x, 3)).collect();
        let corridors = vec![Corridor { path, room_a: start_room, room_b: other }];
        let mut grid = Grid::new(12, 7);
        rasterize(&mut grid, rooms.values(), &corridors, false);
        DungeonLayout { grid, rooms, corridors, start_room, seed: 5, attempts: 1 }
    }

    #[test]
    fn ascii_dump_marks_each_cell_state() {
        let text = tiny_layout().render_ascii();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|row| row.chars().count() == 12));
        assert_eq!(rows[0], "            ");
        assert_eq!(rows[1], " ##### #### ");
        assert_eq!(rows[3], " #.S.,,,..# ");
    }

    #[test]
    fn hash_tracks_layout_content() {
        let layout = tiny_layout();
        let same = tiny_layout();
        assert_eq!(layout.layout_hash(), same.layout_hash());

        let mut changed = tiny_layout();
        changed.corridors[0].path.push(Pos::new(6, 4));
        assert_ne!(layout.layout_hash(), changed.layout_hash());
    }

    #[test]
    fn start_room_is_first_in_iteration_order() {
        let layout = tiny_layout();
        let (first_id, first_room) = layout.rooms().next().expect("has rooms");
        assert_eq!(first_id, layout.start_room);
        assert_eq!(first_room.room_type, RoomType::Start);
        assert_eq!(layout.room(first_id), layout.start_room());
    }

    #[test]
    fn stale_start_room_is_reported_not_panicked() {
        let mut layout = tiny_layout();
        layout.rooms.remove(layout.start_room);
        assert!(layout.start_room().is_none());
        assert!(!layout.render_ascii().contains('S'));
    }

    #[test]
    fn equality_compares_rooms_in_order() {
        let layout = tiny_layout();
        assert_eq!(layout, tiny_layout());

        let mut grown = tiny_layout();
        let start = grown.start_room;
        grown.rooms[start].size = Size::new(4, 3);
        assert_ne!(layout, grown);
    }
}
