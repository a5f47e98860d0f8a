use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct RoomId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }
}

/// Integer width/height pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Floor,
    Wall,
    Corridor,
}

impl CellState {
    pub fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Corridor)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    #[default]
    Normal,
    Start,
}

/// Lifecycle of a generation session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    Attempting {
        attempt: u32,
    },
    Succeeded,
    Failed,
}
