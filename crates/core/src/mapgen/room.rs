//! Axis-aligned rectangles and the rooms placed on them.

use serde::{Deserialize, Serialize};

use crate::types::{Pos, RoomType, Size};

/// Half-open integer rectangle: covers `[x, x + width) × [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn x_max(self) -> i32 {
        self.x + self.width
    }

    pub fn y_max(self) -> i32 {
        self.y + self.height
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x < self.x_max() && pos.y >= self.y && pos.y < self.y_max()
    }

    /// Strict intersection; rectangles that only share an edge do not overlap.
    pub fn overlaps(self, other: Self) -> bool {
        other.x_max() > self.x
            && other.x < self.x_max()
            && other.y_max() > self.y
            && other.y < self.y_max()
    }

    pub fn expanded(self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2,
            height: self.height + margin * 2,
        }
    }

    /// Cells covered by the rectangle, column-major (x outer, y inner).
    pub fn cells(self) -> impl Iterator<Item = Pos> {
        (self.x..self.x_max()).flat_map(move |x| (self.y..self.y_max()).map(move |y| Pos { y, x }))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub position: Pos,
    pub size: Size,
    pub room_type: RoomType,
    /// Informational only; nothing in generation reads it yet.
    pub is_main_path: bool,
}

impl Room {
    pub fn new(position: Pos, size: Size) -> Self {
        debug_assert!(size.width > 0 && size.height > 0);
        Self { position, size, room_type: RoomType::Normal, is_main_path: false }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.width, self.size.height)
    }

    pub fn expanded_bounds(&self, expansion: i32) -> Rect {
        self.bounds().expanded(expansion)
    }

    /// `position + size / 2` with integer division.
    pub fn center(&self) -> Pos {
        Pos {
            y: self.position.y + self.size.height / 2,
            x: self.position.x + self.size.width / 2,
        }
    }

    pub fn overlaps(&self, other: &Room, padding: i32) -> bool {
        self.expanded_bounds(padding).overlaps(other.expanded_bounds(padding))
    }

    /// Grows the room so its bounds include `cell`. Never shrinks and never moves the origin.
    pub fn grow_to_include(&mut self, cell: Pos) {
        self.size.width = self.size.width.max(cell.x - self.position.x + 1);
        self.size.height = self.size.height.max(cell.y - self.position.y + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(x: i32, y: i32, width: i32, height: i32) -> Room {
        Room::new(Pos::new(x, y), Size::new(width, height))
    }

    #[test]
    fn center_uses_integer_division() {
        assert_eq!(room(2, 3, 5, 4).center(), Pos::new(4, 5));
        assert_eq!(room(0, 0, 1, 1).center(), Pos::new(0, 0));
    }

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let left = Rect::new(0, 0, 4, 4);
        let right = Rect::new(4, 0, 4, 4);
        assert!(!left.overlaps(right));
        assert!(left.overlaps(Rect::new(3, 3, 2, 2)));
    }

    #[test]
    fn padded_overlap_requires_a_four_cell_gap() {
        let anchor = room(10, 10, 4, 4);
        // Right edge of anchor is x = 14; with padding 2 on both sides the
        // neighbour must start at x >= 18 to stay clear.
        assert!(anchor.overlaps(&room(17, 10, 3, 3), 2));
        assert!(!anchor.overlaps(&room(18, 10, 3, 3), 2));
        assert!(!anchor.overlaps(&room(10, 18, 3, 3), 2));
    }

    #[test]
    fn expanded_bounds_grow_on_every_side() {
        let bounds = room(5, 6, 3, 2).expanded_bounds(1);
        assert_eq!(bounds, Rect::new(4, 5, 5, 4));
    }

    #[test]
    fn grow_to_include_only_extends_toward_higher_coordinates() {
        let mut subject = room(5, 5, 3, 3);
        subject.grow_to_include(Pos::new(4, 4));
        assert_eq!(subject.size, Size::new(3, 3));
        assert_eq!(subject.position, Pos::new(5, 5));

        subject.grow_to_include(Pos::new(8, 6));
        assert_eq!(subject.size, Size::new(4, 3));
    }

    #[test]
    fn cells_cover_every_position_once() {
        let cells: Vec<Pos> = Rect::new(1, 2, 2, 3).cells().collect();
        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|&pos| Rect::new(1, 2, 2, 3).contains(pos)));
    }
}
