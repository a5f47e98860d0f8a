//! L-shaped corridor paths between two rooms.

use serde::{Deserialize, Serialize};

use crate::types::{Pos, RoomId};

use super::room::Room;
use super::seed::GenRng;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    /// First cell sits on `room_a`'s perimeter, last cell on `room_b`'s, until
    /// organic blending appends neighbouring cells.
    pub path: Vec<Pos>,
    pub room_a: RoomId,
    pub room_b: RoomId,
}

impl Corridor {
    pub(super) fn between(
        (room_a_id, room_a): (RoomId, &Room),
        (room_b_id, room_b): (RoomId, &Room),
        rng: &mut GenRng,
    ) -> Self {
        let start = edge_point_toward(room_a, room_b.center());
        let end = edge_point_toward(room_b, room_a.center());
        let horizontal_first = rng.coin_flip();
        Self { path: l_shaped_path(start, end, horizontal_first), room_a: room_a_id, room_b: room_b_id }
    }

    pub fn connects(&self, first: RoomId, second: RoomId) -> bool {
        (self.room_a == first && self.room_b == second)
            || (self.room_a == second && self.room_b == first)
    }
}

/// Point on `room`'s perimeter on the edge facing `target`.
pub(super) fn edge_point_toward(room: &Room, target: Pos) -> Pos {
    let bounds = room.bounds();
    let center = room.center();
    let mut closest = Pos {
        y: target.y.clamp(bounds.y, bounds.y_max() - 1),
        x: target.x.clamp(bounds.x, bounds.x_max() - 1),
    };

    if target.x.abs_diff(center.x) > target.y.abs_diff(center.y) {
        closest.x = if target.x < center.x { bounds.x } else { bounds.x_max() - 1 };
    } else {
        closest.y = if target.y < center.y { bounds.y } else { bounds.y_max() - 1 };
    }
    closest
}

pub(super) fn l_shaped_path(start: Pos, end: Pos, horizontal_first: bool) -> Vec<Pos> {
    let mut path = Vec::with_capacity((start.x.abs_diff(end.x) + start.y.abs_diff(end.y)) as usize + 1);
    let mut current = start;
    path.push(current);

    if horizontal_first {
        step_horizontally(&mut path, &mut current, end.x);
        step_vertically(&mut path, &mut current, end.y);
    } else {
        step_vertically(&mut path, &mut current, end.y);
        step_horizontally(&mut path, &mut current, end.x);
    }
    path
}

fn step_horizontally(path: &mut Vec<Pos>, current: &mut Pos, target_x: i32) {
    while current.x != target_x {
        current.x += (target_x - current.x).signum();
        path.push(*current);
    }
}

fn step_vertically(path: &mut Vec<Pos>, current: &mut Pos, target_y: i32) {
    while current.y != target_y {
        current.y += (target_y - current.y).signum();
        path.push(*current);
    }
}
