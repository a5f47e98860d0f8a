//! Spanning-tree room connection plus randomized redundant corridors.

use slotmap::SlotMap;

use crate::types::{Pos, RoomId};

use super::corridor::Corridor;
use super::room::Room;
use super::seed::GenRng;

/// Chance that a room pair without a corridor gains an extra one.
pub(super) const EXTRA_CONNECTION_CHANCE: f32 = 0.2;

/// Appends corridors joining every room in `rooms` to `corridors`.
///
/// The spanning phase repeatedly links the closest (connected, unconnected)
/// pair of room centers, so the graph is connected after it alone. The
/// redundancy phase then rolls once per room pair and adds a corridor when the
/// roll hits and the pair is not yet directly linked.
pub(super) fn connect_rooms(
    rooms: &SlotMap<RoomId, Room>,
    corridors: &mut Vec<Corridor>,
    rng: &mut GenRng,
) {
    if rooms.len() < 2 {
        return;
    }

    let room_ids: Vec<RoomId> = rooms.keys().collect();
    let mut connected = vec![room_ids[0]];
    let mut unconnected: Vec<RoomId> = room_ids[1..].to_vec();

    while !unconnected.is_empty() {
        let mut closest: Option<(f32, RoomId, usize)> = None;
        for &connected_id in &connected {
            let connected_center = rooms[connected_id].center();
            for (pending_index, &pending_id) in unconnected.iter().enumerate() {
                let distance = euclidean(connected_center, rooms[pending_id].center());
                if closest.is_none_or(|(best, _, _)| distance < best) {
                    closest = Some((distance, connected_id, pending_index));
                }
            }
        }

        let Some((_, connected_id, pending_index)) = closest else {
            break;
        };
        let pending_id = unconnected.remove(pending_index);
        corridors.push(Corridor::between(
            (connected_id, &rooms[connected_id]),
            (pending_id, &rooms[pending_id]),
            rng,
        ));
        connected.push(pending_id);
    }

    let spanning_count = corridors.len();
    for (index, &first) in room_ids.iter().enumerate() {
        for &second in &room_ids[index + 1..] {
            if rng.value() >= EXTRA_CONNECTION_CHANCE {
                continue;
            }
            if corridors.iter().any(|corridor| corridor.connects(first, second)) {
                continue;
            }
            corridors.push(Corridor::between((first, &rooms[first]), (second, &rooms[second]), rng));
        }
    }

    log::trace!(
        "connected {} rooms with {} spanning and {} extra corridors",
        rooms.len(),
        spanning_count,
        corridors.len() - spanning_count
    );
}

fn euclidean(a: Pos, b: Pos) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    (dx * dx + dy * dy).sqrt()
}
