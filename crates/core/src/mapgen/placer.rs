//! Rejection-sampled room placement.

use slotmap::SlotMap;

use crate::config::GeneratorConfig;
use crate::error::GenerationFailure;
use crate::types::{Pos, RoomId, RoomType, Size};

use super::room::Room;
use super::seed::GenRng;

/// Minimum distance kept between a room and the grid edge.
pub(super) const GRID_MARGIN: i32 = 2;
/// Padding applied to both rooms in the spacing check.
pub(super) const ROOM_PADDING: i32 = 2;

/// Places rooms into `rooms` until the sampled target count or the attempt budget is reached.
///
/// The arena must be empty on entry. Rooms are never removed during a session,
/// so the arena's iteration order is placement order and the first room is the start room.
pub(super) fn place_rooms(
    config: &GeneratorConfig,
    rng: &mut GenRng,
    rooms: &mut SlotMap<RoomId, Room>,
) -> Result<RoomId, GenerationFailure> {
    debug_assert!(rooms.is_empty());
    let target_room_count = rng.range_inclusive(config.min_rooms, config.max_rooms);
    let level_width = config.level_width as i32;
    let level_height = config.level_height as i32;

    let mut attempts = 0_u32;
    while rooms.len() < target_room_count && attempts < config.max_placement_attempts {
        attempts += 1;

        let size = Size::new(
            rng.range_i32(config.min_room_size.width, config.max_room_size.width + 1),
            rng.range_i32(config.min_room_size.height, config.max_room_size.height + 1),
        );
        let max_x = level_width - size.width - GRID_MARGIN;
        let max_y = level_height - size.height - GRID_MARGIN;
        let position = Pos { y: rng.range_i32(GRID_MARGIN, max_y), x: rng.range_i32(GRID_MARGIN, max_x) };
        if max_x <= GRID_MARGIN || max_y <= GRID_MARGIN {
            continue;
        }

        let candidate = Room::new(position, size);
        if rooms.values().any(|existing| existing.overlaps(&candidate, ROOM_PADDING)) {
            continue;
        }
        rooms.insert(candidate);
    }

    log::trace!(
        "placed {} of {} target rooms in {} attempts",
        rooms.len(),
        target_room_count,
        attempts
    );

    if rooms.len() < config.min_rooms {
        return Err(GenerationFailure::InsufficientRooms {
            placed: rooms.len(),
            required: config.min_rooms,
        });
    }

    let (start_room, room) = rooms.iter_mut().next().ok_or(
        GenerationFailure::InsufficientRooms { placed: 0, required: config.min_rooms },
    )?;
    room.room_type = RoomType::Start;
    Ok(start_room)
}
