use crate::game::{Game, Level, Room, RoomData};
use crate::types::RoomType;

/// Grid indexes of every room inside the level grid, excluding
/// off-grid rooms (negative sentinel indexes).
pub fn rooms_inside_grid(level: &dyn Level) -> Vec<i32> {
    level
        .grid_room_indexes()
        .into_iter()
        .filter(|grid_index| *grid_index >= 0)
        .collect()
}

/// Type of the room the player is currently in.
pub fn room_type(game: &dyn Game) -> RoomType {
    game.room().room_type()
}

/// Layout data for a loaded room, looked up by type and variant.
pub fn room_data_for_type_variant(
    game: &dyn Game,
    room_type: RoomType,
    variant: u32,
) -> Option<RoomData> {
    game.room_data_for_type_variant(room_type, variant)
}
