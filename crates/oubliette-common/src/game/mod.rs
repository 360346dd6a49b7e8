//! The slice of the host game's API that this library consumes.
//!
//! The game owns these objects; mods only ever see them through the engine
//! bindings. Everything here is a trait so that the embedding layer can
//! hand in the real bindings while tests use [`test_fixtures::TestGame`].

use serde::{Deserialize, Serialize};

use crate::types::{
    DoorSlot, DoorSlotFlags, DoorState, DoorVariant, EntityType, GridEntityType, RoomShape,
    RoomType, StageType,
};

pub mod test_fixtures;

/// Setting the stage to an invalid value prevents backdrops and shadows
/// from loading, which is exactly what a custom floor wants.
pub const CUSTOM_FLOOR_STAGE: i32 = -1;

/// Sentinel room index the game uses for the secret-exit room behind
/// boss-room doors.
pub const SECRET_EXIT_IDX: i32 = -8;

pub const MAX_NUM_DOORS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The layout data attached to a room descriptor. Reassigning it is how
/// custom stages replace vanilla rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    pub room_type: RoomType,
    pub variant: u32,
    pub sub_type: u32,
    pub shape: RoomShape,
    pub doors: DoorSlotFlags,
}

/// Point-in-time view of a grid entity, keyed by its grid index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridEntitySnapshot {
    pub grid_index: i32,
    pub kind: GridEntityType,
    pub variant: u32,
    pub state: u32,
}

/// Point-in-time view of an NPC. The pointer hash is stable for the
/// lifetime of the entity and is what the game uses to identify it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpcSnapshot {
    pub ptr_hash: u64,
    pub entity_type: EntityType,
    pub variant: u32,
}

pub trait Door {
    fn slot(&self) -> DoorSlot;
    fn target_room_type(&self) -> RoomType;
    fn target_room_index(&self) -> i32;
    fn state(&self) -> DoorState;
    fn set_state(&mut self, state: DoorState);
    fn variant(&self) -> DoorVariant;
    fn set_variant(&mut self, variant: DoorVariant);
    fn set_locked(&mut self, locked: bool);
    fn open(&mut self);
    /// Close the door. `instant` skips the closing animation.
    fn close(&mut self, instant: bool);
    fn play_animation(&mut self, name: &str);
}

pub trait Room {
    fn room_type(&self) -> RoomType;
    fn shape(&self) -> RoomShape;
    /// Slots that currently hold a door, in slot order.
    fn door_slots(&self) -> Vec<DoorSlot>;
    fn door(&self, slot: DoorSlot) -> Option<&dyn Door>;
    fn door_mut(&mut self, slot: DoorSlot) -> Option<&mut dyn Door>;
    fn remove_door(&mut self, slot: DoorSlot);
    fn is_ambush_active(&self) -> bool;
    fn is_ambush_done(&self) -> bool;
    fn grid_entities(&self) -> Vec<GridEntitySnapshot>;
}

pub trait Level {
    /// Raw stage number. May be [`CUSTOM_FLOOR_STAGE`] while a custom
    /// floor is active, which is why this is not a `LevelStage`.
    fn stage(&self) -> i32;
    fn stage_type(&self) -> StageType;
    fn set_stage(&mut self, stage: i32, stage_type: StageType);
    fn starting_room_index(&self) -> i32;
    /// Grid indexes of every room inside the level grid.
    fn grid_room_indexes(&self) -> Vec<i32>;
    fn room_data(&self, grid_index: i32) -> Option<RoomData>;
    fn set_room_data(&mut self, grid_index: i32, data: RoomData);
    fn set_visited_count(&mut self, grid_index: i32, count: u32);
}

/// A pickup entity freshly spawned by [`Game::spawn_pickup`].
pub trait Pickup {
    fn set_options_index(&mut self, index: i32);
    fn set_shop_item_id(&mut self, id: i32);
    fn set_price(&mut self, price: i32);
    fn morph(&mut self, variant: u32, sub_type: u32);
}

pub trait Game {
    fn start_seed(&self) -> u64;
    fn frame_count(&self) -> u64;
    fn level(&self) -> &dyn Level;
    fn level_mut(&mut self) -> &mut dyn Level;
    /// The room the player is currently in.
    fn room(&self) -> &dyn Room;
    fn room_mut(&mut self) -> &mut dyn Room;
    /// Look up the layout data for a loaded room by type and variant.
    /// Returns `None` if no such room is loaded in the game's content.
    fn room_data_for_type_variant(&self, room_type: RoomType, variant: u32) -> Option<RoomData>;
    /// Re-roll the level layout seed (the console `reseed` command).
    fn reseed(&mut self);
    fn any_player_is(&self, character: crate::types::CharacterKind) -> bool;
    fn spawn_pickup(
        &mut self,
        variant: u32,
        sub_type: u32,
        position: Vector,
        seed: u64,
    ) -> &mut dyn Pickup;
}
