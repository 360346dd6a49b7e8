mod default_map;
mod door_slot_flags;
mod enums;

pub use default_map::DefaultMap;
pub use door_slot_flags::{
    door_slot_flags_to_slots, door_slot_to_direction, door_slot_to_flag, door_slots_to_flags,
    DoorSlotFlags,
};
pub use enums::{
    AmbushType, CharacterKind, Direction, DoorSlot, DoorState, DoorVariant, EntityType,
    GridEntityType, LevelStage, RoomShape, RoomType, StageType,
};
