//! Standard library for oubliette mods.
//!
//! The game owns its API; this crate layers conveniences over it:
//! derived callbacks with optional filters, feature save data with
//! lifetimes, the custom-stage runtime, and a grab bag of helper
//! functions.

pub mod callbacks;
pub mod functions;
pub mod game;
pub mod mods;
pub mod save;
pub mod stage;
pub mod types;

pub use game::{Game, RoomData, Vector, CUSTOM_FLOOR_STAGE, SECRET_EXIT_IDX};
pub use mods::Mod;
pub use save::{Lifetime, SaveData, SaveDataManager, SaveError};
pub use stage::{
    CustomStageMetadata, RoomMetadata, StageError, StageManager, ROOM_VARIANT_MULTIPLIER,
};
