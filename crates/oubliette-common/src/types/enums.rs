use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Room types, matching the values the game uses in its room XML files and
/// in the `RoomDescriptor` data it exposes at runtime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum RoomType {
    Default = 1,
    Shop = 2,
    Treasure = 4,
    Boss = 5,
    MiniBoss = 6,
    Secret = 7,
    SuperSecret = 8,
    Arcade = 9,
    Curse = 10,
    Challenge = 11,
    Library = 12,
    Sacrifice = 13,
    Devil = 14,
    Angel = 15,
    BossRush = 17,
}

impl RoomType {
    pub fn from_repr(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Default),
            2 => Some(Self::Shop),
            4 => Some(Self::Treasure),
            5 => Some(Self::Boss),
            6 => Some(Self::MiniBoss),
            7 => Some(Self::Secret),
            8 => Some(Self::SuperSecret),
            9 => Some(Self::Arcade),
            10 => Some(Self::Curse),
            11 => Some(Self::Challenge),
            12 => Some(Self::Library),
            13 => Some(Self::Sacrifice),
            14 => Some(Self::Devil),
            15 => Some(Self::Angel),
            17 => Some(Self::BossRush),
            _ => None,
        }
    }
}

/// Room shapes. The numeric values come straight from the room editor's XML
/// output; the narrow variants share a footprint with their wide
/// counterparts but have a smaller playable area.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum RoomShape {
    Shape1x1 = 1,
    NarrowHorizontal = 2,
    NarrowVertical = 3,
    Shape1x2 = 4,
    TallNarrow = 5,
    Shape2x1 = 6,
    WideNarrow = 7,
    Shape2x2 = 8,
    CornerTopLeft = 9,
    CornerTopRight = 10,
    CornerBottomLeft = 11,
    CornerBottomRight = 12,
}

impl RoomShape {
    pub fn from_repr(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Shape1x1),
            2 => Some(Self::NarrowHorizontal),
            3 => Some(Self::NarrowVertical),
            4 => Some(Self::Shape1x2),
            5 => Some(Self::TallNarrow),
            6 => Some(Self::Shape2x1),
            7 => Some(Self::WideNarrow),
            8 => Some(Self::Shape2x2),
            9 => Some(Self::CornerTopLeft),
            10 => Some(Self::CornerTopRight),
            11 => Some(Self::CornerBottomLeft),
            12 => Some(Self::CornerBottomRight),
            _ => None,
        }
    }

    /// Footprint of the shape in layout tiles. Door coordinates in room XML
    /// files are expressed relative to this grid, with `-1` meaning "one
    /// tile outside the left/top wall".
    pub fn layout_size(self) -> (i32, i32) {
        match self {
            Self::Shape1x1 | Self::NarrowHorizontal | Self::NarrowVertical => (13, 7),
            Self::Shape1x2 | Self::TallNarrow => (13, 14),
            Self::Shape2x1 | Self::WideNarrow => (26, 7),
            Self::Shape2x2
            | Self::CornerTopLeft
            | Self::CornerTopRight
            | Self::CornerBottomLeft
            | Self::CornerBottomRight => (26, 14),
        }
    }
}

/// The eight door positions a room can have. Large rooms use the `*1`
/// slots for the second door on a given side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum DoorSlot {
    Left0 = 0,
    Up0 = 1,
    Right0 = 2,
    Down0 = 3,
    Left1 = 4,
    Up1 = 5,
    Right1 = 6,
    Down1 = 7,
}

impl DoorSlot {
    pub const ALL: [DoorSlot; 8] = [
        DoorSlot::Left0,
        DoorSlot::Up0,
        DoorSlot::Right0,
        DoorSlot::Down0,
        DoorSlot::Left1,
        DoorSlot::Up1,
        DoorSlot::Right1,
        DoorSlot::Down1,
    ];

    pub fn from_repr(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[repr(i32)]
pub enum DoorState {
    Closed = 1,
    Open = 2,
    Hidden = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[repr(i32)]
pub enum DoorVariant {
    Unspecified = 0,
    Locked = 1,
    DoubleLocked = 2,
    Barred = 3,
}

/// Floors of the game, in play order. Stage numbers are what
/// `Level::stage` reports and what custom stages override.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum LevelStage {
    Crypt1 = 1,
    Crypt2 = 2,
    Burrows1 = 3,
    Burrows2 = 4,
    Depths1 = 5,
    Depths2 = 6,
    Sanctum1 = 7,
    Sanctum2 = 8,
}

impl LevelStage {
    pub fn from_repr(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Crypt1),
            2 => Some(Self::Crypt2),
            3 => Some(Self::Burrows1),
            4 => Some(Self::Burrows2),
            5 => Some(Self::Depths1),
            6 => Some(Self::Depths2),
            7 => Some(Self::Sanctum1),
            8 => Some(Self::Sanctum2),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum StageType {
    Original = 0,
    Expansion = 1,
    Remix = 2,
    AltPath = 4,
    AltPathB = 5,
}

impl StageType {
    pub fn from_repr(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Original),
            1 => Some(Self::Expansion),
            2 => Some(Self::Remix),
            4 => Some(Self::AltPath),
            5 => Some(Self::AltPathB),
            _ => None,
        }
    }
}

/// Grid entities are the static furniture of a room (rocks, pits, spikes),
/// as opposed to free-moving entities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum GridEntityType {
    Rock = 2,
    Pit = 7,
    Spikes = 8,
    Web = 10,
    Barrel = 12,
    Statue = 13,
    Door = 16,
    Trapdoor = 17,
    PressurePlate = 20,
}

/// Free-moving entity types. The game defines hundreds of these; mods only
/// ever compare them for equality, so a thin newtype over the raw id is
/// enough.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct EntityType(pub u32);

impl EntityType {
    pub const PICKUP: EntityType = EntityType(5);
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EntityType({})", self.0)
    }
}

/// Playable characters. Only the ones the library special-cases are
/// spelled out; the rest are compared by raw id through `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    Wanderer,
    Zealot,
    Merchant,
    /// The merchant's unlockable alternate, who pays for every pedestal
    /// collectible with coins.
    TaintedMerchant,
    Other(u32),
}

/// Which kind of timed fight a room is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum AmbushType {
    ChallengeRoom,
    BossRush,
}
