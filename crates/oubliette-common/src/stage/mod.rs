//! Custom-stage runtime: registration of compiler-emitted stage metadata
//! and the floor-warp logic that swaps vanilla rooms for custom ones.

use std::collections::{BTreeMap, HashMap, HashSet};

use rand_isaac::Isaac64Rng;
use thiserror::Error;
use tracing::{debug, error};

use crate::functions::rng::{new_rng, weighted_index};
use crate::functions::rooms::rooms_inside_grid;
use crate::game::{Game, Level, RoomData, CUSTOM_FLOOR_STAGE};
use crate::types::{
    door_slot_flags_to_slots, DefaultMap, DoorSlotFlags, LevelStage, RoomShape, RoomType,
    StageType,
};

mod metadata;

pub use metadata::{BossPoolEntry, CustomStageMetadata, RoomMetadata};

/// Room variants of custom stages are namespaced by
/// `prefix * ROOM_VARIANT_MULTIPLIER` so they can never collide with
/// vanilla variants.
pub const ROOM_VARIANT_MULTIPLIER: u32 = 10_000;

pub const DEFAULT_BASE_STAGE: LevelStage = LevelStage::Crypt2;
pub const DEFAULT_BASE_STAGE_TYPE: StageType = StageType::Original;

/// The stage type applied together with [`CUSTOM_FLOOR_STAGE`]. It must
/// be the expansion stage type or the walls will not render.
pub const CUSTOM_FLOOR_STAGE_TYPE: StageType = StageType::Expansion;

#[derive(Debug, Error)]
pub enum StageError {
    #[error(
        "custom stage \"{0}\" was not found; define it in the project config, recompile the mod, \
         and restart the game"
    )]
    UnknownStage(String),
    #[error("a custom stage has a blank name, which is not allowed")]
    BlankName,
    #[error("the custom stage \"{0}\" is registered more than once")]
    DuplicateStage(String),
    #[error(
        "there is more than one room with a variant of \"{variant}\" in the \"{stage}\" custom \
         stage; each room must have a unique variant"
    )]
    DuplicateRoomVariant { stage: String, variant: u32 },
    #[error("the \"{stage}\" custom stage has a room with an unknown room type: {value}")]
    InvalidRoomType { stage: String, value: i32 },
    #[error("the \"{stage}\" custom stage has a room with an unknown room shape: {value}")]
    InvalidRoomShape { stage: String, value: i32 },
    #[error("the \"{stage}\" custom stage has a room with invalid door slot flags: {value}")]
    InvalidDoorSlotFlags { stage: String, value: u32 },
    #[error("the \"{stage}\" custom stage has an unknown base stage: {value}")]
    InvalidBaseStage { stage: String, value: i32 },
    #[error("the \"{stage}\" custom stage has an unknown base stage type: {value}")]
    InvalidBaseStageType { stage: String, value: i32 },
}

/// A room's metadata after validation, with typed fields.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StageRoom {
    room_type: RoomType,
    variant: u32,
    sub_type: u32,
    shape: RoomShape,
    doors: DoorSlotFlags,
    weight: f32,
}

type DoorFlagMap = DefaultMap<DoorSlotFlags, Vec<StageRoom>>;
type ShapeMap = DefaultMap<RoomShape, DoorFlagMap>;
type RoomTypeMap = DefaultMap<RoomType, ShapeMap>;

/// A registered custom stage: the descriptor plus the nested
/// type -> shape -> door-flags -> rooms lookup maps.
pub struct CustomStage {
    pub name: String,
    pub room_variant_prefix: u32,
    pub base_stage: Option<LevelStage>,
    pub base_stage_type: Option<StageType>,
    pub boss_pool: Option<Vec<BossPoolEntry>>,
    room_type_map: RoomTypeMap,
}

/// Owns every registered custom stage plus the state of the currently
/// active one.
pub struct StageManager {
    stages: BTreeMap<String, CustomStage>,
    current: Option<String>,
    first_floor: bool,
    /// Room data fetched from the game, cached per custom variant.
    room_data_cache: HashMap<u32, RoomData>,
}

impl StageManager {
    pub fn new() -> Self {
        Self {
            stages: BTreeMap::new(),
            current: None,
            first_floor: true,
            room_data_cache: HashMap::new(),
        }
    }

    /// Register one stage's metadata, validating room-variant uniqueness
    /// and every numeric field.
    pub fn register(&mut self, metadata: CustomStageMetadata) -> Result<(), StageError> {
        if metadata.name.is_empty() {
            return Err(StageError::BlankName);
        }
        if self.stages.contains_key(&metadata.name) {
            return Err(StageError::DuplicateStage(metadata.name));
        }

        let stage_name = metadata.name.clone();
        let base_stage = match metadata.base_stage {
            Some(value) => Some(LevelStage::from_repr(value).ok_or(StageError::InvalidBaseStage {
                stage: stage_name.clone(),
                value,
            })?),
            None => None,
        };
        let base_stage_type = match metadata.base_stage_type {
            Some(value) => {
                Some(
                    StageType::from_repr(value).ok_or(StageError::InvalidBaseStageType {
                        stage: stage_name.clone(),
                        value,
                    })?,
                )
            }
            None => None,
        };

        let mut seen_variants = HashSet::new();
        let mut room_type_map = RoomTypeMap::new();

        for room in &metadata.rooms_metadata {
            let room_type =
                RoomType::from_repr(room.room_type).ok_or(StageError::InvalidRoomType {
                    stage: stage_name.clone(),
                    value: room.room_type,
                })?;
            let shape = RoomShape::from_repr(room.shape).ok_or(StageError::InvalidRoomShape {
                stage: stage_name.clone(),
                value: room.shape,
            })?;
            let doors = DoorSlotFlags::from_bits(room.door_slot_flags).ok_or(
                StageError::InvalidDoorSlotFlags {
                    stage: stage_name.clone(),
                    value: room.door_slot_flags,
                },
            )?;

            if !seen_variants.insert(room.variant) {
                return Err(StageError::DuplicateRoomVariant {
                    stage: stage_name,
                    variant: room.variant,
                });
            }

            let stage_room = StageRoom {
                room_type,
                variant: room.variant,
                sub_type: room.sub_type,
                shape,
                doors,
                weight: room.weight,
            };
            room_type_map
                .get_or_insert_default(room_type)
                .get_or_insert_default(shape)
                .get_or_insert_default(doors)
                .push(stage_room);
        }

        debug!(
            target: "stage",
            "Registered custom stage \"{}\" with {} rooms",
            stage_name,
            metadata.rooms_metadata.len()
        );
        self.stages.insert(
            stage_name.clone(),
            CustomStage {
                name: stage_name,
                room_variant_prefix: metadata.room_variant_prefix,
                base_stage,
                base_stage_type,
                boss_pool: metadata.boss_pool,
                room_type_map,
            },
        );
        Ok(())
    }

    pub fn current_stage(&self) -> Option<&CustomStage> {
        self.current.as_deref().and_then(|name| self.stages.get(name))
    }

    pub fn is_first_floor(&self) -> bool {
        self.first_floor
    }

    /// Warp to a custom stage. Returns the (stage, stage type) pair that
    /// ends up applied to the level, which is always the invalid-floor
    /// sentinel.
    pub fn set_custom_stage(
        &mut self,
        game: &mut dyn Game,
        name: &str,
        first_floor: bool,
    ) -> Result<(i32, StageType), StageError> {
        if !self.stages.contains_key(name) {
            return Err(StageError::UnknownStage(name.to_string()));
        }

        self.current = Some(name.to_string());
        self.first_floor = first_floor;

        let stage = &self.stages[name];
        let current_stage = game.level().stage();
        let mut rng = new_rng(game.start_seed());

        // Revert the bugged sentinel stage first, if present, so the new
        // backdrop spawns.
        if current_stage == CUSTOM_FLOOR_STAGE {
            game.level_mut()
                .set_stage(LevelStage::Crypt1 as i32, StageType::Original);
        }

        let mut base_stage = stage.base_stage.unwrap_or(DEFAULT_BASE_STAGE) as i32;
        if !first_floor {
            base_stage += 1;
        }
        let base_stage_type = stage.base_stage_type.unwrap_or(DEFAULT_BASE_STAGE_TYPE);

        // Travelling to the same floor or backwards needs a fresh layout.
        let reseed = current_stage >= base_stage;
        game.level_mut().set_stage(base_stage, base_stage_type);
        if reseed {
            game.reseed();
        }

        assign_room_data(stage, game, &mut self.room_data_cache, &mut rng);

        game.level_mut()
            .set_stage(CUSTOM_FLOOR_STAGE, CUSTOM_FLOOR_STAGE_TYPE);
        Ok((CUSTOM_FLOOR_STAGE, CUSTOM_FLOOR_STAGE_TYPE))
    }

    /// Clear the active custom stage, typically right before taking the
    /// player to a vanilla floor.
    pub fn disable_custom_stage(&mut self) {
        self.current = None;
    }
}

impl Default for StageManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick a custom room for each vanilla room in the level grid.
fn assign_room_data(
    stage: &CustomStage,
    game: &mut dyn Game,
    cache: &mut HashMap<u32, RoomData>,
    rng: &mut Isaac64Rng,
) {
    let starting_room_index = game.level().starting_room_index();
    let mut assignments = Vec::new();

    for grid_index in rooms_inside_grid(game.level()) {
        // The starting room of each floor stays empty.
        if grid_index == starting_room_index {
            continue;
        }
        let Some(data) = game.level().room_data(grid_index) else {
            continue;
        };

        let Some(shape_map) = stage.room_type_map.get(&data.room_type) else {
            // End-users are not required to provide custom rooms for shops
            // and other special rooms, so only default rooms warrant an
            // error here.
            if data.room_type == RoomType::Default {
                error!(
                    target: "stage",
                    "Failed to find any custom rooms of type {} for custom stage: {}",
                    data.room_type, stage.name
                );
            }
            continue;
        };
        let Some(flag_map) = shape_map.get(&data.shape) else {
            error!(
                target: "stage",
                "Failed to find any custom rooms of type {} + shape {} for custom stage: {}",
                data.room_type, data.shape, stage.name
            );
            continue;
        };
        let Some(rooms) = flag_map.get(&data.doors) else {
            error!(
                target: "stage",
                "Failed to find any custom rooms of type {} + shape {} + door slot flags {} for \
                 custom stage: {}",
                data.room_type,
                data.shape,
                data.doors.bits(),
                stage.name
            );
            let slots: Vec<String> = door_slot_flags_to_slots(data.doors)
                .into_iter()
                .map(|slot| slot.to_string())
                .collect();
            error!(
                target: "stage",
                "Door slot flags {} correspond to these enabled doors: {}",
                data.doors.bits(),
                slots.join(", ")
            );
            continue;
        };

        let picked = if data.room_type == RoomType::Boss {
            let Some(boss_pool) = &stage.boss_pool else {
                continue;
            };
            pick_boss_room(rooms, boss_pool, rng)
        } else {
            pick_weighted_room(rooms, rng)
        };
        let Some(picked) = picked else {
            continue;
        };

        let new_data = match cache.get(&picked.variant) {
            Some(cached) => cached.clone(),
            None => match game.room_data_for_type_variant(data.room_type, picked.variant) {
                Some(fetched) => {
                    cache.insert(picked.variant, fetched.clone());
                    fetched
                }
                None => {
                    error!(
                        target: "stage",
                        "Failed to get the room data for room variant {} for custom stage: {}",
                        picked.variant, stage.name
                    );
                    continue;
                }
            },
        };
        assignments.push((grid_index, new_data));
    }

    for (grid_index, data) in assignments {
        game.level_mut().set_room_data(grid_index, data);
    }
}

fn pick_weighted_room<'a>(rooms: &'a [StageRoom], rng: &mut Isaac64Rng) -> Option<&'a StageRoom> {
    let weights: Vec<f32> = rooms.iter().map(|room| room.weight).collect();
    weighted_index(rng, &weights).map(|index| &rooms[index])
}

/// Boss rooms draw a boss from the pool first, then a room belonging to
/// that boss.
fn pick_boss_room<'a>(
    rooms: &'a [StageRoom],
    boss_pool: &[BossPoolEntry],
    rng: &mut Isaac64Rng,
) -> Option<&'a StageRoom> {
    let pool_weights: Vec<f32> = boss_pool.iter().map(|entry| entry.weight).collect();
    let entry = &boss_pool[weighted_index(rng, &pool_weights)?];

    let matching: Vec<&StageRoom> = rooms
        .iter()
        .filter(|room| room.sub_type == entry.sub_type)
        .collect();
    if matching.is_empty() {
        error!(
            target: "stage",
            "The boss \"{}\" (sub-type {}) has no boss rooms in the stage metadata",
            entry.name, entry.sub_type
        );
        return None;
    }

    let weights: Vec<f32> = matching.iter().map(|room| room.weight).collect();
    weighted_index(rng, &weights).map(|index| matching[index])
}
