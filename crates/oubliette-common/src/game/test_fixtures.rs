//! Deterministic in-memory implementation of the host API traits.
//!
//! Used by this crate's own tests and available to downstream crates that
//! need to drive callbacks without the real engine bindings.

use std::collections::{BTreeMap, HashMap};

use super::{Door, Game, GridEntitySnapshot, Level, Pickup, Room, RoomData, Vector};
use crate::types::{
    CharacterKind, DoorSlot, DoorState, DoorVariant, RoomShape, RoomType, StageType,
};

#[derive(Debug, Clone)]
pub struct TestDoor {
    pub slot: DoorSlot,
    pub target_room_type: RoomType,
    pub target_room_index: i32,
    pub state: DoorState,
    pub variant: DoorVariant,
    pub locked: bool,
    pub last_animation: Option<String>,
}

impl TestDoor {
    pub fn new(slot: DoorSlot, target_room_type: RoomType) -> Self {
        Self {
            slot,
            target_room_type,
            target_room_index: 0,
            state: DoorState::Closed,
            variant: DoorVariant::Unspecified,
            locked: false,
            last_animation: None,
        }
    }

    pub fn with_target_room_index(mut self, index: i32) -> Self {
        self.target_room_index = index;
        self
    }
}

impl Door for TestDoor {
    fn slot(&self) -> DoorSlot {
        self.slot
    }

    fn target_room_type(&self) -> RoomType {
        self.target_room_type
    }

    fn target_room_index(&self) -> i32 {
        self.target_room_index
    }

    fn state(&self) -> DoorState {
        self.state
    }

    fn set_state(&mut self, state: DoorState) {
        self.state = state;
    }

    fn variant(&self) -> DoorVariant {
        self.variant
    }

    fn set_variant(&mut self, variant: DoorVariant) {
        self.variant = variant;
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn open(&mut self) {
        self.state = DoorState::Open;
    }

    fn close(&mut self, _instant: bool) {
        self.state = DoorState::Closed;
    }

    fn play_animation(&mut self, name: &str) {
        self.last_animation = Some(name.to_string());
    }
}

#[derive(Debug, Default)]
pub struct TestRoom {
    pub room_type: Option<RoomType>,
    pub shape: Option<RoomShape>,
    pub doors: Vec<TestDoor>,
    pub ambush_active: bool,
    pub ambush_done: bool,
    pub grid_entities: Vec<GridEntitySnapshot>,
}

impl TestRoom {
    pub fn new(room_type: RoomType, shape: RoomShape) -> Self {
        Self {
            room_type: Some(room_type),
            shape: Some(shape),
            ..Default::default()
        }
    }

    pub fn add_door(&mut self, door: TestDoor) {
        self.doors.push(door);
        self.doors.sort_by_key(|d| d.slot as u8);
    }

    pub fn door_ref(&self, slot: DoorSlot) -> Option<&TestDoor> {
        self.doors.iter().find(|d| d.slot == slot)
    }
}

impl Room for TestRoom {
    fn room_type(&self) -> RoomType {
        self.room_type.unwrap_or(RoomType::Default)
    }

    fn shape(&self) -> RoomShape {
        self.shape.unwrap_or(RoomShape::Shape1x1)
    }

    fn door_slots(&self) -> Vec<DoorSlot> {
        self.doors.iter().map(|d| d.slot).collect()
    }

    fn door(&self, slot: DoorSlot) -> Option<&dyn Door> {
        self.doors
            .iter()
            .find(|d| d.slot == slot)
            .map(|d| d as &dyn Door)
    }

    fn door_mut(&mut self, slot: DoorSlot) -> Option<&mut dyn Door> {
        self.doors
            .iter_mut()
            .find(|d| d.slot == slot)
            .map(|d| d as &mut dyn Door)
    }

    fn remove_door(&mut self, slot: DoorSlot) {
        self.doors.retain(|d| d.slot != slot);
    }

    fn is_ambush_active(&self) -> bool {
        self.ambush_active
    }

    fn is_ambush_done(&self) -> bool {
        self.ambush_done
    }

    fn grid_entities(&self) -> Vec<GridEntitySnapshot> {
        self.grid_entities.clone()
    }
}

#[derive(Debug, Default, Clone)]
pub struct TestRoomDescriptor {
    pub data: Option<RoomData>,
    pub visited_count: u32,
}

#[derive(Debug)]
pub struct TestLevel {
    pub stage: i32,
    pub stage_type: StageType,
    pub starting_room_index: i32,
    pub rooms: BTreeMap<i32, TestRoomDescriptor>,
}

impl Default for TestLevel {
    fn default() -> Self {
        Self {
            stage: 1,
            stage_type: StageType::Original,
            starting_room_index: 0,
            rooms: BTreeMap::new(),
        }
    }
}

impl TestLevel {
    pub fn add_room(&mut self, grid_index: i32, data: RoomData) {
        self.rooms.insert(
            grid_index,
            TestRoomDescriptor {
                data: Some(data),
                visited_count: 0,
            },
        );
    }
}

impl Level for TestLevel {
    fn stage(&self) -> i32 {
        self.stage
    }

    fn stage_type(&self) -> StageType {
        self.stage_type
    }

    fn set_stage(&mut self, stage: i32, stage_type: StageType) {
        self.stage = stage;
        self.stage_type = stage_type;
    }

    fn starting_room_index(&self) -> i32 {
        self.starting_room_index
    }

    fn grid_room_indexes(&self) -> Vec<i32> {
        self.rooms.keys().copied().collect()
    }

    fn room_data(&self, grid_index: i32) -> Option<RoomData> {
        self.rooms.get(&grid_index).and_then(|r| r.data.clone())
    }

    fn set_room_data(&mut self, grid_index: i32, data: RoomData) {
        let room = self.rooms.entry(grid_index).or_default();
        room.data = Some(data);
    }

    fn set_visited_count(&mut self, grid_index: i32, count: u32) {
        let room = self.rooms.entry(grid_index).or_default();
        room.visited_count = count;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestPickup {
    pub variant: u32,
    pub sub_type: u32,
    pub position: Vector,
    pub seed: u64,
    pub options_index: i32,
    pub shop_item_id: i32,
    pub price: i32,
}

impl Pickup for TestPickup {
    fn set_options_index(&mut self, index: i32) {
        self.options_index = index;
    }

    fn set_shop_item_id(&mut self, id: i32) {
        self.shop_item_id = id;
    }

    fn set_price(&mut self, price: i32) {
        self.price = price;
    }

    fn morph(&mut self, variant: u32, sub_type: u32) {
        self.variant = variant;
        self.sub_type = sub_type;
    }
}

#[derive(Debug, Default)]
pub struct TestGame {
    pub start_seed: u64,
    pub frame_count: u64,
    pub level: TestLevel,
    pub room: TestRoom,
    /// Rooms "loaded in the game's content", keyed by (type, variant).
    pub content_rooms: HashMap<(RoomType, u32), RoomData>,
    pub players: Vec<CharacterKind>,
    pub spawned_pickups: Vec<TestPickup>,
    pub reseed_count: u32,
}

impl TestGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_room(room: TestRoom) -> Self {
        Self {
            room,
            ..Default::default()
        }
    }

    pub fn add_content_room(&mut self, data: RoomData) {
        self.content_rooms
            .insert((data.room_type, data.variant), data);
    }
}

impl Game for TestGame {
    fn start_seed(&self) -> u64 {
        self.start_seed
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn level(&self) -> &dyn Level {
        &self.level
    }

    fn level_mut(&mut self) -> &mut dyn Level {
        &mut self.level
    }

    fn room(&self) -> &dyn Room {
        &self.room
    }

    fn room_mut(&mut self) -> &mut dyn Room {
        &mut self.room
    }

    fn room_data_for_type_variant(&self, room_type: RoomType, variant: u32) -> Option<RoomData> {
        self.content_rooms.get(&(room_type, variant)).cloned()
    }

    fn reseed(&mut self) {
        self.reseed_count += 1;
    }

    fn any_player_is(&self, character: CharacterKind) -> bool {
        self.players.contains(&character)
    }

    fn spawn_pickup(
        &mut self,
        variant: u32,
        sub_type: u32,
        position: Vector,
        seed: u64,
    ) -> &mut dyn Pickup {
        self.spawned_pickups.push(TestPickup {
            variant,
            sub_type,
            position,
            seed,
            options_index: 0,
            shop_item_id: 0,
            price: 0,
        });
        self.spawned_pickups
            .last_mut()
            .expect("pickup was just pushed")
    }
}
