// Integration tests driving a whole Mod through a simulated run
// lifecycle with the in-memory test game.

use std::cell::RefCell;
use std::rc::Rc;

use oubliette_common::game::test_fixtures::{TestGame, TestRoom};
use oubliette_common::game::{GridEntitySnapshot, Level, RoomData};
use oubliette_common::stage::{CustomStageMetadata, RoomMetadata};
use oubliette_common::types::{
    door_slots_to_flags, DoorSlot, GridEntityType, RoomShape, RoomType,
};
use oubliette_common::{Lifetime, Mod, CUSTOM_FLOOR_STAGE};

fn doors() -> oubliette_common::types::DoorSlotFlags {
    door_slots_to_flags(&[DoorSlot::Left0, DoorSlot::Right0])
}

#[test]
fn test_continue_flow_observes_reordered_callbacks() {
    let mut m = Mod::new("integration");
    let order = Rc::new(RefCell::new(Vec::new()));

    let o = Rc::clone(&order);
    m.on_game_started_reordered(move |_game, info| {
        o.borrow_mut().push(format!("started continued={}", info.continued));
    });
    let o = Rc::clone(&order);
    m.on_new_level_reordered(move |_game, info| {
        o.borrow_mut().push(format!("level stage={}", info.stage));
    });
    let o = Rc::clone(&order);
    m.on_new_room_reordered(move |_game, info| {
        o.borrow_mut().push(format!("room type={}", info.room_type));
    });

    let mut game = TestGame::with_room(TestRoom::new(RoomType::Default, RoomShape::Shape1x1));
    game.level.stage = 3;

    // The game delivers level and room before started when continuing;
    // subscribers still see started -> level -> room.
    m.handle_new_level(&mut game);
    m.handle_new_room(&mut game);
    m.handle_game_started(&mut game, true, None).unwrap();

    assert_eq!(
        *order.borrow(),
        vec![
            "started continued=true".to_string(),
            "level stage=3".to_string(),
            "room type=Default".to_string(),
        ]
    );
}

#[test]
fn test_save_data_round_trip_across_sessions() {
    // First session: play, accumulate state, exit.
    let mut m = Mod::new("integration");
    let wins = m
        .save_data()
        .register::<u32>("wins", Lifetime::Persistent)
        .unwrap();
    let floor_kills = m
        .save_data()
        .register::<u32>("floor-kills", Lifetime::Level)
        .unwrap();

    let mut game = TestGame::new();
    m.handle_game_started(&mut game, false, None).unwrap();
    *wins.borrow_mut() = 2;
    *floor_kills.borrow_mut() = 14;
    let document = m.handle_game_exit().unwrap();

    // Second session: continue from the document.
    let mut m = Mod::new("integration");
    let wins = m
        .save_data()
        .register::<u32>("wins", Lifetime::Persistent)
        .unwrap();
    let floor_kills = m
        .save_data()
        .register::<u32>("floor-kills", Lifetime::Level)
        .unwrap();

    let mut game = TestGame::new();
    m.handle_game_started(&mut game, true, Some(&document)).unwrap();

    assert_eq!(*wins.borrow(), 2);
    // Level state is never persisted.
    assert_eq!(*floor_kills.borrow(), 0);
}

#[test]
fn test_grid_entity_callbacks_through_room_transition() {
    let mut m = Mod::new("integration");
    let events = Rc::new(RefCell::new(Vec::new()));

    let e = Rc::clone(&events);
    m.on_grid_entity_init(None, move |_game, entity| {
        e.borrow_mut().push(format!("init {}", entity.grid_index));
    });
    let e = Rc::clone(&events);
    m.on_grid_entity_removed(None, move |_game, entity| {
        e.borrow_mut().push(format!("removed {}", entity.grid_index));
    });

    let mut game = TestGame::with_room(TestRoom::new(RoomType::Default, RoomShape::Shape1x1));
    game.room.grid_entities = vec![GridEntitySnapshot {
        grid_index: 44,
        kind: GridEntityType::Rock,
        variant: 0,
        state: 0,
    }];
    m.handle_update(&mut game);

    game.room.grid_entities.clear();
    m.handle_update(&mut game);

    // A room transition forgets the old room's entities entirely; the
    // same grid index inits again without a remove in between.
    game.room.grid_entities = vec![GridEntitySnapshot {
        grid_index: 44,
        kind: GridEntityType::Rock,
        variant: 0,
        state: 0,
    }];
    m.handle_new_room(&mut game);
    m.handle_update(&mut game);

    assert_eq!(
        *events.borrow(),
        vec![
            "init 44".to_string(),
            "removed 44".to_string(),
            "init 44".to_string(),
        ]
    );
}

#[test]
fn test_custom_stage_warp_end_to_end() {
    let mut m = Mod::new("integration");
    m.stages()
        .register(CustomStageMetadata {
            name: "Sunken Archive".to_string(),
            xml_path: "content/stages/archive.xml".to_string(),
            room_variant_prefix: 101,
            base_stage: None,
            base_stage_type: None,
            boss_pool: None,
            rooms_metadata: vec![RoomMetadata {
                room_type: RoomType::Default as i32,
                variant: 1_010_000,
                sub_type: 0,
                shape: RoomShape::Shape1x1 as i32,
                door_slot_flags: doors().bits(),
                weight: 1.0,
            }],
        })
        .unwrap();

    let mut game = TestGame::new();
    game.start_seed = 123_456;
    game.level.starting_room_index = 0;
    let vanilla = RoomData {
        room_type: RoomType::Default,
        variant: 7,
        sub_type: 0,
        shape: RoomShape::Shape1x1,
        doors: doors(),
    };
    game.level.add_room(0, vanilla.clone());
    game.level.add_room(9, vanilla);
    game.add_content_room(RoomData {
        room_type: RoomType::Default,
        variant: 1_010_000,
        sub_type: 0,
        shape: RoomShape::Shape1x1,
        doors: doors(),
    });

    m.set_custom_stage(&mut game, "Sunken Archive", true).unwrap();

    assert_eq!(game.level.stage, CUSTOM_FLOOR_STAGE);
    assert_eq!(game.level.room_data(9).unwrap().variant, 1_010_000);
    assert_eq!(game.level.room_data(0).unwrap().variant, 7);

    assert!(matches!(
        m.set_custom_stage(&mut game, "No Such Stage", true),
        Err(oubliette_common::StageError::UnknownStage(_))
    ));
}
