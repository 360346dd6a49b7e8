//! Door helpers. These return [`DoorSlot`] handles rather than door
//! references so callers never end up holding two borrows of the room.

use std::collections::HashSet;

use crate::game::{Door, Game, Level, Room, SECRET_EXIT_IDX};
use crate::types::{DoorSlot, DoorState, DoorVariant, RoomType};

/// All slots holding a door, optionally filtered by the target room
/// type. An empty filter returns every door.
pub fn get_door_slots(room: &dyn Room, room_types: &[RoomType]) -> Vec<DoorSlot> {
    let filter: HashSet<RoomType> = room_types.iter().copied().collect();

    room.door_slots()
        .into_iter()
        .filter(|slot| match room.door(*slot) {
            Some(door) => filter.is_empty() || filter.contains(&door.target_room_type()),
            None => false,
        })
        .collect()
}

/// Doors leading to any of the provided room grid indexes.
pub fn get_door_slots_to_room_index(room: &dyn Room, room_indexes: &[i32]) -> Vec<DoorSlot> {
    let filter: HashSet<i32> = room_indexes.iter().copied().collect();

    room.door_slots()
        .into_iter()
        .filter(|slot| {
            room.door(*slot)
                .is_some_and(|door| filter.contains(&door.target_room_index()))
        })
        .collect()
}

pub fn get_angel_room_door(room: &dyn Room) -> Option<DoorSlot> {
    get_door_slots(room, &[RoomType::Angel]).first().copied()
}

pub fn get_devil_room_door(room: &dyn Room) -> Option<DoorSlot> {
    get_door_slots(room, &[RoomType::Devil]).first().copied()
}

/// If the room has both a devil-room and an angel-room door, the one
/// with the lowest slot number wins.
pub fn get_devil_or_angel_room_door(room: &dyn Room) -> Option<DoorSlot> {
    get_door_slots(room, &[RoomType::Devil, RoomType::Angel])
        .first()
        .copied()
}

/// The door leading to the secret-exit room behind a boss room, if any.
pub fn get_secret_exit_door(room: &dyn Room) -> Option<DoorSlot> {
    room.door_slots().into_iter().find(|slot| {
        room.door(*slot)
            .is_some_and(|door| door.target_room_index() == SECRET_EXIT_IDX)
    })
}

pub fn is_secret_room_door(door: &dyn Door) -> bool {
    matches!(
        door.target_room_type(),
        RoomType::Secret | RoomType::SuperSecret
    )
}

/// A secret-room door that has not been blown open yet.
pub fn is_hidden_secret_room_door(door: &dyn Door) -> bool {
    is_secret_room_door(door) && door.state() == DoorState::Hidden
}

pub fn open_all_doors(room: &mut dyn Room) {
    // Hidden secret-room doors ignore this, which matches how the game
    // itself treats them.
    for slot in room.door_slots() {
        if let Some(door) = room.door_mut(slot) {
            door.open();
        }
    }
}

pub fn close_all_doors(room: &mut dyn Room) {
    for slot in room.door_slots() {
        if let Some(door) = room.door_mut(slot) {
            door.close(true);
        }
    }
}

/// Open a door immediately, without the opening animation.
pub fn open_door_fast(door: &mut dyn Door) {
    door.set_state(DoorState::Open);
    door.play_animation("Opened");
}

/// Close a door immediately, without the closing animation.
pub fn close_door_fast(door: &mut dyn Door) {
    door.set_state(DoorState::Closed);
    door.play_animation("Closed");
}

/// Reset an unlocked door back to a locked state. In addition to
/// setting the locked flag, the target room's visited count must go
/// back to zero and the door must take the locked variant, or the game
/// will unlock it again on the next room transition.
///
/// Returns false when the slot holds no door.
pub fn lock_door(game: &mut dyn Game, slot: DoorSlot) -> bool {
    let Some(target_room_index) = game
        .room()
        .door(slot)
        .map(|door| door.target_room_index())
    else {
        return false;
    };

    game.level_mut().set_visited_count(target_room_index, 0);

    let Some(door) = game.room_mut().door_mut(slot) else {
        return false;
    };
    door.set_variant(DoorVariant::Locked);
    door.set_locked(true);
    door.close(true);
    true
}

pub fn remove_door(room: &mut dyn Room, slot: DoorSlot) {
    room.remove_door(slot);
}

pub fn remove_doors(room: &mut dyn Room, slots: &[DoorSlot]) {
    for slot in slots {
        room.remove_door(*slot);
    }
}

/// Remove doors matching the given room types (all doors when the
/// filter is empty). Returns the number of doors removed.
pub fn remove_all_doors(room: &mut dyn Room, room_types: &[RoomType]) -> usize {
    let slots = get_door_slots(room, room_types);
    remove_doors(room, &slots);
    slots.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_fixtures::{TestDoor, TestGame, TestRoom};
    use crate::types::RoomShape;

    fn room_with_doors() -> TestRoom {
        let mut room = TestRoom::new(RoomType::Boss, RoomShape::Shape1x1);
        room.add_door(TestDoor::new(DoorSlot::Up0, RoomType::Angel));
        room.add_door(TestDoor::new(DoorSlot::Left0, RoomType::Devil));
        room.add_door(TestDoor::new(DoorSlot::Right0, RoomType::Default));
        room
    }

    #[test]
    fn test_get_door_slots_unfiltered_and_filtered() {
        let room = room_with_doors();
        assert_eq!(
            get_door_slots(&room, &[]),
            vec![DoorSlot::Left0, DoorSlot::Up0, DoorSlot::Right0]
        );
        assert_eq!(
            get_door_slots(&room, &[RoomType::Devil]),
            vec![DoorSlot::Left0]
        );
    }

    #[test]
    fn test_devil_or_angel_prefers_lowest_slot() {
        let room = room_with_doors();
        // Devil door is in Left0, which is a lower slot than the angel
        // door in Up0.
        assert_eq!(get_devil_or_angel_room_door(&room), Some(DoorSlot::Left0));
        assert_eq!(get_angel_room_door(&room), Some(DoorSlot::Up0));
    }

    #[test]
    fn test_secret_exit_door_found_by_sentinel_index() {
        let mut room = TestRoom::new(RoomType::Boss, RoomShape::Shape1x1);
        room.add_door(
            TestDoor::new(DoorSlot::Up0, RoomType::Default).with_target_room_index(SECRET_EXIT_IDX),
        );
        room.add_door(TestDoor::new(DoorSlot::Left0, RoomType::Default));

        assert_eq!(get_secret_exit_door(&room), Some(DoorSlot::Up0));
    }

    #[test]
    fn test_open_and_close_all() {
        let mut room = room_with_doors();
        open_all_doors(&mut room);
        assert!(room.doors.iter().all(|d| d.state == DoorState::Open));

        close_all_doors(&mut room);
        assert!(room.doors.iter().all(|d| d.state == DoorState::Closed));
    }

    #[test]
    fn test_fast_open_plays_animation() {
        let mut door = TestDoor::new(DoorSlot::Up0, RoomType::Default);
        open_door_fast(&mut door);
        assert_eq!(door.state, DoorState::Open);
        assert_eq!(door.last_animation.as_deref(), Some("Opened"));
    }

    #[test]
    fn test_lock_door_resets_visited_count() {
        let mut game = TestGame::with_room(TestRoom::new(RoomType::Default, RoomShape::Shape1x1));
        game.room.add_door(
            TestDoor::new(DoorSlot::Down0, RoomType::Treasure).with_target_room_index(31),
        );
        game.level.set_visited_count(31, 4);

        assert!(lock_door(&mut game, DoorSlot::Down0));

        let door = game.room.door_ref(DoorSlot::Down0).unwrap();
        assert!(door.locked);
        assert_eq!(door.variant, DoorVariant::Locked);
        assert_eq!(door.state, DoorState::Closed);
        assert_eq!(game.level.rooms[&31].visited_count, 0);

        assert!(!lock_door(&mut game, DoorSlot::Up1));
    }

    #[test]
    fn test_remove_all_doors_counts() {
        let mut room = room_with_doors();
        assert_eq!(remove_all_doors(&mut room, &[RoomType::Default]), 1);
        assert_eq!(room.doors.len(), 2);

        assert_eq!(remove_all_doors(&mut room, &[]), 2);
        assert!(room.doors.is_empty());
    }

    #[test]
    fn test_hidden_secret_room_door() {
        let mut door = TestDoor::new(DoorSlot::Up0, RoomType::Secret);
        door.state = DoorState::Hidden;
        assert!(is_hidden_secret_room_door(&door));

        door.state = DoorState::Open;
        assert!(!is_hidden_secret_room_door(&door));
    }
}
