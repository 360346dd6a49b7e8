use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::enums::{Direction, DoorSlot};

bitflags! {
    /// Bitmask of enabled door slots, as stored in room XML files and in
    /// the `doors` field of runtime room data.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct DoorSlotFlags: u32 {
        const LEFT_0 = 1 << 0;
        const UP_0 = 1 << 1;
        const RIGHT_0 = 1 << 2;
        const DOWN_0 = 1 << 3;
        const LEFT_1 = 1 << 4;
        const UP_1 = 1 << 5;
        const RIGHT_1 = 1 << 6;
        const DOWN_1 = 1 << 7;
    }
}

impl Default for DoorSlotFlags {
    fn default() -> Self {
        DoorSlotFlags::empty()
    }
}

// Door slot flags cross the save-data and metadata boundaries as the
// raw bitmask the game itself uses.
impl Serialize for DoorSlotFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for DoorSlotFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(DoorSlotFlags::from_bits_truncate(bits))
    }
}

pub fn door_slot_to_flag(slot: DoorSlot) -> DoorSlotFlags {
    DoorSlotFlags::from_bits_truncate(1 << (slot as u8))
}

pub fn door_slot_flags_to_slots(flags: DoorSlotFlags) -> Vec<DoorSlot> {
    DoorSlot::ALL
        .into_iter()
        .filter(|slot| flags.contains(door_slot_to_flag(*slot)))
        .collect()
}

pub fn door_slots_to_flags(slots: &[DoorSlot]) -> DoorSlotFlags {
    slots
        .iter()
        .fold(DoorSlotFlags::empty(), |acc, slot| acc | door_slot_to_flag(*slot))
}

pub fn door_slot_to_direction(slot: DoorSlot) -> Direction {
    match slot {
        DoorSlot::Left0 | DoorSlot::Left1 => Direction::Left,
        DoorSlot::Up0 | DoorSlot::Up1 => Direction::Up,
        DoorSlot::Right0 | DoorSlot::Right1 => Direction::Right,
        DoorSlot::Down0 | DoorSlot::Down1 => Direction::Down,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_flag_round_trip() {
        let slots = [DoorSlot::Left0, DoorSlot::Right0, DoorSlot::Down1];
        let flags = door_slots_to_flags(&slots);
        assert_eq!(door_slot_flags_to_slots(flags), slots.to_vec());
    }

    #[test]
    fn test_flags_preserve_slot_order() {
        // Conversion back to slots is always in slot order, regardless of
        // how the mask was built.
        let flags = door_slot_to_flag(DoorSlot::Down0) | door_slot_to_flag(DoorSlot::Up0);
        assert_eq!(
            door_slot_flags_to_slots(flags),
            vec![DoorSlot::Up0, DoorSlot::Down0]
        );
    }

    #[test]
    fn test_serde_round_trips_as_bits() {
        let flags = door_slots_to_flags(&[DoorSlot::Left0, DoorSlot::Up1]);
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, "33");
        let parsed: DoorSlotFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, flags);
    }

    #[test]
    fn test_slot_to_direction() {
        assert_eq!(door_slot_to_direction(DoorSlot::Left1), Direction::Left);
        assert_eq!(door_slot_to_direction(DoorSlot::Up0), Direction::Up);
    }
}
