//! "Init late" NPC callback: fires on an NPC's first update frame, once
//! its full post-init state is available to read.

use std::collections::HashSet;

use super::registry::{SubscriptionFilter, SubscriptionRegistry};
use crate::game::{Game, NpcSnapshot};
use crate::types::EntityType;

impl SubscriptionFilter<NpcSnapshot> for EntityType {
    fn matches(&self, payload: &NpcSnapshot) -> bool {
        *self == payload.entity_type
    }
}

pub(crate) struct NpcCallbacks {
    init_late: SubscriptionRegistry<NpcSnapshot, EntityType>,
    seen: HashSet<u64>,
}

impl NpcCallbacks {
    pub(crate) fn new() -> Self {
        Self {
            init_late: SubscriptionRegistry::new(),
            seen: HashSet::new(),
        }
    }

    pub(crate) fn register_init_late(
        &mut self,
        entity_type: Option<EntityType>,
        callback: impl FnMut(&mut dyn Game, &NpcSnapshot) + 'static,
    ) {
        self.init_late.register(entity_type, callback);
    }

    pub(crate) fn on_npc_update(&mut self, game: &mut dyn Game, npc: &NpcSnapshot) {
        if !self.init_late.has_subscriptions() {
            return;
        }

        if self.seen.insert(npc.ptr_hash) {
            self.init_late.fire(game, npc);
        }
    }

    pub(crate) fn on_new_room(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_fixtures::TestGame;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn npc(ptr_hash: u64, entity_type: u32) -> NpcSnapshot {
        NpcSnapshot {
            ptr_hash,
            entity_type: EntityType(entity_type),
            variant: 0,
        }
    }

    #[test]
    fn test_fires_on_first_update_only() {
        let mut callbacks = NpcCallbacks::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let f = Rc::clone(&fired);
        callbacks.register_init_late(None, move |_game, npc| {
            f.borrow_mut().push(npc.ptr_hash);
        });

        let mut game = TestGame::new();
        callbacks.on_npc_update(&mut game, &npc(100, 20));
        callbacks.on_npc_update(&mut game, &npc(100, 20));
        callbacks.on_npc_update(&mut game, &npc(101, 20));

        assert_eq!(*fired.borrow(), vec![100, 101]);
    }

    #[test]
    fn test_entity_type_filter() {
        let mut callbacks = NpcCallbacks::new();
        let fired = Rc::new(RefCell::new(0u32));
        let f = Rc::clone(&fired);
        callbacks.register_init_late(Some(EntityType(30)), move |_game, _npc| {
            *f.borrow_mut() += 1;
        });

        let mut game = TestGame::new();
        callbacks.on_npc_update(&mut game, &npc(1, 20));
        callbacks.on_npc_update(&mut game, &npc(2, 30));

        assert_eq!(*fired.borrow(), 1);
    }
}
