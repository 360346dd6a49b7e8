//! Grid-entity detection: diffs the room's grid entities against an
//! index-keyed cache on every update to derive init, update,
//! state-changed, and remove callbacks.

use std::collections::HashMap;

use super::registry::{SubscriptionFilter, SubscriptionRegistry};
use crate::game::{Game, GridEntitySnapshot, Room};
use crate::types::GridEntityType;

/// Optional (type, variant) filter for grid-entity callbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridEntityFilter {
    pub kind: Option<GridEntityType>,
    pub variant: Option<u32>,
}

impl GridEntityFilter {
    fn matches_snapshot(&self, entity: &GridEntitySnapshot) -> bool {
        if let Some(kind) = self.kind {
            if kind != entity.kind {
                return false;
            }
        }
        if let Some(variant) = self.variant {
            if variant != entity.variant {
                return false;
            }
        }
        true
    }
}

impl SubscriptionFilter<GridEntitySnapshot> for GridEntityFilter {
    fn matches(&self, payload: &GridEntitySnapshot) -> bool {
        self.matches_snapshot(payload)
    }
}

/// Payload for the state-changed callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntityStateChange {
    pub entity: GridEntitySnapshot,
    pub old_state: u32,
}

impl SubscriptionFilter<GridEntityStateChange> for GridEntityFilter {
    fn matches(&self, payload: &GridEntityStateChange) -> bool {
        self.matches_snapshot(&payload.entity)
    }
}

pub(crate) struct GridEntityCallbacks {
    init: SubscriptionRegistry<GridEntitySnapshot, GridEntityFilter>,
    update: SubscriptionRegistry<GridEntitySnapshot, GridEntityFilter>,
    state_changed: SubscriptionRegistry<GridEntityStateChange, GridEntityFilter>,
    removed: SubscriptionRegistry<GridEntitySnapshot, GridEntityFilter>,
    tracked: HashMap<i32, GridEntitySnapshot>,
}

impl GridEntityCallbacks {
    pub(crate) fn new() -> Self {
        Self {
            init: SubscriptionRegistry::new(),
            update: SubscriptionRegistry::new(),
            state_changed: SubscriptionRegistry::new(),
            removed: SubscriptionRegistry::new(),
            tracked: HashMap::new(),
        }
    }

    pub(crate) fn register_init(
        &mut self,
        filter: Option<GridEntityFilter>,
        callback: impl FnMut(&mut dyn Game, &GridEntitySnapshot) + 'static,
    ) {
        self.init.register(filter, callback);
    }

    pub(crate) fn register_update(
        &mut self,
        filter: Option<GridEntityFilter>,
        callback: impl FnMut(&mut dyn Game, &GridEntitySnapshot) + 'static,
    ) {
        self.update.register(filter, callback);
    }

    pub(crate) fn register_state_changed(
        &mut self,
        filter: Option<GridEntityFilter>,
        callback: impl FnMut(&mut dyn Game, &GridEntityStateChange) + 'static,
    ) {
        self.state_changed.register(filter, callback);
    }

    pub(crate) fn register_removed(
        &mut self,
        filter: Option<GridEntityFilter>,
        callback: impl FnMut(&mut dyn Game, &GridEntitySnapshot) + 'static,
    ) {
        self.removed.register(filter, callback);
    }

    fn has_subscriptions(&self) -> bool {
        self.init.has_subscriptions()
            || self.update.has_subscriptions()
            || self.state_changed.has_subscriptions()
            || self.removed.has_subscriptions()
    }

    pub(crate) fn on_update(&mut self, game: &mut dyn Game) {
        if !self.has_subscriptions() {
            return;
        }

        let entities = game.room().grid_entities();

        for entity in &entities {
            match self.tracked.get(&entity.grid_index).copied() {
                None => {
                    self.tracked.insert(entity.grid_index, *entity);
                    self.init.fire(game, entity);
                }
                Some(previous) => {
                    if previous.state != entity.state {
                        self.tracked.insert(entity.grid_index, *entity);
                        let change = GridEntityStateChange {
                            entity: *entity,
                            old_state: previous.state,
                        };
                        self.state_changed.fire(game, &change);
                    }
                }
            }

            self.update.fire(game, entity);
        }

        let removed: Vec<GridEntitySnapshot> = self
            .tracked
            .values()
            .filter(|tracked| !entities.iter().any(|e| e.grid_index == tracked.grid_index))
            .copied()
            .collect();
        for entity in removed {
            self.tracked.remove(&entity.grid_index);
            self.removed.fire(game, &entity);
        }
    }

    pub(crate) fn on_new_room(&mut self) {
        self.tracked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_fixtures::{TestGame, TestRoom};
    use crate::types::{RoomShape, RoomType};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rock(grid_index: i32, state: u32) -> GridEntitySnapshot {
        GridEntitySnapshot {
            grid_index,
            kind: GridEntityType::Rock,
            variant: 0,
            state,
        }
    }

    #[test]
    fn test_init_fires_once_per_entity() {
        let mut callbacks = GridEntityCallbacks::new();
        let inits = Rc::new(RefCell::new(Vec::new()));
        let i = Rc::clone(&inits);
        callbacks.register_init(None, move |_game, entity| {
            i.borrow_mut().push(entity.grid_index);
        });

        let mut game = TestGame::with_room(TestRoom::new(RoomType::Default, RoomShape::Shape1x1));
        game.room.grid_entities = vec![rock(12, 0), rock(13, 0)];

        callbacks.on_update(&mut game);
        callbacks.on_update(&mut game);

        assert_eq!(*inits.borrow(), vec![12, 13]);
    }

    #[test]
    fn test_state_change_reports_old_state() {
        let mut callbacks = GridEntityCallbacks::new();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let c = Rc::clone(&changes);
        callbacks.register_state_changed(None, move |_game, change| {
            c.borrow_mut().push((change.old_state, change.entity.state));
        });

        let mut game = TestGame::with_room(TestRoom::new(RoomType::Default, RoomShape::Shape1x1));
        game.room.grid_entities = vec![rock(12, 0)];
        callbacks.on_update(&mut game);

        game.room.grid_entities = vec![rock(12, 2)];
        callbacks.on_update(&mut game);
        callbacks.on_update(&mut game);

        assert_eq!(*changes.borrow(), vec![(0, 2)]);
    }

    #[test]
    fn test_removed_fires_when_entity_vanishes() {
        let mut callbacks = GridEntityCallbacks::new();
        let removed = Rc::new(RefCell::new(Vec::new()));
        let r = Rc::clone(&removed);
        callbacks.register_removed(None, move |_game, entity| {
            r.borrow_mut().push(entity.grid_index);
        });

        let mut game = TestGame::with_room(TestRoom::new(RoomType::Default, RoomShape::Shape1x1));
        game.room.grid_entities = vec![rock(12, 0)];
        callbacks.on_update(&mut game);

        game.room.grid_entities = vec![];
        callbacks.on_update(&mut game);

        assert_eq!(*removed.borrow(), vec![12]);
    }

    #[test]
    fn test_type_and_variant_filters() {
        let mut callbacks = GridEntityCallbacks::new();
        let hits = Rc::new(RefCell::new(0u32));
        let h = Rc::clone(&hits);
        callbacks.register_init(
            Some(GridEntityFilter {
                kind: Some(GridEntityType::Pit),
                variant: None,
            }),
            move |_game, _entity| {
                *h.borrow_mut() += 1;
            },
        );

        let mut game = TestGame::with_room(TestRoom::new(RoomType::Default, RoomShape::Shape1x1));
        game.room.grid_entities = vec![rock(12, 0)];
        callbacks.on_update(&mut game);
        assert_eq!(*hits.borrow(), 0);

        game.room.grid_entities = vec![
            rock(12, 0),
            GridEntitySnapshot {
                grid_index: 20,
                kind: GridEntityType::Pit,
                variant: 0,
                state: 0,
            },
        ];
        callbacks.on_update(&mut game);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_new_room_clears_tracking() {
        let mut callbacks = GridEntityCallbacks::new();
        let inits = Rc::new(RefCell::new(0u32));
        let i = Rc::clone(&inits);
        callbacks.register_init(None, move |_game, _entity| {
            *i.borrow_mut() += 1;
        });

        let mut game = TestGame::with_room(TestRoom::new(RoomType::Default, RoomShape::Shape1x1));
        game.room.grid_entities = vec![rock(12, 0)];
        callbacks.on_update(&mut game);
        callbacks.on_new_room();
        callbacks.on_update(&mut game);

        assert_eq!(*inits.borrow(), 2);
    }
}
