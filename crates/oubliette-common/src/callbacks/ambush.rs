//! Ambush (timed-fight) callbacks, derived from the native update
//! callback by polling the room's ambush predicates.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::registry::{SubscriptionFilter, SubscriptionRegistry};
use crate::game::{Game, Room};
use crate::save::{Lifetime, SaveData, SaveDataManager, SaveError};
use crate::types::{AmbushType, RoomType};

impl SubscriptionFilter<AmbushType> for AmbushType {
    fn matches(&self, payload: &AmbushType) -> bool {
        self == payload
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AmbushRoomState {
    ambush_active: bool,
    ambush_done: bool,
}

pub(crate) struct AmbushCallbacks {
    started: SubscriptionRegistry<AmbushType, AmbushType>,
    finished: SubscriptionRegistry<AmbushType, AmbushType>,
    state: SaveData<AmbushRoomState>,
    active: Rc<Cell<bool>>,
}

impl AmbushCallbacks {
    pub(crate) fn new(save: &mut SaveDataManager) -> Result<Self, SaveError> {
        let active = Rc::new(Cell::new(false));
        let condition = Rc::clone(&active);
        let state = save.register_with_condition(
            "ambush-callbacks",
            Lifetime::Room,
            move || condition.get(),
        )?;

        Ok(Self {
            started: SubscriptionRegistry::new(),
            finished: SubscriptionRegistry::new(),
            state,
            active,
        })
    }

    pub(crate) fn register_started(
        &mut self,
        ambush_type: Option<AmbushType>,
        callback: impl FnMut(&mut dyn Game, &AmbushType) + 'static,
    ) {
        self.started.register(ambush_type, callback);
        self.active.set(true);
    }

    pub(crate) fn register_finished(
        &mut self,
        ambush_type: Option<AmbushType>,
        callback: impl FnMut(&mut dyn Game, &AmbushType) + 'static,
    ) {
        self.finished.register(ambush_type, callback);
        self.active.set(true);
    }

    fn has_subscriptions(&self) -> bool {
        self.started.has_subscriptions() || self.finished.has_subscriptions()
    }

    pub(crate) fn on_update(&mut self, game: &mut dyn Game) {
        if !self.has_subscriptions() {
            return;
        }

        if !self.state.borrow().ambush_active && game.room().is_ambush_active() {
            self.state.borrow_mut().ambush_active = true;
            let ambush_type = ambush_type(game);
            self.started.fire(game, &ambush_type);
        }

        if !self.state.borrow().ambush_done && game.room().is_ambush_done() {
            self.state.borrow_mut().ambush_done = true;
            let ambush_type = ambush_type(game);
            self.finished.fire(game, &ambush_type);
        }
    }
}

fn ambush_type(game: &dyn Game) -> AmbushType {
    if game.room().room_type() == RoomType::BossRush {
        AmbushType::BossRush
    } else {
        AmbushType::ChallengeRoom
    }
}
