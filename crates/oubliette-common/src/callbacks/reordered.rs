//! Reordered lifecycle callbacks.
//!
//! When continuing a run, the game fires its native new-level and
//! new-room callbacks before game-started. Subscribers here always
//! observe started -> level -> room order: early level/room events are
//! queued and flushed right after game-started fires.

use super::registry::SubscriptionRegistry;
use crate::game::{Game, Level, Room};
use crate::types::StageType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameStartedInfo {
    pub continued: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewLevelInfo {
    pub stage: i32,
    pub stage_type: StageType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewRoomInfo {
    pub room_type: crate::types::RoomType,
}

pub(crate) struct ReorderedCallbacks {
    game_started: SubscriptionRegistry<GameStartedInfo>,
    new_level: SubscriptionRegistry<NewLevelInfo>,
    new_room: SubscriptionRegistry<NewRoomInfo>,
    started_fired: bool,
    queued_level: bool,
    queued_room: bool,
    /// Set when a custom stage overrides the level's raw stage value, so
    /// that the dispatched payload reflects the custom floor instead of
    /// the invalid sentinel.
    stage_override: Option<(i32, StageType)>,
}

impl ReorderedCallbacks {
    pub(crate) fn new() -> Self {
        Self {
            game_started: SubscriptionRegistry::new(),
            new_level: SubscriptionRegistry::new(),
            new_room: SubscriptionRegistry::new(),
            started_fired: false,
            queued_level: false,
            queued_room: false,
            stage_override: None,
        }
    }

    pub(crate) fn register_game_started(
        &mut self,
        callback: impl FnMut(&mut dyn Game, &GameStartedInfo) + 'static,
    ) {
        self.game_started.register(None, callback);
    }

    pub(crate) fn register_new_level(
        &mut self,
        callback: impl FnMut(&mut dyn Game, &NewLevelInfo) + 'static,
    ) {
        self.new_level.register(None, callback);
    }

    pub(crate) fn register_new_room(
        &mut self,
        callback: impl FnMut(&mut dyn Game, &NewRoomInfo) + 'static,
    ) {
        self.new_room.register(None, callback);
    }

    pub(crate) fn on_game_started(&mut self, game: &mut dyn Game, continued: bool) {
        self.started_fired = true;
        self.game_started.fire(game, &GameStartedInfo { continued });

        if self.queued_level {
            self.queued_level = false;
            self.fire_new_level(game);
        }
        if self.queued_room {
            self.queued_room = false;
            self.fire_new_room(game);
        }
    }

    pub(crate) fn on_new_level(&mut self, game: &mut dyn Game) {
        if !self.started_fired {
            self.queued_level = true;
            return;
        }
        self.fire_new_level(game);
    }

    pub(crate) fn on_new_room(&mut self, game: &mut dyn Game) {
        if !self.started_fired {
            self.queued_room = true;
            return;
        }
        self.fire_new_room(game);
    }

    /// Record the stage a custom floor just warped to.
    pub(crate) fn note_stage_set(&mut self, stage: i32, stage_type: StageType) {
        self.stage_override = Some((stage, stage_type));
    }

    /// Back to the menu; the next run starts with a fresh queue.
    pub(crate) fn on_game_exit(&mut self) {
        self.started_fired = false;
        self.queued_level = false;
        self.queued_room = false;
        self.stage_override = None;
    }

    fn fire_new_level(&mut self, game: &mut dyn Game) {
        let (stage, stage_type) = self.stage_override.unwrap_or_else(|| {
            let level = game.level();
            (level.stage(), level.stage_type())
        });
        self.new_level.fire(game, &NewLevelInfo { stage, stage_type });
    }

    fn fire_new_room(&mut self, game: &mut dyn Game) {
        let info = NewRoomInfo {
            room_type: game.room().room_type(),
        };
        self.new_room.fire(game, &info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_fixtures::TestGame;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_continue_order_is_started_level_room() {
        let mut callbacks = ReorderedCallbacks::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = Rc::clone(&order);
        callbacks.register_game_started(move |_game, info| {
            o.borrow_mut().push(format!("started:{}", info.continued));
        });
        let o = Rc::clone(&order);
        callbacks.register_new_level(move |_game, _info| {
            o.borrow_mut().push("level".to_string());
        });
        let o = Rc::clone(&order);
        callbacks.register_new_room(move |_game, _info| {
            o.borrow_mut().push("room".to_string());
        });

        let mut game = TestGame::new();

        // The game fires level and room before started when continuing.
        callbacks.on_new_level(&mut game);
        callbacks.on_new_room(&mut game);
        callbacks.on_game_started(&mut game, true);

        assert_eq!(*order.borrow(), vec!["started:true", "level", "room"]);
    }

    #[test]
    fn test_events_fire_immediately_after_started() {
        let mut callbacks = ReorderedCallbacks::new();
        let rooms = Rc::new(RefCell::new(0u32));
        let r = Rc::clone(&rooms);
        callbacks.register_new_room(move |_game, _info| {
            *r.borrow_mut() += 1;
        });

        let mut game = TestGame::new();
        callbacks.on_game_started(&mut game, false);
        callbacks.on_new_room(&mut game);
        callbacks.on_new_room(&mut game);

        assert_eq!(*rooms.borrow(), 2);
    }

    #[test]
    fn test_game_exit_rearms_queueing() {
        let mut callbacks = ReorderedCallbacks::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = Rc::clone(&order);
        callbacks.register_game_started(move |_game, _info| {
            o.borrow_mut().push("started");
        });
        let o = Rc::clone(&order);
        callbacks.register_new_room(move |_game, _info| {
            o.borrow_mut().push("room");
        });

        let mut game = TestGame::new();
        callbacks.on_game_started(&mut game, false);
        callbacks.on_game_exit();

        callbacks.on_new_room(&mut game);
        callbacks.on_game_started(&mut game, true);

        assert_eq!(*order.borrow(), vec!["started", "started", "room"]);
    }

    #[test]
    fn test_stage_override_reflected_in_payload() {
        let mut callbacks = ReorderedCallbacks::new();
        let stages = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&stages);
        callbacks.register_new_level(move |_game, info| {
            s.borrow_mut().push(info.stage);
        });

        let mut game = TestGame::new();
        callbacks.on_game_started(&mut game, false);
        callbacks.note_stage_set(4, StageType::Expansion);
        callbacks.on_new_level(&mut game);

        assert_eq!(*stages.borrow(), vec![4]);
    }
}
