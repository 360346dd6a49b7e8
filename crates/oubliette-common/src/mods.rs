//! The [`Mod`] struct: the single object an engine binding forwards the
//! game's native callbacks into, and the mod author's registration
//! surface for the derived callbacks.

use tracing::debug;

use crate::callbacks::ambush::AmbushCallbacks;
use crate::callbacks::grid_entity::GridEntityCallbacks;
use crate::callbacks::npc::NpcCallbacks;
use crate::callbacks::reordered::ReorderedCallbacks;
use crate::callbacks::{
    GameStartedInfo, GridEntityFilter, GridEntityStateChange, NewLevelInfo, NewRoomInfo,
};
use crate::game::{Game, GridEntitySnapshot, NpcSnapshot};
use crate::save::{SaveDataManager, SaveError};
use crate::stage::{StageError, StageManager};
use crate::types::{AmbushType, EntityType};

pub struct Mod {
    name: String,
    save: SaveDataManager,
    stage: StageManager,
    ambush: AmbushCallbacks,
    grid_entity: GridEntityCallbacks,
    npc: NpcCallbacks,
    reordered: ReorderedCallbacks,
}

impl Mod {
    pub fn new(name: impl Into<String>) -> Self {
        let mut save = SaveDataManager::new();
        let ambush =
            AmbushCallbacks::new(&mut save).expect("a fresh save manager has no duplicate keys");

        Self {
            name: name.into(),
            save,
            stage: StageManager::new(),
            ambush,
            grid_entity: GridEntityCallbacks::new(),
            npc: NpcCallbacks::new(),
            reordered: ReorderedCallbacks::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feature save data. Mod features register their own state here.
    pub fn save_data(&mut self) -> &mut SaveDataManager {
        &mut self.save
    }

    /// Custom-stage registration and state.
    pub fn stages(&mut self) -> &mut StageManager {
        &mut self.stage
    }

    // ------------------------------------------------------------------
    // Callback registration
    // ------------------------------------------------------------------

    pub fn on_ambush_started(
        &mut self,
        ambush_type: Option<AmbushType>,
        callback: impl FnMut(&mut dyn Game, &AmbushType) + 'static,
    ) {
        self.ambush.register_started(ambush_type, callback);
    }

    pub fn on_ambush_finished(
        &mut self,
        ambush_type: Option<AmbushType>,
        callback: impl FnMut(&mut dyn Game, &AmbushType) + 'static,
    ) {
        self.ambush.register_finished(ambush_type, callback);
    }

    pub fn on_grid_entity_init(
        &mut self,
        filter: Option<GridEntityFilter>,
        callback: impl FnMut(&mut dyn Game, &GridEntitySnapshot) + 'static,
    ) {
        self.grid_entity.register_init(filter, callback);
    }

    pub fn on_grid_entity_update(
        &mut self,
        filter: Option<GridEntityFilter>,
        callback: impl FnMut(&mut dyn Game, &GridEntitySnapshot) + 'static,
    ) {
        self.grid_entity.register_update(filter, callback);
    }

    pub fn on_grid_entity_state_changed(
        &mut self,
        filter: Option<GridEntityFilter>,
        callback: impl FnMut(&mut dyn Game, &GridEntityStateChange) + 'static,
    ) {
        self.grid_entity.register_state_changed(filter, callback);
    }

    pub fn on_grid_entity_removed(
        &mut self,
        filter: Option<GridEntityFilter>,
        callback: impl FnMut(&mut dyn Game, &GridEntitySnapshot) + 'static,
    ) {
        self.grid_entity.register_removed(filter, callback);
    }

    pub fn on_npc_init_late(
        &mut self,
        entity_type: Option<EntityType>,
        callback: impl FnMut(&mut dyn Game, &NpcSnapshot) + 'static,
    ) {
        self.npc.register_init_late(entity_type, callback);
    }

    pub fn on_game_started_reordered(
        &mut self,
        callback: impl FnMut(&mut dyn Game, &GameStartedInfo) + 'static,
    ) {
        self.reordered.register_game_started(callback);
    }

    pub fn on_new_level_reordered(
        &mut self,
        callback: impl FnMut(&mut dyn Game, &NewLevelInfo) + 'static,
    ) {
        self.reordered.register_new_level(callback);
    }

    pub fn on_new_room_reordered(
        &mut self,
        callback: impl FnMut(&mut dyn Game, &NewRoomInfo) + 'static,
    ) {
        self.reordered.register_new_room(callback);
    }

    // ------------------------------------------------------------------
    // Native callback entry points (called by the engine bindings)
    // ------------------------------------------------------------------

    /// Native per-frame update.
    pub fn handle_update(&mut self, game: &mut dyn Game) {
        self.ambush.on_update(game);
        self.grid_entity.on_update(game);
    }

    /// Native per-NPC update.
    pub fn handle_npc_update(&mut self, game: &mut dyn Game, npc: &NpcSnapshot) {
        self.npc.on_npc_update(game, npc);
    }

    /// Native game-started. `save_document` is the contents of the
    /// host's save slot when continuing, if any.
    pub fn handle_game_started(
        &mut self,
        game: &mut dyn Game,
        continued: bool,
        save_document: Option<&str>,
    ) -> Result<(), SaveError> {
        if continued {
            if let Some(document) = save_document {
                self.save.load(document)?;
            }
        } else {
            self.save.reset_run();
        }

        self.reordered.on_game_started(game, continued);
        Ok(())
    }

    /// Native new-level.
    pub fn handle_new_level(&mut self, game: &mut dyn Game) {
        self.save.reset_level();
        self.reordered.on_new_level(game);
    }

    /// Native new-room.
    pub fn handle_new_room(&mut self, game: &mut dyn Game) {
        self.save.reset_room();
        self.grid_entity.on_new_room();
        self.npc.on_new_room();
        self.reordered.on_new_room(game);
    }

    /// Native game-exit. Returns the save document the host must write
    /// to the save slot.
    pub fn handle_game_exit(&mut self) -> Result<String, SaveError> {
        let document = self.save.serialize()?;
        self.reordered.on_game_exit();
        debug!(target: "mod", "Serialized save data for \"{}\"", self.name);
        Ok(document)
    }

    /// Warp to a registered custom stage.
    pub fn set_custom_stage(
        &mut self,
        game: &mut dyn Game,
        name: &str,
        first_floor: bool,
    ) -> Result<(), StageError> {
        let (stage, stage_type) = self.stage.set_custom_stage(game, name, first_floor)?;
        self.reordered.note_stage_set(stage, stage_type);
        Ok(())
    }

    pub fn disable_custom_stage(&mut self) {
        self.stage.disable_custom_stage();
    }
}
