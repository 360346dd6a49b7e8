//! Spawn helpers for pickup pedestals.

use rand::Rng;
use rand_isaac::Isaac64Rng;

use crate::game::{Game, Pickup, Vector};
use crate::types::CharacterKind;

pub const PICKUP_VARIANT_COLLECTIBLE: u32 = 100;

/// Arbitrary non-empty collectible used as a placeholder when spawning
/// an empty pedestal; spawning sub-type 0 directly would roll a random
/// collectible from the room's item pool instead.
pub const COLLECTIBLE_TALLOW_CANDLE: u32 = 1;

/// Collectibles that belong to quest lines. They must never carry a
/// price and must not be re-rolled by other mechanics.
pub const QUEST_COLLECTIBLES: &[u32] = &[327, 328, 550, 551, 626, 627];

pub fn is_quest_collectible(collectible: u32) -> bool {
    QUEST_COLLECTIBLES.contains(&collectible)
}

/// Spawn a collectible pedestal. Use this instead of spawning the pickup
/// directly: it handles the tainted merchant's coin prices and keeps
/// quest collectibles free.
///
/// `options` marks the pedestal as part of an options group, where
/// taking one despawns the rest. `force_free_item` disables the tainted
/// merchant price logic.
pub fn spawn_collectible(
    game: &mut dyn Game,
    collectible: u32,
    position: Vector,
    rng: &mut Isaac64Rng,
    options: bool,
    force_free_item: bool,
) {
    let seed = rng.gen::<u64>();
    let merchant_pays = game.any_player_is(CharacterKind::TaintedMerchant)
        && !is_quest_collectible(collectible)
        && !force_free_item;

    let pickup = game.spawn_pickup(PICKUP_VARIANT_COLLECTIBLE, collectible, position, seed);

    if options {
        pickup.set_options_index(1);
    }

    if merchant_pays {
        // Manually spawned collectibles have no price; without one the
        // tainted merchant could take them for free. The shop item id of
        // -1 keeps the game from re-rolling the price to 99 cents, and
        // the price itself auto-updates to the true value next frame.
        pickup.set_shop_item_id(-1);
        pickup.set_price(15);
    }
}

/// Spawn an empty pedestal.
pub fn spawn_empty_collectible(game: &mut dyn Game, position: Vector, rng: &mut Isaac64Rng) {
    let seed = rng.gen::<u64>();
    let pickup = game.spawn_pickup(
        PICKUP_VARIANT_COLLECTIBLE,
        COLLECTIBLE_TALLOW_CANDLE,
        position,
        seed,
    );
    pickup.morph(PICKUP_VARIANT_COLLECTIBLE, 0);
}
