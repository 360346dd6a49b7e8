//! Helper functions layered over the host game's API.

pub mod doors;
pub mod names;
pub mod rng;
pub mod rooms;
pub mod spawn;
