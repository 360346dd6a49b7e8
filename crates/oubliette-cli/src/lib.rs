//! Library half of the `oubliette` binary, split out so the stage
//! compiler and helpers can be exercised by integration tests.

pub mod commands;
pub mod config;
pub mod logging;
pub mod paths;
pub mod stage;
pub mod util;
pub mod watcher;
