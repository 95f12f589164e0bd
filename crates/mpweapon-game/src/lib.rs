#![allow(clippy::float_cmp, clippy::new_without_default)]
// Server side of the multiplayer weapon base: entity lifecycle, physics
// setup, sounds and bullet firing against the engine's `GameHost`.

pub mod g_local;
pub mod game_import;
pub mod g_weapon;
