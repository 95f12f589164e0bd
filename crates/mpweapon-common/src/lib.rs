#![allow(clippy::manual_range_contains, clippy::float_cmp, clippy::manual_clamp,
         clippy::new_without_default)]
// Shared code for the multiplayer weapon base: math, cvars, console output,
// ammo table, weapon scripts and the behavior trait both sides implement.

pub mod q_shared;
pub mod common;
pub mod cvar;
pub mod ammo;
pub mod weapon_info;
pub mod weapon_base;
