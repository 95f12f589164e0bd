#![allow(clippy::float_cmp, clippy::needless_range_loop, clippy::new_without_default)]
// Client side of the multiplayer weapon base: predicted sounds, prediction
// gating, view-model bob and punch-angle clamping.

pub mod view_bob;
pub mod punch;
pub mod cl_weapon;
