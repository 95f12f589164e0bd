//! Game host interface — services the engine provides to game-side weapons.
//!
//! Physics, sound emission, model setup and the base combat-weapon behavior
//! all live in the engine. Weapons reach them through `GameHost`, passed in
//! explicitly on every call.

use crate::g_local::{
    ConstraintHandle, FixedConstraintParams, ObjectCaps, PhysObjectHandle, SolidType,
};
use mpweapon_common::q_shared::Vec3;
use mpweapon_common::weapon_base::{EntIndex, FireBulletsInfo, PlayerLookup, SolidFlags};

pub trait GameHost: PlayerLookup {
    /// Current server time in seconds.
    fn curtime(&self) -> f32;

    // Entity setup
    /// Base combat-weapon spawn (model precache, bounds, think setup).
    fn base_spawn(&mut self, ent: EntIndex);
    fn set_model(&mut self, ent: EntIndex, model: &str);
    /// Trace down from `origin` and return where the entity comes to rest.
    /// None if it starts in solid; the caller leaves the origin alone.
    fn drop_to_floor(&mut self, ent: EntIndex, origin: &Vec3, mask: i32) -> Option<Vec3>;
    /// Let the gamerules respawn this weapon where the designer placed it.
    fn add_level_designer_placed_object(&mut self, ent: EntIndex);
    fn base_object_caps(&self, ent: EntIndex) -> ObjectCaps;

    // Effects
    fn emit_sound(&mut self, ent: EntIndex, sound: &str, soundtime: f32);
    fn do_muzzle_flash(&mut self, ent: EntIndex);

    // Physics
    /// Create the entity's rigid body. None if the model has no collision.
    fn vphysics_init_normal(&mut self, ent: EntIndex, solid: SolidType, flags: SolidFlags) -> Option<PhysObjectHandle>;
    fn vphysics_destroy_object(&mut self, ent: EntIndex);
    fn vphysics_object(&self, ent: EntIndex) -> Option<PhysObjectHandle>;
    /// The static world body constraints can attach to.
    fn world_physics_object(&self) -> Option<PhysObjectHandle>;
    fn create_fixed_constraint(
        &mut self,
        reference: PhysObjectHandle,
        attached: PhysObjectHandle,
        params: &FixedConstraintParams,
    ) -> Option<ConstraintHandle>;
    /// Tag a constraint with the entity that owns it.
    fn set_constraint_game_data(&mut self, constraint: ConstraintHandle, ent: EntIndex);

    // Combat
    /// Base bullet firing: traces, damage, impact effects.
    fn base_fire_bullets(&mut self, ent: EntIndex, info: &FireBulletsInfo);
}
