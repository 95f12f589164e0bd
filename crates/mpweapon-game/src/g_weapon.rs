// g_weapon.rs — game-side weapon entity: spawn, materialize, fall, fire

use crate::g_local::*;
use crate::game_import::GameHost;
use mpweapon_common::ammo::{is_ammo_type, AmmoDef};
use mpweapon_common::common::com_dprintf;
use mpweapon_common::q_shared::{lbs2kg, vector_compare, Vec3, MASK_SOLID, VEC3_ORIGIN};
use mpweapon_common::weapon_base::{
    EntIndex, FireBulletsInfo, PlayerRef, SolidFlags, WeaponBase, WeaponBehavior,
};
use mpweapon_common::weapon_info::{WeaponInfo, WeaponSound};

use std::sync::Arc;

pub struct GameWeapon {
    pub base: WeaponBase,
    pub origin: Vec3,
    pub angles: Vec3,
    pub spawnflags: SpawnFlags,
    pub effects: Effects,
    pub movetype: MoveType,
    pub solid: SolidType,
    pub collision_group: CollisionGroup,
    pub model: String,
    pub think_fn: Option<ThinkFn>,
    pub nextthink: f32,
    pub touch_fn: Option<TouchFn>,
    /// Where the level designer placed the weapon; zero until recorded.
    pub original_spawn_origin: Vec3,
    pub original_spawn_angles: Vec3,
    pub constraint: Option<ConstraintHandle>,
}

impl GameWeapon {
    pub fn new(entindex: EntIndex, info: Arc<WeaponInfo>) -> Self {
        Self {
            base: WeaponBase::new(entindex, info),
            origin: VEC3_ORIGIN,
            angles: VEC3_ORIGIN,
            spawnflags: SpawnFlags::empty(),
            effects: Effects::empty(),
            movetype: MoveType::None,
            solid: SolidType::None,
            collision_group: CollisionGroup::None,
            model: String::new(),
            think_fn: None,
            nextthink: 0.0,
            touch_fn: None,
            original_spawn_origin: VEC3_ORIGIN,
            original_spawn_angles: VEC3_ORIGIN,
            constraint: None,
        }
    }

    pub fn entindex(&self) -> EntIndex {
        self.base.entindex
    }

    pub fn player_owner(&self, host: &dyn GameHost) -> Option<PlayerRef> {
        self.base.player_owner(host)
    }

    pub fn mp_player_owner(&self, host: &dyn GameHost) -> Option<PlayerRef> {
        self.base.mp_player_owner(host)
    }

    pub fn uses_ammo(&self, ammo_def: &AmmoDef, ammo_type: usize) -> bool {
        is_ammo_type(ammo_def, ammo_type, &self.base.wpn_data().primary_ammo)
    }

    pub fn spawn(&mut self, host: &mut dyn GameHost) {
        host.base_spawn(self.entindex());

        // dropped weapons can be shot
        self.collision_group = CollisionGroup::Weapon;
    }

    /// Make a respawned weapon visible again and hand it to physics.
    pub fn materialize(&mut self, host: &mut dyn GameHost) {
        let ent = self.entindex();

        if self.effects.contains(EF_NODRAW) {
            // changing from invisible state to visible
            host.emit_sound(ent, MATERIALIZE_SOUND, 0.0);
            self.effects.remove(EF_NODRAW);
            host.do_muzzle_flash(ent);
        }

        if !self.spawnflags.contains(SF_NORESPAWN) {
            self.init_physics(host);
            self.movetype = MoveType::VPhysics;
            host.add_level_designer_placed_object(ent);

            if vector_compare(&self.original_spawn_origin, &VEC3_ORIGIN) {
                self.original_spawn_origin = self.origin;
                self.original_spawn_angles = self.angles;
            }
        }

        com_dprintf(&format!("{} ({}) materialized\n", self.base.class_name(), ent));

        self.set_pickup_touch();
        self.think_fn = None;
    }

    /// Weapons can't be +used; they are picked up by touch.
    pub fn object_caps(&self, host: &dyn GameHost) -> ObjectCaps {
        host.base_object_caps(self.entindex()) & !ObjectCaps::IMPULSE_USE
    }

    pub fn set_pickup_touch(&mut self) {
        self.touch_fn = Some(TouchFn::Pickup);
    }

    fn init_physics(&mut self, host: &mut dyn GameHost) -> Option<PhysObjectHandle> {
        self.solid = SolidType::Bbox;
        let flags = self.base.solid_flags | SolidFlags::TRIGGER;
        self.base.solid_flags = flags;
        host.vphysics_init_normal(self.entindex(), SolidType::Bbox, flags)
    }

    fn settle_as_trigger(&mut self) {
        self.movetype = MoveType::None;
        self.solid = SolidType::Bbox;
        self.base.solid_flags |= SolidFlags::TRIGGER;
    }

    /// Weld the weapon to the world. Leaves it free if either body is missing.
    fn start_constrained(&mut self, host: &mut dyn GameHost) {
        let ent = self.entindex();
        let (Some(reference), Some(attached)) = (host.world_physics_object(), host.vphysics_object(ent)) else {
            com_dprintf(&format!("{} ({}): no physics objects to constrain\n", self.base.class_name(), ent));
            return;
        };

        let limit = lbs2kg(START_CONSTRAINED_LIMIT_LBS);
        let params = FixedConstraintParams {
            force_limit: limit,
            torque_limit: limit,
            ..Default::default()
        };

        match host.create_fixed_constraint(reference, attached, &params) {
            Some(constraint) => {
                host.set_constraint_game_data(constraint, ent);
                self.constraint = Some(constraint);
                com_dprintf(&format!("{} ({}) constrained to world\n", self.base.class_name(), ent));
            }
            None => com_dprintf(&format!("{} ({}): constraint creation failed\n", self.base.class_name(), ent)),
        }
    }
}

impl WeaponBehavior for GameWeapon {
    type Host = dyn GameHost;

    fn base(&self) -> &WeaponBase {
        &self.base
    }

    /// Play a script sound from the owner if there is one, else from the weapon.
    fn weapon_sound(&mut self, host: &mut Self::Host, sound: WeaponSound, soundtime: f32) {
        let Some(shootsound) = self.base.wpn_data().shoot_sound(sound) else {
            return;
        };
        let source = self.base.owner.unwrap_or(self.entindex());
        host.emit_sound(source, shootsound, soundtime);
    }

    fn fall_init(&mut self, host: &mut Self::Host) {
        let ent = self.entindex();

        self.model = self.base.wpn_data().world_model.clone();
        host.set_model(ent, &self.model);
        host.vphysics_destroy_object(ent);

        if !self.spawnflags.contains(SF_NORESPAWN) {
            self.settle_as_trigger();
            if let Some(rest) = host.drop_to_floor(ent, &self.origin, MASK_SOLID) {
                self.origin = rest;
            }
        } else if self.init_physics(host).is_none() {
            com_dprintf(&format!("{} ({}): no physics model, falling as trigger\n", self.base.class_name(), ent));
            self.settle_as_trigger();
        } else if self.spawnflags.contains(SF_WEAPON_START_CONSTRAINED) {
            self.start_constrained(host);
        }

        self.set_pickup_touch();

        self.think_fn = Some(ThinkFn::FallThink);
        self.nextthink = host.curtime() + FALL_THINK_DELAY;
    }

    fn fire_bullets(&mut self, host: &mut Self::Host, info: &FireBulletsInfo) {
        let modinfo = self.base.prepare_fire_bullets(info);
        host.base_fire_bullets(self.entindex(), &modinfo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpweapon_common::weapon_base::PlayerLookup;
    use mpweapon_common::weapon_info::MpWeaponData;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        BaseSpawn(EntIndex),
        SetModel(EntIndex, String),
        DropToFloor(EntIndex, i32),
        AddPlaced(EntIndex),
        Sound(EntIndex, String, f32),
        MuzzleFlash(EntIndex),
        PhysInit(EntIndex, SolidType, SolidFlags),
        PhysDestroy(EntIndex),
        Constraint(PhysObjectHandle, PhysObjectHandle, FixedConstraintParams),
        ConstraintGameData(ConstraintHandle, EntIndex),
        FireBullets(EntIndex, FireBulletsInfo),
    }

    struct MockHost {
        time: f32,
        calls: Vec<Call>,
        players: Vec<PlayerRef>,
        phys_ok: bool,
        world_body: bool,
        floor: Option<Vec3>,
        caps: ObjectCaps,
    }

    impl MockHost {
        fn new() -> Self {
            Self {
                time: 10.0,
                calls: Vec::new(),
                players: Vec::new(),
                phys_ok: true,
                world_body: true,
                floor: Some([0.0, 0.0, -64.0]),
                caps: ObjectCaps::IMPULSE_USE | ObjectCaps::ACROSS_TRANSITION,
            }
        }
    }

    impl PlayerLookup for MockHost {
        fn player(&self, ent: EntIndex) -> Option<PlayerRef> {
            self.players.iter().find(|p| p.entindex == ent).cloned()
        }
    }

    impl GameHost for MockHost {
        fn curtime(&self) -> f32 {
            self.time
        }
        fn base_spawn(&mut self, ent: EntIndex) {
            self.calls.push(Call::BaseSpawn(ent));
        }
        fn set_model(&mut self, ent: EntIndex, model: &str) {
            self.calls.push(Call::SetModel(ent, model.to_string()));
        }
        fn drop_to_floor(&mut self, ent: EntIndex, _origin: &Vec3, mask: i32) -> Option<Vec3> {
            self.calls.push(Call::DropToFloor(ent, mask));
            self.floor
        }
        fn add_level_designer_placed_object(&mut self, ent: EntIndex) {
            self.calls.push(Call::AddPlaced(ent));
        }
        fn base_object_caps(&self, _ent: EntIndex) -> ObjectCaps {
            self.caps
        }
        fn emit_sound(&mut self, ent: EntIndex, sound: &str, soundtime: f32) {
            self.calls.push(Call::Sound(ent, sound.to_string(), soundtime));
        }
        fn do_muzzle_flash(&mut self, ent: EntIndex) {
            self.calls.push(Call::MuzzleFlash(ent));
        }
        fn vphysics_init_normal(&mut self, ent: EntIndex, solid: SolidType, flags: SolidFlags) -> Option<PhysObjectHandle> {
            self.calls.push(Call::PhysInit(ent, solid, flags));
            self.phys_ok.then_some(PhysObjectHandle(ent))
        }
        fn vphysics_destroy_object(&mut self, ent: EntIndex) {
            self.calls.push(Call::PhysDestroy(ent));
        }
        fn vphysics_object(&self, ent: EntIndex) -> Option<PhysObjectHandle> {
            self.phys_ok.then_some(PhysObjectHandle(ent))
        }
        fn world_physics_object(&self) -> Option<PhysObjectHandle> {
            self.world_body.then_some(PhysObjectHandle(0))
        }
        fn create_fixed_constraint(
            &mut self,
            reference: PhysObjectHandle,
            attached: PhysObjectHandle,
            params: &FixedConstraintParams,
        ) -> Option<ConstraintHandle> {
            self.calls.push(Call::Constraint(reference, attached, *params));
            Some(ConstraintHandle(77))
        }
        fn set_constraint_game_data(&mut self, constraint: ConstraintHandle, ent: EntIndex) {
            self.calls.push(Call::ConstraintGameData(constraint, ent));
        }
        fn base_fire_bullets(&mut self, ent: EntIndex, info: &FireBulletsInfo) {
            self.calls.push(Call::FireBullets(ent, info.clone()));
        }
    }

    fn pistol_info() -> Arc<WeaponInfo> {
        let mut info = WeaponInfo::new("weapon_pistol");
        info.world_model = "models/weapons/w_pistol.mdl".to_string();
        info.primary_ammo = "Pistol".to_string();
        info.shoot_sounds[WeaponSound::Single as usize] = "Weapon_Pistol.Single".to_string();
        info.set_mp_weapon_data(MpWeaponData { player_damage: 8 });
        Arc::new(info)
    }

    fn make_weapon() -> GameWeapon {
        let mut w = GameWeapon::new(5, pistol_info());
        w.origin = [100.0, 200.0, 30.0];
        w.angles = [0.0, 90.0, 0.0];
        w
    }

    fn has_call(host: &MockHost, f: impl Fn(&Call) -> bool) -> bool {
        host.calls.iter().any(f)
    }

    // ============================================================
    // spawn / object caps
    // ============================================================

    #[test]
    fn test_spawn_sets_weapon_collision_group() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.spawn(&mut host);
        assert_eq!(host.calls, vec![Call::BaseSpawn(5)]);
        assert_eq!(w.collision_group, CollisionGroup::Weapon);
    }

    #[test]
    fn test_object_caps_strip_impulse_use() {
        let host = MockHost::new();
        let w = make_weapon();
        let caps = w.object_caps(&host);
        assert!(!caps.contains(ObjectCaps::IMPULSE_USE));
        assert!(caps.contains(ObjectCaps::ACROSS_TRANSITION));
    }

    // ============================================================
    // materialize
    // ============================================================

    #[test]
    fn test_materialize_hidden_weapon() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.effects = EF_NODRAW;
        w.think_fn = Some(ThinkFn::FallThink);

        w.materialize(&mut host);

        assert!(!w.effects.contains(EF_NODRAW));
        assert_eq!(host.calls[0], Call::Sound(5, MATERIALIZE_SOUND.to_string(), 0.0));
        assert_eq!(host.calls[1], Call::MuzzleFlash(5));
        assert!(has_call(&host, |c| *c == Call::AddPlaced(5)));
        assert_eq!(w.movetype, MoveType::VPhysics);
        assert_eq!(w.touch_fn, Some(TouchFn::Pickup));
        assert_eq!(w.think_fn, None);
    }

    #[test]
    fn test_materialize_visible_weapon_is_silent() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.materialize(&mut host);
        assert!(!has_call(&host, |c| matches!(c, Call::Sound(..) | Call::MuzzleFlash(_))));
    }

    #[test]
    fn test_materialize_records_original_spawn_once() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.materialize(&mut host);
        assert_eq!(w.original_spawn_origin, [100.0, 200.0, 30.0]);
        assert_eq!(w.original_spawn_angles, [0.0, 90.0, 0.0]);

        w.origin = [1.0, 1.0, 1.0];
        w.materialize(&mut host);
        assert_eq!(w.original_spawn_origin, [100.0, 200.0, 30.0]);
    }

    #[test]
    fn test_materialize_norespawn_skips_physics() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.spawnflags = SF_NORESPAWN;
        w.materialize(&mut host);
        assert!(!has_call(&host, |c| matches!(c, Call::PhysInit(..) | Call::AddPlaced(_))));
        assert_eq!(w.original_spawn_origin, VEC3_ORIGIN);
        assert_eq!(w.touch_fn, Some(TouchFn::Pickup));
    }

    #[test]
    fn test_materialize_physics_flags_include_trigger() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.materialize(&mut host);
        assert!(has_call(&host, |c| matches!(c,
            Call::PhysInit(5, SolidType::Bbox, flags) if flags.contains(SolidFlags::TRIGGER))));
    }

    // ============================================================
    // fall_init
    // ============================================================

    #[test]
    fn test_fall_init_placed_weapon_drops_to_floor() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.fall_init(&mut host);

        assert_eq!(host.calls[0], Call::SetModel(5, "models/weapons/w_pistol.mdl".to_string()));
        assert_eq!(host.calls[1], Call::PhysDestroy(5));
        assert_eq!(host.calls[2], Call::DropToFloor(5, MASK_SOLID));
        assert_eq!(w.origin, [0.0, 0.0, -64.0]);
        assert_eq!(w.movetype, MoveType::None);
        assert_eq!(w.solid, SolidType::Bbox);
        assert!(w.base.solid_flags.contains(SolidFlags::TRIGGER));
        assert_eq!(w.touch_fn, Some(TouchFn::Pickup));
        assert_eq!(w.think_fn, Some(ThinkFn::FallThink));
        assert!((w.nextthink - 10.1).abs() < 1e-5);
    }

    #[test]
    fn test_fall_init_startsolid_keeps_origin() {
        let mut host = MockHost::new();
        host.floor = None;
        let mut w = make_weapon();
        w.fall_init(&mut host);
        assert_eq!(w.origin, [100.0, 200.0, 30.0]);
    }

    #[test]
    fn test_fall_init_dropped_weapon_uses_physics() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.spawnflags = SF_NORESPAWN;
        w.fall_init(&mut host);
        assert!(has_call(&host, |c| matches!(c, Call::PhysInit(5, SolidType::Bbox, _))));
        assert!(!has_call(&host, |c| matches!(c, Call::DropToFloor(..))));
        assert!(!has_call(&host, |c| matches!(c, Call::Constraint(..))));
        assert_eq!(w.think_fn, Some(ThinkFn::FallThink));
    }

    #[test]
    fn test_fall_init_physics_failure_falls_back_to_trigger() {
        let mut host = MockHost::new();
        host.phys_ok = false;
        let mut w = make_weapon();
        w.spawnflags = SF_NORESPAWN | SF_WEAPON_START_CONSTRAINED;
        w.movetype = MoveType::VPhysics;
        w.fall_init(&mut host);
        assert_eq!(w.movetype, MoveType::None);
        assert_eq!(w.solid, SolidType::Bbox);
        assert!(!has_call(&host, |c| matches!(c, Call::Constraint(..))));
        assert_eq!(w.constraint, None);
    }

    #[test]
    fn test_fall_init_start_constrained() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.spawnflags = SF_NORESPAWN | SF_WEAPON_START_CONSTRAINED;
        w.fall_init(&mut host);

        let params = host.calls.iter().find_map(|c| match c {
            Call::Constraint(PhysObjectHandle(0), PhysObjectHandle(5), p) => Some(*p),
            _ => None,
        });
        let params = params.expect("constraint should be created");
        assert!((params.force_limit - 4535.9237).abs() < 0.01);
        assert_eq!(params.force_limit, params.torque_limit);
        assert!(has_call(&host, |c| *c == Call::ConstraintGameData(ConstraintHandle(77), 5)));
        assert_eq!(w.constraint, Some(ConstraintHandle(77)));
    }

    #[test]
    fn test_fall_init_constrained_without_world_body() {
        let mut host = MockHost::new();
        host.world_body = false;
        let mut w = make_weapon();
        w.spawnflags = SF_NORESPAWN | SF_WEAPON_START_CONSTRAINED;
        w.fall_init(&mut host);
        assert!(!has_call(&host, |c| matches!(c, Call::Constraint(..))));
        assert_eq!(w.touch_fn, Some(TouchFn::Pickup));
    }

    // ============================================================
    // sounds / bullets / owners
    // ============================================================

    #[test]
    fn test_weapon_sound_from_owner_or_self() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.weapon_sound(&mut host, WeaponSound::Single, 0.5);
        assert_eq!(host.calls, vec![Call::Sound(5, "Weapon_Pistol.Single".to_string(), 0.5)]);

        host.calls.clear();
        w.base.owner = Some(2);
        w.weapon_sound(&mut host, WeaponSound::Single, 0.0);
        assert_eq!(host.calls, vec![Call::Sound(2, "Weapon_Pistol.Single".to_string(), 0.0)]);
    }

    #[test]
    fn test_weapon_sound_missing_slot() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        w.weapon_sound(&mut host, WeaponSound::Reload, 0.0);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_fire_bullets_uses_script_player_damage() {
        let mut host = MockHost::new();
        let mut w = make_weapon();
        let info = FireBulletsInfo { shots: 3, player_damage: 99, ..Default::default() };
        w.fire_bullets(&mut host, &info);
        match &host.calls[0] {
            Call::FireBullets(5, fired) => {
                assert_eq!(fired.player_damage, 8);
                assert_eq!(fired.shots, 3);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_owner_lookup_through_host() {
        let mut host = MockHost::new();
        host.players.push(PlayerRef {
            entindex: 2,
            abs_origin: VEC3_ORIGIN,
            local_velocity: VEC3_ORIGIN,
            is_mp_player: false,
        });
        let mut w = make_weapon();
        w.base.owner = Some(2);
        assert!(w.player_owner(&host).is_some());
        assert!(w.mp_player_owner(&host).is_none());
    }

    #[test]
    fn test_uses_ammo() {
        let def = AmmoDef::multiplayer_defaults();
        let w = make_weapon();
        let pistol = def.index("Pistol").unwrap();
        let buckshot = def.index("Buckshot").unwrap();
        assert!(w.uses_ammo(&def, pistol));
        assert!(!w.uses_ammo(&def, buckshot));
    }

    #[test]
    fn test_is_predicted() {
        let w = make_weapon();
        assert!(w.is_predicted());
    }
}
