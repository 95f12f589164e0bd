// weapon_base.rs — weapon state and behavior shared by the game and the client
//
// The game crate and the client crate each implement `WeaponBehavior` over
// their own host interface; everything both sides agree on lives here.

use crate::common::com_dprintf;
use crate::q_shared::Vec3;
use crate::weapon_info::{MpWeaponData, WeaponInfo, WeaponSound};

use std::sync::Arc;

/// Entity index in the host's entity list.
pub type EntIndex = usize;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SolidFlags: i32 {
        const CUSTOM_RAY_TEST      = 0x0001;
        const CUSTOM_BOX_TEST      = 0x0002;
        const NOT_SOLID            = 0x0004;
        /// Touch callbacks fire but nothing collides.
        const TRIGGER              = 0x0008;
        const NOT_STANDABLE        = 0x0010;
        const VOLUME_CONTENTS      = 0x0020;
        const FORCE_WORLD_ALIGNED  = 0x0040;
        const USE_TRIGGER_BOUNDS   = 0x0080;
        const ROOT_PARENT_ALIGNED  = 0x0100;
        const TRIGGER_TOUCH_DEBRIS = 0x0200;
    }
}

// ============================================================
// Owner lookup
// ============================================================

/// A player entity as seen through the host.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerRef {
    pub entindex: EntIndex,
    pub abs_origin: Vec3,
    pub local_velocity: Vec3,
    /// Player of the multiplayer class (as opposed to the plain base player).
    pub is_mp_player: bool,
}

/// Resolve an entity index to a player. Non-player entities yield None.
pub trait PlayerLookup {
    fn player(&self, ent: EntIndex) -> Option<PlayerRef>;
}

// ============================================================
// Bullets
// ============================================================

pub const MAX_TRACE_LENGTH: f32 = 56756.0;

#[derive(Clone, Debug, PartialEq)]
pub struct FireBulletsInfo {
    pub shots: i32,
    pub src: Vec3,
    pub dir_shooting: Vec3,
    pub spread: Vec3,
    pub distance: f32,
    pub ammo_type: Option<usize>,
    /// Every n-th bullet draws a tracer; 0 disables tracers.
    pub tracer_freq: i32,
    /// Damage override; 0 uses the ammo type's damage.
    pub damage: f32,
    /// Damage against players; 0 uses the ammo type's damage.
    pub player_damage: i32,
    pub flags: i32,
    pub attacker: Option<EntIndex>,
}

impl FireBulletsInfo {
    pub fn new(shots: i32, src: Vec3, dir: Vec3, spread: Vec3, distance: f32, ammo_type: Option<usize>) -> Self {
        Self {
            shots,
            src,
            dir_shooting: dir,
            spread,
            distance,
            ammo_type,
            tracer_freq: 4,
            damage: 0.0,
            player_damage: 0,
            flags: 0,
            attacker: None,
        }
    }
}

impl Default for FireBulletsInfo {
    fn default() -> Self {
        Self::new(1, [0.0; 3], [1.0, 0.0, 0.0], [0.0; 3], MAX_TRACE_LENGTH, None)
    }
}

// ============================================================
// Weapon base
// ============================================================

pub struct WeaponBase {
    pub entindex: EntIndex,
    pub info: Arc<WeaponInfo>,
    pub owner: Option<EntIndex>,
    pub solid_flags: SolidFlags,
    pub prediction_eligible: bool,
    pub next_reset_check_time: f32,
}

impl WeaponBase {
    pub fn new(entindex: EntIndex, info: Arc<WeaponInfo>) -> Self {
        Self {
            entindex,
            info,
            owner: None,
            // nothing collides with weapons but they still get touches
            solid_flags: SolidFlags::TRIGGER,
            prediction_eligible: true,
            next_reset_check_time: 0.0,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.info.class_name
    }

    /// Weapons of this family always run through client prediction.
    pub fn is_predicted(&self) -> bool {
        true
    }

    pub fn wpn_data(&self) -> &WeaponInfo {
        &self.info
    }

    /// Multiplayer script data, if the script provides it.
    pub fn mp_wpn_data(&self) -> Option<&MpWeaponData> {
        self.info.mp_weapon_data()
    }

    /// The owning entity, if it is a player of any class.
    pub fn player_owner<L: PlayerLookup + ?Sized>(&self, lookup: &L) -> Option<PlayerRef> {
        self.owner.and_then(|ent| lookup.player(ent))
    }

    /// The owning entity, if it is a multiplayer-class player.
    pub fn mp_player_owner<L: PlayerLookup + ?Sized>(&self, lookup: &L) -> Option<PlayerRef> {
        self.player_owner(lookup).filter(|p| p.is_mp_player)
    }

    /// Copy of `info` with the player damage taken from the weapon script.
    pub fn prepare_fire_bullets(&self, info: &FireBulletsInfo) -> FireBulletsInfo {
        let mut modinfo = info.clone();
        match self.mp_wpn_data() {
            Some(data) => modinfo.player_damage = data.player_damage,
            None => com_dprintf(&format!(
                "{}: weapon script has no multiplayer data\n",
                self.class_name()
            )),
        }
        modinfo
    }
}

/// Behavior both sides implement; `Host` is the engine interface of that side.
pub trait WeaponBehavior {
    type Host: ?Sized;

    fn base(&self) -> &WeaponBase;

    fn is_predicted(&self) -> bool {
        self.base().is_predicted()
    }

    fn weapon_sound(&mut self, host: &mut Self::Host, sound: WeaponSound, soundtime: f32);

    /// Settle a freshly spawned weapon into the world.
    fn fall_init(&mut self, host: &mut Self::Host);

    fn fire_bullets(&mut self, host: &mut Self::Host, info: &FireBulletsInfo);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Players(Vec<PlayerRef>);

    impl PlayerLookup for Players {
        fn player(&self, ent: EntIndex) -> Option<PlayerRef> {
            self.0.iter().find(|p| p.entindex == ent).cloned()
        }
    }

    fn player(entindex: EntIndex, is_mp_player: bool) -> PlayerRef {
        PlayerRef {
            entindex,
            abs_origin: [1.0, 2.0, 3.0],
            local_velocity: [0.0; 3],
            is_mp_player,
        }
    }

    fn pistol(player_damage: Option<i32>) -> Arc<WeaponInfo> {
        let mut info = WeaponInfo::new("weapon_pistol");
        if let Some(player_damage) = player_damage {
            info.set_mp_weapon_data(MpWeaponData { player_damage });
        }
        Arc::new(info)
    }

    #[test]
    fn test_new_weapon_defaults() {
        let base = WeaponBase::new(7, pistol(None));
        assert!(base.prediction_eligible);
        assert!(base.solid_flags.contains(SolidFlags::TRIGGER));
        assert_eq!(base.next_reset_check_time, 0.0);
        assert!(base.is_predicted());
        assert_eq!(base.class_name(), "weapon_pistol");
    }

    #[test]
    fn test_owner_lookups() {
        let players = Players(vec![player(1, true), player(2, false)]);
        let mut base = WeaponBase::new(7, pistol(None));
        assert!(base.player_owner(&players).is_none());

        base.owner = Some(1);
        assert_eq!(base.mp_player_owner(&players).map(|p| p.entindex), Some(1));

        base.owner = Some(2);
        assert!(base.player_owner(&players).is_some());
        assert!(base.mp_player_owner(&players).is_none());

        // owner that is not a player at all
        base.owner = Some(99);
        assert!(base.player_owner(&players).is_none());
    }

    #[test]
    fn test_prepare_fire_bullets_overrides_player_damage() {
        let base = WeaponBase::new(7, pistol(Some(8)));
        let info = FireBulletsInfo { player_damage: 50, damage: 3.0, ..Default::default() };
        let modinfo = base.prepare_fire_bullets(&info);
        assert_eq!(modinfo.player_damage, 8);
        assert_eq!(modinfo.damage, 3.0);
        assert_eq!(info.player_damage, 50);
    }

    #[test]
    fn test_prepare_fire_bullets_without_mp_data() {
        let base = WeaponBase::new(7, pistol(None));
        let info = FireBulletsInfo { player_damage: 50, ..Default::default() };
        assert_eq!(base.prepare_fire_bullets(&info).player_damage, 50);
    }
}
