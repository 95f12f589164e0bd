// cl_weapon.rs — client-side weapon: predicted sounds, prediction gating, view bob

use crate::view_bob::{BobCvars, BobOffsets, ViewModelController};
use mpweapon_common::common::com_dprintf;
use mpweapon_common::q_shared::{vector_length_2d, Vec3};
use mpweapon_common::weapon_base::{
    EntIndex, FireBulletsInfo, PlayerLookup, PlayerRef, WeaponBase, WeaponBehavior,
};
use mpweapon_common::weapon_info::{WeaponInfo, WeaponSound};

use std::sync::Arc;

/// Why a networked entity's data changed this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataUpdateType {
    Created,
    DataTableChanged,
}

// ============================================================
// Client host interface
// ============================================================

pub trait ClientHost: PlayerLookup {
    fn curtime(&self) -> f32;
    /// Duration of the frame being simulated; 0 while paused.
    fn frametime(&self) -> f32;
    fn local_player(&self) -> Option<EntIndex>;

    /// False while re-running prediction; sounds would play twice.
    fn can_predict(&self) -> bool;
    fn emit_sound_at(&mut self, ent: EntIndex, sound: &str, origin: &Vec3, soundtime: f32);

    fn base_on_data_changed(&mut self, ent: EntIndex, update: DataUpdateType);
    fn base_should_predict(&self, ent: EntIndex) -> bool;
    fn is_predictable(&self, ent: EntIndex) -> bool;
    fn shutdown_predictable(&mut self, ent: EntIndex);

    fn base_fire_bullets(&mut self, ent: EntIndex, info: &FireBulletsInfo);
}

// ============================================================
// Client weapon
// ============================================================

pub struct ClientWeapon {
    pub base: WeaponBase,
}

impl ClientWeapon {
    pub fn new(entindex: EntIndex, info: Arc<WeaponInfo>) -> Self {
        Self {
            base: WeaponBase::new(entindex, info),
        }
    }

    pub fn player_owner(&self, host: &dyn ClientHost) -> Option<PlayerRef> {
        self.base.player_owner(host)
    }

    pub fn mp_player_owner(&self, host: &dyn ClientHost) -> Option<PlayerRef> {
        self.base.mp_player_owner(host)
    }

    /// The local player always predicts its own weapons.
    pub fn should_predict(&self, host: &dyn ClientHost) -> bool {
        if self.base.owner.is_some() && self.base.owner == host.local_player() {
            return true;
        }
        host.base_should_predict(self.base.entindex)
    }

    pub fn on_data_changed(&mut self, host: &mut dyn ClientHost, update: DataUpdateType) {
        let ent = self.base.entindex;
        host.base_on_data_changed(ent, update);

        if host.is_predictable(ent) && !self.should_predict(host) {
            com_dprintf(&format!("{} ({}): stopped predicting\n", self.base.class_name(), ent));
            host.shutdown_predictable(ent);
        }
    }

    /// Advance the viewer's bob oscillator with the owner's ground speed.
    pub fn calc_viewmodel_bob(
        &self,
        host: &dyn ClientHost,
        view: &mut ViewModelController,
        cvars: &BobCvars,
    ) -> BobOffsets {
        let speed = self
            .player_owner(host)
            .map(|p| vector_length_2d(&p.local_velocity));
        view.bob.calc(host.curtime(), host.frametime(), speed, cvars)
    }

    /// Bob the view model. A degenerate frame reuses the previous offsets.
    pub fn add_viewmodel_bob(
        &self,
        host: &dyn ClientHost,
        view: &mut ViewModelController,
        origin: &mut Vec3,
        angles: &mut Vec3,
    ) {
        let cvars = BobCvars::from_cvars();
        self.calc_viewmodel_bob(host, view, &cvars);
        view.bob.apply(origin, angles);
    }
}

impl WeaponBehavior for ClientWeapon {
    type Host = dyn ClientHost;

    fn base(&self) -> &WeaponBase {
        &self.base
    }

    /// Predicted shot sounds play at the owner; re-simulated frames stay silent.
    fn weapon_sound(&mut self, host: &mut Self::Host, sound: WeaponSound, soundtime: f32) {
        let Some(shootsound) = self.base.wpn_data().shoot_sound(sound) else {
            return;
        };
        if !host.can_predict() {
            return;
        }
        let Some(owner) = self.base.player_owner(&*host) else {
            return;
        };
        host.emit_sound_at(owner.entindex, shootsound, &owner.abs_origin, soundtime);
    }

    /// Placement is server-authoritative.
    fn fall_init(&mut self, _host: &mut Self::Host) {}

    fn fire_bullets(&mut self, host: &mut Self::Host, info: &FireBulletsInfo) {
        let modinfo = self.base.prepare_fire_bullets(info);
        host.base_fire_bullets(self.base.entindex, &modinfo);
    }
}
