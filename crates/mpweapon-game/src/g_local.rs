// g_local.rs — game-side entity constants and small types

bitflags::bitflags! {
    /// Level-designer spawn flags relevant to weapons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SpawnFlags: i32 {
        /// Weapon is welded to the world until something knocks it loose.
        const WEAPON_START_CONSTRAINED = 1 << 0;
        const WEAPON_NO_PLAYER_PICKUP  = 1 << 1;
        const WEAPON_NO_PHYSCANNON_PUNT = 1 << 2;
        /// Dropped (not placed) weapons never respawn.
        const NORESPAWN                = 1 << 30;
    }
}

pub const SF_WEAPON_START_CONSTRAINED: SpawnFlags = SpawnFlags::WEAPON_START_CONSTRAINED;
pub const SF_NORESPAWN: SpawnFlags = SpawnFlags::NORESPAWN;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Effects: i32 {
        const BONEMERGE       = 0x001;
        const BRIGHTLIGHT     = 0x002;
        const DIMLIGHT        = 0x004;
        const NOINTERP        = 0x008;
        const NOSHADOW        = 0x010;
        const NODRAW          = 0x020;
        const NORECEIVESHADOW = 0x040;
        const ITEM_BLINK      = 0x100;
    }
}

pub const EF_NODRAW: Effects = Effects::NODRAW;

bitflags::bitflags! {
    /// Capabilities the entity advertises to the save system and to +use.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ObjectCaps: u32 {
        const CUSTOM_SAVE          = 0x0000_0001;
        const ACROSS_TRANSITION    = 0x0000_0002;
        const MUST_SPAWN           = 0x0000_0004;
        const IMPULSE_USE          = 0x0000_0010;
        const CONTINUOUS_USE       = 0x0000_0020;
        const ONOFF_USE            = 0x0000_0040;
        const DIRECTIONAL_USE      = 0x0000_0080;
        const USE_ONGROUND         = 0x0000_0100;
        const USE_IN_RADIUS        = 0x0000_0200;
        const SAVE_NON_NETWORKABLE = 0x0000_0400;
        const MASTER               = 0x1000_0000;
        const WCEDIT_POSITION      = 0x4000_0000;
        const DONT_SAVE            = 0x8000_0000;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MoveType {
    #[default]
    None = 0,
    Isometric,
    Walk,
    Step,
    Fly,
    FlyGravity,
    VPhysics,
    Push,
    Noclip,
    Ladder,
    Observer,
    Custom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SolidType {
    #[default]
    None = 0,
    Bsp,
    Bbox,
    Obb,
    ObbYaw,
    Custom,
    VPhysics,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionGroup {
    #[default]
    None = 0,
    Debris,
    DebrisTrigger,
    InteractiveDebris,
    Interactive,
    Player,
    BreakableGlass,
    Vehicle,
    PlayerMovement,
    Npc,
    InVehicle,
    /// Weapons: bullets still hit them.
    Weapon,
}

/// Think callbacks a weapon can schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThinkFn {
    /// Wait for the weapon to come to rest, then materialize it.
    FallThink,
}

/// Touch callbacks a weapon can install.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchFn {
    /// Players touching the weapon pick it up.
    Pickup,
}

/// Host handle to a rigid body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhysObjectHandle(pub usize);

/// Host handle to a physics constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintHandle(pub usize);

/// Parameters for welding two bodies together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedConstraintParams {
    /// Linear force (kg) that breaks the constraint; 0 never breaks.
    pub force_limit: f32,
    /// Torque (kg) that breaks the constraint; 0 never breaks.
    pub torque_limit: f32,
    pub strength: f32,
    pub is_active: bool,
}

impl Default for FixedConstraintParams {
    fn default() -> Self {
        Self {
            force_limit: 0.0,
            torque_limit: 0.0,
            strength: 1.0,
            is_active: true,
        }
    }
}

/// Delay before a falling weapon first checks whether it has settled.
pub const FALL_THINK_DELAY: f32 = 0.1;

/// Break limit for weapons placed constrained, in pounds.
pub const START_CONSTRAINED_LIMIT_LBS: f32 = 10000.0;

/// Sound played when a hidden weapon respawns.
pub const MATERIALIZE_SOUND: &str = "AlyxEmp.Charge";
