// view_bob.rs — view-model bob oscillator driven by the owner's ground speed

use mpweapon_common::cvar::{with_cvar_ctx, CvarContext};
use mpweapon_common::q_shared::{
    angle_vectors_tuple, clamp_f32, remap_val, vector_ma, Vec3, CVAR_CHEAT, PITCH, ROLL, YAW,
};

use std::f32::consts::PI;

/// Speed at which the bob reaches full rate, and the hard speed limit.
pub const BOB_MAX_SPEED: f32 = 320.0;
const BOB_MIN: f32 = -7.0;
const BOB_MAX: f32 = 4.0;

// ============================================================
// Cvars
// ============================================================

/// Snapshot of the bob cvars for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BobCvars {
    /// cl_bobcycle: seconds per vertical cycle at full speed.
    pub cycle: f32,
    /// cl_bob: registered for compatibility; the oscillator does not read it.
    pub bob: f32,
    /// cl_bobup: fraction of the cycle spent rising.
    pub up: f32,
}

impl Default for BobCvars {
    fn default() -> Self {
        Self { cycle: 0.8, bob: 0.002, up: 0.5 }
    }
}

impl BobCvars {
    pub fn register(ctx: &mut CvarContext) {
        ctx.get("cl_bobcycle", "0.8", CVAR_CHEAT);
        ctx.get("cl_bob", "0.002", CVAR_CHEAT);
        ctx.get("cl_bobup", "0.5", CVAR_CHEAT);
    }

    pub fn from_ctx(ctx: &CvarContext) -> Self {
        Self {
            cycle: ctx.variable_value("cl_bobcycle"),
            bob: ctx.variable_value("cl_bob"),
            up: ctx.variable_value("cl_bobup"),
        }
    }

    /// Read the global cvars, registering them first if needed.
    /// Falls back to the defaults when the cvar system is not up.
    pub fn from_cvars() -> Self {
        with_cvar_ctx(|ctx| {
            Self::register(ctx);
            Self::from_ctx(ctx)
        })
        .unwrap_or_default()
    }

    /// Degenerate settings switch the bob off.
    pub fn is_valid(&self) -> bool {
        self.cycle > 0.0 && self.up > 0.0 && self.up < 1.0
    }
}

// ============================================================
// Oscillator
// ============================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BobOffsets {
    pub vertical: f32,
    pub lateral: f32,
}

impl BobOffsets {
    pub const ZERO: BobOffsets = BobOffsets { vertical: 0.0, lateral: 0.0 };
}

/// Bob oscillator state. Lives in the viewer's `ViewModelController`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewBob {
    pub bobtime: f32,
    pub lastbobtime: f32,
    pub lastspeed: f32,
    pub vertical: f32,
    pub lateral: f32,
}

/// Map a [0,1) cycle fraction onto a sine phase: the first `up` of the
/// cycle covers the rising half wave, the rest the falling half.
fn bob_phase(frac: f32, up: f32) -> f32 {
    if frac < up {
        PI * frac / up
    } else {
        PI + PI * (frac - up) / (1.0 - up)
    }
}

fn bob_wave(speed: f32, phase: f32) -> f32 {
    let amp = speed * 0.005;
    clamp_f32(amp * 0.3 + amp * 0.7 * phase.sin(), BOB_MIN, BOB_MAX)
}

impl ViewBob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offsets(&self) -> BobOffsets {
        BobOffsets { vertical: self.vertical, lateral: self.lateral }
    }

    /// Advance the oscillator. `speed` is the owner's horizontal speed, None
    /// when there is no owning player. Degenerate frames leave the state
    /// alone and return `BobOffsets::ZERO`.
    pub fn calc(&mut self, curtime: f32, frametime: f32, speed: Option<f32>, cvars: &BobCvars) -> BobOffsets {
        let speed = match speed {
            Some(speed) if frametime != 0.0 && cvars.is_valid() => speed,
            _ => return BobOffsets::ZERO,
        };

        let elapsed = curtime - self.lastbobtime;
        let max_delta = (elapsed * BOB_MAX_SPEED).max(0.0);

        // don't allow too big speed changes
        let speed = clamp_f32(speed, self.lastspeed - max_delta, self.lastspeed + max_delta);
        let speed = clamp_f32(speed, -BOB_MAX_SPEED, BOB_MAX_SPEED);
        self.lastspeed = speed;

        let bob_offset = remap_val(speed, 0.0, BOB_MAX_SPEED, 0.0, 1.0);
        self.bobtime += elapsed * bob_offset;
        self.lastbobtime = curtime;

        let cycle = cvars.cycle;
        let vfrac = (self.bobtime % cycle) / cycle;
        self.vertical = bob_wave(speed, bob_phase(vfrac, cvars.up));

        // lateral runs at half the rate
        let lfrac = (self.bobtime % (cycle * 2.0)) / (cycle * 2.0);
        self.lateral = bob_wave(speed, bob_phase(lfrac, cvars.up));

        self.offsets()
    }

    /// Offset a view-model origin and angles by the stored bob.
    pub fn apply(&self, origin: &mut Vec3, angles: &mut Vec3) {
        let (forward, _, _) = angle_vectors_tuple(angles);

        // scaled down to 40%
        *origin = vector_ma(origin, self.vertical * 0.4, &forward);

        // z bob a bit more
        origin[2] += self.vertical * 0.1;

        angles[ROLL] += self.vertical * 0.5;
        angles[PITCH] -= self.vertical * 0.4;
        angles[YAW] -= self.lateral * 0.3;
    }
}

// ============================================================
// Per-client view model
// ============================================================

/// View-model state owned by one viewer and shared by every weapon that
/// viewer holds, so switching weapons does not restart the bob.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewModelController {
    pub bob: ViewBob,
}

impl ViewModelController {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================
// Tests
// ============================================================
