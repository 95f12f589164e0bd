// q_shared.rs — foundational types and math shared by game and client

// ============================================================
// Basic types
// ============================================================

pub type Vec3 = [f32; 3];

pub const VEC3_ORIGIN: Vec3 = [0.0, 0.0, 0.0];

// angle indexes
pub const PITCH: usize = 0; // up / down
pub const YAW: usize = 1; // left / right
pub const ROLL: usize = 2; // fall over

pub const MAX_TOKEN_CHARS: usize = 1024;

// ============================================================
// Cvar flags
// ============================================================

pub const CVAR_NOSET: i32 = 8; // don't allow change from console at all
pub const CVAR_CHEAT: i32 = 32; // only settable while sv_cheats is on

// ============================================================
// Content masks
// ============================================================

pub const CONTENTS_SOLID: i32 = 1;
pub const CONTENTS_WINDOW: i32 = 2;
pub const CONTENTS_GRATE: i32 = 0x8;
pub const CONTENTS_MOVEABLE: i32 = 0x4000;
pub const CONTENTS_MONSTER: i32 = 0x2000000;

pub const MASK_SOLID: i32 =
    CONTENTS_SOLID | CONTENTS_MOVEABLE | CONTENTS_WINDOW | CONTENTS_MONSTER | CONTENTS_GRATE;

// ============================================================
// MATHLIB — Vector operations
// ============================================================

/// veca + scale * vecb
pub fn vector_ma(veca: &Vec3, scale: f32, vecb: &Vec3) -> Vec3 {
    [
        veca[0] + scale * vecb[0],
        veca[1] + scale * vecb[1],
        veca[2] + scale * vecb[2],
    ]
}

pub fn vector_compare(v1: &Vec3, v2: &Vec3) -> bool {
    v1[0] == v2[0] && v1[1] == v2[1] && v1[2] == v2[2]
}

/// Length of the horizontal (x, y) part of a vector.
pub fn vector_length_2d(v: &Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

// ============================================================
// Scalar helpers
// ============================================================

/// Clamp without the `min <= max` precondition of `f32::clamp`.
/// The upper bound wins when the range is inverted.
#[inline]
pub fn clamp_f32(value: f32, min: f32, max: f32) -> f32 {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Linearly map `val` from [a, b] onto [c, d]. No clamping.
pub fn remap_val(val: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    if a == b {
        return if val >= b { d } else { c };
    }
    c + (d - c) * (val - a) / (b - a)
}

/// Pounds to kilograms.
#[inline]
pub fn lbs2kg(lbs: f32) -> f32 {
    lbs * 0.453_592_37
}

// ============================================================
// Angle functions
// ============================================================

pub fn angle_vectors(
    angles: &Vec3,
    forward: Option<&mut Vec3>,
    right: Option<&mut Vec3>,
    up: Option<&mut Vec3>,
) {
    let angle_yaw = angles[YAW].to_radians();
    let sy = angle_yaw.sin();
    let cy = angle_yaw.cos();

    let angle_pitch = angles[PITCH].to_radians();
    let sp = angle_pitch.sin();
    let cp = angle_pitch.cos();

    let angle_roll = angles[ROLL].to_radians();
    let sr = angle_roll.sin();
    let cr = angle_roll.cos();

    if let Some(fwd) = forward {
        fwd[0] = cp * cy;
        fwd[1] = cp * sy;
        fwd[2] = -sp;
    }
    if let Some(r) = right {
        r[0] = -sr * sp * cy + -cr * -sy;
        r[1] = -sr * sp * sy + -cr * cy;
        r[2] = -sr * cp;
    }
    if let Some(u) = up {
        u[0] = cr * sp * cy + -sr * -sy;
        u[1] = cr * sp * sy + -sr * cy;
        u[2] = cr * cp;
    }
}

/// Convenience version of angle_vectors that returns a tuple (forward, right, up).
pub fn angle_vectors_tuple(angles: &Vec3) -> (Vec3, Vec3, Vec3) {
    let mut forward = [0.0f32; 3];
    let mut right = [0.0f32; 3];
    let mut up = [0.0f32; 3];
    angle_vectors(angles, Some(&mut forward), Some(&mut right), Some(&mut up));
    (forward, right, up)
}

// ============================================================
// Token parser
// ============================================================

/// One token out of `com_parse`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComToken {
    pub text: String,
    /// The token was a "quoted string", so `"{"` is text, not a brace.
    pub quoted: bool,
    /// The token reached MAX_TOKEN_CHARS and was dropped; `text` is empty.
    pub overflow: bool,
}

/// Parse one token from `data`, handling // comments, "quoted strings" and
/// the single-character tokens `{` and `}`. Returns `(token, remaining)`;
/// `remaining` is `None` once the input is exhausted.
pub fn com_parse(data: &str) -> (ComToken, Option<&str>) {
    let mut chars = data.as_bytes();
    let mut token = ComToken::default();

    // skip whitespace
    loop {
        while !chars.is_empty() && chars[0] <= b' ' {
            if chars[0] == 0 {
                return (token, None);
            }
            chars = &chars[1..];
        }
        if chars.is_empty() {
            return (token, None);
        }

        // skip // comments
        if chars.len() >= 2 && chars[0] == b'/' && chars[1] == b'/' {
            while !chars.is_empty() && chars[0] != b'\n' {
                chars = &chars[1..];
            }
            continue;
        }
        break;
    }

    // braces are tokens on their own
    if chars[0] == b'{' || chars[0] == b'}' {
        token.text.push(chars[0] as char);
        return (token, rest_of(data, &chars[1..]));
    }

    // handle quoted strings
    if chars[0] == b'"' {
        token.quoted = true;
        chars = &chars[1..];
        let start = data.len() - chars.len();
        let mut len = 0;
        while len < chars.len() && chars[len] != b'"' {
            len += 1;
        }
        if len < MAX_TOKEN_CHARS {
            token.text.push_str(&data[start..start + len]);
        } else {
            token.overflow = true;
        }
        chars = &chars[len..];
        if !chars.is_empty() {
            chars = &chars[1..]; // skip closing quote
        }
        return (token, rest_of(data, chars));
    }

    // parse regular word
    let start = data.len() - chars.len();
    let mut len = 0;
    while len < chars.len() && chars[len] > b' ' && chars[len] != b'{' && chars[len] != b'}' {
        len += 1;
    }
    if len < MAX_TOKEN_CHARS {
        token.text.push_str(&data[start..start + len]);
    } else {
        token.overflow = true;
    }
    (token, rest_of(data, &chars[len..]))
}

/// Tail of `data` that `chars` (a suffix of its bytes) still covers.
fn rest_of<'a>(data: &'a str, chars: &[u8]) -> Option<&'a str> {
    if chars.is_empty() {
        None
    } else {
        Some(&data[data.len() - chars.len()..])
    }
}

/// 1-based line number of the parse position, for error reporting.
pub fn com_line_of(data: &str, remaining: Option<&str>) -> usize {
    let consumed = match remaining {
        Some(r) => &data[..data.len() - r.len()],
        None => data,
    };
    consumed.bytes().filter(|&c| c == b'\n').count() + 1
}

// ============================================================
// Tests
// ============================================================
