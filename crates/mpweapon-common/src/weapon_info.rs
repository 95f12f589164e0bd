// weapon_info.rs — weapon script data
//
// Each weapon class has a script `scripts/<classname>.txt`:
//
//     WeaponData
//     {
//         "printname"     "#MP_Pistol"
//         "playermodel"   "models/weapons/w_pistol.mdl"
//         "primary_ammo"  "Pistol"
//         "damage"        "8"
//         SoundData
//         {
//             "single_shot"   "Weapon_Pistol.Single"
//         }
//     }
//
// Scripts are parsed once and shared between every weapon of that class.

use crate::common::{com_dprintf, com_printf};
use crate::q_shared::{com_line_of, com_parse, MAX_TOKEN_CHARS};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================
// Shoot sounds
// ============================================================

/// Sound slots a weapon script can fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponSound {
    Empty = 0,
    Single,
    SingleNpc,
    WpnDouble,
    DoubleNpc,
    Burst,
    Reload,
    ReloadNpc,
    MeleeMiss,
    MeleeHit,
    MeleeHitWorld,
    Special1,
    Special2,
    Special3,
    Taunt,
    Deploy,
}

pub const NUM_SHOOT_SOUND_TYPES: usize = 16;

/// Script key for each sound slot, indexed by `WeaponSound as usize`.
const SHOOT_SOUND_KEYS: [&str; NUM_SHOOT_SOUND_TYPES] = [
    "empty",
    "single_shot",
    "single_shot_npc",
    "double_shot",
    "double_shot_npc",
    "burst",
    "reload",
    "reload_npc",
    "melee_miss",
    "melee_hit",
    "melee_hit_world",
    "special1",
    "special2",
    "special3",
    "taunt",
    "deploy",
];

impl WeaponSound {
    pub const ALL: [WeaponSound; NUM_SHOOT_SOUND_TYPES] = [
        WeaponSound::Empty,
        WeaponSound::Single,
        WeaponSound::SingleNpc,
        WeaponSound::WpnDouble,
        WeaponSound::DoubleNpc,
        WeaponSound::Burst,
        WeaponSound::Reload,
        WeaponSound::ReloadNpc,
        WeaponSound::MeleeMiss,
        WeaponSound::MeleeHit,
        WeaponSound::MeleeHitWorld,
        WeaponSound::Special1,
        WeaponSound::Special2,
        WeaponSound::Special3,
        WeaponSound::Taunt,
        WeaponSound::Deploy,
    ];

    pub fn script_key(self) -> &'static str {
        SHOOT_SOUND_KEYS[self as usize]
    }

    pub fn from_script_key(key: &str) -> Option<Self> {
        SHOOT_SOUND_KEYS
            .iter()
            .position(|k| k.eq_ignore_ascii_case(key))
            .map(|i| Self::ALL[i])
    }
}

// ============================================================
// Errors
// ============================================================

#[derive(Debug, Clone, PartialEq)]
pub enum WeaponInfoError {
    /// No script could be loaded for the class.
    NotFound(String),
    /// The script has no top-level WeaponData block.
    MissingSection(String),
    /// Malformed script text.
    Parse { line: usize, msg: String },
    /// A numeric key carried a non-numeric value.
    BadValue { key: String, value: String },
}

impl fmt::Display for WeaponInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeaponInfoError::NotFound(name) => write!(f, "weapon script not found: {}", name),
            WeaponInfoError::MissingSection(found) => {
                write!(f, "expected WeaponData block, found \"{}\"", found)
            }
            WeaponInfoError::Parse { line, msg } => write!(f, "line {}: {}", line, msg),
            WeaponInfoError::BadValue { key, value } => {
                write!(f, "bad value \"{}\" for key \"{}\"", value, key)
            }
        }
    }
}

impl std::error::Error for WeaponInfoError {}

// ============================================================
// Weapon info
// ============================================================

/// Multiplayer additions to the base script data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MpWeaponData {
    /// Damage dealt to players per bullet.
    pub player_damage: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponInfo {
    pub class_name: String,
    pub print_name: String,
    pub view_model: String,
    pub world_model: String,
    pub primary_ammo: String,
    pub secondary_ammo: String,
    pub max_clip1: i32,
    pub default_clip1: i32,
    pub weight: i32,
    /// Sound script names; empty means "no sound".
    pub shoot_sounds: [String; NUM_SHOOT_SOUND_TYPES],
    mp: Option<MpWeaponData>,
}

impl WeaponInfo {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            print_name: String::new(),
            view_model: String::new(),
            world_model: String::new(),
            primary_ammo: String::new(),
            secondary_ammo: String::new(),
            max_clip1: -1,
            default_clip1: -1,
            weight: 0,
            shoot_sounds: Default::default(),
            mp: None,
        }
    }

    /// Shoot sound for a slot, if the script set a non-empty one.
    pub fn shoot_sound(&self, sound: WeaponSound) -> Option<&str> {
        let s = self.shoot_sounds[sound as usize].as_str();
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }

    /// Multiplayer data; only present when the script carried a "damage" key.
    pub fn mp_weapon_data(&self) -> Option<&MpWeaponData> {
        self.mp.as_ref()
    }

    pub fn set_mp_weapon_data(&mut self, data: MpWeaponData) {
        self.mp = Some(data);
    }

    /// Parse a weapon script.
    pub fn parse(class_name: &str, text: &str) -> Result<Self, WeaponInfoError> {
        let mut tokens = Tokens::new(text);
        let mut info = WeaponInfo::new(class_name);

        match tokens.next()? {
            Some(Tok::Word(w)) if w.eq_ignore_ascii_case("WeaponData") => {}
            Some(other) => return Err(WeaponInfoError::MissingSection(other.into_text())),
            None => return Err(WeaponInfoError::MissingSection(String::new())),
        }
        tokens.expect_open()?;

        loop {
            let key = match tokens.next()? {
                Some(Tok::Word(key)) => key,
                Some(Tok::Close) => break,
                Some(Tok::Open) => return Err(tokens.error("unexpected '{'")),
                None => return Err(tokens.error("unexpected end of file")),
            };

            match tokens.next()? {
                Some(Tok::Word(value)) => info.set_key(&key, &value)?,
                Some(Tok::Open) if key.eq_ignore_ascii_case("SoundData") => {
                    info.parse_sounds(&mut tokens)?
                }
                Some(Tok::Open) => tokens.skip_block()?,
                Some(Tok::Close) | None => {
                    return Err(tokens.error(&format!("missing value for \"{}\"", key)))
                }
            }
        }

        Ok(info)
    }

    fn parse_sounds(&mut self, tokens: &mut Tokens) -> Result<(), WeaponInfoError> {
        loop {
            let key = match tokens.next()? {
                Some(Tok::Word(key)) => key,
                Some(Tok::Close) => return Ok(()),
                Some(Tok::Open) => return Err(tokens.error("unexpected '{' in SoundData")),
                None => return Err(tokens.error("unterminated SoundData")),
            };
            let value = match tokens.next()? {
                Some(Tok::Word(value)) => value,
                Some(_) => {
                    return Err(tokens.error(&format!("missing value for sound \"{}\"", key)))
                }
                None => return Err(tokens.error("unterminated SoundData")),
            };
            match WeaponSound::from_script_key(&key) {
                Some(slot) => self.shoot_sounds[slot as usize] = value,
                None => com_dprintf(&format!(
                    "{}: unknown sound slot \"{}\"\n",
                    self.class_name, key
                )),
            }
        }
    }

    fn set_key(&mut self, key: &str, value: &str) -> Result<(), WeaponInfoError> {
        let int_value = || {
            value.trim().parse::<i32>().map_err(|_| WeaponInfoError::BadValue {
                key: key.to_string(),
                value: value.to_string(),
            })
        };

        match key.to_ascii_lowercase().as_str() {
            "printname" => self.print_name = value.to_string(),
            "viewmodel" => self.view_model = value.to_string(),
            "playermodel" => self.world_model = value.to_string(),
            "primary_ammo" => self.primary_ammo = value.to_string(),
            "secondary_ammo" => self.secondary_ammo = value.to_string(),
            "clip_size" => self.max_clip1 = int_value()?,
            "default_clip" => self.default_clip1 = int_value()?,
            "weight" => self.weight = int_value()?,
            "damage" => {
                self.mp = Some(MpWeaponData {
                    player_damage: int_value()?,
                })
            }
            _ => {}
        }
        Ok(())
    }
}

/// Script token: block structure or a (possibly quoted) word.
enum Tok {
    Open,
    Close,
    Word(String),
}

impl Tok {
    fn into_text(self) -> String {
        match self {
            Tok::Open => "{".to_string(),
            Tok::Close => "}".to_string(),
            Tok::Word(w) => w,
        }
    }
}

/// Token cursor over script text.
struct Tokens<'a> {
    data: &'a str,
    rest: Option<&'a str>,
}

impl<'a> Tokens<'a> {
    fn new(data: &'a str) -> Self {
        Self { data, rest: Some(data) }
    }

    fn next(&mut self) -> Result<Option<Tok>, WeaponInfoError> {
        let Some(r) = self.rest else {
            return Ok(None);
        };
        let (tok, rest) = com_parse(r);
        self.rest = rest;

        if tok.overflow {
            return Err(self.error(&format!(
                "token longer than {} characters",
                MAX_TOKEN_CHARS - 1
            )));
        }
        if tok.text.is_empty() && !tok.quoted && rest.is_none() {
            return Ok(None);
        }

        // quoted braces are plain text
        let tok = if tok.quoted {
            Tok::Word(tok.text)
        } else if tok.text == "{" {
            Tok::Open
        } else if tok.text == "}" {
            Tok::Close
        } else {
            Tok::Word(tok.text)
        };
        Ok(Some(tok))
    }

    fn expect_open(&mut self) -> Result<(), WeaponInfoError> {
        match self.next()? {
            Some(Tok::Open) => Ok(()),
            _ => Err(self.error("expected '{'")),
        }
    }

    /// Skip a nested block whose opening brace was already consumed.
    fn skip_block(&mut self) -> Result<(), WeaponInfoError> {
        let mut depth = 1;
        while depth > 0 {
            match self.next()? {
                Some(Tok::Open) => depth += 1,
                Some(Tok::Close) => depth -= 1,
                Some(Tok::Word(_)) => {}
                None => return Err(self.error("unterminated block")),
            }
        }
        Ok(())
    }

    fn error(&self, msg: &str) -> WeaponInfoError {
        WeaponInfoError::Parse {
            line: com_line_of(self.data, self.rest),
            msg: msg.to_string(),
        }
    }
}

// ============================================================
// Weapon info database
// ============================================================

/// Callback for loading a script file by path. Returns None if missing.
pub type FsLoadFileFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Load and parse the script for a class. Parse errors are reported on the
/// console as well as returned.
fn load_script(load_file: Option<&FsLoadFileFn>, class_name: &str) -> Result<WeaponInfo, WeaponInfoError> {
    let path = WeaponInfoDatabase::script_path(class_name);
    let text = load_file
        .and_then(|load| load(&path))
        .ok_or_else(|| WeaponInfoError::NotFound(path.clone()))?;

    WeaponInfo::parse(class_name, &text).map_err(|e| {
        com_printf(&format!("Error parsing {}: {}\n", path, e));
        e
    })
}

pub struct WeaponInfoDatabase {
    infos: HashMap<String, Arc<WeaponInfo>>,
    load_file: Option<FsLoadFileFn>,
}

impl WeaponInfoDatabase {
    pub fn new() -> Self {
        Self {
            infos: HashMap::new(),
            load_file: None,
        }
    }

    pub fn with_loader(load_file: FsLoadFileFn) -> Self {
        Self {
            infos: HashMap::new(),
            load_file: Some(load_file),
        }
    }

    pub fn script_path(class_name: &str) -> String {
        format!("scripts/{}.txt", class_name)
    }

    /// Load (or return the cached) script data for a weapon class.
    pub fn precache(&mut self, class_name: &str) -> Result<Arc<WeaponInfo>, WeaponInfoError> {
        if let Some(info) = self.lookup(class_name) {
            return Ok(info);
        }
        let info = load_script(self.load_file.as_ref(), class_name)?;
        Ok(self.cache(info))
    }

    /// Register already-built script data, replacing any cached copy.
    pub fn insert(&mut self, info: WeaponInfo) -> Arc<WeaponInfo> {
        let info = Arc::new(info);
        self.infos
            .insert(info.class_name.to_ascii_lowercase(), Arc::clone(&info));
        info
    }

    /// Cache freshly loaded data unless the class is already cached.
    fn cache(&mut self, info: WeaponInfo) -> Arc<WeaponInfo> {
        let key = info.class_name.to_ascii_lowercase();
        Arc::clone(self.infos.entry(key).or_insert_with(|| Arc::new(info)))
    }

    pub fn lookup(&self, class_name: &str) -> Option<Arc<WeaponInfo>> {
        self.infos.get(&class_name.to_ascii_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

impl Default for WeaponInfoDatabase {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================
// Global database
// ============================================================

static WEAPON_INFO_DB: Mutex<Option<WeaponInfoDatabase>> = Mutex::new(None);

pub fn weapon_info_init(load_file: FsLoadFileFn) {
    *WEAPON_INFO_DB.lock() = Some(WeaponInfoDatabase::with_loader(load_file));
}

pub fn weapon_info_shutdown() {
    *WEAPON_INFO_DB.lock() = None;
}

/// Load script data for a class through the global database.
/// The loader runs without the database lock held, so it may precache
/// other classes itself.
pub fn weapon_info_precache(class_name: &str) -> Result<Arc<WeaponInfo>, WeaponInfoError> {
    let load_file = {
        let guard = WEAPON_INFO_DB.lock();
        let Some(db) = guard.as_ref() else {
            return Err(WeaponInfoError::NotFound(WeaponInfoDatabase::script_path(class_name)));
        };
        if let Some(info) = db.lookup(class_name) {
            return Ok(info);
        }
        db.load_file.clone()
    };

    let info = load_script(load_file.as_ref(), class_name)?;

    match WEAPON_INFO_DB.lock().as_mut() {
        Some(db) => Ok(db.cache(info)),
        // shut down while loading
        None => Ok(Arc::new(info)),
    }
}

// ============================================================
// Tests
// ============================================================
