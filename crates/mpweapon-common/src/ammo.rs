// ammo.rs — ammo type table
//
// Weapons name their ammo by string in their scripts; the game refers to it
// by index into this table.

/// One registered ammo type.
#[derive(Clone, Debug, PartialEq)]
pub struct AmmoType {
    pub name: String,
    pub max_carry: i32,
}

#[derive(Clone, Debug, Default)]
pub struct AmmoDef {
    types: Vec<AmmoType>,
}

impl AmmoDef {
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Stock multiplayer ammo types, in registration order.
    pub fn multiplayer_defaults() -> Self {
        let mut def = Self::new();
        def.add("AR2", 60);
        def.add("AR2AltFire", 3);
        def.add("Pistol", 150);
        def.add("SMG1", 225);
        def.add("357", 12);
        def.add("XBowBolt", 10);
        def.add("Buckshot", 30);
        def.add("RPG_Round", 3);
        def.add("SMG1_Grenade", 3);
        def.add("Grenade", 5);
        def.add("slam", 5);
        def
    }

    /// Register an ammo type and return its index. Registering a name twice
    /// returns the existing index.
    pub fn add(&mut self, name: &str, max_carry: i32) -> usize {
        if let Some(idx) = self.index(name) {
            return idx;
        }
        self.types.push(AmmoType {
            name: name.to_string(),
            max_carry,
        });
        self.types.len() - 1
    }

    /// Case-insensitive name lookup.
    pub fn index(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.types.iter().position(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, idx: usize) -> Option<&AmmoType> {
        self.types.get(idx)
    }

    pub fn max_carry(&self, idx: usize) -> i32 {
        self.get(idx).map_or(0, |t| t.max_carry)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// True if `ammo_type` is the index registered under `ammo_name`.
pub fn is_ammo_type(ammo_def: &AmmoDef, ammo_type: usize, ammo_name: &str) -> bool {
    ammo_def.index(ammo_name) == Some(ammo_type)
}
