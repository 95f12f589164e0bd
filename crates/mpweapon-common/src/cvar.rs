// cvar.rs — console variable tracking
//
// Weapon tuning (view bob cycle, bob up fraction, ...) is read through
// cvars. Variables flagged CVAR_CHEAT only change from the console while
// "sv_cheats" is non-zero.

use crate::common::com_printf;
use crate::q_shared::{CVAR_CHEAT, CVAR_NOSET};

use parking_lot::Mutex;
use std::collections::HashMap;

/// A console variable.
#[derive(Clone, Debug)]
pub struct Cvar {
    pub name: String,
    pub string: String,
    pub default_string: String,
    pub flags: i32,
    pub modified: bool,
    pub value: f32,
}

/// The cvar system context.
pub struct CvarContext {
    pub cvar_vars: Vec<Cvar>,
    /// O(1) cvar lookup by name -> index in cvar_vars
    cvar_index: HashMap<String, usize>,
}

fn parse_value(s: &str) -> f32 {
    s.trim().parse::<f32>().unwrap_or(0.0)
}

impl CvarContext {
    pub fn new() -> Self {
        Self {
            cvar_vars: Vec::new(),
            cvar_index: HashMap::new(),
        }
    }

    /// Find a cvar by name, returning its index.
    pub fn find_var_index(&self, name: &str) -> Option<usize> {
        self.cvar_index.get(name).copied()
    }

    pub fn find_var(&self, name: &str) -> Option<&Cvar> {
        self.cvar_index.get(name).map(|&idx| &self.cvar_vars[idx])
    }

    /// Get the floating-point value of a cvar. Returns 0 if not found.
    pub fn variable_value(&self, name: &str) -> f32 {
        self.find_var(name).map_or(0.0, |var| var.value)
    }

    /// Get the string value of a cvar. Returns "" if not found.
    pub fn variable_string(&self, name: &str) -> &str {
        self.find_var(name).map_or("", |var| var.string.as_str())
    }

    /// Get or create a cvar. If it already exists, the value is not changed
    /// but flags are OR'd in.
    pub fn get(&mut self, name: &str, value: &str, flags: i32) -> usize {
        if let Some(&idx) = self.cvar_index.get(name) {
            self.cvar_vars[idx].flags |= flags;
            return idx;
        }

        let idx = self.cvar_vars.len();
        self.cvar_vars.push(Cvar {
            name: name.to_string(),
            string: value.to_string(),
            default_string: value.to_string(),
            flags,
            modified: true,
            value: parse_value(value),
        });
        self.cvar_index.insert(name.to_string(), idx);
        idx
    }

    fn cheats_enabled(&self) -> bool {
        self.variable_value("sv_cheats") != 0.0
    }

    fn set2(&mut self, name: &str, value: &str, force: bool) -> usize {
        let idx = match self.find_var_index(name) {
            Some(idx) => idx,
            None => return self.get(name, value, 0),
        };

        if !force {
            let flags = self.cvar_vars[idx].flags;
            if flags & CVAR_NOSET != 0 {
                com_printf(&format!("{} is write protected.\n", name));
                return idx;
            }
            if flags & CVAR_CHEAT != 0 && !self.cheats_enabled() {
                com_printf(&format!("Can't change cheat cvar '{}' unless sv_cheats is set.\n", name));
                return idx;
            }
        }

        let var = &mut self.cvar_vars[idx];
        if value == var.string {
            return idx; // not changed
        }

        var.modified = true;
        var.string = value.to_string();
        var.value = parse_value(value);

        if name == "sv_cheats" && !self.cheats_enabled() {
            self.revert_cheats();
        }
        idx
    }

    /// Set a cvar value (respects NOSET and CHEAT flags).
    pub fn set(&mut self, name: &str, value: &str) -> usize {
        self.set2(name, value, false)
    }

    /// Force-set a cvar value (ignores NOSET and CHEAT).
    pub fn force_set(&mut self, name: &str, value: &str) -> usize {
        self.set2(name, value, true)
    }

    /// Restore every cheat-protected cvar to its registered default.
    /// Run when sv_cheats is switched off.
    pub fn revert_cheats(&mut self) {
        for var in &mut self.cvar_vars {
            if var.flags & CVAR_CHEAT != 0 && var.string != var.default_string {
                var.string = var.default_string.clone();
                var.value = parse_value(&var.string);
                var.modified = true;
            }
        }
    }
}

impl Default for CvarContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================
// Global singleton and free-function wrappers
// ============================================================

static CVAR_CTX: Mutex<Option<CvarContext>> = Mutex::new(None);

pub fn cvar_init() {
    *CVAR_CTX.lock() = Some(CvarContext::new());
}

pub fn cvar_shutdown() {
    *CVAR_CTX.lock() = None;
}

pub fn cvar_variable_value(name: &str) -> f32 {
    CVAR_CTX.lock().as_ref().map_or(0.0, |c| c.variable_value(name))
}

/// Access the global cvar context with a closure. Returns None if not initialized.
pub fn with_cvar_ctx<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut CvarContext) -> R,
{
    CVAR_CTX.lock().as_mut().map(f)
}

// ============================================================
// Tests
// ============================================================
