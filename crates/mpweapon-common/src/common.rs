// common.rs — console printing shared by game and client

use parking_lot::Mutex;

// ============================================================
// Redirect buffer for Com_Printf
// ============================================================

static RD_BUFFER: Mutex<Option<String>> = Mutex::new(None);

/// Begin redirecting printf output into a buffer.
pub fn com_begin_redirect() {
    *RD_BUFFER.lock() = Some(String::new());
}

/// End redirect and return the captured output.
pub fn com_end_redirect() -> Option<String> {
    RD_BUFFER.lock().take()
}

// ============================================================
// Com_Printf / Com_DPrintf
// ============================================================

/// General-purpose print function. Prints to stdout, or appends to the
/// redirect buffer if one is active.
pub fn com_printf(msg: &str) {
    {
        let mut buf = RD_BUFFER.lock();
        if let Some(ref mut s) = *buf {
            s.push_str(msg);
            return;
        }
    }
    print!("{}", msg);
}

/// Developer-only print, gated on the "developer" cvar.
/// Must not be called while the cvar context is locked.
pub fn com_dprintf(msg: &str) {
    if crate::cvar::cvar_variable_value("developer") == 0.0 {
        return;
    }
    com_printf(msg);
}
