//! Clipboard for copying repository paths
//!
//! A copied path always lands in the internal clipboard. Outside of
//! internal-only mode it is also sent to the system clipboard twice over:
//! - as an OSC 52 escape sequence through crossterm, which reaches the
//!   local clipboard even over SSH in terminals that support it
//! - through arboard (X11/Wayland/macOS/Windows APIs) for terminals that
//!   ignore OSC 52

use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use std::io::{stdout, Write};
use std::sync::Mutex;

/// On X11 the clipboard owner must stay alive to answer paste requests, so
/// the arboard handle lives for the whole process.
static SYSTEM_CLIPBOARD: Mutex<Option<arboard::Clipboard>> = Mutex::new(None);

/// Path clipboard with an optional system clipboard backend
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    /// Last copied text (always available)
    internal: String,
    /// When true, copies never touch the terminal or system clipboard
    internal_only: bool,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that only records copies (for tests and `--print`)
    pub fn internal_only() -> Self {
        Self {
            internal: String::new(),
            internal_only: true,
        }
    }

    /// Copy text to the internal clipboard and, unless internal-only, to
    /// the system clipboard
    ///
    /// Returns false only when no system route accepted the text. OSC 52
    /// cannot report whether the terminal honoured it, so a successful
    /// write of the escape sequence counts as accepted.
    pub fn copy(&mut self, text: &str) -> bool {
        self.internal = text.to_string();
        if self.internal_only {
            return true;
        }

        let osc52 = execute!(stdout(), CopyToClipboard::to_clipboard_from(text));
        if let Err(e) = &osc52 {
            tracing::debug!("OSC 52 clipboard copy failed: {}", e);
        }
        let _ = stdout().flush();

        let system = copy_to_system(text);
        tracing::debug!(
            "Copied {} bytes (osc52: {}, system: {})",
            text.len(),
            osc52.is_ok(),
            system
        );
        osc52.is_ok() || system
    }

    /// Last copied text
    pub fn get_internal(&self) -> &str {
        &self.internal
    }
}

fn copy_to_system(text: &str) -> bool {
    let Ok(mut guard) = SYSTEM_CLIPBOARD.lock() else {
        return false;
    };

    if guard.is_none() {
        match arboard::Clipboard::new() {
            Ok(cb) => *guard = Some(cb),
            Err(e) => {
                tracing::debug!("arboard clipboard init failed: {}", e);
                return false;
            }
        }
    }

    let Some(clipboard) = guard.as_mut() else {
        return false;
    };
    match clipboard.set_text(text) {
        Ok(()) => true,
        Err(e) => {
            // The owner may have been lost (e.g. the X server restarted)
            tracing::debug!("arboard copy failed: {}, recreating clipboard", e);
            match arboard::Clipboard::new() {
                Ok(mut fresh) => {
                    let ok = fresh.set_text(text).is_ok();
                    *guard = Some(fresh);
                    ok
                }
                Err(_) => false,
            }
        }
    }
}
