//! Terminal setup for the viewer and its restore path
//!
//! The viewer needs raw input, its own screen, and paste delivered as one
//! event so a pasted query lands in the search bar. `TerminalModes` records
//! each mode as it is switched on and switches them off in reverse order
//! when dropped.

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{self, stdout, Write};

/// One terminal mode the viewer switches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Raw,
    AlternateScreen,
    BracketedPaste,
}

impl Mode {
    fn switch_on(self) -> io::Result<()> {
        match self {
            Mode::Raw => terminal::enable_raw_mode(),
            Mode::AlternateScreen => stdout().execute(EnterAlternateScreen).map(drop),
            Mode::BracketedPaste => stdout().execute(EnableBracketedPaste).map(drop),
        }
    }

    fn switch_off(self) -> io::Result<()> {
        match self {
            Mode::Raw => terminal::disable_raw_mode(),
            Mode::AlternateScreen => stdout().execute(LeaveAlternateScreen).map(drop),
            Mode::BracketedPaste => stdout().execute(DisableBracketedPaste).map(drop),
        }
    }
}

/// Modes currently switched on, in the order they were enabled
#[derive(Debug, Default)]
pub struct TerminalModes {
    enabled: Vec<Mode>,
}

impl TerminalModes {
    /// Switch the terminal into viewer mode
    ///
    /// Raw mode and the alternate screen are required; failing to get
    /// either undoes whatever was already switched on. Bracketed paste is
    /// optional.
    pub fn enable() -> Result<Self> {
        let mut modes = Self::default();
        for mode in [Mode::Raw, Mode::AlternateScreen] {
            if let Err(e) = modes.push(mode) {
                modes.undo();
                return Err(e).with_context(|| format!("Failed to enable {:?}", mode));
            }
        }
        if let Err(e) = modes.push(Mode::BracketedPaste) {
            tracing::warn!("Bracketed paste unavailable: {}", e);
        }
        Ok(modes)
    }

    fn push(&mut self, mode: Mode) -> io::Result<()> {
        mode.switch_on()?;
        tracing::debug!("Enabled {:?}", mode);
        self.enabled.push(mode);
        Ok(())
    }

    /// Switch off everything this instance switched on
    pub fn undo(&mut self) {
        while let Some(mode) = self.enabled.pop() {
            if let Err(e) = mode.switch_off() {
                tracing::warn!("Failed to disable {:?}: {}", mode, e);
            }
        }
        let _ = stdout().flush();
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Restore the terminal from a panic hook, where no `TerminalModes` is at hand
pub fn emergency_cleanup() {
    for mode in [Mode::BracketedPaste, Mode::AlternateScreen, Mode::Raw] {
        let _ = mode.switch_off();
    }
    let _ = stdout().flush();
}
