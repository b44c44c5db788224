//! Where diagnostics go
//!
//! The viewer owns the terminal, so logs go to a file instead:
//! `$XDG_STATE_HOME/repotree/logs/repotree-{pid}.log`, or
//! `~/.local/state/repotree/logs/` when the variable is unset. Files left by
//! processes that have exited are deleted at startup once they are a day old.

use crate::config_io::DirectoryContext;
use std::fs::{self, DirEntry};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

const STALE_AFTER: Duration = Duration::from_secs(24 * 60 * 60);
const LOG_PREFIX: &str = "repotree-";

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// The log directory, created on first use
///
/// Falls back to a directory under the system temp dir when the state
/// directory cannot be created.
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let fallback = std::env::temp_dir().join("repotree-logs");
        let Some(dir) = state_log_dir() else {
            return fallback;
        };
        match fs::create_dir_all(&dir) {
            Ok(()) => dir,
            Err(e) => {
                tracing::warn!("Cannot create {}: {}", dir.display(), e);
                fallback
            }
        }
    })
}

fn state_log_dir() -> Option<PathBuf> {
    let state_home = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("state")))?;
    Some(state_home.join("repotree").join("logs"))
}

/// This process's log file
pub fn main_log_path() -> PathBuf {
    log_dir().join(format!("{}{}.log", LOG_PREFIX, std::process::id()))
}

/// Delete day-old logs of processes that are gone
pub fn cleanup_stale_logs() {
    let Ok(entries) = fs::read_dir(log_dir()) else {
        return;
    };
    let own_pid = std::process::id();
    for entry in entries.flatten() {
        if !is_stale(&entry, own_pid) {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => tracing::debug!("Removed stale log {}", entry.path().display()),
            Err(e) => tracing::debug!("Could not remove {}: {}", entry.path().display(), e),
        }
    }
}

fn is_stale(entry: &DirEntry, own_pid: u32) -> bool {
    let Some(pid) = log_file_pid(&entry.file_name().to_string_lossy()) else {
        return false;
    };
    if pid == own_pid || process_alive(pid) {
        return false;
    }
    let Ok(metadata) = entry.metadata() else {
        return false;
    };
    metadata.is_file()
        && metadata
            .modified()
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .is_some_and(|age| age > STALE_AFTER)
}

/// PID of a log file named `repotree-{pid}.log`
fn log_file_pid(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix(LOG_PREFIX)?
        .strip_suffix(".log")?
        .parse()
        .ok()
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    // Signal 0 delivers nothing; EPERM still means the process exists
    unsafe {
        libc::kill(pid as libc::pid_t, 0) == 0
            || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
    }
}

#[cfg(windows)]
fn process_alive(pid: u32) -> bool {
    use windows_sys::Win32::Foundation::CloseHandle;
    use windows_sys::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
        if handle.is_null() {
            return false;
        }
        CloseHandle(handle);
        true
    }
}

#[cfg(not(any(unix, windows)))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// `--show-paths` output
pub fn print_all_paths(dirs: &DirectoryContext) {
    println!("Config directory: {}", dirs.config_dir.display());
    println!("  config file:    {}", dirs.config_path().display());
    println!("  stored token:   {}", dirs.token_path().display());
    println!("Cache directory:  {}", dirs.cache_dir.display());
    println!("  repositories:   {}", dirs.repo_cache_dir().display());
    println!("Log directory:    {}", log_dir().display());
}
