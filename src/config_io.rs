//! Locating and loading configuration on disk
//!
//! System directory detection and config loading. These need runtime
//! dependencies (dirs) and are kept apart from config.rs so the schema
//! generator builds without them.

use crate::config::Config;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "repotree";

/// Directories the viewer reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryContext {
    /// Config directory for `config.json` and the stored token
    /// e.g., ~/.config/repotree on Linux
    pub config_dir: PathBuf,

    /// Cache directory for fetched repositories
    /// e.g., ~/.cache/repotree on Linux, ~/Library/Caches/repotree on macOS
    pub cache_dir: PathBuf,
}

impl DirectoryContext {
    /// Platform directories for the current user; used by `main` only
    ///
    /// On macOS the config lives in `~/.config/repotree` rather than under
    /// `Application Support`, matching where terminal users look for it.
    pub fn from_system() -> std::io::Result<Self> {
        let missing = |what: &str| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("No {} directory for this user", what),
            )
        };

        let config_base = if cfg!(target_os = "macos") {
            dirs::home_dir().map(|home| home.join(".config"))
        } else {
            None
        };
        let config_dir = config_base
            .or_else(dirs::config_dir)
            .ok_or_else(|| missing("config"))?
            .join(APP_DIR);
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| missing("cache"))?
            .join(APP_DIR);

        Ok(Self {
            config_dir,
            cache_dir,
        })
    }

    /// Directories under a temp dir, for tests
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            config_dir: temp_dir.join("config"),
            cache_dir: temp_dir.join("cache"),
        }
    }

    /// `config.json`
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// Get the stored personal access token path
    pub fn token_path(&self) -> PathBuf {
        self.config_dir.join("github_pat")
    }

    /// Get the directory holding one cache file per repository
    pub fn repo_cache_dir(&self) -> PathBuf {
        self.cache_dir.join("repos")
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file means defaults. An explicit path that cannot
    /// be loaded, or a default file that is broken, is logged and replaced
    /// by defaults as well, so a bad config never keeps the viewer from
    /// starting.
    pub fn load_or_default(dirs: &DirectoryContext, path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dirs.config_path());

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}
