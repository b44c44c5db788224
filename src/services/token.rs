//! Stored GitHub personal access token
//!
//! The token lives in a single-line file in the config directory, readable
//! only by the owner on Unix.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable checked before the stored token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored token, if any
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!("Failed to read token file {}: {}", self.path.display(), e);
                }
                None
            }
        }
    }

    /// Store a token, returning false for a blank one (nothing is written)
    pub fn save(&self, token: &str) -> io::Result<bool> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n", token))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!("Saved GitHub token to {}", self.path.display());
        Ok(true)
    }

    /// Remove the stored token
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Removed stored GitHub token");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Pick the token to use: explicit flag, then environment, then stored
pub fn resolve_token(
    flag: Option<&str>,
    env: Option<&str>,
    store: &TokenStore,
) -> Option<String> {
    let non_blank = |t: &&str| !t.trim().is_empty();
    flag.filter(non_blank)
        .or_else(|| env.filter(non_blank))
        .map(|t| t.trim().to_string())
        .or_else(|| store.load())
}
