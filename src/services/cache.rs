//! On-disk cache of fetched repositories
//!
//! One JSON file per repository, `{dir}/{owner}__{repo}.json`, holding the
//! snapshot with its fetch timestamp. Cache problems are never fatal: a
//! file that cannot be read or parsed is a miss, and a failed write only
//! means the next start fetches again.

use crate::model::repo::{RepoId, RepoSnapshot};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RepoCache {
    dir: PathBuf,
    ttl: Duration,
}

impl RepoCache {
    pub fn new(dir: PathBuf, ttl: Duration) -> Self {
        Self { dir, ttl }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cache file for a repository
    pub fn path_for(&self, repo: &RepoId) -> PathBuf {
        self.dir.join(format!(
            "{}__{}.json",
            sanitize(&repo.owner),
            sanitize(&repo.repo)
        ))
    }

    /// Return the cached snapshot if it is younger than the TTL at `now_ms`
    pub fn read(&self, repo: &RepoId, now_ms: u64) -> Option<RepoSnapshot> {
        let path = self.path_for(repo);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read cache {}: {}", path.display(), e);
                return None;
            }
        };

        let snapshot: RepoSnapshot = match serde_json::from_str(&contents) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache {}: {}", path.display(), e);
                return None;
            }
        };

        let age = Duration::from_millis(now_ms.saturating_sub(snapshot.fetched_at_ms));
        if age >= self.ttl {
            tracing::debug!("Cache for {} expired ({}s old)", repo, age.as_secs());
            return None;
        }

        tracing::debug!("Cache hit for {} ({}s old)", repo, age.as_secs());
        Some(snapshot)
    }

    /// Store a snapshot, logging (not returning) any failure
    pub fn write(&self, repo: &RepoId, snapshot: &RepoSnapshot) {
        let path = self.path_for(repo);
        let result = fs::create_dir_all(&self.dir).and_then(|()| {
            let json = serde_json::to_string(snapshot)?;
            fs::write(&path, json)
        });

        match result {
            Ok(()) => tracing::debug!("Cached {} at {}", repo, path.display()),
            Err(e) => tracing::warn!("Failed to write cache {}: {}", path.display(), e),
        }
    }

    /// Remove the cached entry for a repository
    pub fn clear(&self, repo: &RepoId) {
        let path = self.path_for(repo);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove cache {}: {}", path.display(), e);
            }
        }
    }
}

/// Keep file names portable; GitHub names are already mostly safe
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
