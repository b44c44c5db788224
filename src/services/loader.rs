//! Cache-then-network repository loading
//!
//! `load` is synchronous; `spawn` runs it on a background thread and hands
//! the result back over a channel, so the UI thread never blocks on I/O.

use super::cache::RepoCache;
use super::github::RepoDataSource;
use super::time_source::SharedTimeSource;
use crate::model::repo::{FetchError, RepoId, RepoSnapshot};
use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

/// Where a loaded snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Cache,
    Network,
}

/// Result of a background load
#[derive(Debug)]
pub struct FetchCompletion {
    pub repo: RepoId,
    pub result: Result<(RepoSnapshot, LoadSource), FetchError>,
}

/// Loads repositories through the cache, falling back to a data source
#[derive(Clone)]
pub struct RepoLoader {
    source: Arc<dyn RepoDataSource>,
    cache: Option<RepoCache>,
    time_source: SharedTimeSource,
}

impl RepoLoader {
    pub fn new(
        source: Arc<dyn RepoDataSource>,
        cache: Option<RepoCache>,
        time_source: SharedTimeSource,
    ) -> Self {
        Self {
            source,
            cache,
            time_source,
        }
    }

    pub fn cache(&self) -> Option<&RepoCache> {
        self.cache.as_ref()
    }

    /// Credentials for later loads; cached snapshots are unaffected
    pub fn set_token(&self, token: Option<String>) {
        self.source.set_token(token);
    }

    /// Load a repository
    ///
    /// Unless `force_refresh` is set, a fresh cache entry is returned
    /// without touching the network. Fetched snapshots are written back to
    /// the cache; failed fetches leave the cache untouched.
    pub fn load(
        &self,
        repo: &RepoId,
        force_refresh: bool,
    ) -> Result<(RepoSnapshot, LoadSource), FetchError> {
        if !force_refresh {
            if let Some(cache) = &self.cache {
                if let Some(snapshot) = cache.read(repo, self.time_source.now_millis()) {
                    return Ok((snapshot, LoadSource::Cache));
                }
            }
        }

        let snapshot = self.source.fetch(repo)?;
        if let Some(cache) = &self.cache {
            cache.write(repo, &snapshot);
        }
        Ok((snapshot, LoadSource::Network))
    }

    /// Load on a background thread, sending the completion to `sender`
    ///
    /// Loads are never cancelled. If the receiver is gone by the time the
    /// load finishes, the result is dropped. Exactly one completion is sent
    /// per call, including when no thread could be started.
    pub fn spawn(&self, repo: RepoId, force_refresh: bool, sender: Sender<FetchCompletion>) {
        let loader = self.clone();
        let thread_sender = sender.clone();
        let thread_repo = repo.clone();
        let spawned = thread::Builder::new()
            .name(format!("fetch-{}", repo))
            .spawn(move || {
                let repo = thread_repo;
                let result = loader.load(&repo, force_refresh);
                if let Err(e) = &result {
                    tracing::debug!("Load of {} failed: {}", repo, e);
                }
                if thread_sender.send(FetchCompletion { repo, result }).is_err() {
                    tracing::debug!("Fetch finished after the viewer went away");
                }
            });

        if let Err(e) = spawned {
            report_spawn_failure(repo, &e, &sender);
        }
    }
}

/// Answer a load that never started with a network failure
fn report_spawn_failure(repo: RepoId, error: &io::Error, sender: &Sender<FetchCompletion>) {
    tracing::error!("Failed to spawn fetch thread for {}: {}", repo, error);
    let result = Err(FetchError::Network(format!(
        "Could not start fetching {}: {}",
        repo, error
    )));
    if sender.send(FetchCompletion { repo, result }).is_err() {
        tracing::debug!("Spawn failure reported after the viewer went away");
    }
}
