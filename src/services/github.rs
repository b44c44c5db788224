//! GitHub REST API data source
//!
//! Two requests per repository: the repository details (for the default
//! branch and header text), then the recursive tree listing of that branch.

use super::time_source::{RealTimeSource, SharedTimeSource};
use crate::model::entry::FlatEntry;
use crate::model::repo::{FetchError, RepoId, RepoMetadata, RepoSnapshot};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Where repository data comes from
///
/// Implementations are called from background threads.
pub trait RepoDataSource: Send + Sync {
    /// Fetch details and the full flat listing of a repository
    fn fetch(&self, repo: &RepoId) -> Result<RepoSnapshot, FetchError>;

    /// Replace the credentials used by later fetches
    ///
    /// Sources that take no credentials ignore this.
    fn set_token(&self, _token: Option<String>) {}
}

const USER_AGENT: &str = concat!("repotree/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github.v3+json";

const DETAILS_FALLBACK: &str = "Could not fetch repository details.";
const TREE_FALLBACK: &str = "Could not fetch repository tree.";

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<FlatEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Blocking GitHub client
pub struct GitHubClient {
    agent: ureq::Agent,
    base_url: String,
    token: RwLock<Option<String>>,
    time_source: SharedTimeSource,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(usable_token(token)),
            time_source: RealTimeSource::shared(),
        }
    }

    /// Use a different clock for the fetch timestamp
    pub fn with_time_source(mut self, time_source: SharedTimeSource) -> Self {
        self.time_source = time_source;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        fallback: &str,
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.agent.get(&url).set("Accept", ACCEPT);
        for (key, value) in query {
            request = request.query(key, value);
        }
        if let Some(token) = self.current_token() {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        tracing::debug!("GET {}", url);
        match request.call() {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| FetchError::Network(e.to_string()))?;
                serde_json::from_str(&body).map_err(|e| {
                    tracing::warn!("Unreadable response from {}: {}", url, e);
                    FetchError::Api(fallback.to_string())
                })
            }
            Err(ureq::Error::Status(status, response)) => {
                let remaining = response
                    .header("X-RateLimit-Remaining")
                    .map(|v| v.trim().to_string());
                if status == 403 && remaining.as_deref() == Some("0") {
                    tracing::warn!("GitHub rate limit exhausted ({})", url);
                    return Err(FetchError::RateLimited);
                }

                let message = response
                    .into_string()
                    .ok()
                    .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
                    .and_then(|body| body.message)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| fallback.to_string());
                tracing::warn!("GitHub returned {} for {}: {}", status, url, message);
                Err(FetchError::Api(message))
            }
            Err(ureq::Error::Transport(transport)) => {
                tracing::warn!("Request to {} failed: {}", url, transport);
                Err(FetchError::Network(transport.to_string()))
            }
        }
    }
}

fn usable_token(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

impl RepoDataSource for GitHubClient {
    fn set_token(&self, token: Option<String>) {
        let token = usable_token(token);
        tracing::info!(
            "GitHub requests are now {}",
            if token.is_some() { "authenticated" } else { "anonymous" }
        );
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn fetch(&self, repo: &RepoId) -> Result<RepoSnapshot, FetchError> {
        let repo_path = format!("/repos/{}/{}", repo.owner, repo.repo);

        let metadata: RepoMetadata = self.get_json(&repo_path, &[], DETAILS_FALLBACK)?;

        let tree_path = format!("{}/git/trees/{}", repo_path, metadata.default_branch);
        let listing: TreeResponse =
            self.get_json(&tree_path, &[("recursive", "1")], TREE_FALLBACK)?;

        if listing.truncated {
            tracing::warn!(
                "Tree listing for {} was truncated at {} entries",
                repo,
                listing.tree.len()
            );
        }
        tracing::info!(
            "Fetched {} ({} entries, branch {})",
            repo,
            listing.tree.len(),
            metadata.default_branch
        );

        Ok(RepoSnapshot {
            metadata,
            entries: listing.tree,
            truncated: listing.truncated,
            fetched_at_ms: self.time_source.now_millis(),
        })
    }
}
