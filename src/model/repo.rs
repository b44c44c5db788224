//! Repository identity, metadata and fetch results
//!
//! These types cross the boundary between the data source (network and
//! cache) and the tree view, so they carry no I/O of their own.

use super::entry::FlatEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Owner and name of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    /// Build an id, rejecting empty parts and a bare `.git` repo name
    pub fn new(owner: &str, repo: &str) -> Option<Self> {
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Resolve a repository from a GitHub URL or an `owner/repo` shorthand.
///
/// Accepts:
/// - `https://github.com/owner/repo`
/// - `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo/tree/main/src` (extra segments ignored)
/// - `github.com/owner/repo` (scheme added)
/// - `owner/repo`
///
/// Returns `None` for anything else, including URLs on other hosts.
pub fn parse_github_url(input: &str) -> Option<RepoId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    match Url::parse(input) {
        Ok(url) => repo_from_url(&url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if input.starts_with("github.com/") || input.starts_with("www.github.com/") {
                let url = Url::parse(&format!("https://{input}")).ok()?;
                return repo_from_url(&url);
            }
            parse_shorthand(input)
        }
        Err(_) => None,
    }
}

fn repo_from_url(url: &Url) -> Option<RepoId> {
    let host = url.host_str()?;
    if !host.ends_with("github.com") {
        return None;
    }

    let mut parts = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = parts.next()?;
    let repo = parts.next()?;
    RepoId::new(owner, repo)
}

fn parse_shorthand(input: &str) -> Option<RepoId> {
    let (owner, repo) = input.split_once('/')?;
    let valid = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    };
    if !valid(owner) || !valid(repo) {
        return None;
    }
    RepoId::new(owner, repo)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOwner {
    #[serde(default)]
    pub login: String,
}

/// Repository details as returned by `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: String,
    pub default_branch: String,
    #[serde(default)]
    pub owner: RepoOwner,
}

impl RepoMetadata {
    /// Description, or `owner · branch` when the repository has none
    pub fn subtitle(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => description.to_string(),
            _ => format!("{} · {}", self.owner.login, self.default_branch),
        }
    }
}

/// Everything needed to show one repository: details plus the flat listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    #[serde(rename = "repo_details")]
    pub metadata: RepoMetadata,
    pub entries: Vec<FlatEntry>,
    /// The API stopped listing before the end of a very large tree
    #[serde(default)]
    pub truncated: bool,
    /// When the data was fetched, in milliseconds since the Unix epoch
    #[serde(rename = "timestamp")]
    pub fetched_at_ms: u64,
}

/// Why a repository could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never got a response
    Network(String),
    /// The API refused the request because the rate limit is exhausted
    RateLimited,
    /// The API answered with an error, or with something unreadable
    Api(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {msg}"),
            FetchError::RateLimited => write!(f, "GitHub API rate limit exceeded"),
            FetchError::Api(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FetchError {}
