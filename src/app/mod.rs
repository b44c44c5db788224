//! Viewer application: state, commands and the fetch channel

pub mod command;
pub mod state;
mod tree_actions;

use crate::config::Config;
use crate::model::repo::{parse_github_url, RepoId};
use crate::services::clipboard::Clipboard;
use crate::services::loader::{FetchCompletion, LoadSource, RepoLoader};
use crate::services::time_source::SharedTimeSource;
use crate::services::token::TokenStore;
use command::{command_for_key, Focus};
use crossterm::event::KeyEvent;
use state::TreeViewState;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// How long a status message (such as "Copied: ...") stays visible
pub const STATUS_MESSAGE_DURATION: Duration = Duration::from_millis(1500);

/// The interactive viewer
pub struct App {
    state: TreeViewState,
    config: Config,
    loader: RepoLoader,
    clipboard: Clipboard,
    time_source: SharedTimeSource,
    focus: Focus,
    token_input: String,
    token_store: Option<TokenStore>,
    status_message: Option<(String, Instant)>,
    completion_tx: Sender<FetchCompletion>,
    completion_rx: Receiver<FetchCompletion>,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        loader: RepoLoader,
        clipboard: Clipboard,
        time_source: SharedTimeSource,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel();
        Self {
            state: TreeViewState::new(config.expand_folders),
            config,
            loader,
            clipboard,
            time_source,
            focus: Focus::Tree,
            token_input: String::new(),
            token_store: None,
            status_message: None,
            completion_tx,
            completion_rx,
            should_quit: false,
        }
    }

    /// Persist tokens entered at the prompt in `store`
    pub fn with_token_store(mut self, store: TokenStore) -> Self {
        self.token_store = Some(store);
        self
    }

    /// What has been typed at the token prompt so far
    pub fn token_input(&self) -> &str {
        &self.token_input
    }

    pub fn state(&self) -> &TreeViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TreeViewState {
        &mut self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn time_source(&self) -> &SharedTimeSource {
        &self.time_source
    }

    /// Resolve a repository URL (or `owner/repo`) and start loading it
    pub fn open(&mut self, input: &str, force_refresh: bool) -> Option<RepoId> {
        match parse_github_url(input) {
            Some(repo) => {
                self.request_load(repo.clone(), force_refresh);
                Some(repo)
            }
            None => {
                tracing::warn!("Not a GitHub repository: {:?}", input);
                self.state.invalid_repo();
                None
            }
        }
    }

    /// Start a background load
    pub fn request_load(&mut self, repo: RepoId, force_refresh: bool) {
        tracing::info!("Loading {} (refresh: {})", repo, force_refresh);
        self.state.begin_loading(repo.clone());
        self.loader
            .spawn(repo, force_refresh, self.completion_tx.clone());
    }

    /// Install every completed load, in arrival order
    ///
    /// Returns true if anything changed.
    pub fn drain_completions(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply_completion(completion);
            changed = true;
        }
        changed
    }

    /// Block until one load completes or `timeout` passes
    pub fn wait_for_completion(&mut self, timeout: Duration) -> bool {
        match self.completion_rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.apply_completion(completion);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    fn apply_completion(&mut self, completion: FetchCompletion) {
        let FetchCompletion { repo, result } = completion;
        match result {
            Ok((snapshot, source)) => {
                if source == LoadSource::Cache {
                    tracing::debug!("Showing cached copy of {}", repo);
                }
                self.state.install(repo, snapshot);
            }
            Err(e) => self.state.fail(&e),
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(command) = command_for_key(key, self.focus) {
            self.execute(command);
        }
    }

    /// Show a message in the status bar for a short while
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, self.time_source.now()));
    }

    /// The status message, while it is still fresh
    pub fn status_message(&self) -> Option<&str> {
        let (message, since) = self.status_message.as_ref()?;
        (self.time_source.elapsed_since(*since) < STATUS_MESSAGE_DURATION)
            .then_some(message.as_str())
    }
}
