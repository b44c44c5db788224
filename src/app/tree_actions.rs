//! Command dispatch for the viewer

use super::command::{Command, Focus};
use super::state::Movement;
use super::App;

impl App {
    /// Run one command
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Move(movement) => self.state.navigate(movement),
            Command::Toggle => {
                self.state.toggle_selected();
            }
            Command::Expand => self.state.expand_selected(),
            Command::Collapse => self.state.collapse_selected(),
            Command::ToggleAll => self.state.toggle_all(),
            Command::CopyPath => self.copy_selected_path(),
            Command::Refresh => self.refresh(),
            Command::FocusSearch => self.focus = Focus::Search,
            Command::FocusTree => self.focus = Focus::Tree,
            Command::SearchInsert(c) => {
                let mut query = self.state.query().to_string();
                query.push(c);
                self.search(&query);
            }
            Command::SearchBackspace => {
                let mut query = self.state.query().to_string();
                if query.pop().is_some() {
                    self.search(&query);
                }
            }
            Command::SearchClear => {
                if !self.state.query().is_empty() {
                    self.search("");
                }
            }
            Command::FocusToken => self.focus = Focus::Token,
            Command::TokenInsert(c) => self.token_input.push(c),
            Command::TokenBackspace => {
                self.token_input.pop();
            }
            Command::SaveToken => self.save_token(),
            Command::CancelToken => {
                self.token_input.clear();
                self.focus = Focus::Tree;
            }
            Command::ForgetToken => self.forget_token(),
            Command::Quit => self.should_quit = true,
        }
    }

    /// Replace the query and keep the selection on a shown row
    pub fn search(&mut self, query: &str) {
        let outcome = self.state.on_search(query);
        if let Some(outcome) = outcome {
            if !outcome.is_inactive() && self.state.selected_row().is_none() {
                self.state.navigate(Movement::First);
            }
        }
    }

    /// Append pasted text to the search query or the token prompt
    pub fn paste(&mut self, text: &str) {
        let pasted: String = text.chars().filter(|c| !c.is_control()).collect();
        if pasted.is_empty() {
            return;
        }
        match self.focus {
            Focus::Search => {
                let query = format!("{}{}", self.state.query(), pasted);
                self.search(&query);
            }
            Focus::Token => self.token_input.push_str(&pasted),
            Focus::Tree => {}
        }
    }

    /// Use the typed token from now on and retry the current repository
    ///
    /// A blank entry leaves the prompt open and changes nothing.
    pub fn save_token(&mut self) {
        let token = self.token_input.trim().to_string();
        if token.is_empty() {
            return;
        }
        self.token_input.clear();
        self.focus = Focus::Tree;

        let stored = match &self.token_store {
            Some(store) => match store.save(&token) {
                Ok(saved) => saved,
                Err(e) => {
                    tracing::warn!("Could not store token at {}: {}", store.path().display(), e);
                    false
                }
            },
            None => false,
        };
        self.loader.set_token(Some(token));
        self.set_status_message(if stored {
            "Token saved".to_string()
        } else {
            "Token set for this session".to_string()
        });

        if let Some(repo) = self.state.repo().cloned() {
            if !self.state.is_loading() {
                self.request_load(repo, false);
            }
        }
    }

    /// Delete the stored token; later requests are anonymous
    pub fn forget_token(&mut self) {
        self.token_input.clear();
        self.focus = Focus::Tree;
        if let Some(store) = &self.token_store {
            if let Err(e) = store.clear() {
                tracing::warn!("Could not remove {}: {}", store.path().display(), e);
            }
        }
        self.loader.set_token(None);
        self.set_status_message("Token removed".to_string());
    }

    /// Copy the selected node's full path
    pub fn copy_selected_path(&mut self) {
        let Some(path) = self.state.selected_path() else {
            return;
        };
        if self.clipboard.copy(&path) {
            self.set_status_message(format!("Copied: {}", path));
        } else {
            self.set_status_message(format!("Could not copy {}", path));
        }
    }

    /// Refetch the current repository, bypassing the cache
    pub fn refresh(&mut self) {
        if self.state.is_loading() {
            return;
        }
        if let Some(repo) = self.state.repo().cloned() {
            self.request_load(repo, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::entry::FlatEntry;
    use crate::model::repo::{FetchError, RepoId, RepoMetadata, RepoOwner, RepoSnapshot};
    use crate::services::clipboard::Clipboard;
    use crate::services::github::RepoDataSource;
    use crate::services::loader::RepoLoader;
    use crate::services::time_source::TestTimeSource;
    use crate::services::token::TokenStore;
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedSource;

    impl RepoDataSource for FixedSource {
        fn fetch(&self, repo: &RepoId) -> Result<RepoSnapshot, FetchError> {
            Ok(RepoSnapshot {
                metadata: RepoMetadata {
                    full_name: repo.to_string(),
                    description: None,
                    html_url: format!("https://github.com/{}", repo),
                    default_branch: "main".into(),
                    owner: RepoOwner {
                        login: repo.owner.clone(),
                    },
                },
                entries: vec![
                    FlatEntry::blob("src/main.rs"),
                    FlatEntry::blob("src/lib.rs"),
                    FlatEntry::blob("Cargo.toml"),
                ],
                truncated: false,
                fetched_at_ms: 0,
            })
        }
    }

    fn app() -> (App, Arc<TestTimeSource>) {
        let time = TestTimeSource::shared();
        let loader = RepoLoader::new(Arc::new(FixedSource), None, time.clone());
        let app = App::new(
            Config::default(),
            loader,
            Clipboard::internal_only(),
            time.clone(),
        );
        (app, time)
    }

    fn loaded() -> (App, Arc<TestTimeSource>) {
        let (mut app, time) = app();
        app.open("https://github.com/o/r", false).unwrap();
        assert!(app.wait_for_completion(Duration::from_secs(5)));
        (app, time)
    }

    #[test]
    fn test_copy_path_flashes_message() {
        let (mut app, time) = loaded();
        app.execute(Command::CopyPath);
        assert_eq!(app.clipboard().get_internal(), "src");
        assert_eq!(app.status_message(), Some("Copied: src"));

        time.advance(Duration::from_millis(1600));
        assert_eq!(app.status_message(), None);
    }

    #[test]
    fn test_typing_in_search_filters() {
        let (mut app, _time) = loaded();
        app.execute(Command::FocusSearch);
        assert_eq!(app.focus(), Focus::Search);
        for c in "main".chars() {
            app.execute(Command::SearchInsert(c));
        }
        assert_eq!(app.state().query(), "main");
        assert_eq!(app.state().last_search().unwrap().matches, 1);

        app.execute(Command::SearchClear);
        assert!(app.state().last_search().is_none());
    }

    #[test]
    fn test_invalid_input_reports_error() {
        let (mut app, _time) = app();
        assert!(app.open("not a repo", false).is_none());
        assert!(matches!(
            app.state().status(),
            crate::app::state::ViewStatus::Error(_)
        ));
    }

    #[test]
    fn test_blank_token_keeps_prompt_open() {
        let (mut app, _time) = loaded();
        app.execute(Command::FocusToken);
        app.execute(Command::TokenInsert(' '));
        app.execute(Command::SaveToken);
        assert_eq!(app.focus(), Focus::Token);
        assert_eq!(app.status_message(), None);

        app.execute(Command::CancelToken);
        assert_eq!(app.focus(), Focus::Tree);
        assert_eq!(app.token_input(), "");
    }

    #[test]
    fn test_saved_token_is_stored_and_forgotten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_pat");
        let (app, _time) = loaded();
        let mut app = app.with_token_store(TokenStore::new(path.clone()));

        app.execute(Command::FocusToken);
        app.paste(" ghp_abc\n");
        app.execute(Command::SaveToken);
        assert_eq!(app.focus(), Focus::Tree);
        assert_eq!(app.token_input(), "");
        assert_eq!(app.status_message(), Some("Token saved"));
        assert_eq!(TokenStore::new(path.clone()).load().as_deref(), Some("ghp_abc"));
        assert!(app.wait_for_completion(Duration::from_secs(5)));

        app.execute(Command::FocusToken);
        app.execute(Command::ForgetToken);
        assert!(TokenStore::new(path).load().is_none());
        assert_eq!(app.status_message(), Some("Token removed"));
    }

    #[test]
    fn test_quit() {
        let (mut app, _time) = app();
        app.execute(Command::Quit);
        assert!(app.should_quit());
    }
}
