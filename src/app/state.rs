use crate::model::repo::{FetchError, RepoId, RepoMetadata, RepoSnapshot};
use crate::model::tree::build_file_tree;
use crate::view::navigator::TreeNavigator;
use crate::view::render::{RenderOptions, RenderedNode, RenderedTree, ToggleError};
use crate::view::search::SearchOutcome;

/// Message shown when the repository argument cannot be resolved
pub const INVALID_REPO_MESSAGE: &str = "Invalid GitHub repository URL provided.";

/// What the main area shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// No repository requested yet
    Welcome,
    /// First load in progress
    Loading,
    /// A tree is installed
    Ready,
    /// The last load failed
    Error(String),
    /// The last load hit the API rate limit
    RateLimited,
}

/// Movement of the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
    Parent,
}

/// Everything one viewer session knows about the current repository
///
/// Fetch completions are installed in the order they arrive. A failed
/// fetch reports its error but keeps whatever tree is already installed.
#[derive(Debug)]
pub struct TreeViewState {
    status: ViewStatus,
    repo: Option<RepoId>,
    metadata: Option<RepoMetadata>,
    tree: Option<RenderedTree>,
    navigator: TreeNavigator,
    /// Raw query as typed
    query: String,
    last_search: Option<SearchOutcome>,
    /// State of the expand-all/collapse-all switch
    all_expanded: bool,
    /// Initial expansion for newly installed trees
    expand_folders: bool,
    fetched_at_ms: Option<u64>,
    truncated: bool,
    /// Loads requested but not yet completed
    pending: usize,
}

impl TreeViewState {
    pub fn new(expand_folders: bool) -> Self {
        Self {
            status: ViewStatus::Welcome,
            repo: None,
            metadata: None,
            tree: None,
            navigator: TreeNavigator::new(),
            query: String::new(),
            last_search: None,
            all_expanded: expand_folders,
            expand_folders,
            fetched_at_ms: None,
            truncated: false,
            pending: 0,
        }
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn repo(&self) -> Option<&RepoId> {
        self.repo.as_ref()
    }

    pub fn metadata(&self) -> Option<&RepoMetadata> {
        self.metadata.as_ref()
    }

    pub fn tree(&self) -> Option<&RenderedTree> {
        self.tree.as_ref()
    }

    pub fn navigator(&self) -> &TreeNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut TreeNavigator {
        &mut self.navigator
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Outcome of the active query, `None` when no query is active
    pub fn last_search(&self) -> Option<&SearchOutcome> {
        self.last_search.as_ref().filter(|s| !s.is_inactive())
    }

    pub fn all_expanded(&self) -> bool {
        self.all_expanded
    }

    pub fn fetched_at_ms(&self) -> Option<u64> {
        self.fetched_at_ms
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// A load for `repo` was started
    pub fn begin_loading(&mut self, repo: RepoId) {
        self.pending += 1;
        if self.repo.as_ref() != Some(&repo) {
            // A different repository: the old tree no longer applies
            self.tree = None;
            self.metadata = None;
            self.fetched_at_ms = None;
            self.navigator.reset();
        }
        self.repo = Some(repo);
        if self.tree.is_none() {
            self.status = ViewStatus::Loading;
        }
    }

    /// The repository argument could not be resolved
    pub fn invalid_repo(&mut self) {
        self.status = ViewStatus::Error(INVALID_REPO_MESSAGE.to_string());
    }

    /// Replace the tree with a freshly loaded snapshot
    ///
    /// The current query, if any, is applied to the new tree.
    pub fn install(&mut self, repo: RepoId, snapshot: RepoSnapshot) {
        self.pending = self.pending.saturating_sub(1);

        let tree = build_file_tree(Some(&snapshot.entries));
        let mut rendered = RenderedTree::render(
            tree,
            RenderOptions {
                initially_expanded: self.expand_folders,
            },
        );
        self.last_search = (!self.query.trim().is_empty()).then(|| rendered.apply_search(&self.query));

        tracing::info!(
            "Installed {} ({} files, {} directories)",
            repo,
            rendered.file_count(),
            rendered.directory_count()
        );

        self.tree = Some(rendered);
        self.repo = Some(repo);
        self.metadata = Some(snapshot.metadata);
        self.fetched_at_ms = Some(snapshot.fetched_at_ms);
        self.truncated = snapshot.truncated;
        self.all_expanded = self.expand_folders;
        self.status = ViewStatus::Ready;

        self.navigator.reset();
        self.clamp_selection();
    }

    /// Record a failed load; an installed tree stays as it is
    pub fn fail(&mut self, error: &FetchError) {
        self.pending = self.pending.saturating_sub(1);
        tracing::warn!("Load failed: {}", error);
        self.status = match error {
            FetchError::RateLimited => ViewStatus::RateLimited,
            other => ViewStatus::Error(other.to_string()),
        };
    }

    /// Expand or collapse one directory
    pub fn on_toggle(&mut self, path: &str) -> Result<bool, ToggleError> {
        let tree = self
            .tree
            .as_mut()
            .ok_or_else(|| ToggleError::NotFound(path.to_string()))?;
        let expanded = tree.toggle(path)?;
        self.clamp_selection();
        Ok(expanded)
    }

    /// Apply a new query (re-evaluated from scratch each time)
    pub fn on_search(&mut self, query: &str) -> Option<SearchOutcome> {
        self.query = query.to_string();
        let outcome = self.tree.as_mut().map(|tree| tree.apply_search(query));
        self.last_search = outcome.clone();
        self.clamp_selection();
        outcome
    }

    /// Set the expand-all switch, expanding or collapsing every directory
    pub fn on_expand_all_changed(&mut self, expand: bool) {
        self.all_expanded = expand;
        if let Some(tree) = self.tree.as_mut() {
            if expand {
                tree.expand_all();
            } else {
                tree.collapse_all();
            }
        }
        self.clamp_selection();
    }

    /// Flip the expand-all switch
    pub fn toggle_all(&mut self) {
        self.on_expand_all_changed(!self.all_expanded);
    }

    pub fn selected_row(&self) -> Option<&RenderedNode> {
        let tree = self.tree.as_ref()?;
        self.navigator.selected().and_then(|i| tree.row(i))
    }

    /// Path of the selected node
    pub fn selected_path(&self) -> Option<String> {
        self.selected_row().map(|row| row.full_path.clone())
    }

    /// Move the selection
    pub fn navigate(&mut self, movement: Movement) {
        let Some(tree) = self.tree.as_ref() else {
            return;
        };
        let nav = &mut self.navigator;
        match movement {
            Movement::Up => nav.select_prev(tree),
            Movement::Down => nav.select_next(tree),
            Movement::PageUp => nav.select_page_up(tree),
            Movement::PageDown => nav.select_page_down(tree),
            Movement::First => nav.select_first(tree),
            Movement::Last => nav.select_last(tree),
            Movement::Parent => nav.select_parent(tree),
        }
    }

    /// Toggle the selected directory; files are left alone
    pub fn toggle_selected(&mut self) -> Option<bool> {
        let row = self.selected_row()?;
        if !row.is_dir() {
            return None;
        }
        let path = row.full_path.clone();
        self.on_toggle(&path).ok()
    }

    /// Expand the selected directory, or step into it when already open
    pub fn expand_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if !row.is_dir() {
            return;
        }
        if row.expanded {
            self.navigate(Movement::Down);
        } else {
            let path = row.full_path.clone();
            let _ = self.on_toggle(&path);
        }
    }

    /// Collapse the selected directory, or move to its parent
    pub fn collapse_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.is_dir() && row.expanded {
            let path = row.full_path.clone();
            let _ = self.on_toggle(&path);
        } else {
            self.navigate(Movement::Parent);
        }
    }

    /// Record the number of tree rows on screen and keep the selection in view
    pub fn set_viewport_height(&mut self, height: usize) {
        self.navigator.set_viewport_height(height);
        if let Some(tree) = self.tree.as_ref() {
            self.navigator.ensure_visible(tree);
        }
    }

    fn clamp_selection(&mut self) {
        if let Some(tree) = self.tree.as_ref() {
            self.navigator.clamp(tree);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::FlatEntry;
    use crate::model::repo::RepoOwner;

    fn snapshot(entries: Vec<FlatEntry>) -> RepoSnapshot {
        RepoSnapshot {
            metadata: RepoMetadata {
                full_name: "o/r".into(),
                description: None,
                html_url: "https://github.com/o/r".into(),
                default_branch: "main".into(),
                owner: RepoOwner { login: "o".into() },
            },
            entries,
            truncated: false,
            fetched_at_ms: 7,
        }
    }

    fn repo() -> RepoId {
        RepoId::new("o", "r").unwrap()
    }

    fn sample() -> Vec<FlatEntry> {
        vec![
            FlatEntry::blob("src/index.ts"),
            FlatEntry::blob("src/lib/util.ts"),
            FlatEntry::blob("README.md"),
        ]
    }

    fn loaded(expand: bool) -> TreeViewState {
        let mut state = TreeViewState::new(expand);
        state.begin_loading(repo());
        state.install(repo(), snapshot(sample()));
        state
    }

    #[test]
    fn test_lifecycle() {
        let mut state = TreeViewState::new(false);
        assert_eq!(state.status(), &ViewStatus::Welcome);

        state.begin_loading(repo());
        assert_eq!(state.status(), &ViewStatus::Loading);
        assert!(state.is_loading());

        state.install(repo(), snapshot(sample()));
        assert_eq!(state.status(), &ViewStatus::Ready);
        assert!(!state.is_loading());
        assert_eq!(state.fetched_at_ms(), Some(7));
        assert_eq!(state.selected_path().as_deref(), Some("src"));
    }

    #[test]
    fn test_fail_keeps_installed_tree() {
        let mut state = loaded(false);
        state.begin_loading(repo());
        state.fail(&FetchError::RateLimited);

        assert_eq!(state.status(), &ViewStatus::RateLimited);
        assert!(state.tree().is_some());
        assert_eq!(state.metadata().unwrap().full_name, "o/r");

        state.fail(&FetchError::Api("Not Found".into()));
        assert_eq!(state.status(), &ViewStatus::Error("Not Found".into()));
    }

    #[test]
    fn test_expand_folders_on_install() {
        let state = loaded(true);
        assert!(state.all_expanded());
        let tree = state.tree().unwrap();
        assert_eq!(tree.display_rows().len(), tree.rows().len());
    }

    #[test]
    fn test_toggle_all_flips_every_directory() {
        let mut state = loaded(false);
        state.toggle_all();
        assert!(state.all_expanded());
        assert!(state.tree().unwrap().get("src/lib").unwrap().expanded);

        state.toggle_all();
        assert!(!state.all_expanded());
        assert!(!state.tree().unwrap().get("src").unwrap().expanded);
    }

    #[test]
    fn test_query_survives_reinstall() {
        let mut state = loaded(false);
        let outcome = state.on_search("util").unwrap();
        assert_eq!(outcome.matches, 1);

        state.begin_loading(repo());
        state.install(repo(), snapshot(sample()));
        assert_eq!(state.last_search().unwrap().matches, 1);
        assert!(!state.tree().unwrap().get("README.md").unwrap().visible);
    }

    #[test]
    fn test_search_without_tree_is_remembered() {
        let mut state = TreeViewState::new(false);
        assert!(state.on_search("util").is_none());
        state.begin_loading(repo());
        state.install(repo(), snapshot(sample()));
        assert_eq!(state.last_search().unwrap().query, "util");
    }

    #[test]
    fn test_toggle_errors() {
        let mut state = TreeViewState::new(false);
        assert!(matches!(state.on_toggle("src"), Err(ToggleError::NotFound(_))));

        let mut state = loaded(false);
        assert_eq!(state.on_toggle("src"), Ok(true));
        assert!(matches!(
            state.on_toggle("README.md"),
            Err(ToggleError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_keyboard_expand_and_collapse() {
        let mut state = loaded(false);
        // "src" is selected after install
        state.expand_selected();
        assert!(state.tree().unwrap().get("src").unwrap().expanded);

        state.expand_selected();
        assert_eq!(state.selected_path().as_deref(), Some("src/lib"));

        state.collapse_selected();
        assert_eq!(state.selected_path().as_deref(), Some("src"));

        state.collapse_selected();
        assert!(!state.tree().unwrap().get("src").unwrap().expanded);
    }

    #[test]
    fn test_collapsing_hides_selection_moves_to_parent() {
        let mut state = loaded(true);
        state.navigate(Movement::Down);
        state.navigate(Movement::Down);
        assert_eq!(state.selected_path().as_deref(), Some("src/lib/util.ts"));

        state.on_toggle("src").unwrap();
        assert_eq!(state.selected_path().as_deref(), Some("src"));
    }

    #[test]
    fn test_new_repository_drops_old_tree() {
        let mut state = loaded(false);
        state.begin_loading(RepoId::new("other", "repo").unwrap());
        assert!(state.tree().is_none());
        assert_eq!(state.status(), &ViewStatus::Loading);
    }

    #[test]
    fn test_invalid_repo_message() {
        let mut state = TreeViewState::new(false);
        state.invalid_repo();
        assert_eq!(
            state.status(),
            &ViewStatus::Error(INVALID_REPO_MESSAGE.to_string())
        );
    }
}
