//! Drives a viewer `App` against a ratatui `TestBackend`

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use repotree::app::App;
use repotree::config::Config;
use repotree::services::cache::RepoCache;
use repotree::services::clipboard::Clipboard;
use repotree::services::github::RepoDataSource;
use repotree::services::loader::RepoLoader;
use repotree::services::time_source::TestTimeSource;
use repotree::services::token::TokenStore;
use repotree::ui::{self, Theme};
use std::sync::Arc;
use std::time::Duration;

pub struct ViewerHarness {
    app: App,
    terminal: Terminal<TestBackend>,
    theme: Theme,
    pub time: Arc<TestTimeSource>,
}

impl ViewerHarness {
    pub fn new(
        source: Arc<dyn RepoDataSource>,
        cache: Option<RepoCache>,
        config: Config,
        width: u16,
        height: u16,
    ) -> Self {
        let time = TestTimeSource::shared();
        let loader = RepoLoader::new(source, cache, time.clone());
        let theme = Theme::resolve(config.theme, config.transparent);
        let app = App::new(config, loader, Clipboard::internal_only(), time.clone());
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        Self {
            app,
            terminal,
            theme,
            time,
        }
    }

    /// Keep tokens typed at the prompt in `store`
    pub fn with_token_store(mut self, store: TokenStore) -> Self {
        self.app = self.app.with_token_store(store);
        self
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Open a repository and wait for the load to land
    pub fn open_and_wait(&mut self, input: &str) {
        self.app.open(input, false);
        self.wait_for_load();
    }

    pub fn wait_for_load(&mut self) {
        assert!(
            self.app.wait_for_completion(Duration::from_secs(10)),
            "load did not complete"
        );
        self.render();
    }

    pub fn render(&mut self) {
        let app = &mut self.app;
        let theme = &self.theme;
        self.terminal
            .draw(|frame| ui::draw(frame, app, theme))
            .unwrap();
    }

    pub fn press(&mut self, code: KeyCode) {
        self.app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        self.render();
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.app
                .handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        self.render();
    }

    /// Screen contents, one string per row
    pub fn screen_rows(&self) -> Vec<String> {
        let buffer = self.terminal.backend().buffer();
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    pub fn screen_text(&self) -> String {
        self.screen_rows().join("\n")
    }

    pub fn status_bar(&self) -> String {
        self.screen_rows().pop().unwrap_or_default()
    }

    pub fn assert_screen_contains(&self, needle: &str) {
        let screen = self.screen_text();
        assert!(
            screen.contains(needle),
            "expected {:?} on screen:\n{}",
            needle,
            screen
        );
    }

    pub fn assert_screen_not_contains(&self, needle: &str) {
        let screen = self.screen_text();
        assert!(
            !screen.contains(needle),
            "did not expect {:?} on screen:\n{}",
            needle,
            screen
        );
    }
}
