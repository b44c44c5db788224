//! UI rendering modules
//!
//! - `header` - Repository name, description and link
//! - `search_bar` - Query input and the token prompt
//! - `tree_panel` - The collapsible file tree
//! - `messages` - Welcome, loading, error and rate-limit views
//! - `status_bar` - Counts, copy notices and key hints
//! - `theme` - Dark and light colors

pub mod header;
pub mod messages;
pub mod search_bar;
pub mod status_bar;
pub mod theme;
pub mod tree_panel;

pub use header::HeaderRenderer;
pub use messages::{MessageRenderer, MessageView};
pub use search_bar::SearchBarRenderer;
pub use status_bar::StatusBarRenderer;
pub use theme::Theme;
pub use tree_panel::TreePanelRenderer;

use crate::app::command::Focus;
use crate::app::state::ViewStatus;
use crate::app::App;
use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Draw the whole screen
pub fn draw(frame: &mut Frame, app: &mut App, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);

    let [header, search, main, status] = Layout::vertical([
        Constraint::Length(HeaderRenderer::HEIGHT),
        Constraint::Length(SearchBarRenderer::HEIGHT),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let focus = app.focus();
    let show_icons = app.config().show_icons;

    HeaderRenderer::render(app.state(), frame, header, theme);
    if focus == Focus::Token {
        SearchBarRenderer::render_token_prompt(app.token_input(), frame, search, theme);
    } else {
        SearchBarRenderer::render(app.state(), frame, search, theme, focus == Focus::Search);
    }

    if app.state().tree().is_some() {
        TreePanelRenderer::render(
            app.state_mut(),
            frame,
            main,
            theme,
            focus == Focus::Tree,
            show_icons,
        );
    } else {
        let view = match app.state().status() {
            ViewStatus::Welcome => MessageView::Welcome,
            ViewStatus::Loading | ViewStatus::Ready => MessageView::Loading,
            ViewStatus::Error(message) => MessageView::Error(message),
            ViewStatus::RateLimited => MessageView::RateLimited,
        };
        MessageRenderer::render(view, frame, main, theme);
    }

    StatusBarRenderer::render(app, frame, status, theme);
}

/// Cut `text` to at most `width` terminal columns, ending in `…` when cut
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
