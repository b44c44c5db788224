use super::theme::Theme;
use super::truncate_to_width;
use crate::app::command::Focus;
use crate::app::state::{TreeViewState, ViewStatus};
use crate::app::App;
use crate::model::repo::FetchError;
use crate::services::time_source::format_local;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

const TREE_HINTS: &str = "/ search  e expand all  c copy  r refresh  q quit";
const SEARCH_HINTS: &str = "Enter done  Esc back  Ctrl+U clear";
const TOKEN_HINTS: &str = "Enter save  Esc cancel  Ctrl+D forget stored token";

/// One-line status bar at the bottom of the screen
pub struct StatusBarRenderer;

impl StatusBarRenderer {
    pub fn render(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
        let state = app.state();
        let width = area.width as usize;

        let (left, left_style) = match app.status_message() {
            Some(message) => (message.to_string(), Style::default().fg(theme.notice_fg)),
            None => Self::summary(state, theme),
        };

        let mut right = String::new();
        if let Some(updated) = state.fetched_at_ms().and_then(format_local) {
            right.push_str(&format!("Last updated: {}  ", updated));
        }
        right.push_str(match app.focus() {
            Focus::Tree => TREE_HINTS,
            Focus::Search => SEARCH_HINTS,
            Focus::Token => TOKEN_HINTS,
        });

        // The summary keeps priority over the right-hand side
        let left = truncate_to_width(&left, width);
        let remaining = width.saturating_sub(left.width() + 1);
        let right = if right.width() <= remaining {
            right
        } else {
            String::new()
        };
        let padding = width.saturating_sub(left.width() + right.width());

        let line = Line::from(vec![
            Span::styled(left, left_style),
            Span::raw(" ".repeat(padding)),
            Span::styled(right, Style::default().fg(theme.muted_fg)),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(
                Style::default()
                    .fg(theme.status_bar_fg)
                    .bg(theme.status_bar_bg),
            ),
            area,
        );
    }

    /// Counts, shown rows, search matches and load problems for the current tree
    fn summary(state: &TreeViewState, theme: &Theme) -> (String, Style) {
        match state.status() {
            ViewStatus::Error(message) => {
                return (message.clone(), Style::default().fg(theme.error_fg));
            }
            ViewStatus::RateLimited => {
                return (
                    FetchError::RateLimited.to_string(),
                    Style::default().fg(theme.error_fg),
                );
            }
            _ => {}
        }

        let Some(tree) = state.tree() else {
            return (String::new(), Style::default());
        };
        let mut text = format!(
            "{} files, {} directories",
            tree.file_count(),
            tree.directory_count()
        );
        text.push_str(&format!(" · {} shown", tree.display_rows().len()));
        if let Some(search) = state.last_search() {
            let noun = if search.matches == 1 { "match" } else { "matches" };
            text.push_str(&format!(" · {} {}", search.matches, noun));
        }
        if state.is_truncated() {
            text.push_str(" · listing truncated by GitHub");
        }
        if state.is_loading() {
            text.push_str(" · refreshing…");
        }
        (text, Style::default().fg(theme.status_bar_fg))
    }
}
