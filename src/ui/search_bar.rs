use super::theme::Theme;
use crate::app::state::TreeViewState;
use ratatui::{
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Query input above the tree
pub struct SearchBarRenderer;

impl SearchBarRenderer {
    pub const HEIGHT: u16 = 3;

    pub fn render(
        state: &TreeViewState,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        is_focused: bool,
    ) {
        let query = state.query();
        let line = if query.is_empty() && !is_focused {
            Line::from(Span::styled(
                "Press / to search files",
                Style::default().fg(theme.muted_fg),
            ))
        } else {
            Line::from(Span::styled(query.to_string(), Style::default().fg(theme.fg)))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(Style::default().fg(if is_focused {
                theme.focused_border_fg
            } else {
                theme.border_fg
            }));
        frame.render_widget(
            Paragraph::new(line)
                .block(block)
                .style(Style::default().bg(theme.bg)),
            area,
        );

        if is_focused {
            place_cursor(frame, area, query.width());
        }
    }

    /// The token prompt, drawn in place of the search bar while it has focus
    ///
    /// Typed characters are masked.
    pub fn render_token_prompt(input: &str, frame: &mut Frame, area: Rect, theme: &Theme) {
        let masked = "•".repeat(input.chars().count());
        let line = if masked.is_empty() {
            Line::from(Span::styled(
                "Paste a GitHub personal access token",
                Style::default().fg(theme.muted_fg),
            ))
        } else {
            Line::from(Span::styled(masked.clone(), Style::default().fg(theme.fg)))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" GitHub token ")
            .border_style(Style::default().fg(theme.focused_border_fg));
        frame.render_widget(
            Paragraph::new(line)
                .block(block)
                .style(Style::default().bg(theme.bg)),
            area,
        );
        place_cursor(frame, area, masked.width());
    }
}

fn place_cursor(frame: &mut Frame, area: Rect, text_width: usize) {
    if area.width > 2 && area.height > 2 {
        let max_x = area.x + area.width - 2;
        let x = (area.x + 1).saturating_add(text_width as u16).min(max_x);
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}
