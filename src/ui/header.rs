use super::theme::Theme;
use super::truncate_to_width;
use crate::app::state::TreeViewState;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Repository name, subtitle and link
pub struct HeaderRenderer;

impl HeaderRenderer {
    /// Height of the header in rows
    pub const HEIGHT: u16 = 3;

    pub fn render(state: &TreeViewState, frame: &mut Frame, area: Rect, theme: &Theme) {
        let width = area.width as usize;
        let lines = match (state.metadata(), state.repo()) {
            (Some(metadata), _) => vec![
                Line::from(Span::styled(
                    truncate_to_width(&metadata.full_name, width),
                    Style::default()
                        .fg(theme.header_title_fg)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    truncate_to_width(&metadata.subtitle(), width),
                    Style::default().fg(theme.muted_fg),
                )),
                Line::from(Span::styled(
                    truncate_to_width(&metadata.html_url, width),
                    Style::default()
                        .fg(theme.link_fg)
                        .add_modifier(Modifier::UNDERLINED),
                )),
            ],
            (None, Some(repo)) => vec![Line::from(Span::styled(
                truncate_to_width(&repo.to_string(), width),
                Style::default()
                    .fg(theme.header_title_fg)
                    .add_modifier(Modifier::BOLD),
            ))],
            (None, None) => vec![Line::from(Span::styled(
                "repotree",
                Style::default()
                    .fg(theme.header_title_fg)
                    .add_modifier(Modifier::BOLD),
            ))],
        };

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme.bg).fg(theme.fg)),
            area,
        );
    }
}
