//! Full-panel views shown instead of the tree

use super::theme::Theme;
use crate::model::repo::FetchError;
use crate::services::token::TOKEN_ENV;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Which centered message to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageView<'a> {
    Welcome,
    Loading,
    Error(&'a str),
    RateLimited,
}

pub struct MessageRenderer;

impl MessageRenderer {
    pub fn render(view: MessageView<'_>, frame: &mut Frame, area: Rect, theme: &Theme) {
        let title = Style::default()
            .fg(theme.header_title_fg)
            .add_modifier(Modifier::BOLD);
        let body = Style::default().fg(theme.muted_fg);

        let lines = match view {
            MessageView::Welcome => vec![
                Line::from(Span::styled("No repository selected", title)),
                Line::default(),
                Line::from(Span::styled(
                    "Run repotree with a GitHub URL or owner/repo, for example:",
                    body,
                )),
                Line::from(Span::styled("repotree https://github.com/rust-lang/cargo", body)),
            ],
            MessageView::Loading => vec![Line::from(Span::styled(
                "Loading repository…",
                body,
            ))],
            MessageView::Error(message) => vec![
                Line::from(Span::styled(
                    "Something went wrong",
                    title.fg(theme.error_fg),
                )),
                Line::default(),
                Line::from(Span::styled(message.to_string(), body)),
                Line::default(),
                Line::from(Span::styled("Press r to try again", body)),
            ],
            MessageView::RateLimited => vec![
                Line::from(Span::styled(
                    FetchError::RateLimited.to_string(),
                    title.fg(theme.error_fg),
                )),
                Line::default(),
                Line::from(Span::styled(
                    "Unauthenticated requests are limited to 60 per hour.",
                    body,
                )),
                Line::from(Span::styled(
                    format!(
                        "Set {}, pass --token, or store one with --save-token.",
                        TOKEN_ENV
                    ),
                    body,
                )),
                Line::default(),
                Line::from(Span::styled("Press t to enter a token and try again", body)),
            ],
        };

        // Rough vertical centering
        let padding = area.height.saturating_sub(lines.len() as u16 + 2) / 2;
        let mut padded = vec![Line::default(); padding as usize];
        padded.extend(lines);

        frame.render_widget(
            Paragraph::new(padded)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme.border_fg)),
                )
                .style(Style::default().bg(theme.bg)),
            area,
        );
    }
}
