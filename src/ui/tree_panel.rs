use super::theme::Theme;
use crate::app::state::TreeViewState;
use crate::view::icons::{icon_for_directory, icon_for_file};
use crate::view::render::RenderedNode;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub struct TreePanelRenderer;

impl TreePanelRenderer {
    /// Render the repository tree in the given frame area
    pub fn render(
        state: &mut TreeViewState,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        is_focused: bool,
        show_icons: bool,
    ) {
        // Borders take one row each
        state.set_viewport_height(area.height.saturating_sub(2) as usize);

        let Some(tree) = state.tree() else {
            return;
        };
        let display_rows = tree.display_rows();
        let scroll_offset = state.navigator().scroll_offset();
        let selected_row = state.navigator().selected();
        let query = state.last_search().map(|s| s.query.as_str());

        let items: Vec<ListItem> = display_rows
            .iter()
            .skip(scroll_offset)
            .filter_map(|&index| tree.row(index))
            .map(|row| Self::render_row(row, theme, query, show_icons))
            .collect();

        let title = match state.metadata() {
            Some(metadata) => format!(" {} ", metadata.default_branch),
            None => " Files ".to_string(),
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(if is_focused {
                        theme.focused_border_fg
                    } else {
                        theme.border_fg
                    })),
            )
            .style(Style::default().bg(theme.bg).fg(theme.fg))
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg)
                    .fg(theme.selection_fg),
            );

        let mut list_state = ListState::default();
        if let Some(pos) = selected_row
            .and_then(|selected| display_rows.iter().position(|&i| i == selected))
        {
            list_state.select(Some(pos.saturating_sub(scroll_offset)));
        }

        frame.render_stateful_widget(list, area, &mut list_state);
    }

    /// Render a single row as a ListItem
    fn render_row(
        row: &RenderedNode,
        theme: &Theme,
        query: Option<&str>,
        show_icons: bool,
    ) -> ListItem<'static> {
        let mut spans = Vec::new();

        if row.depth > 0 {
            spans.push(Span::raw("  ".repeat(row.depth)));
        }

        if row.is_dir() {
            let indicator = if row.expanded { "▼ " } else { "▶ " };
            spans.push(Span::styled(
                indicator,
                Style::default().fg(theme.indicator_fg),
            ));
        } else {
            spans.push(Span::raw("  "));
        }

        if show_icons {
            let icon = if row.is_dir() {
                icon_for_directory(row.expanded)
            } else {
                icon_for_file(&row.name)
            };
            spans.push(Span::raw(icon.glyph()));
        }

        let name_style = if row.is_dir() {
            Style::default().fg(theme.directory_fg)
        } else {
            Style::default().fg(theme.file_fg)
        };
        let match_style = name_style
            .fg(theme.match_fg)
            .add_modifier(Modifier::BOLD);
        spans.extend(highlight_match(&row.name, query, name_style, match_style));

        ListItem::new(Line::from(spans))
    }
}

/// Split a name into spans, styling the first case-insensitive match
fn highlight_match(
    name: &str,
    query: Option<&str>,
    base: Style,
    highlight: Style,
) -> Vec<Span<'static>> {
    let lowered = name.to_lowercase();
    let range = query
        .filter(|q| !q.is_empty())
        // Byte offsets only line up when lowercasing kept the length
        .filter(|_| lowered.len() == name.len())
        .and_then(|q| lowered.find(q).map(|start| (start, start + q.len())))
        .filter(|&(start, end)| name.is_char_boundary(start) && name.is_char_boundary(end));

    match range {
        Some((start, end)) => [
            Span::styled(name[..start].to_string(), base),
            Span::styled(name[start..end].to_string(), highlight),
            Span::styled(name[end..].to_string(), base),
        ]
        .into_iter()
        .filter(|span| !span.content.is_empty())
        .collect(),
        None => vec![Span::styled(name.to_string(), base)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_match() {
        let base = Style::default();
        let hl = Style::default().add_modifier(Modifier::BOLD);

        let spans = highlight_match("README.md", Some("read"), base, hl);
        assert_eq!(texts(&spans), vec!["READ", "ME.md"]);
        assert_eq!(spans[0].style, hl);

        let spans = highlight_match("index.ts", Some("x.t"), base, hl);
        assert_eq!(texts(&spans), vec!["inde", "x.t", "s"]);

        let spans = highlight_match("index.ts", None, base, hl);
        assert_eq!(texts(&spans), vec!["index.ts"]);

        let spans = highlight_match("index.ts", Some("zzz"), base, hl);
        assert_eq!(texts(&spans), vec!["index.ts"]);
    }
}
