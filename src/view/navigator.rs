use super::render::RenderedTree;

/// Selection and scroll state over the rows on screen
///
/// The selection is a row index into `RenderedTree::rows()`, so it survives
/// toggles and searches. Every method takes the current tree and works on
/// `display_rows()`.
#[derive(Debug, Clone)]
pub struct TreeNavigator {
    /// Currently selected row
    selected: Option<usize>,
    /// Scroll offset (index into displayed rows)
    scroll_offset: usize,
    /// Last known viewport height (for paging and scrolling)
    pub(crate) viewport_height: usize,
}

impl Default for TreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeNavigator {
    pub fn new() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            viewport_height: 10, // Updated during rendering
        }
    }

    /// Set the viewport height (should be called during rendering)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
    }

    /// Get the currently selected row
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Position of the selection among the displayed rows
    pub fn selected_position(&self, tree: &RenderedTree) -> Option<usize> {
        let selected = self.selected?;
        tree.display_rows().iter().position(|&i| i == selected)
    }

    /// Select a row by path, if it exists
    pub fn select_path(&mut self, tree: &RenderedTree, path: &str) -> bool {
        match tree.index_of(path) {
            Some(index) => {
                self.selected = Some(index);
                self.clamp(tree);
                true
            }
            None => false,
        }
    }

    /// Select the next displayed row
    pub fn select_next(&mut self, tree: &RenderedTree) {
        self.step(tree, |pos, len| (pos + 1).min(len - 1));
    }

    /// Select the previous displayed row
    pub fn select_prev(&mut self, tree: &RenderedTree) {
        self.step(tree, |pos, _| pos.saturating_sub(1));
    }

    /// Move selection up by a page (viewport height)
    pub fn select_page_up(&mut self, tree: &RenderedTree) {
        let page = self.viewport_height.max(1);
        self.step(tree, |pos, _| pos.saturating_sub(page));
    }

    /// Move selection down by a page (viewport height)
    pub fn select_page_down(&mut self, tree: &RenderedTree) {
        let page = self.viewport_height.max(1);
        self.step(tree, |pos, len| (pos + page).min(len - 1));
    }

    /// Select the first displayed row
    pub fn select_first(&mut self, tree: &RenderedTree) {
        self.step(tree, |_, _| 0);
    }

    /// Select the last displayed row
    pub fn select_last(&mut self, tree: &RenderedTree) {
        self.step(tree, |_, len| len - 1);
    }

    /// Select the directory containing the current selection
    pub fn select_parent(&mut self, tree: &RenderedTree) {
        let parent = self
            .selected
            .and_then(|i| tree.row(i))
            .and_then(|row| row.parent);
        if let Some(parent) = parent {
            self.selected = Some(parent);
            self.ensure_visible(tree);
        }
    }

    /// Move to `next(position, len)` among displayed rows
    ///
    /// With nothing selected (or the selection off screen) the first row is
    /// selected instead.
    fn step(&mut self, tree: &RenderedTree, next: impl Fn(usize, usize) -> usize) {
        let displayed = tree.display_rows();
        if displayed.is_empty() {
            self.selected = None;
            self.scroll_offset = 0;
            return;
        }

        let current = self
            .selected
            .and_then(|selected| displayed.iter().position(|&i| i == selected));
        let new_pos = match current {
            Some(pos) => next(pos, displayed.len()),
            None => 0,
        };
        self.selected = Some(displayed[new_pos]);
        self.scroll_to(new_pos, displayed.len());
    }

    /// Keep the selection on a displayed row after the rows changed
    ///
    /// A hidden selection moves to its nearest displayed ancestor, or to the
    /// first row when no ancestor is displayed.
    pub fn clamp(&mut self, tree: &RenderedTree) {
        let displayed = tree.display_rows();
        if displayed.is_empty() {
            self.selected = None;
            self.scroll_offset = 0;
            return;
        }

        let mut candidate = self.selected.filter(|&i| i < tree.rows().len());
        while let Some(index) = candidate {
            if displayed.contains(&index) {
                break;
            }
            candidate = tree.row(index).and_then(|row| row.parent);
        }

        self.selected = Some(candidate.unwrap_or(displayed[0]));
        self.ensure_visible(tree);
    }

    /// Ensure the selected row is within the viewport
    pub fn ensure_visible(&mut self, tree: &RenderedTree) {
        let displayed = tree.display_rows();
        match self.selected_position(tree) {
            Some(pos) => self.scroll_to(pos, displayed.len()),
            None => self.scroll_offset = self.scroll_offset.min(displayed.len()),
        }
    }

    /// Adjust the scroll offset so `pos` is inside the viewport
    ///
    /// Only scrolls once the selection goes past an edge.
    fn scroll_to(&mut self, pos: usize, len: usize) {
        if self.viewport_height == 0 {
            return;
        }

        if pos < self.scroll_offset {
            self.scroll_offset = pos;
        } else if pos >= self.scroll_offset + self.viewport_height {
            self.scroll_offset = pos + 1 - self.viewport_height;
        }

        // Don't leave empty space below the last row
        let max_offset = len.saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Forget the selection (a new tree was installed)
    pub fn reset(&mut self) {
        self.selected = None;
        self.scroll_offset = 0;
    }
}
