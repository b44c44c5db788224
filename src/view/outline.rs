//! Plain-text rendering of the displayed rows, for `--print`

use super::icons::{icon_for_directory, icon_for_file};
use super::render::RenderedTree;
use std::fmt::Write;

/// One line per displayed row, indented two spaces per level
///
/// Directories end in `/`.
pub fn outline(tree: &RenderedTree, show_icons: bool) -> String {
    let mut out = String::new();
    for index in tree.display_rows() {
        let Some(row) = tree.row(index) else {
            continue;
        };
        out.push_str(&"  ".repeat(row.depth));
        if show_icons {
            let icon = if row.is_dir() {
                icon_for_directory(row.expanded)
            } else {
                icon_for_file(&row.name)
            };
            out.push_str(icon.glyph());
        }
        let suffix = if row.is_dir() { "/" } else { "" };
        let _ = writeln!(out, "{}{}", row.name, suffix);
    }
    out
}
