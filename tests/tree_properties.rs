// Property tests for tree building, ordering and search

use proptest::prelude::*;
use repotree::model::entry::FlatEntry;
use repotree::model::tree::{build_file_tree, FileTree, NodeKind};
use repotree::view::render::{locale_cmp, RenderOptions, RenderedTree};
use repotree::view::search::filter;
use std::cmp::Ordering;

fn entry_strategy() -> impl Strategy<Value = FlatEntry> {
    let segment = prop::sample::select(vec!["a", "b", "Src", "src", "lib", "x.rs", "README.md"]);
    (
        prop::collection::vec(segment, 1..5),
        prop::bool::ANY,
    )
        .prop_map(|(segments, is_tree)| {
            let path = segments.join("/");
            if is_tree {
                FlatEntry::tree(path)
            } else {
                FlatEntry::blob(path)
            }
        })
}

fn entries_strategy() -> impl Strategy<Value = Vec<FlatEntry>> {
    prop::collection::vec(entry_strategy(), 0..40)
}

fn render(entries: &[FlatEntry], expanded: bool) -> RenderedTree {
    RenderedTree::render(
        build_file_tree(Some(entries)),
        RenderOptions {
            initially_expanded: expanded,
        },
    )
}

fn is_proper_prefix(prefix: &str, path: &str) -> bool {
    path.len() > prefix.len()
        && path.starts_with(prefix)
        && path.as_bytes()[prefix.len()] == b'/'
}

proptest! {
    #[test]
    fn every_entry_is_reachable(entries in entries_strategy()) {
        let tree = build_file_tree(Some(&entries));
        for (i, entry) in entries.iter().enumerate() {
            let id = tree.lookup(&entry.path);
            prop_assert!(id.is_some(), "{} not reachable", entry.path);
            let node = tree.get_node(id.unwrap()).unwrap();

            let used_as_directory = entries.iter().any(|e| is_proper_prefix(&entry.path, &e.path));
            if used_as_directory {
                prop_assert!(node.is_dir(), "{} is an intermediate segment", entry.path);
            }

            let first_declaration = entries
                .iter()
                .position(|e| e.path == entry.path)
                .unwrap();
            if !used_as_directory && first_declaration == i {
                let expected: NodeKind = entry.kind.into();
                prop_assert_eq!(node.kind(), expected);
            }
        }
    }

    #[test]
    fn building_is_deterministic(entries in entries_strategy()) {
        let first = render(&entries, true);
        let second = render(&entries, true);
        prop_assert_eq!(first.rows(), second.rows());
    }

    #[test]
    fn full_path_round_trips(entries in entries_strategy()) {
        let tree = build_file_tree(Some(&entries));
        for node in tree.all_nodes().skip(1) {
            let path = tree.full_path(node.id);
            prop_assert_eq!(tree.lookup(&path), Some(node.id));
        }
    }

    #[test]
    fn directories_come_first_then_names_in_order(entries in entries_strategy()) {
        let rendered = render(&entries, false);
        let mut levels = vec![rendered.top_level().to_vec()];
        for index in 0..rendered.rows().len() {
            levels.push(rendered.children_of(index).to_vec());
        }

        for level in levels {
            for pair in level.windows(2) {
                let a = rendered.row(pair[0]).unwrap();
                let b = rendered.row(pair[1]).unwrap();
                prop_assert!(
                    !(a.kind == NodeKind::File && b.kind == NodeKind::Directory),
                    "file {} before directory {}", a.name, b.name
                );
                if a.kind == b.kind {
                    prop_assert_ne!(locale_cmp(&a.name, &b.name), Ordering::Greater);
                }
            }
        }
    }

    #[test]
    fn search_keeps_matches_and_their_ancestors(entries in entries_strategy()) {
        let rendered = render(&entries, false);
        let outcome = filter(rendered.rows(), "SRC");
        let matches: Vec<&str> = rendered
            .rows()
            .iter()
            .filter(|row| row.name.to_lowercase().contains("src"))
            .map(|row| row.full_path.as_str())
            .collect();

        for row in rendered.rows() {
            let is_match = matches.contains(&row.full_path.as_str());
            let is_ancestor = matches.iter().any(|m| is_proper_prefix(&row.full_path, m));
            prop_assert_eq!(outcome.is_visible(&row.full_path), is_match || is_ancestor);
        }
        prop_assert_eq!(outcome.matches, matches.len());
    }

    #[test]
    fn toggling_twice_restores_display(entries in entries_strategy()) {
        let mut rendered = render(&entries, false);
        let before = rendered.display_rows();
        let dirs: Vec<String> = rendered
            .rows()
            .iter()
            .filter(|row| row.is_dir())
            .map(|row| row.full_path.clone())
            .collect();
        for dir in &dirs {
            rendered.toggle(dir).unwrap();
            rendered.toggle(dir).unwrap();
        }
        prop_assert_eq!(rendered.display_rows(), before);
    }
}

fn top_level_names(rendered: &RenderedTree) -> Vec<&str> {
    rendered
        .top_level()
        .iter()
        .map(|&i| rendered.row(i).unwrap().name.as_str())
        .collect()
}

fn child_names<'a>(rendered: &'a RenderedTree, path: &str) -> Vec<&'a str> {
    let index = rendered.index_of(path).unwrap();
    rendered
        .children_of(index)
        .iter()
        .map(|&i| rendered.row(i).unwrap().name.as_str())
        .collect()
}

fn sample() -> Vec<FlatEntry> {
    vec![
        FlatEntry::blob("src/index.ts"),
        FlatEntry::blob("src/lib/util.ts"),
        FlatEntry::blob("README.md"),
    ]
}

#[test]
fn test_end_to_end_ordering() {
    let rendered = render(&sample(), false);
    assert_eq!(top_level_names(&rendered), vec!["src", "README.md"]);
    assert!(rendered.get("src").unwrap().is_dir());
    assert_eq!(child_names(&rendered, "src"), vec!["lib", "index.ts"]);
}

#[test]
fn test_directory_forcing_is_order_independent() {
    for entries in [
        vec![FlatEntry::blob("a"), FlatEntry::blob("a/b")],
        vec![FlatEntry::blob("a/b"), FlatEntry::blob("a")],
    ] {
        let tree: FileTree = build_file_tree(Some(&entries));
        let a = tree.lookup("a").unwrap();
        assert!(tree.get_node(a).unwrap().is_dir());
        assert!(tree.lookup("a/b").is_some());
    }
}

#[test]
fn test_leaf_kind_first_write_wins() {
    let tree = build_file_tree(Some(&[
        FlatEntry::tree("docs"),
        FlatEntry::blob("docs"),
    ]));
    assert!(tree.get_node(tree.lookup("docs").unwrap()).unwrap().is_dir());

    let tree = build_file_tree(Some(&[
        FlatEntry::blob("notes"),
        FlatEntry::tree("notes"),
    ]));
    assert!(tree.get_node(tree.lookup("notes").unwrap()).unwrap().is_file());
}

#[test]
fn test_toggle_src_only_changes_its_subtree() {
    let mut rendered = render(&sample(), false);
    let paths = |r: &RenderedTree| -> Vec<String> {
        r.display_rows()
            .iter()
            .map(|&i| r.row(i).unwrap().full_path.clone())
            .collect()
    };
    assert_eq!(paths(&rendered), vec!["src", "README.md"]);

    assert_eq!(rendered.toggle("src"), Ok(true));
    assert_eq!(
        paths(&rendered),
        vec!["src", "src/lib", "src/index.ts", "README.md"]
    );
    assert_eq!(top_level_names(&rendered), vec!["src", "README.md"]);
    assert!(!rendered.get("src/lib").unwrap().expanded);
}

#[test]
fn test_search_expansion_is_sticky() {
    let mut rendered = render(&sample(), false);
    rendered.apply_search("util");
    rendered.apply_search("");

    assert!(rendered.get("src").unwrap().expanded);
    assert!(rendered.get("src/lib").unwrap().expanded);
    assert!(rendered.rows().iter().all(|row| row.visible));
}

#[test]
fn test_search_excludes_unrelated_sibling() {
    let entries = vec![
        FlatEntry::blob("tests/test_a.rs"),
        FlatEntry::blob("tests/helpers.rs"),
        FlatEntry::blob("src/main.rs"),
    ];
    let rendered = render(&entries, false);
    let outcome = filter(rendered.rows(), "test");
    assert!(outcome.is_visible("tests"));
    assert!(outcome.is_visible("tests/test_a.rs"));
    assert!(!outcome.is_visible("tests/helpers.rs"));
    assert!(!outcome.is_visible("src"));
    assert!(!outcome.is_visible("src/main.rs"));
    assert_eq!(outcome.matches, 2);
}
