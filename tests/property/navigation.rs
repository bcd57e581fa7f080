//! Navigation resolution properties over arbitrary adjacency tables.

use std::collections::BTreeSet;

use proptest::prelude::*;
use refrain::{AdjacencyTable, ChapterId, ChapterLinkResolver, Direction, NavLink};

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn pointer_strategy() -> impl Strategy<Value = Option<usize>> {
    prop::option::of(0..NAMES.len())
}

/// A table with one row per name, random pointers (self-loops and cycles
/// included), and a random subset of names that exist.
fn table_strategy() -> impl Strategy<Value = (AdjacencyTable, BTreeSet<ChapterId>)> {
    (
        prop::collection::vec((pointer_strategy(), pointer_strategy()), NAMES.len()),
        prop::collection::btree_set(0..NAMES.len(), 0..=NAMES.len()),
    )
        .prop_map(|(rows, existing)| {
            let text: String = rows
                .iter()
                .zip(NAMES)
                .map(|((prev, next), focus)| {
                    let name = |p: &Option<usize>| p.map_or("", |i| NAMES[i]);
                    format!("{}\t{}\t{}\n", name(prev), focus, name(next))
                })
                .collect();
            let (table, _) = AdjacencyTable::parse(&text, "generated");
            let existing = existing.into_iter().map(|i| ChapterId::from(NAMES[i])).collect();
            (table, existing)
        })
}

/// Walk at most `NAMES.len()` pointers, stopping at the first existing chapter.
fn bounded_walk(
    table: &AdjacencyTable,
    existing: &BTreeSet<ChapterId>,
    start: &ChapterId,
    direction: Direction,
) -> NavLink {
    let mut current = table.pointer(start, direction);
    for _ in 0..NAMES.len() {
        match current {
            Some(candidate) if candidate == start => return NavLink::NoLink,
            Some(candidate) if existing.contains(candidate) => {
                return NavLink::Chapter(candidate.clone())
            }
            Some(candidate) => current = table.pointer(candidate, direction),
            None => return NavLink::NoLink,
        }
    }
    NavLink::NoLink
}

proptest! {
    /// Resolution terminates with an existing chapter other than the start, or no link.
    #[test]
    fn resolves_to_existing_chapter_or_nothing((table, existing) in table_strategy()) {
        let resolver = ChapterLinkResolver::new(&table, |id| existing.contains(id));
        for name in NAMES {
            let start = ChapterId::from(name);
            for direction in [Direction::Previous, Direction::Next] {
                match resolver.resolve(&start, direction) {
                    NavLink::Chapter(found) => {
                        prop_assert!(existing.contains(&found));
                        prop_assert_ne!(found, start.clone());
                    }
                    NavLink::NoLink => {}
                }
            }
        }
    }

    /// The resolver agrees with a bounded pointer walk.
    #[test]
    fn matches_bounded_walk((table, existing) in table_strategy()) {
        let resolver = ChapterLinkResolver::new(&table, |id| existing.contains(id));
        for name in NAMES {
            let start = ChapterId::from(name);
            for direction in [Direction::Previous, Direction::Next] {
                prop_assert_eq!(
                    resolver.resolve(&start, direction),
                    bounded_walk(&table, &existing, &start, direction)
                );
            }
        }
    }

    /// Only existing chapters get navigation entries.
    #[test]
    fn resolve_all_covers_existing_rows((table, existing) in table_strategy()) {
        let resolver = ChapterLinkResolver::new(&table, |id| existing.contains(id));
        let covered: BTreeSet<ChapterId> =
            resolver.resolve_all().into_iter().map(|nav| nav.chapter).collect();
        prop_assert_eq!(covered, existing);
    }
}

#[test]
fn fully_cyclic_table_with_nothing_existing_has_no_links() {
    let table = refrain::testing::adjacency(&[("c", "a", "b"), ("a", "b", "c"), ("b", "c", "a")]);
    let resolver = ChapterLinkResolver::new(&table, |_| false);
    let a = ChapterId::from("a");
    assert_eq!(resolver.resolve(&a, Direction::Next), NavLink::NoLink);
    assert_eq!(resolver.resolve(&a, Direction::Previous), NavLink::NoLink);
}
