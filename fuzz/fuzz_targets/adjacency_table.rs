// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for adjacency-table parsing and navigation resolution.
//!
//! Tables are hand-maintained and may contain cycles, dangling pointers, or
//! garbage rows. Parsing must not panic and resolution must terminate.

#![no_main]

use libfuzzer_sys::fuzz_target;
use refrain::{AdjacencyTable, ChapterLinkResolver, Direction, NavLink, Trail};

fuzz_target!(|data: &str| {
    let (table, _diagnostics) = AdjacencyTable::parse(data, "fuzz");

    // Row focus chapters are unique, so they always form a Trail.
    let trail = Trail::from_table(&table).expect("parsed rows have unique chapters");
    assert_eq!(trail.len(), table.len());

    // Half the chapters exist; resolution must stop on every input.
    let resolver = ChapterLinkResolver::new(&table, |id| id.as_str().len() % 2 == 0);
    for entry in table.entries() {
        for direction in [Direction::Previous, Direction::Next] {
            if let NavLink::Chapter(found) = resolver.resolve(&entry.chapter, direction) {
                assert_eq!(found.as_str().len() % 2, 0);
                assert_ne!(found, entry.chapter);
            }
        }
    }
});
