// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Previous/next chapter navigation from a hand-maintained adjacency table.
//!
//! The table is written by people and drifts: chapters get merged or filtered
//! out, rows point at chapters that produce no output, and sometimes the
//! pointers loop. `ChapterLinkResolver` walks a direction's pointers until it
//! reaches a chapter that exists, and gives up with `NavLink::NoLink` on a
//! blank pointer, a dead end or a revisit. The visited set caps every walk at
//! N steps, so malformed tables cannot hang a build.
//!
//! # Table format
//!
//! ```text
//! predecessor<TAB>focus<TAB>successor[<TAB>reserved]
//! ```
//!
//! One row per chapter. Blank neighbour fields mean "none". Blank lines and
//! `#` comments are skipped; malformed rows are reported and skipped.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::error::{BuildError, Result};
use crate::types::{AdjacencyEntry, ChapterId, ChapterNavigation, Direction, NavLink};

/// Adjacency rows keyed by focus chapter, remembering row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyTable {
    entries: Vec<AdjacencyEntry>,
    positions: HashMap<ChapterId, usize>,
}

fn neighbour(field: &str) -> Option<ChapterId> {
    let field = field.trim();
    if field.is_empty() {
        None
    } else {
        Some(ChapterId::from(field))
    }
}

impl AdjacencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. A second row for the same chapter is refused.
    pub fn insert(&mut self, entry: AdjacencyEntry) -> bool {
        if self.positions.contains_key(&entry.chapter) {
            return false;
        }
        self.positions.insert(entry.chapter.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Straight chain over `chapters`: no predecessor for the first row, no
    /// successor for the last. Used when a run has no table file.
    pub fn linear<'a>(chapters: impl IntoIterator<Item = &'a ChapterId>) -> Self {
        let ids: Vec<&ChapterId> = chapters.into_iter().collect();
        let mut table = AdjacencyTable::new();
        for (pos, id) in ids.iter().enumerate() {
            table.insert(AdjacencyEntry {
                chapter: (*id).clone(),
                predecessor: pos.checked_sub(1).map(|prev| ids[prev].clone()),
                successor: ids.get(pos + 1).map(|next| (*next).clone()),
            });
        }
        table
    }

    /// Parse table text. `source` names the input in diagnostics.
    pub fn parse(text: &str, source: &str) -> (Self, Diagnostics) {
        let mut table = AdjacencyTable::new();
        let mut diagnostics = Diagnostics::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let item = format!("{}:{}", source, line_no + 1);

            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() < 3 {
                diagnostics.warn(
                    item,
                    format!(
                        "expected at least 3 tab-separated columns, found {}",
                        columns.len()
                    ),
                );
                continue;
            }

            let Some(chapter) = neighbour(columns[1]) else {
                diagnostics.warn(item, "empty focus chapter");
                continue;
            };

            let entry = AdjacencyEntry {
                chapter: chapter.clone(),
                predecessor: neighbour(columns[0]),
                successor: neighbour(columns[2]),
            };
            if !table.insert(entry) {
                diagnostics.warn(item, format!("duplicate row for chapter '{}'", chapter));
            }
        }

        (table, diagnostics)
    }

    /// Read and parse a table file. A missing or unreadable file is fatal.
    pub fn load(path: &Path) -> Result<(Self, Diagnostics)> {
        let text = fs::read_to_string(path).map_err(|e| BuildError::read(path, e))?;
        Ok(Self::parse(&text, &path.display().to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows in file order.
    pub fn entries(&self) -> impl Iterator<Item = &AdjacencyEntry> {
        self.entries.iter()
    }

    pub fn get(&self, chapter: &ChapterId) -> Option<&AdjacencyEntry> {
        self.positions.get(chapter).map(|&pos| &self.entries[pos])
    }

    /// The raw pointer for `direction`, as written in the table.
    pub fn pointer(&self, chapter: &ChapterId, direction: Direction) -> Option<&ChapterId> {
        let entry = self.get(chapter)?;
        match direction {
            Direction::Previous => entry.predecessor.as_ref(),
            Direction::Next => entry.successor.as_ref(),
        }
    }
}

/// Resolves navigation targets against the set of chapters that exist.
pub struct ChapterLinkResolver<'a, F>
where
    F: Fn(&ChapterId) -> bool,
{
    table: &'a AdjacencyTable,
    exists: F,
}

impl<'a, F> ChapterLinkResolver<'a, F>
where
    F: Fn(&ChapterId) -> bool,
{
    pub fn new(table: &'a AdjacencyTable, exists: F) -> Self {
        ChapterLinkResolver { table, exists }
    }

    /// Nearest existing chapter in `direction`, or `NoLink`.
    pub fn resolve(&self, chapter: &ChapterId, direction: Direction) -> NavLink {
        let mut visited: HashSet<&ChapterId> = HashSet::new();
        visited.insert(chapter);

        let mut current = self.table.pointer(chapter, direction);
        while let Some(candidate) = current {
            if visited.contains(candidate) {
                tracing::debug!(
                    chapter = %chapter,
                    direction = direction.as_str(),
                    revisited = %candidate,
                    "navigation cycle, no link"
                );
                return NavLink::NoLink;
            }
            if (self.exists)(candidate) {
                return NavLink::Chapter(candidate.clone());
            }
            visited.insert(candidate);
            current = self.table.pointer(candidate, direction);
        }

        NavLink::NoLink
    }

    pub fn navigation(&self, chapter: &ChapterId) -> ChapterNavigation {
        ChapterNavigation {
            chapter: chapter.clone(),
            previous: self.resolve(chapter, Direction::Previous),
            next: self.resolve(chapter, Direction::Next),
        }
    }

    /// Navigation for every existing chapter with a table row, in row order.
    pub fn resolve_all(&self) -> Vec<ChapterNavigation> {
        self.table
            .entries()
            .filter(|entry| (self.exists)(&entry.chapter))
            .map(|entry| self.navigation(&entry.chapter))
            .collect()
    }
}
