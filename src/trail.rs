// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The Trail: canonical cyclic reading order over chapters.
//!
//! Chapters live in an arena (`Vec<TrailNode>`) and the ring is stored as indices
//! into it, so there are no reference cycles and two trails compare with `==`.
//! A chapter's rank is its arena position.
//!
//! Two ways to build one:
//! - `Trail::from_order`: any caller-supplied order, e.g. the corpus order.
//! - `Trail::from_table`: the row order of an adjacency table. The table's own
//!   predecessor/successor columns are not consulted here; they can dangle or
//!   loop, and repairing them is `ChapterLinkResolver`'s job.
//!
//! Either way the result is always a valid ring over the declared chapters.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{BuildError, Result};
use crate::navigation::AdjacencyTable;
use crate::types::{ChapterId, Location};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TrailNode {
    id: ChapterId,
    prev: usize,
    next: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail {
    nodes: Vec<TrailNode>,
    ranks: HashMap<ChapterId, usize>,
}

impl Trail {
    /// Ring over `chapters` in the given order. Duplicates are rejected.
    pub fn from_order<I>(chapters: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<ChapterId>,
    {
        let ids: Vec<ChapterId> = chapters.into_iter().map(Into::into).collect();
        let len = ids.len();

        let mut ranks = HashMap::with_capacity(len);
        for (rank, id) in ids.iter().enumerate() {
            if ranks.insert(id.clone(), rank).is_some() {
                return Err(BuildError::DuplicateChapter(id.clone()));
            }
        }

        let nodes = ids
            .into_iter()
            .enumerate()
            .map(|(rank, id)| TrailNode {
                id,
                prev: (rank + len - 1) % len,
                next: (rank + 1) % len,
            })
            .collect();

        Ok(Trail { nodes, ranks })
    }

    /// Ring over the focus chapters of `table`, in row order.
    pub fn from_table(table: &AdjacencyTable) -> Result<Self> {
        Self::from_order(table.entries().map(|entry| entry.chapter.clone()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, chapter: &ChapterId) -> bool {
        self.ranks.contains_key(chapter)
    }

    #[inline]
    pub fn rank(&self, chapter: &ChapterId) -> Option<usize> {
        self.ranks.get(chapter).copied()
    }

    pub fn successor(&self, chapter: &ChapterId) -> Option<&ChapterId> {
        let rank = self.rank(chapter)?;
        Some(&self.nodes[self.nodes[rank].next].id)
    }

    pub fn predecessor(&self, chapter: &ChapterId) -> Option<&ChapterId> {
        let rank = self.rank(chapter)?;
        Some(&self.nodes[self.nodes[rank].prev].id)
    }

    /// Chapters in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &ChapterId> {
        self.nodes.iter().map(|node| &node.id)
    }

    /// Reading order over locations: chapter rank, then word index.
    ///
    /// Chapters outside the trail sort after every declared chapter, by id,
    /// which keeps this a strict total order on any input.
    pub fn compare(&self, a: &Location, b: &Location) -> Ordering {
        let key = |location: &Location| match self.rank(&location.chapter) {
            Some(rank) => (0, rank),
            None => (1, 0),
        };
        key(a)
            .cmp(&key(b))
            .then_with(|| {
                if self.contains(&a.chapter) {
                    Ordering::Equal
                } else {
                    a.chapter.cmp(&b.chapter)
                }
            })
            .then_with(|| a.index.cmp(&b.index))
    }

    /// Sort locations (or anything holding one) into reading order.
    pub fn sort_by_location<T>(&self, items: &mut [T], location: impl Fn(&T) -> &Location) {
        items.sort_by(|a, b| self.compare(location(a), location(b)));
    }
}
