// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Chapter → phrase occurrences, sorted by word index.
//!
//! Subsumption asks "which length-(L+1) phrase starts at index i of chapter C?"
//! millions of times. Grouping by chapter and keeping each group sorted turns
//! that into a binary search. Within one length at most one phrase starts at
//! any location, so the search key is unique.

use std::collections::{BTreeMap, HashMap};

use super::PhraseIndex;
use crate::types::{ChapterId, PhraseOccurrence};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterIndex {
    length: usize,
    chapters: BTreeMap<ChapterId, Vec<PhraseOccurrence>>,
}

impl ChapterIndex {
    pub fn new(length: usize) -> Self {
        ChapterIndex {
            length,
            chapters: BTreeMap::new(),
        }
    }

    pub fn from_occurrences(
        length: usize,
        occurrences: impl IntoIterator<Item = PhraseOccurrence>,
    ) -> Self {
        let mut chapters: BTreeMap<ChapterId, Vec<PhraseOccurrence>> = BTreeMap::new();
        for occurrence in occurrences {
            chapters
                .entry(occurrence.chapter().clone())
                .or_default()
                .push(occurrence);
        }
        for occurrences in chapters.values_mut() {
            occurrences.sort_by_key(PhraseOccurrence::index);
        }
        ChapterIndex { length, chapters }
    }

    /// Assemble from already-sorted per-chapter groups (parallel stage output).
    pub(crate) fn from_sorted_groups(
        length: usize,
        groups: impl IntoIterator<Item = (ChapterId, Vec<PhraseOccurrence>)>,
    ) -> Self {
        let chapters = groups
            .into_iter()
            .filter(|(_, occurrences)| !occurrences.is_empty())
            .collect();
        ChapterIndex { length, chapters }
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn chapter(&self, id: &ChapterId) -> Option<&[PhraseOccurrence]> {
        self.chapters.get(id).map(Vec::as_slice)
    }

    /// The occurrence starting exactly at `index` in chapter `id`.
    pub fn occurrence_at(&self, id: &ChapterId, index: usize) -> Option<&PhraseOccurrence> {
        let occurrences = self.chapters.get(id)?;
        occurrences
            .binary_search_by_key(&index, PhraseOccurrence::index)
            .ok()
            .map(|pos| &occurrences[pos])
    }

    pub fn chapters(&self) -> impl Iterator<Item = (&ChapterId, &[PhraseOccurrence])> {
        self.chapters
            .iter()
            .map(|(id, occurrences)| (id, occurrences.as_slice()))
    }

    pub fn chapter_ids(&self) -> impl Iterator<Item = &ChapterId> {
        self.chapters.keys()
    }

    pub fn occurrences(&self) -> impl Iterator<Item = &PhraseOccurrence> {
        self.chapters.values().flatten()
    }

    pub fn total_occurrences(&self) -> usize {
        self.chapters.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Drop phrases left with fewer than two occurrences across all chapters.
    ///
    /// Returns the number of occurrences removed.
    pub fn retain_repeated(&mut self) -> usize {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for occurrence in self.chapters.values().flatten() {
            *counts.entry(occurrence.phrase.as_str()).or_default() += 1;
        }
        let unique: std::collections::HashSet<String> = counts
            .into_iter()
            .filter(|&(_, count)| count < 2)
            .map(|(phrase, _)| phrase.to_string())
            .collect();
        if unique.is_empty() {
            return 0;
        }

        let mut removed = 0;
        for occurrences in self.chapters.values_mut() {
            let before = occurrences.len();
            occurrences.retain(|o| !unique.contains(&o.phrase));
            removed += before - occurrences.len();
        }
        self.chapters.retain(|_, occurrences| !occurrences.is_empty());
        removed
    }

    pub fn to_phrase_index(&self) -> PhraseIndex {
        let mut index = PhraseIndex::new(self.length);
        for occurrence in self.occurrences() {
            index.record(occurrence.phrase.clone(), occurrence.location.clone());
        }
        index
    }
}
