// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Phrase text → locations.
//!
//! `PhraseIndex` is the per-length multimap the miner produces and the persisted
//! phrase files hold. `SharedPhraseIndex` is its concurrent twin used while a
//! pass is still scanning: many chapters can discover the same phrase at the
//! same time, and all of them have to land in one entry.
//!
//! # Invariants
//!
//! 1. **NON_EMPTY**: an entry exists only after a location was recorded for it.
//! 2. **DISTINCT**: an entry never holds the same location twice.
//! 3. **STORAGE_ORDER**: locations in an entry are sorted by `Location::storage_key`.

use parking_lot::Mutex;
use std::collections::hash_map::RandomState;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::BuildHasher;

use super::ChapterIndex;
use crate::types::{Location, PhraseOccurrence};

/// Phrase text → distinct locations, for a single phrase length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseIndex {
    length: usize,
    entries: BTreeMap<String, Vec<Location>>,
}

impl PhraseIndex {
    pub fn new(length: usize) -> Self {
        PhraseIndex {
            length,
            entries: BTreeMap::new(),
        }
    }

    /// Word count shared by every phrase in this index.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Record one occurrence. Recording a location twice is a no-op.
    pub fn record(&mut self, phrase: impl Into<String>, location: Location) {
        let locations = self.entries.entry(phrase.into()).or_default();
        insert_sorted(locations, location);
    }

    pub fn locations(&self, phrase: &str) -> Option<&[Location]> {
        self.entries.get(phrase).map(Vec::as_slice)
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.entries.contains_key(phrase)
    }

    /// Number of distinct phrase texts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of locations across all phrases.
    pub fn total_locations(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Entries sorted by phrase text.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Location])> {
        self.entries
            .iter()
            .map(|(phrase, locations)| (phrase.as_str(), locations.as_slice()))
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Drop every phrase with fewer than two locations. Returns how many were dropped.
    pub fn retain_repeated(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, locations| locations.len() >= 2);
        before - self.entries.len()
    }

    /// Owned phrase-text set, used as the pruning oracle for the next length.
    pub fn phrase_set(&self) -> HashSet<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn occurrences(&self) -> impl Iterator<Item = PhraseOccurrence> + '_ {
        let length = self.length;
        self.entries.iter().flat_map(move |(phrase, locations)| {
            locations
                .iter()
                .map(move |location| PhraseOccurrence::new(phrase.clone(), location.clone(), length))
        })
    }

    /// Regroup by chapter, each chapter's occurrences sorted by word index.
    pub fn to_chapter_index(&self) -> ChapterIndex {
        ChapterIndex::from_occurrences(self.length, self.occurrences())
    }
}

fn insert_sorted(locations: &mut Vec<Location>, location: Location) {
    if let Err(pos) = locations.binary_search_by(|probe| probe.storage_key().cmp(&location.storage_key())) {
        locations.insert(pos, location);
    }
}

// ============================================================================
// CONCURRENT PASS STATE
// ============================================================================

const SHARD_COUNT: usize = 64;

/// Lock-sharded phrase table shared by the workers of one mining pass.
///
/// Writers only contend when their phrases hash to the same shard. Nothing is
/// readable until the pass ends and `into_phrase_index` merges the shards, which
/// is the barrier between one phrase length and the next.
pub struct SharedPhraseIndex {
    length: usize,
    hasher: RandomState,
    shards: Vec<Mutex<HashMap<String, Vec<Location>>>>,
}

impl SharedPhraseIndex {
    pub fn new(length: usize) -> Self {
        SharedPhraseIndex {
            length,
            hasher: RandomState::new(),
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
        }
    }

    pub fn record(&self, phrase: String, location: Location) {
        let shard = (self.hasher.hash_one(phrase.as_str()) as usize) % SHARD_COUNT;
        self.shards[shard]
            .lock()
            .entry(phrase)
            .or_default()
            .push(location);
    }

    /// Merge every shard into an ordered, deduplicated `PhraseIndex`.
    pub fn into_phrase_index(self) -> PhraseIndex {
        let mut entries = BTreeMap::new();
        for shard in self.shards {
            for (phrase, mut locations) in shard.into_inner() {
                locations.sort_by(|a, b| a.storage_key().cmp(&b.storage_key()));
                locations.dedup();
                entries.insert(phrase, locations);
            }
        }
        PhraseIndex {
            length: self.length,
            entries,
        }
    }
}
