// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Incremental repeated-phrase mining.
//!
//! Lengths are mined in ascending order. Each pass slides an L-word window over
//! every chapter and keeps a candidate only if its (L−1)-word prefix repeated in
//! the previous pass. That pruning is sound: two occurrences of an L-word phrase
//! are also two occurrences of its prefix at the same starts, so a prefix that
//! never repeats rules the longer phrase out.
//!
//! ```text
//!   oracle(L-1) ──▶ mine_length(L) ──▶ repeated(L) ──▶ oracle(L) ──▶ ...
//!        │                                                  │
//!      Seed (admits every window at L = min)       stop when empty
//! ```
//!
//! Within one pass chapters are scanned in parallel and written into a
//! `SharedPhraseIndex`. Merging it is the barrier: the oracle for L is complete
//! before L+1 starts.

use std::collections::HashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{BuildError, Result};
use crate::index::{Corpus, PhraseIndex, SharedPhraseIndex, WordIndex};
use crate::types::{join_phrase, PHRASE_SEPARATOR};
use crate::verify::contracts;

/// Default shortest phrase worth mining.
pub const DEFAULT_MIN_LENGTH: usize = 3;

/// Inclusive phrase-length range. `max = None` mines until a length comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    min: usize,
    max: Option<usize>,
}

impl LengthRange {
    pub fn new(min: usize, max: Option<usize>) -> Result<Self> {
        if min == 0 {
            return Err(BuildError::LengthRange(
                "minimum phrase length must be at least 1".to_string(),
            ));
        }
        if let Some(max) = max {
            if max < min {
                return Err(BuildError::LengthRange(format!(
                    "maximum {} is below minimum {}",
                    max, min
                )));
            }
        }
        Ok(LengthRange { min, max })
    }

    /// `[min, ∞)`, terminated by the first empty length.
    pub fn from_min(min: usize) -> Result<Self> {
        Self::new(min, None)
    }

    #[inline]
    pub fn min(&self) -> usize {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn contains(&self, length: usize) -> bool {
        length >= self.min && self.max.is_none_or(|max| length <= max)
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        LengthRange {
            min: DEFAULT_MIN_LENGTH,
            max: None,
        }
    }
}

/// The set of shorter phrases a candidate's prefix must belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruningOracle {
    /// Sentinel for the first length: the empty prefix, always present.
    Seed,
    /// Phrase texts that repeated at the previous length.
    Phrases(HashSet<String>),
}

impl PruningOracle {
    /// Is a candidate with this (L−1)-word prefix worth trying?
    pub fn admits(&self, prefix: &str) -> bool {
        match self {
            PruningOracle::Seed => true,
            PruningOracle::Phrases(phrases) => prefix.is_empty() || phrases.contains(prefix),
        }
    }

    /// No candidate of the next length can pass.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, PruningOracle::Phrases(phrases) if phrases.is_empty())
    }
}

impl From<&PhraseIndex> for PruningOracle {
    fn from(repeated: &PhraseIndex) -> Self {
        PruningOracle::Phrases(repeated.phrase_set())
    }
}

/// The phrase with its final word dropped.
///
/// `last_word_len` is the byte length of that final word. A one-word phrase
/// has the empty prefix.
fn phrase_prefix(phrase: &str, last_word_len: usize) -> &str {
    let cut = phrase.len() - last_word_len;
    if cut == 0 {
        ""
    } else {
        // Drop the separator too.
        &phrase[..cut - PHRASE_SEPARATOR.len_utf8()]
    }
}

fn scan_chapter(
    chapter: &WordIndex,
    length: usize,
    oracle: &PruningOracle,
    shared: &SharedPhraseIndex,
) {
    for (start, window) in chapter.windows(length) {
        let phrase = join_phrase(window);
        let last_word_len = window.last().map_or(0, String::len);
        if !oracle.admits(phrase_prefix(&phrase, last_word_len)) {
            continue;
        }
        shared.record(phrase, chapter.location(start));
    }
}

/// Mine every repeated phrase of exactly `length` words.
///
/// Only windows whose prefix the oracle admits are considered; phrases left
/// with fewer than two distinct locations are dropped.
#[tracing::instrument(skip(corpus, oracle), fields(chapters = corpus.len()))]
pub fn mine_length(corpus: &Corpus, length: usize, oracle: &PruningOracle) -> PhraseIndex {
    let shared = SharedPhraseIndex::new(length);
    if length == 0 || oracle.is_exhausted() {
        return shared.into_phrase_index();
    }

    #[cfg(feature = "parallel")]
    corpus
        .chapters()
        .par_iter()
        .for_each(|chapter| scan_chapter(chapter, length, oracle, &shared));

    #[cfg(not(feature = "parallel"))]
    corpus
        .chapters()
        .iter()
        .for_each(|chapter| scan_chapter(chapter, length, oracle, &shared));

    let mut repeated = shared.into_phrase_index();
    let unique = repeated.retain_repeated();
    tracing::debug!(
        repeated = repeated.len(),
        unique,
        locations = repeated.total_locations(),
        "mined length"
    );

    contracts::check_phrases_match_corpus(corpus, &repeated);
    repeated
}

/// One step of the length fold: the repeated set for `length` and the oracle
/// to carry into `length + 1`.
pub struct MiningStep {
    pub repeated: PhraseIndex,
    pub oracle: PruningOracle,
}

pub fn mine_step(corpus: &Corpus, length: usize, oracle: PruningOracle) -> MiningStep {
    let repeated = mine_length(corpus, length, &oracle);
    let next = PruningOracle::from(&repeated);
    MiningStep {
        repeated,
        oracle: next,
    }
}

/// Mine every length in `range`, shortest first.
///
/// Stops after the first length with no repeated phrase, since nothing longer
/// can repeat either. The returned indexes are contiguous from `range.min()`.
pub fn mine_repeated_phrases(corpus: &Corpus, range: LengthRange) -> Vec<PhraseIndex> {
    mine_repeated_phrases_with(corpus, range, |_| {})
}

/// `mine_repeated_phrases` with a callback after each completed length.
#[tracing::instrument(skip_all, fields(min = range.min(), max = ?range.max()))]
pub fn mine_repeated_phrases_with(
    corpus: &Corpus,
    range: LengthRange,
    mut on_length: impl FnMut(&PhraseIndex),
) -> Vec<PhraseIndex> {
    let mut mined = Vec::new();
    let mut oracle = PruningOracle::Seed;
    let mut length = range.min();

    while range.contains(length) {
        let step = mine_step(corpus, length, oracle);
        if step.repeated.is_empty() {
            break;
        }
        on_length(&step.repeated);
        mined.push(step.repeated);
        oracle = step.oracle;
        length += 1;
    }

    contracts::check_prefixes_repeated(&mined);
    tracing::info!(lengths = mined.len(), "mining finished");
    mined
}
