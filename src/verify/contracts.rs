// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the phrase pipeline.
//!
//! Debug-mode assertions over each stage's output. They:
//!
//! 1. Are **zero-cost in release builds** (early return + `debug_assert!`)
//! 2. Panic at the stage that broke the property, not three stages later
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function            | Property                                              |
//! |------------------------------|-------------------------------------------------------|
//! | `check_phrases_match_corpus` | every mined location spells its phrase; ≥ 2 locations |
//! | `check_prefixes_repeated`    | every (L+1) phrase's L-word prefix was mined at L     |
//! | `check_subsumption_sound`    | no kept occurrence overlaps an (L+1) occurrence       |
//! | `check_anchor_cycles`        | each phrase's links form one permutation of its group |

use std::collections::{HashMap, HashSet};

use crate::anchor::AnchorGraph;
use crate::index::{ChapterIndex, Corpus, PhraseIndex};
use crate::types::{phrase_word_count, Location};

// ============================================================================
// MINING CONTRACTS
// ============================================================================

/// Check that every recorded location really spells its phrase.
///
/// # Panics (debug builds only)
/// Panics if a location is out of range, spells a different phrase, or a
/// phrase has fewer than two distinct locations.
#[inline]
pub fn check_phrases_match_corpus(corpus: &Corpus, repeated: &PhraseIndex) {
    if !cfg!(debug_assertions) {
        return;
    }
    for (phrase, locations) in repeated.iter() {
        debug_assert!(
            phrase_word_count(phrase) == repeated.length(),
            "Contract violation: '{}' does not have {} words",
            phrase,
            repeated.length()
        );
        debug_assert!(
            locations.len() >= 2,
            "Contract violation: '{}' kept with {} location(s)",
            phrase,
            locations.len()
        );
        for location in locations {
            let spelled = corpus
                .chapter(&location.chapter)
                .and_then(|chapter| chapter.phrase_at(location.index, repeated.length()));
            debug_assert!(
                spelled.as_deref() == Some(phrase),
                "Contract violation: {} spells {:?}, not '{}'",
                location,
                spelled,
                phrase
            );
        }
    }
}

/// Check downward closure across a contiguous run of mined lengths.
///
/// # Panics (debug builds only)
/// Panics if lengths are not contiguous or a phrase's prefix is missing from
/// the previous length.
#[inline]
pub fn check_prefixes_repeated(mined: &[PhraseIndex]) {
    if !cfg!(debug_assertions) {
        return;
    }
    for pair in mined.windows(2) {
        let (shorter, longer) = (&pair[0], &pair[1]);
        debug_assert!(
            shorter.length() + 1 == longer.length(),
            "Contract violation: mined lengths {} and {} are not contiguous",
            shorter.length(),
            longer.length()
        );
        for phrase in longer.phrases() {
            let prefix = phrase.rsplit_once(crate::types::PHRASE_SEPARATOR).map(|(p, _)| p);
            debug_assert!(
                prefix.is_some_and(|p| shorter.contains(p)),
                "Contract violation: prefix of '{}' was not repeated at length {}",
                phrase,
                shorter.length()
            );
        }
    }
}

// ============================================================================
// SUBSUMPTION CONTRACTS
// ============================================================================

/// Check that no kept occurrence has a longer occurrence at i−1 or i.
///
/// # Panics (debug builds only)
/// Panics on the first kept occurrence that is still overlapped.
#[inline]
pub fn check_subsumption_sound(independent: &ChapterIndex, longer: &ChapterIndex) {
    if !cfg!(debug_assertions) {
        return;
    }
    for occurrence in independent.occurrences() {
        let chapter = occurrence.chapter();
        let index = occurrence.index();
        let left = index
            .checked_sub(1)
            .and_then(|start| longer.occurrence_at(chapter, start));
        let right = longer.occurrence_at(chapter, index);
        debug_assert!(
            left.is_none() && right.is_none(),
            "Contract violation: '{}' at {} kept while overlapped (left: {:?}, right: {:?})",
            occurrence.phrase,
            occurrence.location,
            left.map(|l| &l.phrase),
            right.map(|r| &r.phrase)
        );
    }
}

// ============================================================================
// ANCHOR CONTRACTS
// ============================================================================

/// Check that each phrase's links are a single permutation of its locations:
/// every source appears once, and the targets are exactly the sources.
///
/// # Panics (debug builds only)
/// Panics if a phrase has a repeated source or a target outside its group.
#[inline]
pub fn check_anchor_cycles(graph: &AnchorGraph) {
    if !cfg!(debug_assertions) {
        return;
    }
    let mut sources: HashMap<&str, HashSet<&Location>> = HashMap::new();
    for link in graph.links() {
        let fresh = sources
            .entry(link.phrase.as_str())
            .or_default()
            .insert(&link.source);
        debug_assert!(
            fresh,
            "Contract violation: '{}' links out of {} twice",
            link.phrase,
            link.source
        );
    }

    let mut targets: HashMap<&str, HashSet<&Location>> = HashMap::new();
    for link in graph.links() {
        targets
            .entry(link.phrase.as_str())
            .or_default()
            .insert(&link.target);
    }

    for (phrase, group) in &sources {
        debug_assert!(
            targets.get(phrase) == Some(group),
            "Contract violation: links for '{}' do not close into a cycle",
            phrase
        );
    }
}
