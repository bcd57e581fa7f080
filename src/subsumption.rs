// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Subsumption filter: keep only occurrences not explained by a longer repeat.
//!
//! A repeated L-word phrase inside a repeated (L+1)-word phrase is noise: linking
//! both would plant two anchors on the same passage. For an L-word occurrence at
//! index i, the only (L+1)-word occurrences that can contain it start at i−1
//! (it is their suffix) or at i (it is their prefix).
//!
//! ```text
//!   index:      i-1   i    i+1  ...  i+L-1  i+L
//!   left:       [──────── L+1 words ────]
//!   shorter:          [──── L words ─────]
//!   right:            [──────── L+1 words ─────]
//! ```
//!
//! Each length is compared against the **raw** mined set of the next length,
//! never the filtered one. A longer occurrence that was itself subsumed still
//! explains the shorter one.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **SOUND**: no kept occurrence has a containing (L+1) occurrence at i−1 or i.
//! 2. **REPEATED**: after pruning, every kept phrase has ≥ 2 kept occurrences.

use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::diagnostics::Diagnostics;
use crate::index::{ChapterIndex, PhraseIndex};
use crate::types::{ends_with_phrase, starts_with_phrase, ChapterId, PhraseOccurrence};
use crate::verify::{contracts, InvariantError};

/// What to do when an overlapping longer occurrence fails containment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsumptionPolicy {
    /// Abort the run with an `InvariantError`.
    #[default]
    Strict,
    /// Drop the occurrence and record a diagnostic.
    Lenient,
}

enum Verdict {
    Independent,
    Dependent,
    Violation(InvariantError),
}

fn classify(occurrence: &PhraseOccurrence, longer: &ChapterIndex) -> Verdict {
    let chapter = occurrence.chapter();
    let index = occurrence.index();

    let left = index
        .checked_sub(1)
        .and_then(|start| longer.occurrence_at(chapter, start));
    let right = longer.occurrence_at(chapter, index);

    if left.is_none() && right.is_none() {
        return Verdict::Independent;
    }

    let left_contains = left.is_some_and(|l| ends_with_phrase(&l.phrase, &occurrence.phrase));
    let right_contains = right.is_some_and(|r| starts_with_phrase(&r.phrase, &occurrence.phrase));
    if left_contains || right_contains {
        return Verdict::Dependent;
    }

    Verdict::Violation(InvariantError::SubsumptionViolation {
        phrase: occurrence.phrase.clone(),
        chapter: chapter.clone(),
        index,
        left: left.map(|l| l.phrase.clone()),
        right: right.map(|r| r.phrase.clone()),
    })
}

struct ChapterOutcome {
    chapter: ChapterId,
    kept: Vec<PhraseOccurrence>,
    violations: Vec<InvariantError>,
}

fn filter_chapter(
    chapter: &ChapterId,
    occurrences: &[PhraseOccurrence],
    longer: &ChapterIndex,
    policy: SubsumptionPolicy,
) -> Result<ChapterOutcome, InvariantError> {
    let mut outcome = ChapterOutcome {
        chapter: chapter.clone(),
        kept: Vec::new(),
        violations: Vec::new(),
    };

    // Chapters with no longer phrase keep everything.
    if longer.chapter(chapter).is_none() {
        outcome.kept = occurrences.to_vec();
        return Ok(outcome);
    }

    for occurrence in occurrences {
        match classify(occurrence, longer) {
            Verdict::Independent => outcome.kept.push(occurrence.clone()),
            Verdict::Dependent => {}
            Verdict::Violation(err) => match policy {
                SubsumptionPolicy::Strict => return Err(err),
                SubsumptionPolicy::Lenient => outcome.violations.push(err),
            },
        }
    }
    Ok(outcome)
}

/// Length-L occurrences independent of the raw length-(L+1) set.
///
/// `shorter` and `longer` must be the unfiltered mined sets for L and L+1.
/// Occurrences are not pruned for uniqueness here; see `prune_unique`.
pub fn independent_occurrences(
    shorter: &ChapterIndex,
    longer: &ChapterIndex,
    policy: SubsumptionPolicy,
    diagnostics: &mut Diagnostics,
) -> Result<ChapterIndex, InvariantError> {
    debug_assert_eq!(
        shorter.length() + 1,
        longer.length(),
        "subsumption compares adjacent lengths"
    );

    let chapters: Vec<(&ChapterId, &[PhraseOccurrence])> = shorter.chapters().collect();

    #[cfg(feature = "parallel")]
    let outcomes: Result<Vec<ChapterOutcome>, InvariantError> = chapters
        .par_iter()
        .map(|(id, occurrences)| filter_chapter(id, occurrences, longer, policy))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Result<Vec<ChapterOutcome>, InvariantError> = chapters
        .iter()
        .map(|(id, occurrences)| filter_chapter(id, occurrences, longer, policy))
        .collect();

    let mut groups = Vec::with_capacity(chapters.len());
    for outcome in outcomes? {
        for violation in outcome.violations {
            diagnostics.warn(
                format!("{}@{}", outcome.chapter, violation_index(&violation)),
                format!("dropped: {}", violation),
            );
        }
        groups.push((outcome.chapter, outcome.kept));
    }

    let independent = ChapterIndex::from_sorted_groups(shorter.length(), groups);
    contracts::check_subsumption_sound(&independent, longer);
    Ok(independent)
}

fn violation_index(err: &InvariantError) -> usize {
    match err {
        InvariantError::SubsumptionViolation { index, .. } => *index,
        _ => 0,
    }
}

/// Drop phrases left with fewer than two independent occurrences.
pub fn prune_unique(mut independent: ChapterIndex) -> ChapterIndex {
    let removed = independent.retain_repeated();
    if removed > 0 {
        tracing::debug!(
            length = independent.length(),
            removed,
            "pruned phrases with a single independent occurrence"
        );
    }
    independent
}

/// Filter every mined length, longest first, then prune unique phrases.
///
/// `raw` is the miner output in ascending length order. The longest length has
/// nothing longer to be subsumed by and is kept whole. Returns the independent
/// sets in the same ascending order.
#[tracing::instrument(skip_all, fields(lengths = raw.len(), ?policy))]
pub fn filter_independent(
    raw: &[PhraseIndex],
    policy: SubsumptionPolicy,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<ChapterIndex>, InvariantError> {
    let by_chapter: Vec<ChapterIndex> = raw.iter().map(PhraseIndex::to_chapter_index).collect();
    let mut filtered = Vec::with_capacity(by_chapter.len());

    for (pos, shorter) in by_chapter.iter().enumerate().rev() {
        let longer = by_chapter
            .get(pos + 1)
            .filter(|longer| longer.length() == shorter.length() + 1);

        let independent = match longer {
            Some(longer) => independent_occurrences(shorter, longer, policy, diagnostics)?,
            None => shorter.clone(),
        };
        let kept = prune_unique(independent);
        tracing::debug!(
            length = kept.length(),
            raw = shorter.total_occurrences(),
            independent = kept.total_occurrences(),
            "filtered length"
        );
        filtered.push(kept);
    }

    filtered.reverse();
    Ok(filtered)
}
