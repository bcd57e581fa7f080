// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Invariant violations raised by the phrase pipeline.
//!
//! None of these are data-quality problems. Each one means an upstream stage
//! produced something its construction rules forbid, so they carry the phrase,
//! chapter and index needed to find the bad record and they abort the run.

use crate::types::{ChapterId, Location};
use std::fmt;

/// Error type for invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// A length-L occurrence is overlapped by length-(L+1) occurrences and none of
    /// them contains it.
    SubsumptionViolation {
        phrase: String,
        chapter: ChapterId,
        index: usize,
        left: Option<String>,
        right: Option<String>,
    },
    /// An occurrence could not be found among its own phrase group.
    MissingFromGroup {
        phrase: String,
        chapter: ChapterId,
        index: usize,
    },
    /// The same location was recorded twice for one phrase.
    DuplicateLocation {
        phrase: String,
        chapter: ChapterId,
        index: usize,
    },
    /// An occurrence lives in a chapter the Trail does not declare.
    UnknownChapter {
        phrase: String,
        chapter: ChapterId,
        index: usize,
    },
}

impl InvariantError {
    pub(crate) fn missing_from_group(phrase: &str, location: &Location) -> Self {
        InvariantError::MissingFromGroup {
            phrase: phrase.to_string(),
            chapter: location.chapter.clone(),
            index: location.index,
        }
    }

    pub(crate) fn duplicate_location(phrase: &str, location: &Location) -> Self {
        InvariantError::DuplicateLocation {
            phrase: phrase.to_string(),
            chapter: location.chapter.clone(),
            index: location.index,
        }
    }

    pub(crate) fn unknown_chapter(phrase: &str, location: &Location) -> Self {
        InvariantError::UnknownChapter {
            phrase: phrase.to_string(),
            chapter: location.chapter.clone(),
            index: location.index,
        }
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::SubsumptionViolation {
                phrase,
                chapter,
                index,
                left,
                right,
            } => {
                write!(
                    f,
                    "'{}' at {}@{} is overlapped but not contained (left: {}, right: {})",
                    phrase,
                    chapter,
                    index,
                    left.as_deref().unwrap_or("-"),
                    right.as_deref().unwrap_or("-")
                )
            }
            InvariantError::MissingFromGroup {
                phrase,
                chapter,
                index,
            } => {
                write!(
                    f,
                    "occurrence {}@{} missing from its phrase group '{}'",
                    chapter, index, phrase
                )
            }
            InvariantError::DuplicateLocation {
                phrase,
                chapter,
                index,
            } => {
                write!(
                    f,
                    "location {}@{} recorded twice for '{}'",
                    chapter, index, phrase
                )
            }
            InvariantError::UnknownChapter {
                phrase,
                chapter,
                index,
            } => {
                write!(
                    f,
                    "'{}' at {}@{} is in a chapter missing from the trail",
                    phrase, chapter, index
                )
            }
        }
    }
}

impl std::error::Error for InvariantError {}
