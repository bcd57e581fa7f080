// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the phrase graph.
//!
//! These types define how chapters, positions and phrase occurrences fit together.
//! Everything downstream of the miner speaks in terms of `Location` and
//! `PhraseOccurrence`, so the invariants here are the ones every stage relies on.
//!
//! | Type               | Purpose                                          |
//! |--------------------|--------------------------------------------------|
//! | `ChapterId`        | Opaque chapter identifier                        |
//! | `Location`         | (chapter, word index) position                   |
//! | `PhraseOccurrence` | One appearance of a phrase at a Location         |
//! | `AnchorLink`       | Occurrence → next occurrence in Trail order      |
//! | `AdjacencyEntry`   | One row of the ordering/adjacency table          |
//! | `NavLink`          | Resolved previous/next target or no link         |
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Location** has no intrinsic order. Reading order belongs to `Trail`, and
//!   sorting locations any other way produces links that jump around the book.
//!
//! - **PhraseOccurrence**: `phrase` has exactly `length` words joined by
//!   `PHRASE_SEPARATOR`, and those words are the run starting at `location`.
//!
//! - **AnchorLink**: `source` and `target` carry the same phrase text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator placed between the words of a phrase.
pub const PHRASE_SEPARATOR: char = ' ';

// =============================================================================
// IDENTIFIERS AND POSITIONS
// =============================================================================

/// Opaque chapter identifier.
///
/// The derived `Ord` is lexical and exists only so maps iterate deterministically.
/// It says nothing about reading order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(String);

impl ChapterId {
    pub fn new(id: impl Into<String>) -> Self {
        ChapterId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChapterId {
    fn from(id: &str) -> Self {
        ChapterId(id.to_string())
    }
}

impl From<String> for ChapterId {
    fn from(id: String) -> Self {
        ChapterId(id)
    }
}

impl AsRef<str> for ChapterId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A (chapter, word index) position in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub chapter: ChapterId,
    /// Zero-based word index within the chapter.
    pub index: usize,
}

impl Location {
    pub fn new(chapter: impl Into<ChapterId>, index: usize) -> Self {
        Location {
            chapter: chapter.into(),
            index,
        }
    }

    /// Key used to store locations deterministically (files, map entries).
    ///
    /// This is a storage order, not a reading order. Use `Trail::compare` for the latter.
    #[inline]
    pub fn storage_key(&self) -> (&str, usize) {
        (self.chapter.as_str(), self.index)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.chapter, self.index)
    }
}

// =============================================================================
// PHRASES
// =============================================================================

/// One concrete appearance of a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhraseOccurrence {
    pub phrase: String,
    pub location: Location,
    /// Word count of `phrase`.
    pub length: usize,
}

impl PhraseOccurrence {
    pub fn new(phrase: impl Into<String>, location: Location, length: usize) -> Self {
        PhraseOccurrence {
            phrase: phrase.into(),
            location,
            length,
        }
    }

    #[inline]
    pub fn chapter(&self) -> &ChapterId {
        &self.location.chapter
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.location.index
    }
}

/// Join words into canonical phrase text.
pub fn join_phrase<S: AsRef<str>>(words: &[S]) -> String {
    let mut phrase = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            phrase.push(PHRASE_SEPARATOR);
        }
        phrase.push_str(word.as_ref());
    }
    phrase
}

/// Number of words in a canonical phrase text.
pub fn phrase_word_count(phrase: &str) -> usize {
    if phrase.is_empty() {
        0
    } else {
        phrase.split(PHRASE_SEPARATOR).count()
    }
}

/// Does `longer` start with the whole words of `shorter`?
///
/// `"a b c"` starts with `"a b"` but not with `"a b c d"` or `"a bc"`-style partial words.
pub fn starts_with_phrase(longer: &str, shorter: &str) -> bool {
    match longer.strip_prefix(shorter) {
        Some(rest) => rest.is_empty() || rest.starts_with(PHRASE_SEPARATOR),
        None => false,
    }
}

/// Does `longer` end with the whole words of `shorter`?
pub fn ends_with_phrase(longer: &str, shorter: &str) -> bool {
    match longer.strip_suffix(shorter) {
        Some(rest) => rest.is_empty() || rest.ends_with(PHRASE_SEPARATOR),
        None => false,
    }
}

// =============================================================================
// LINKS
// =============================================================================

/// Directed link from one occurrence of a phrase to the next one in Trail order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorLink {
    pub phrase: String,
    /// Word count of `phrase`, so consumers can apply a minimum-length threshold.
    pub length: usize,
    pub source: Location,
    pub target: Location,
}

/// One row of the ordering/adjacency table.
///
/// `None` means the row left that neighbour blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    pub chapter: ChapterId,
    pub predecessor: Option<ChapterId>,
    pub successor: Option<ChapterId>,
}

/// Which pointer of an adjacency entry to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Previous => "previous",
            Direction::Next => "next",
        }
    }
}

/// Resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NavLink {
    Chapter(ChapterId),
    NoLink,
}

impl NavLink {
    pub fn chapter(&self) -> Option<&ChapterId> {
        match self {
            NavLink::Chapter(id) => Some(id),
            NavLink::NoLink => None,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, NavLink::Chapter(_))
    }
}

// Serialized as the chapter id or `null`, which is what the markup splicer expects.
impl Serialize for NavLink {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.chapter().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NavLink {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<ChapterId>::deserialize(deserializer)? {
            Some(id) => NavLink::Chapter(id),
            None => NavLink::NoLink,
        })
    }
}

/// Resolved previous/next navigation for one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterNavigation {
    pub chapter: ChapterId,
    pub previous: NavLink,
    pub next: NavLink,
}
