// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-chapter word sequences.
//!
//! A `WordIndex` is produced once by whatever extracted the words and is never
//! mutated afterwards. Word positions are the stable coordinates every other
//! structure refers to, so the sequence has no mutating API.

use std::collections::HashSet;

use crate::error::{BuildError, Result};
use crate::types::{join_phrase, ChapterId, Location};

/// Immutable ordered word sequence for one chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordIndex {
    id: ChapterId,
    words: Vec<String>,
}

impl WordIndex {
    pub fn new(id: impl Into<ChapterId>, words: Vec<String>) -> Self {
        WordIndex {
            id: id.into(),
            words,
        }
    }

    /// Check that the id and every word can round-trip through phrase text.
    ///
    /// Phrases are words joined by a single space and phrase files are
    /// tab-separated lines, so a word must be non-empty and free of
    /// whitespace, and an id must be non-empty, unpadded and free of tabs
    /// and line breaks. The error names the offending word's position.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let id = self.id.as_str();
        if id.is_empty() {
            return Err("chapter id is empty".to_string());
        }
        if id.contains(['\t', '\n', '\r']) || id.trim() != id {
            return Err(format!("chapter id {:?} contains a tab, line break or padding", id));
        }
        for (position, word) in self.words.iter().enumerate() {
            if word.is_empty() || word.chars().any(char::is_whitespace) {
                return Err(format!(
                    "word {} ({:?}) is empty or contains whitespace",
                    position, word
                ));
            }
        }
        Ok(())
    }

    /// Split plain text on whitespace. No markup handling happens here.
    pub fn from_text(id: impl Into<ChapterId>, text: &str) -> Self {
        Self::new(id, text.split_whitespace().map(str::to_string).collect())
    }

    #[inline]
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    #[inline]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn location(&self, index: usize) -> Location {
        Location::new(self.id.clone(), index)
    }

    /// The `length`-word phrase starting at `start`, if it fits inside the chapter.
    pub fn phrase_at(&self, start: usize, length: usize) -> Option<String> {
        let end = start.checked_add(length)?;
        self.words.get(start..end).map(join_phrase)
    }

    /// Every `length`-word window as (start index, word slice).
    ///
    /// Windows never cross the end of the chapter. A zero length yields nothing.
    pub fn windows(&self, length: usize) -> impl Iterator<Item = (usize, &[String])> + '_ {
        let windows = if length == 0 {
            None
        } else {
            Some(self.words.windows(length).enumerate())
        };
        windows.into_iter().flatten()
    }
}

/// All chapters of a run, in the order they were supplied.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    chapters: Vec<WordIndex>,
}

impl Corpus {
    /// Build a corpus, rejecting duplicate chapter identifiers and chapters
    /// that fail [`WordIndex::validate`].
    pub fn new(chapters: Vec<WordIndex>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(chapters.len());
        for chapter in &chapters {
            chapter
                .validate()
                .map_err(|msg| BuildError::Config(format!("chapter {}: {}", chapter.id(), msg)))?;
            if !seen.insert(chapter.id()) {
                return Err(BuildError::DuplicateChapter(chapter.id().clone()));
            }
        }
        Ok(Corpus { chapters })
    }

    pub fn chapters(&self) -> &[WordIndex] {
        &self.chapters
    }

    pub fn chapter(&self, id: &ChapterId) -> Option<&WordIndex> {
        self.chapters.iter().find(|c| c.id() == id)
    }

    /// Chapter identifiers in supply order. This is the default reading order.
    pub fn ids(&self) -> impl Iterator<Item = &ChapterId> {
        self.chapters.iter().map(WordIndex::id)
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn total_words(&self) -> usize {
        self.chapters.iter().map(WordIndex::len).sum()
    }
}
