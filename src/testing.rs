//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::index::{Corpus, WordIndex};
use crate::navigation::AdjacencyTable;
use crate::types::{phrase_word_count, ChapterId, Location, PhraseOccurrence};

/// Build a corpus from (chapter id, whitespace-separated text) pairs.
///
/// Panics on duplicate ids; tests should not need to handle that.
pub fn corpus(chapters: &[(&str, &str)]) -> Corpus {
    Corpus::new(
        chapters
            .iter()
            .map(|(id, text)| WordIndex::from_text(*id, text))
            .collect(),
    )
    .expect("test corpus has duplicate chapter ids")
}

/// Create an occurrence, deriving the length from the phrase text.
pub fn occurrence(phrase: &str, chapter: &str, index: usize) -> PhraseOccurrence {
    PhraseOccurrence::new(phrase, Location::new(chapter, index), phrase_word_count(phrase))
}

/// Build an adjacency table from (predecessor, chapter, successor) rows.
///
/// Empty strings mean "no neighbour", as in the table file.
pub fn adjacency(rows: &[(&str, &str, &str)]) -> AdjacencyTable {
    let text: String = rows
        .iter()
        .map(|(prev, focus, next)| format!("{}\t{}\t{}\n", prev, focus, next))
        .collect();
    let (table, diagnostics) = AdjacencyTable::parse(&text, "test");
    assert!(diagnostics.is_empty(), "test table produced diagnostics");
    table
}

/// Chapter ids from string slices.
pub fn ids(names: &[&str]) -> Vec<ChapterId> {
    names.iter().map(|n| ChapterId::from(*n)).collect()
}
