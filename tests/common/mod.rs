//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::path::PathBuf;

use proptest::prelude::*;
use refrain::{ChapterIndex, Corpus, Diagnostics, PhraseIndex, SubsumptionPolicy, WordIndex};

// Re-export canonical test utilities from refrain::testing
pub use refrain::testing::{adjacency, corpus, ids, occurrence};

// ============================================================================
// FIXTURE DIRECTORIES
// ============================================================================

/// Directory containing the build fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/build-fixtures")
}

pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// Words from a tiny vocabulary, so random chapters actually repeat phrases.
pub fn word_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(str::to_string)
}

/// One chapter's words.
pub fn chapter_words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(word_strategy(), 0..24)
}

/// A corpus of 1-4 chapters named c0, c1, ...
pub fn corpus_strategy() -> impl Strategy<Value = Corpus> {
    prop::collection::vec(chapter_words_strategy(), 1..5).prop_map(|chapters| {
        let chapters = chapters
            .into_iter()
            .enumerate()
            .map(|(i, words)| WordIndex::new(format!("c{}", i), words))
            .collect();
        Corpus::new(chapters).expect("generated ids are distinct")
    })
}

// ============================================================================
// PIPELINE HELPERS
// ============================================================================

/// Mine and filter with the lenient policy, which never aborts.
pub fn mine_and_filter(corpus: &Corpus, min: usize) -> (Vec<PhraseIndex>, Vec<ChapterIndex>) {
    let mut diagnostics = Diagnostics::new();
    let mined = refrain::build::mine_corpus(
        corpus,
        refrain::LengthRange::from_min(min).unwrap(),
        SubsumptionPolicy::Lenient,
        &mut diagnostics,
    )
    .expect("lenient filtering does not fail");
    (mined.raw, mined.independent)
}
