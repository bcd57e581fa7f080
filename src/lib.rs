//! Repeated-phrase mining and cross-chapter anchor linking.
//!
//! Given a corpus of chapters, this crate finds every phrase that occurs more
//! than once, keeps only the occurrences not explained by a longer repeated
//! phrase, and links each remaining occurrence to the next one of the same
//! phrase in the canonical reading order (the Trail). A separate resolver turns
//! a hand-maintained adjacency table into previous/next chapter navigation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌────────────────┐
//! │  index/     │────▶│  mining.rs   │────▶│ subsumption.rs │
//! │ (WordIndex, │     │ (length fold,│     │ (independent,  │
//! │  Corpus)    │     │  oracle)     │     │  prune_unique) │
//! └─────────────┘     └──────────────┘     └────────────────┘
//!                                                   │
//! ┌─────────────┐     ┌──────────────┐              ▼
//! │ navigation  │────▶│   trail.rs   │────▶┌────────────────┐
//! │ (Adjacency- │     │ (ring, rank, │     │   anchor.rs    │
//! │  Table)     │     │  compare)    │     │ (AnchorGraph)  │
//! └─────────────┘     └──────────────┘     └────────────────┘
//!        │
//!        ▼
//! ┌─────────────────────────────────────────────────────┐
//! │ ChapterLinkResolver (previous/next, cycle-safe)      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! `build` wires the stages into a file pipeline (manifest, chapter files,
//! persisted phrase files, anchors.json, navigation.json); `verify` holds the
//! invariant errors and the debug-only contracts every stage checks.
//!
//! # Usage
//!
//! ```ignore
//! use refrain::{build_anchor_graph, filter_independent, mine_repeated_phrases};
//! use refrain::{Corpus, LengthRange, SubsumptionPolicy, Trail, WordIndex};
//!
//! let corpus = Corpus::new(vec![WordIndex::from_text("A", "w1 w2 w3 w2 w3")])?;
//! let raw = mine_repeated_phrases(&corpus, LengthRange::from_min(2)?);
//! let mut diagnostics = refrain::Diagnostics::new();
//! let independent = filter_independent(&raw, SubsumptionPolicy::Strict, &mut diagnostics)?;
//! let trail = Trail::from_order(corpus.ids().cloned())?;
//! let graph = build_anchor_graph(&independent, &trail)?;
//! ```

// Module declarations
pub mod anchor;
pub mod build;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod mining;
pub mod navigation;
pub mod subsumption;
pub mod trail;
pub mod types;
pub mod verify;

#[doc(hidden)]
pub mod testing;

// Re-exports for public API
pub use anchor::{build_anchor_graph, AnchorGraph};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{BuildError, Result};
pub use index::{ChapterIndex, Corpus, PhraseIndex, SharedPhraseIndex, WordIndex};
pub use mining::{
    mine_length, mine_repeated_phrases, mine_repeated_phrases_with, mine_step, LengthRange,
    MiningStep, PruningOracle, DEFAULT_MIN_LENGTH,
};
pub use navigation::{AdjacencyTable, ChapterLinkResolver};
pub use subsumption::{filter_independent, independent_occurrences, prune_unique, SubsumptionPolicy};
pub use trail::Trail;
pub use types::{
    AdjacencyEntry, AnchorLink, ChapterId, ChapterNavigation, Direction, Location, NavLink,
    PhraseOccurrence, PHRASE_SEPARATOR,
};
pub use verify::InvariantError;
