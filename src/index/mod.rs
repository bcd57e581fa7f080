// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction: the data structures every stage reads and writes.
//!
//! Three indexes, each keyed for a different question:
//! - **WordIndex**: what word sits at position i of chapter C?
//! - **PhraseIndex**: where does this phrase text occur?
//! - **ChapterIndex**: which phrase starts at position i of chapter C?
//!
//! The miner fills a PhraseIndex per length; subsumption regroups it by chapter
//! so overlapping occurrences can be found with a binary search.

mod chapter;
mod phrase;
mod word;

pub use chapter::*;
pub use phrase::*;
pub use word::*;
