// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parallel chapter loading and phrase-file writing.
//!
//! Reading and tokenizing chapter files is independent per file, and so is
//! writing one phrase file per length. Both fan out with `par_iter()`. Chapter
//! order is whatever the manifest says, so results are collected in input
//! order rather than completion order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::index::{ChapterIndex, Corpus, PhraseIndex, WordIndex};

use super::document::load_chapter;
use super::phrase_file::{write_phrase_file, PhraseFileKind};

/// Load every chapter file and assemble the corpus.
///
/// Any unreadable or malformed chapter aborts the load.
pub fn load_corpus(files: &[PathBuf]) -> Result<Corpus> {
    #[cfg(feature = "parallel")]
    let chapters: Result<Vec<WordIndex>> = files.par_iter().map(|path| load_chapter(path)).collect();

    #[cfg(not(feature = "parallel"))]
    let chapters: Result<Vec<WordIndex>> = files.iter().map(|path| load_chapter(path)).collect();

    Corpus::new(chapters?)
}

/// Load every chapter file with progress reporting.
#[cfg(feature = "parallel")]
pub fn load_corpus_with_progress(files: &[PathBuf], progress: &ProgressBar) -> Result<Corpus> {
    let counter = AtomicUsize::new(0);
    let total = files.len();

    let chapters = files
        .par_iter()
        .map(|path| {
            let chapter = load_chapter(path)?;

            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress.set_position(count as u64);
            if count.is_multiple_of(10) || count == total {
                progress.set_message(format!("{}/{}", count, total));
            }

            Ok(chapter)
        })
        .collect::<Result<Vec<WordIndex>>>()?;

    Corpus::new(chapters)
}

/// Load every chapter file with progress reporting.
/// Non-parallel fallback (no-op progress).
#[cfg(not(feature = "parallel"))]
pub fn load_corpus_with_progress(files: &[PathBuf]) -> Result<Corpus> {
    load_corpus(files)
}

/// Write one phrase file per raw and per independent length.
///
/// Returns the written paths, raw files first, each group in length order.
pub fn write_phrase_files(
    dir: &Path,
    raw: &[PhraseIndex],
    independent: &[ChapterIndex],
) -> Result<Vec<PathBuf>> {
    let jobs: Vec<(PhraseFileKind, PhraseIndex)> = raw
        .iter()
        .map(|index| (PhraseFileKind::Repeated, index.clone()))
        .chain(
            independent
                .iter()
                .map(|index| (PhraseFileKind::Independent, index.to_phrase_index())),
        )
        .collect();

    #[cfg(feature = "parallel")]
    let written = jobs
        .par_iter()
        .map(|(kind, index)| write_phrase_file(dir, *kind, index))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let written = jobs
        .iter()
        .map(|(kind, index)| write_phrase_file(dir, *kind, index))
        .collect();

    written
}
