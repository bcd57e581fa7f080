// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Persisted phrase files, one per phrase length.
//!
//! ```text
//! <phrase><TAB><index>;<chapter><TAB><index>;<chapter>...
//! ```
//!
//! Files are named `repeated-<L>.tsv` (raw miner output) and
//! `independent-<L>.tsv` (after subsumption and pruning). Lines are sorted by
//! phrase and locations by (chapter, index), so the same corpus always writes
//! byte-identical files.
//!
//! Reading is forgiving: a bad location entry, a phrase of the wrong length or
//! a phrase left with fewer than two locations is reported and skipped.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;
use crate::error::{BuildError, Result};
use crate::index::PhraseIndex;
use crate::types::{phrase_word_count, Location};

const EXTENSION: &str = "tsv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhraseFileKind {
    Repeated,
    Independent,
}

impl PhraseFileKind {
    pub fn prefix(self) -> &'static str {
        match self {
            PhraseFileKind::Repeated => "repeated",
            PhraseFileKind::Independent => "independent",
        }
    }

    pub fn file_name(self, length: usize) -> String {
        format!("{}-{}.{}", self.prefix(), length, EXTENSION)
    }
}

impl fmt::Display for PhraseFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Recover kind and length from a file name like `independent-4.tsv`.
pub fn parse_file_name(name: &str) -> Option<(PhraseFileKind, usize)> {
    let stem = name.strip_suffix(EXTENSION)?.strip_suffix('.')?;
    let (prefix, length) = stem.rsplit_once('-')?;
    let kind = match prefix {
        "repeated" => PhraseFileKind::Repeated,
        "independent" => PhraseFileKind::Independent,
        _ => return None,
    };
    let length = length.parse().ok().filter(|&l| l > 0)?;
    Some((kind, length))
}

// ============================================================================
// WRITING
// ============================================================================

pub fn format_phrase_index(index: &PhraseIndex) -> String {
    let mut out = String::new();
    for (phrase, locations) in index.iter() {
        out.push_str(phrase);
        for location in locations {
            out.push('\t');
            out.push_str(&location.index.to_string());
            out.push(';');
            out.push_str(location.chapter.as_str());
        }
        out.push('\n');
    }
    out
}

/// Write `index` to `<dir>/<kind>-<L>.tsv` and return the path.
pub fn write_phrase_file(dir: &Path, kind: PhraseFileKind, index: &PhraseIndex) -> Result<PathBuf> {
    let path = dir.join(kind.file_name(index.length()));
    fs::write(&path, format_phrase_index(index)).map_err(|e| BuildError::write(&path, e))?;
    tracing::debug!(path = %path.display(), phrases = index.len(), "wrote phrase file");
    Ok(path)
}

// ============================================================================
// READING
// ============================================================================

fn parse_location(entry: &str) -> Option<Location> {
    let (index, chapter) = entry.split_once(';')?;
    let index = index.trim().parse().ok()?;
    let chapter = chapter.trim();
    if chapter.is_empty() {
        return None;
    }
    Some(Location::new(chapter, index))
}

/// Parse phrase-file text holding `length`-word phrases.
///
/// `source` names the input in diagnostics.
pub fn parse_phrase_file(text: &str, length: usize, source: &str) -> (PhraseIndex, Diagnostics) {
    let mut index = PhraseIndex::new(length);
    let mut diagnostics = Diagnostics::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let item = format!("{}:{}", source, line_no + 1);

        let mut fields = line.split('\t');
        let phrase = fields.next().unwrap_or_default();
        let words = phrase_word_count(phrase);
        if words != length {
            diagnostics.warn(
                item,
                format!("phrase '{}' has {} words, expected {}", phrase, words, length),
            );
            continue;
        }

        let mut locations = Vec::new();
        for entry in fields {
            match parse_location(entry) {
                Some(location) => locations.push(location),
                None => diagnostics.warn(item.clone(), format!("bad location entry '{}'", entry)),
            }
        }
        locations.sort_by(|a, b| a.storage_key().cmp(&b.storage_key()));
        locations.dedup();

        if locations.len() < 2 {
            diagnostics.warn(
                item,
                format!("phrase '{}' has {} location(s), skipped", phrase, locations.len()),
            );
            continue;
        }
        if index.contains(phrase) {
            diagnostics.warn(item, format!("phrase '{}' listed twice, merged", phrase));
        }
        for location in locations {
            index.record(phrase, location);
        }
    }

    (index, diagnostics)
}

/// Read one phrase file; the phrase length comes from its name.
pub fn read_phrase_file(path: &Path) -> Result<(PhraseIndex, Diagnostics)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (_, length) = parse_file_name(&name).ok_or_else(|| {
        BuildError::Config(format!("{}: not a phrase file name", path.display()))
    })?;
    let text = fs::read_to_string(path).map_err(|e| BuildError::read(path, e))?;
    Ok(parse_phrase_file(&text, length, &path.display().to_string()))
}

/// Read every `<kind>-<L>.tsv` in `dir`, sorted by length.
///
/// An unreadable directory is fatal; an unreadable file is reported and skipped.
pub fn read_phrase_dir(dir: &Path, kind: PhraseFileKind) -> Result<(Vec<PhraseIndex>, Diagnostics)> {
    let mut diagnostics = Diagnostics::new();
    let mut files: Vec<(usize, PathBuf)> = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| BuildError::read(dir, e))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                diagnostics.warn(dir.display().to_string(), format!("unreadable entry: {}", e));
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some((found, length)) = parse_file_name(&name) {
            if found == kind {
                files.push((length, entry.path()));
            }
        }
    }
    files.sort();

    let mut indexes = Vec::with_capacity(files.len());
    for (_, path) in files {
        match read_phrase_file(&path) {
            Ok((index, file_diagnostics)) => {
                diagnostics.extend(file_diagnostics);
                indexes.push(index);
            }
            Err(e) => diagnostics.warn(path.display().to_string(), e.to_string()),
        }
    }

    Ok((indexes, diagnostics))
}
