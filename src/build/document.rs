use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{BuildError, Result};
use crate::index::WordIndex;
use crate::types::ChapterId;

/// A `.json` chapter file: an id and its already-tokenized words.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ChapterDocument {
    pub id: ChapterId,
    pub words: Vec<String>,
}

impl From<ChapterDocument> for WordIndex {
    fn from(doc: ChapterDocument) -> Self {
        WordIndex::new(doc.id, doc.words)
    }
}

/// Load one chapter file.
///
/// `.json` files are `ChapterDocument`s. Anything else is plain text: the id is
/// the file stem and the words are split on whitespace.
pub fn load_chapter(path: &Path) -> Result<WordIndex> {
    let content = fs::read_to_string(path).map_err(|e| BuildError::read(path, e))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let doc: ChapterDocument =
            serde_json::from_str(&content).map_err(|source| BuildError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        return checked(path, doc.into());
    }

    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| {
            BuildError::Config(format!("{}: cannot derive a chapter id", path.display()))
        })?;
    checked(path, WordIndex::from_text(id, &content))
}

/// Reject chapters whose id or words cannot survive phrase files.
fn checked(path: &Path, chapter: WordIndex) -> Result<WordIndex> {
    chapter
        .validate()
        .map_err(|msg| BuildError::Config(format!("{}: {}", path.display(), msg)))?;
    Ok(chapter)
}
