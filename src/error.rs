// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Input and configuration errors.
//!
//! Everything here is fatal for the stage that hit it: a missing corpus file or
//! a bad length range means there is nothing trustworthy to publish.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ChapterId;
use crate::verify::InvariantError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("chapter '{0}' is declared more than once")]
    DuplicateChapter(ChapterId),

    #[error("invalid phrase length range: {0}")]
    LengthRange(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantError),
}

impl BuildError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
