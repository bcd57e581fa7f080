// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Soft, per-item problems found during batch stages.
//!
//! A malformed table row or one unreadable phrase file should not take the whole
//! batch down. Stages push a `Diagnostic` here, log it, skip the item and keep going.
//! The caller decides what to do with the list afterwards.

use std::fmt;

/// One skipped item and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Path, `path:line`, or chapter identifier of the skipped item.
    pub item: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.item, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped item and emit it as a warning.
    pub fn warn(&mut self, item: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            item: item.into(),
            message: message.into(),
        };
        tracing::warn!(item = %diagnostic.item, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
