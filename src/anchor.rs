// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Anchor graph: each independent occurrence links to the next one of the same
//! phrase in Trail order, and the last wraps to the first.
//!
//! ```text
//!   "w2 w3":   A@1 ──▶ A@3 ──▶ B@0 ─┐
//!               ▲                   │
//!               └───────────────────┘
//! ```
//!
//! Phrase groups are independent of each other, so they are sorted and linked
//! in parallel. Each group costs O(k log k) for k occurrences, regardless of how
//! large the corpus is. Because `Trail::compare` is total, the result depends
//! only on the phrase texts and the Trail.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::index::ChapterIndex;
use crate::trail::Trail;
use crate::types::{AnchorLink, Location, PhraseOccurrence};
use crate::verify::{contracts, InvariantError};

/// The complete set of anchor links for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorGraph {
    links: Vec<AnchorLink>,
    by_source: HashMap<Location, Vec<usize>>,
}

impl AnchorGraph {
    fn from_links(links: Vec<AnchorLink>) -> Self {
        let mut by_source: HashMap<Location, Vec<usize>> = HashMap::with_capacity(links.len());
        for (pos, link) in links.iter().enumerate() {
            by_source.entry(link.source.clone()).or_default().push(pos);
        }
        AnchorGraph { links, by_source }
    }

    /// Links sorted by source in Trail order, then by phrase.
    pub fn links(&self) -> &[AnchorLink] {
        &self.links
    }

    pub fn into_links(self) -> Vec<AnchorLink> {
        self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links whose phrase has at least `min_length` words.
    pub fn links_at_least(&self, min_length: usize) -> impl Iterator<Item = &AnchorLink> {
        self.links.iter().filter(move |link| link.length >= min_length)
    }

    /// Where the anchor for `phrase` at `source` points.
    pub fn next(&self, source: &Location, phrase: &str) -> Option<&Location> {
        self.by_source
            .get(source)?
            .iter()
            .map(|&pos| &self.links[pos])
            .find(|link| link.phrase == phrase)
            .map(|link| &link.target)
    }

    /// The link built for `occurrence`. Missing means upstream corruption.
    pub fn link_for(&self, occurrence: &PhraseOccurrence) -> Result<&AnchorLink, InvariantError> {
        self.by_source
            .get(&occurrence.location)
            .into_iter()
            .flatten()
            .map(|&pos| &self.links[pos])
            .find(|link| link.phrase == occurrence.phrase)
            .ok_or_else(|| InvariantError::missing_from_group(&occurrence.phrase, &occurrence.location))
    }
}

/// Link one phrase group into a cycle.
fn link_group(
    phrase: &str,
    mut occurrences: Vec<&PhraseOccurrence>,
    trail: &Trail,
) -> Result<Vec<AnchorLink>, InvariantError> {
    if occurrences.len() < 2 {
        tracing::debug!(phrase, "skipping phrase with a single occurrence");
        return Ok(Vec::new());
    }

    trail.sort_by_location(&mut occurrences, |occurrence| &occurrence.location);

    if let Some(pair) = occurrences
        .windows(2)
        .find(|pair| pair[0].location == pair[1].location)
    {
        return Err(InvariantError::duplicate_location(phrase, &pair[0].location));
    }

    let k = occurrences.len();
    Ok(occurrences
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let target = occurrences[(i + 1) % k];
            AnchorLink {
                phrase: phrase.to_string(),
                length: source.length,
                source: source.location.clone(),
                target: target.location.clone(),
            }
        })
        .collect())
}

/// Build the anchor graph from the final independent occurrence sets.
///
/// Every occurrence's chapter must be on the Trail.
#[tracing::instrument(skip_all, fields(chapters = trail.len()))]
pub fn build_anchor_graph<'a>(
    independent: impl IntoIterator<Item = &'a ChapterIndex>,
    trail: &Trail,
) -> Result<AnchorGraph, InvariantError> {
    let mut groups: HashMap<&str, Vec<&PhraseOccurrence>> = HashMap::new();
    for index in independent {
        for occurrence in index.occurrences() {
            if !trail.contains(occurrence.chapter()) {
                return Err(InvariantError::unknown_chapter(
                    &occurrence.phrase,
                    &occurrence.location,
                ));
            }
            groups
                .entry(occurrence.phrase.as_str())
                .or_default()
                .push(occurrence);
        }
    }
    let groups: Vec<(&str, Vec<&PhraseOccurrence>)> = groups.into_iter().collect();

    #[cfg(feature = "parallel")]
    let linked: Result<Vec<Vec<AnchorLink>>, InvariantError> = groups
        .into_par_iter()
        .map(|(phrase, occurrences)| link_group(phrase, occurrences, trail))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let linked: Result<Vec<Vec<AnchorLink>>, InvariantError> = groups
        .into_iter()
        .map(|(phrase, occurrences)| link_group(phrase, occurrences, trail))
        .collect();

    let mut links: Vec<AnchorLink> = linked?.into_iter().flatten().collect();
    links.sort_by(|a, b| {
        trail
            .compare(&a.source, &b.source)
            .then_with(|| a.phrase.cmp(&b.phrase))
    });

    let graph = AnchorGraph::from_links(links);
    contracts::check_anchor_cycles(&graph);
    tracing::info!(links = graph.len(), "anchor graph built");
    Ok(graph)
}
