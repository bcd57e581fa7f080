//! Reference oracles for differential testing.
//!
//! Simple, obviously-correct implementations: no pruning oracle, no sharding,
//! no parallelism. Slow, but easy to check by eye, so the optimized pipeline is
//! verified by comparing against them on random corpora.

use std::collections::{BTreeMap, BTreeSet};

use refrain::Corpus;

/// Phrase → sorted (chapter, index) set.
pub type OracleLength = BTreeMap<String, BTreeSet<(String, usize)>>;

/// Count every window of every length from `min` up, keep phrases with ≥ 2
/// locations, stop at the first length with none.
pub fn oracle_mine(corpus: &Corpus, min: usize) -> Vec<OracleLength> {
    let mut out = Vec::new();
    let mut length = min;
    loop {
        let mut all: OracleLength = BTreeMap::new();
        for chapter in corpus.chapters() {
            let words = chapter.words();
            if words.len() < length {
                continue;
            }
            for start in 0..=words.len() - length {
                let phrase = words[start..start + length].join(" ");
                all.entry(phrase)
                    .or_default()
                    .insert((chapter.id().to_string(), start));
            }
        }
        all.retain(|_, locations| locations.len() >= 2);
        if all.is_empty() {
            return out;
        }
        out.push(all);
        length += 1;
    }
}

/// Drop every occurrence with a raw (L+1) occurrence at i−1 or i in the same
/// chapter, then drop phrases left with fewer than two occurrences. The last
/// length has nothing longer and is kept whole.
pub fn oracle_independent(raw: &[OracleLength]) -> Vec<OracleLength> {
    let mut out = Vec::with_capacity(raw.len());
    for (pos, shorter) in raw.iter().enumerate() {
        let Some(longer) = raw.get(pos + 1) else {
            out.push(shorter.clone());
            break;
        };
        let starts: BTreeSet<&(String, usize)> = longer.values().flatten().collect();

        let mut kept: OracleLength = BTreeMap::new();
        for (phrase, locations) in shorter {
            for (chapter, index) in locations {
                let left = index
                    .checked_sub(1)
                    .is_some_and(|l| starts.contains(&(chapter.clone(), l)));
                let right = starts.contains(&(chapter.clone(), *index));
                if !left && !right {
                    kept.entry(phrase.clone())
                        .or_default()
                        .insert((chapter.clone(), *index));
                }
            }
        }
        kept.retain(|_, locations| locations.len() >= 2);
        out.push(kept);
    }
    out
}

/// The pipeline's per-length output in oracle form.
pub fn as_oracle(index: &refrain::PhraseIndex) -> OracleLength {
    index
        .iter()
        .map(|(phrase, locations)| {
            let set = locations
                .iter()
                .map(|l| (l.chapter.to_string(), l.index))
                .collect();
            (phrase.to_string(), set)
        })
        .collect()
}
