//! Anchor graph properties: cycle closure, distinct targets, determinism.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use refrain::{build_anchor_graph, Location, Trail};

use super::common::{corpus_strategy, mine_and_filter};

/// Shuffled Trail over chapters c0, c1, ...
fn trail_for(chapters: usize, seed: u64) -> Trail {
    let mut order: Vec<String> = (0..chapters).map(|i| format!("c{}", i)).collect();
    // Cheap deterministic shuffle; proptest supplies the seed.
    let mut state = seed;
    for i in (1..order.len()).rev() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let j = (state >> 33) as usize % (i + 1);
        order.swap(i, j);
    }
    Trail::from_order(order).unwrap()
}

proptest! {
    /// Following next k times from any occurrence of a k-group returns to it.
    #[test]
    fn links_close_into_cycles(corpus in corpus_strategy(), seed in any::<u64>()) {
        let (_, independent) = mine_and_filter(&corpus, 1);
        let trail = trail_for(corpus.len(), seed);
        let graph = build_anchor_graph(&independent, &trail).unwrap();

        let mut groups: HashMap<&str, usize> = HashMap::new();
        for link in graph.links() {
            *groups.entry(link.phrase.as_str()).or_default() += 1;
        }

        for link in graph.links() {
            let k = groups[link.phrase.as_str()];
            let mut at: &Location = &link.source;
            for _ in 0..k {
                at = graph.next(at, &link.phrase).unwrap();
            }
            prop_assert_eq!(at, &link.source);
        }
    }

    /// No two occurrences of a phrase share a target.
    #[test]
    fn targets_are_distinct(corpus in corpus_strategy(), seed in any::<u64>()) {
        let (_, independent) = mine_and_filter(&corpus, 1);
        let trail = trail_for(corpus.len(), seed);
        let graph = build_anchor_graph(&independent, &trail).unwrap();

        let mut seen: HashSet<(&str, &Location)> = HashSet::new();
        for link in graph.links() {
            prop_assert!(seen.insert((link.phrase.as_str(), &link.target)));
        }
    }

    /// One link per independent occurrence, pointing forward in Trail order
    /// except for the single wrap per phrase.
    #[test]
    fn one_forward_link_per_occurrence(corpus in corpus_strategy(), seed in any::<u64>()) {
        let (_, independent) = mine_and_filter(&corpus, 1);
        let trail = trail_for(corpus.len(), seed);
        let graph = build_anchor_graph(&independent, &trail).unwrap();

        let total: usize = independent.iter().map(|k| k.total_occurrences()).sum();
        prop_assert_eq!(graph.len(), total);

        let mut wraps: HashMap<&str, usize> = HashMap::new();
        for link in graph.links() {
            if trail.compare(&link.target, &link.source).is_le() {
                *wraps.entry(link.phrase.as_str()).or_default() += 1;
            }
        }
        prop_assert!(wraps.values().all(|&w| w == 1));
    }

    /// Building twice from the same input gives the same graph.
    #[test]
    fn construction_is_deterministic(corpus in corpus_strategy(), seed in any::<u64>()) {
        let (_, independent) = mine_and_filter(&corpus, 1);
        let trail = trail_for(corpus.len(), seed);
        let first = build_anchor_graph(&independent, &trail).unwrap();
        let second = build_anchor_graph(independent.iter().rev(), &trail).unwrap();
        prop_assert_eq!(first.links(), second.links());
    }
}
