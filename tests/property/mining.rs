//! Miner properties: windows are real, repetition is exact, pruning is sound.

use proptest::prelude::*;
use refrain::{mine_repeated_phrases, LengthRange};

use super::common::{corpus, corpus_strategy};
use super::oracles::{as_oracle, oracle_mine};

proptest! {
    /// Every emitted location spells its phrase inside one chapter.
    #[test]
    fn every_occurrence_is_a_real_run(corpus in corpus_strategy(), min in 1usize..4) {
        let mined = mine_repeated_phrases(&corpus, LengthRange::from_min(min).unwrap());
        for index in &mined {
            for (phrase, locations) in index.iter() {
                for location in locations {
                    let chapter = corpus.chapter(&location.chapter).unwrap();
                    let spelled = chapter.phrase_at(location.index, index.length());
                    prop_assert_eq!(spelled.as_deref(), Some(phrase));
                }
            }
        }
    }

    /// A phrase is emitted iff it has at least two distinct locations.
    #[test]
    fn matches_brute_force_oracle(corpus in corpus_strategy(), min in 1usize..4) {
        let mined = mine_repeated_phrases(&corpus, LengthRange::from_min(min).unwrap());
        let expected = oracle_mine(&corpus, min);

        let actual: Vec<_> = mined.iter().map(as_oracle).collect();
        prop_assert_eq!(actual, expected);
    }

    /// Anti-monotonicity: a repeated L-phrase's prefix repeated at L-1.
    #[test]
    fn prefixes_of_repeated_phrases_repeat(corpus in corpus_strategy()) {
        let mined = mine_repeated_phrases(&corpus, LengthRange::from_min(1).unwrap());
        for pair in mined.windows(2) {
            for phrase in pair[1].phrases() {
                let (prefix, _) = phrase.rsplit_once(' ').unwrap();
                prop_assert!(pair[0].contains(prefix), "prefix of '{}' missing", phrase);
            }
        }
    }

    /// Lengths are contiguous from min and none of them is empty.
    #[test]
    fn lengths_are_contiguous(corpus in corpus_strategy(), min in 1usize..4, extra in 0usize..4) {
        let range = LengthRange::new(min, Some(min + extra)).unwrap();
        let mined = mine_repeated_phrases(&corpus, range);
        for (offset, index) in mined.iter().enumerate() {
            prop_assert_eq!(index.length(), min + offset);
            prop_assert!(!index.is_empty());
            prop_assert!(range.contains(index.length()));
        }
    }
}

#[test]
fn worked_example() {
    let corpus = corpus(&[("A", "w1 w2 w3 w2 w3 w4"), ("B", "w2 w3")]);
    let mined = mine_repeated_phrases(&corpus, LengthRange::new(2, Some(3)).unwrap());

    // Length 3 comes back empty, so only length 2 is returned.
    assert_eq!(mined.len(), 1);
    let locations: Vec<String> = mined[0]
        .locations("w2 w3")
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(locations, ["A@1", "A@3", "B@0"]);
    assert_eq!(mined[0].len(), 1);
}
