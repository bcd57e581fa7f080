// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the phrase-file reader.
//!
//! Phrase files are edited by hand between `mine` and `link`, so the reader
//! sees arbitrary text. Bad rows must become diagnostics, never panics.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use refrain::build::{format_phrase_index, parse_phrase_file};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    length: u8,
    text: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let length = usize::from(input.length % 16) + 1;
    let (index, _diagnostics) = parse_phrase_file(input.text, length, "fuzz");

    // Everything kept is well formed.
    assert_eq!(index.length(), length);
    for (phrase, locations) in index.iter() {
        assert_eq!(phrase.split(' ').count(), length, "kept '{}'", phrase);
        assert!(locations.len() >= 2, "'{}' kept with one location", phrase);
    }

    // What was accepted survives a write and re-read, when the phrases
    // themselves contain no separators the format cannot express.
    let printable = index
        .iter()
        .all(|(phrase, locations)| {
            !phrase.contains(['\t', '\n', '\r'])
                && locations
                    .iter()
                    .all(|l| !l.chapter.as_str().contains(['\t', '\n', '\r']))
        });
    if printable {
        let (reread, diagnostics) = parse_phrase_file(&format_phrase_index(&index), length, "fuzz");
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(reread, index);
    }
});
