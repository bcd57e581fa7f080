//! Phrase files on disk: round trips and soft errors.

use std::fs;

use refrain::build::{read_phrase_dir, read_phrase_file, write_phrase_file, PhraseFileKind};
use refrain::{Location, PhraseIndex};

fn sample(length: usize, phrase: &str) -> PhraseIndex {
    let mut index = PhraseIndex::new(length);
    index.record(phrase, Location::new("b", 2));
    index.record(phrase, Location::new("a", 0));
    index.record(phrase, Location::new("a;x", 5));
    index
}

#[test]
fn written_file_reads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let index = sample(2, "red fish");

    let path = write_phrase_file(dir.path(), PhraseFileKind::Independent, &index).unwrap();
    assert_eq!(path.file_name().unwrap(), "independent-2.tsv");

    let (read, diagnostics) = read_phrase_file(&path).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(read, index);
}

#[test]
fn directory_read_filters_by_kind_and_sorts_by_length() {
    let dir = tempfile::tempdir().unwrap();
    write_phrase_file(dir.path(), PhraseFileKind::Independent, &sample(10, "a b c d e f g h i j")).unwrap();
    write_phrase_file(dir.path(), PhraseFileKind::Independent, &sample(2, "red fish")).unwrap();
    write_phrase_file(dir.path(), PhraseFileKind::Repeated, &sample(3, "one two three")).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let (indexes, diagnostics) = read_phrase_dir(dir.path(), PhraseFileKind::Independent).unwrap();
    assert!(diagnostics.is_empty());
    let lengths: Vec<usize> = indexes.iter().map(PhraseIndex::length).collect();
    assert_eq!(lengths, [2, 10]);
}

#[test]
fn bad_rows_are_reported_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("independent-2.tsv");
    fs::write(
        &path,
        "red fish\t0;one\t4;two\n\
         too many words\t0;one\t1;two\n\
         blue fish\t2;one\tnot-a-location\n\
         blue fish\t7;two\n",
    )
    .unwrap();

    let (index, diagnostics) = read_phrase_file(&path).unwrap();
    assert_eq!(index.phrases().collect::<Vec<_>>(), ["red fish"]);

    // Wrong word count, bad entry, then two single-location rows.
    assert_eq!(diagnostics.len(), 4);
    let lines: Vec<&str> = diagnostics
        .iter()
        .map(|d| d.item.rsplit(':').next().unwrap())
        .collect();
    assert_eq!(lines, ["2", "3", "3", "4"]);
}

#[test]
fn missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(read_phrase_dir(&missing, PhraseFileKind::Independent).is_err());
}
