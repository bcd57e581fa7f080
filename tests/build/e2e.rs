//! End-to-end runs over the fixture corpora.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use refrain::build::{
    run_build, run_link, run_mine, LinkConfig, Overrides, RunConfig, ANCHORS_FILE, CHAPTERS_FILE,
    NAVIGATION_FILE,
};
use refrain::{AnchorLink, BuildError, ChapterId, ChapterNavigation, Location};
use serde::Deserialize;

use super::common::fixture;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Anchors {
    version: u32,
    min_length: usize,
    links: Vec<AnchorLink>,
}

#[derive(Deserialize)]
struct Navigation {
    chapters: Vec<ChapterNavigation>,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> T {
    let text = fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn config(name: &str, out: &Path) -> RunConfig {
    RunConfig::load(&fixture(name), out, &Overrides::default()).unwrap()
}

/// phrase → [(source, target)] as "chapter@index" strings.
fn cycles(links: &[AnchorLink]) -> BTreeMap<&str, Vec<(String, String)>> {
    let mut out: BTreeMap<&str, Vec<(String, String)>> = BTreeMap::new();
    for link in links {
        out.entry(link.phrase.as_str())
            .or_default()
            .push((link.source.to_string(), link.target.to_string()));
    }
    out
}

fn nav_pairs(navigation: &Navigation) -> Vec<(String, Option<String>, Option<String>)> {
    navigation
        .chapters
        .iter()
        .map(|nav| {
            (
                nav.chapter.to_string(),
                nav.previous.chapter().map(ToString::to_string),
                nav.next.chapter().map(ToString::to_string),
            )
        })
        .collect()
}

fn link_config(phrases: &Path, chapters: Vec<ChapterId>) -> LinkConfig {
    LinkConfig {
        phrases_dir: phrases.to_path_buf(),
        trail: fixture("valid").join("trail.tsv"),
        output_dir: phrases.to_path_buf(),
        link_min_length: 3,
        chapters,
    }
}

/// The whale corpus plus an `interlude` chapter that shares no phrase with it.
fn corpus_with_interlude(input: &Path) {
    let valid = fixture("valid");
    for name in ["loomings.txt", "chase.json", "epilogue.txt", "trail.tsv"] {
        fs::copy(valid.join(name), input.join(name)).unwrap();
    }
    fs::write(input.join("interlude.txt"), "a calm day upon deck\n").unwrap();
    fs::write(
        input.join("manifest.json"),
        r#"{
  "version": 1,
  "chapters": ["loomings.txt", "interlude.txt", "chase.json", "epilogue.txt"],
  "trail": "trail.tsv",
  "minLength": 3
}"#,
    )
    .unwrap();
}

#[test]
fn build_links_the_whale_corpus() {
    let out = tempfile::tempdir().unwrap();
    let report = run_build(&config("valid", out.path())).unwrap();

    assert_eq!(report.chapters, 3);
    assert_eq!(report.links, 5);
    assert_eq!(report.links_written, 5);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

    let anchors: Anchors = read_json(&out.path().join(ANCHORS_FILE));
    assert_eq!(anchors.version, 1);
    assert_eq!(anchors.min_length, 3);

    let by_phrase = cycles(&anchors.links);
    let pair = |s: &str, t: &str| (s.to_string(), t.to_string());
    assert_eq!(
        by_phrase["some years ago never mind"],
        [pair("loomings@3", "chase@4"), pair("chase@4", "loomings@3")]
    );
    assert_eq!(
        by_phrase["the white whale"],
        [
            pair("chase@0", "chase@9"),
            pair("chase@9", "epilogue@10"),
            pair("epilogue@10", "chase@0"),
        ]
    );
    assert_eq!(by_phrase.len(), 2);

    // Links come out in reading order of their sources.
    assert_eq!(anchors.links[0].source, Location::new("loomings", 3));
}

#[test]
fn build_resolves_navigation_past_missing_chapters() {
    let out = tempfile::tempdir().unwrap();
    run_build(&config("valid", out.path())).unwrap();

    let navigation: Navigation = read_json(&out.path().join(NAVIGATION_FILE));
    let some = |s: &str| Some(s.to_string());
    assert_eq!(
        nav_pairs(&navigation),
        [
            ("loomings".to_string(), None, some("chase")),
            ("chase".to_string(), some("loomings"), some("epilogue")),
            ("epilogue".to_string(), some("chase"), None),
        ]
    );
}

#[test]
fn build_writes_phrase_files_for_every_length() {
    let out = tempfile::tempdir().unwrap();
    let report = run_build(&config("valid", out.path())).unwrap();

    for name in [
        "repeated-3.tsv",
        "repeated-4.tsv",
        "repeated-5.tsv",
        "independent-3.tsv",
        "independent-4.tsv",
        "independent-5.tsv",
        CHAPTERS_FILE,
    ] {
        assert!(out.path().join(name).is_file(), "{} missing", name);
    }
    assert!(!out.path().join("repeated-6.tsv").exists());

    let counts: Vec<(usize, usize, usize)> = report
        .lengths
        .iter()
        .map(|l| (l.length, l.repeated_phrases, l.independent_phrases))
        .collect();
    assert_eq!(counts, [(3, 4, 1), (4, 2, 0), (5, 1, 1)]);
}

#[test]
fn mine_then_link_matches_build() {
    let built = tempfile::tempdir().unwrap();
    run_build(&config("valid", built.path())).unwrap();

    let staged = tempfile::tempdir().unwrap();
    run_mine(&config("valid", staged.path())).unwrap();
    let report = run_link(&link_config(staged.path(), Vec::new())).unwrap();
    assert_eq!(report.links, 5);

    for file in [ANCHORS_FILE, NAVIGATION_FILE] {
        let expected = fs::read_to_string(built.path().join(file)).unwrap();
        let actual = fs::read_to_string(staged.path().join(file)).unwrap();
        assert_eq!(actual, expected, "{} differs", file);
    }
}

#[test]
fn link_reaches_chapters_named_on_the_command_line() {
    let staged = tempfile::tempdir().unwrap();
    run_mine(&config("valid", staged.path())).unwrap();

    let report =
        run_link(&link_config(staged.path(), vec![ChapterId::from("interlude")])).unwrap();
    assert_eq!(report.chapters, 4);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);

    let navigation: Navigation = read_json(&staged.path().join(NAVIGATION_FILE));
    let some = |s: &str| Some(s.to_string());
    assert_eq!(
        nav_pairs(&navigation),
        [
            ("loomings".to_string(), None, some("interlude")),
            ("interlude".to_string(), some("loomings"), some("chase")),
            ("chase".to_string(), some("interlude"), some("epilogue")),
            ("epilogue".to_string(), some("chase"), None),
        ]
    );
}

#[test]
fn link_reaches_chapters_without_repeated_phrases() {
    let input = tempfile::tempdir().unwrap();
    corpus_with_interlude(input.path());
    let staged = tempfile::tempdir().unwrap();
    let config = RunConfig::load(input.path(), staged.path(), &Overrides::default()).unwrap();
    run_mine(&config).unwrap();

    // Only the chapter list knows about the interlude.
    let independent = fs::read_to_string(staged.path().join("independent-3.tsv")).unwrap();
    assert!(!independent.contains("interlude"));

    let report = run_link(&link_config(staged.path(), Vec::new())).unwrap();
    assert_eq!(report.chapters, 4);
    assert_eq!(report.links, 5);

    let navigation: Navigation = read_json(&staged.path().join(NAVIGATION_FILE));
    let some = |s: &str| Some(s.to_string());
    assert_eq!(
        nav_pairs(&navigation),
        [
            ("loomings".to_string(), None, some("interlude")),
            ("interlude".to_string(), some("loomings"), some("chase")),
            ("chase".to_string(), some("interlude"), some("epilogue")),
            ("epilogue".to_string(), some("chase"), None),
        ]
    );
}

#[test]
fn link_without_chapter_list_warns_and_uses_phrase_files() {
    let staged = tempfile::tempdir().unwrap();
    run_mine(&config("valid", staged.path())).unwrap();
    fs::remove_file(staged.path().join(CHAPTERS_FILE)).unwrap();

    let report = run_link(&link_config(staged.path(), Vec::new())).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = report.diagnostics.iter().next().unwrap();
    assert!(diagnostic.item.ends_with(CHAPTERS_FILE), "{}", diagnostic.item);
    assert!(diagnostic.message.contains("no chapter list"), "{}", diagnostic.message);

    assert_eq!(report.chapters, 3);
    assert_eq!(report.links, 5);
    let navigation: Navigation = read_json(&staged.path().join(NAVIGATION_FILE));
    let chapters: Vec<String> = nav_pairs(&navigation).into_iter().map(|(c, _, _)| c).collect();
    assert_eq!(chapters, ["loomings", "chase", "epilogue"]);
}

#[test]
fn link_threshold_filters_published_links() {
    let out = tempfile::tempdir().unwrap();
    let overrides = Overrides {
        link_min_length: Some(4),
        ..Default::default()
    };
    let config = RunConfig::load(&fixture("valid"), out.path(), &overrides).unwrap();
    let report = run_build(&config).unwrap();
    assert_eq!(report.links, 5);
    assert_eq!(report.links_written, 2);

    let anchors: Anchors = read_json(&out.path().join(ANCHORS_FILE));
    assert!(anchors.links.iter().all(|l| l.length >= 4));
}

#[test]
fn missing_chapter_file_aborts() {
    let out = tempfile::tempdir().unwrap();
    let err = run_build(&config("missing-chapter", out.path())).unwrap_err();
    match err {
        BuildError::Read { path, .. } => assert!(path.ends_with("absent.txt")),
        other => panic!("expected a read error, got {:?}", other),
    }
    assert!(!out.path().join(ANCHORS_FILE).exists());
}

#[test]
fn malformed_trail_row_is_a_diagnostic() {
    let out = tempfile::tempdir().unwrap();
    let report = run_build(&config("bad-trail", out.path())).unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = report.diagnostics.iter().next().unwrap();
    assert!(diagnostic.item.ends_with("trail.tsv:2"), "{}", diagnostic.item);

    let anchors: Anchors = read_json(&out.path().join(ANCHORS_FILE));
    assert_eq!(
        cycles(&anchors.links)["red fish"],
        [
            ("one@0".to_string(), "two@4".to_string()),
            ("two@4".to_string(), "one@0".to_string()),
        ]
    );
}
