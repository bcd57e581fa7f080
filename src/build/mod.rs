pub mod document;
pub mod manifest;
pub mod parallel;
pub mod phrase_file;

use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::anchor::{build_anchor_graph, AnchorGraph};
use crate::diagnostics::Diagnostics;
use crate::error::{BuildError, Result};
use crate::index::{ChapterIndex, Corpus, PhraseIndex};
use crate::mining::{mine_repeated_phrases_with, LengthRange};
use crate::navigation::{AdjacencyTable, ChapterLinkResolver};
use crate::subsumption::{filter_independent, SubsumptionPolicy};
use crate::trail::Trail;
use crate::types::{AnchorLink, ChapterId, ChapterNavigation};

pub use document::*;
pub use manifest::*;
pub use parallel::*;
pub use phrase_file::*;

/// Output file names.
pub const ANCHORS_FILE: &str = "anchors.json";
pub const NAVIGATION_FILE: &str = "navigation.json";
pub const CHAPTERS_FILE: &str = "chapters.json";

/// Output format version for the JSON files.
pub const OUTPUT_VERSION: u32 = 1;

// ============================================================================
// OUTPUT DOCUMENTS
// ============================================================================

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AnchorsDocument<'a> {
    version: u32,
    min_length: usize,
    links: Vec<&'a AnchorLink>,
}

#[derive(Serialize, Debug)]
struct NavigationDocument<'a> {
    version: u32,
    chapters: &'a [ChapterNavigation],
}

#[derive(Serialize, serde::Deserialize, Debug)]
struct ChaptersDocument {
    version: u32,
    chapters: Vec<ChapterId>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| BuildError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|e| BuildError::write(path, e))?;
    eprintln!("  ✓ {}", path.display());
    Ok(())
}

/// Write the links at or above `min_length` to `anchors.json`.
pub fn write_anchors(dir: &Path, graph: &AnchorGraph, min_length: usize) -> Result<usize> {
    let doc = AnchorsDocument {
        version: OUTPUT_VERSION,
        min_length,
        links: graph.links_at_least(min_length).collect(),
    };
    write_json(&dir.join(ANCHORS_FILE), &doc)?;
    Ok(doc.links.len())
}

pub fn write_navigation(dir: &Path, navigation: &[ChapterNavigation]) -> Result<()> {
    let doc = NavigationDocument {
        version: OUTPUT_VERSION,
        chapters: navigation,
    };
    write_json(&dir.join(NAVIGATION_FILE), &doc)
}

fn write_chapter_list(dir: &Path, corpus: &Corpus) -> Result<()> {
    let doc = ChaptersDocument {
        version: OUTPUT_VERSION,
        chapters: corpus.ids().cloned().collect(),
    };
    write_json(&dir.join(CHAPTERS_FILE), &doc)
}

/// Chapters recorded by a previous `mine` run, if it left a list behind.
fn read_chapter_list(dir: &Path, diagnostics: &mut Diagnostics) -> Vec<ChapterId> {
    let path = dir.join(CHAPTERS_FILE);
    let parsed = fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<ChaptersDocument>(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(doc) => doc.chapters,
        Err(e) => {
            diagnostics.warn(path.display().to_string(), format!("no chapter list: {}", e));
            Vec::new()
        }
    }
}

fn create_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| BuildError::write(dir, e))
}

// ============================================================================
// REPORT
// ============================================================================

/// Counts for one phrase length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthReport {
    pub length: usize,
    pub repeated_phrases: usize,
    pub repeated_occurrences: usize,
    pub independent_phrases: usize,
    pub independent_occurrences: usize,
}

/// What a pipeline run produced.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub chapters: usize,
    pub words: usize,
    pub lengths: Vec<LengthReport>,
    pub links: usize,
    pub links_written: usize,
    pub navigation: usize,
    pub files: Vec<PathBuf>,
    pub diagnostics: Diagnostics,
}

impl PipelineReport {
    fn record_lengths(&mut self, raw: &[PhraseIndex], independent: &[ChapterIndex]) {
        self.lengths = raw
            .iter()
            .map(|index| LengthReport {
                length: index.length(),
                repeated_phrases: index.len(),
                repeated_occurrences: index.total_locations(),
                ..Default::default()
            })
            .collect();

        for filtered in independent {
            let phrases = filtered.to_phrase_index();
            match self.lengths.iter_mut().find(|l| l.length == filtered.length()) {
                Some(entry) => {
                    entry.independent_phrases = phrases.len();
                    entry.independent_occurrences = phrases.total_locations();
                }
                None => self.lengths.push(LengthReport {
                    length: filtered.length(),
                    independent_phrases: phrases.len(),
                    independent_occurrences: phrases.total_locations(),
                    ..Default::default()
                }),
            }
        }
    }

    /// Final summary on stderr.
    pub fn print_summary(&self, stage: &str) {
        let independent: usize = self.lengths.iter().map(|l| l.independent_occurrences).sum();
        eprintln!();
        eprintln!("✅ {} complete", stage);
        eprintln!(
            "   {} chapters │ {} words │ {} lengths │ {} independent │ {} links ({} written) │ {} nav",
            self.chapters,
            self.words,
            self.lengths.len(),
            independent,
            self.links,
            self.links_written,
            self.navigation
        );
        if !self.diagnostics.is_empty() {
            eprintln!("⚠️  {} item(s) skipped", self.diagnostics.len());
        }
    }
}

// ============================================================================
// STAGES
// ============================================================================

/// Create a progress style for the main progress bars
#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━╸")
}

#[cfg(feature = "parallel")]
fn stage_bar(multi: &MultiProgress, len: usize, prefix: &'static str, message: &'static str) -> ProgressBar {
    let bar = multi.add(ProgressBar::new(len as u64));
    bar.set_style(create_progress_style());
    bar.set_prefix(prefix);
    bar.set_message(message);
    bar
}

/// Number of lengths a bounded range can mine. `None` when unbounded.
#[cfg(feature = "parallel")]
fn mining_span(range: LengthRange) -> Option<usize> {
    range.max().map(|max| max + 1 - range.min())
}

/// Advance the mining bar past one finished length.
/// An unbounded bar grows one level at a time.
#[cfg(feature = "parallel")]
fn record_level(bar: &ProgressBar, bounded: bool, index: &PhraseIndex) {
    if !bounded {
        bar.inc_length(1);
    }
    bar.inc(1);
    bar.set_message(format!("length {}: {} phrases", index.length(), index.len()));
}

/// Mined and filtered phrase sets for one corpus.
pub struct MinedPhrases {
    pub raw: Vec<PhraseIndex>,
    pub independent: Vec<ChapterIndex>,
}

/// Mine every length in `range` and filter the result, all in memory.
pub fn mine_corpus(
    corpus: &Corpus,
    range: LengthRange,
    policy: SubsumptionPolicy,
    diagnostics: &mut Diagnostics,
) -> Result<MinedPhrases> {
    let raw = mine_repeated_phrases_with(corpus, range, |index| {
        tracing::info!(length = index.length(), phrases = index.len(), "mined");
    });
    let independent = filter_independent(&raw, policy, diagnostics)?;
    Ok(MinedPhrases { raw, independent })
}

fn load_stage(
    config: &RunConfig,
    #[cfg(feature = "parallel")] multi: &MultiProgress,
) -> Result<Corpus> {
    #[cfg(feature = "parallel")]
    let load_pb = stage_bar(multi, config.chapters.len(), "Loading", "chapters...");

    let corpus = load_corpus_with_progress(
        &config.chapters,
        #[cfg(feature = "parallel")]
        &load_pb,
    )?;

    #[cfg(feature = "parallel")]
    load_pb.finish_with_message(format!("loaded {} chapters", corpus.len()));

    Ok(corpus)
}

fn mine_stage(
    corpus: &Corpus,
    config: &RunConfig,
    diagnostics: &mut Diagnostics,
    #[cfg(feature = "parallel")] multi: &MultiProgress,
) -> Result<MinedPhrases> {
    #[cfg(feature = "parallel")]
    let span = mining_span(config.range);
    #[cfg(feature = "parallel")]
    let mine_pb = stage_bar(multi, span.unwrap_or(0), "Mining", "lengths...");

    let raw = mine_repeated_phrases_with(corpus, config.range, |_index| {
        #[cfg(feature = "parallel")]
        record_level(&mine_pb, span.is_some(), _index);
    });

    #[cfg(feature = "parallel")]
    mine_pb.finish_with_message(format!("mined {} lengths", raw.len()));

    let independent = filter_independent(&raw, config.policy, diagnostics)?;
    Ok(MinedPhrases { raw, independent })
}

fn trail_and_table(
    trail_path: Option<&Path>,
    fallback: &[ChapterId],
    diagnostics: &mut Diagnostics,
) -> Result<(Trail, AdjacencyTable)> {
    let table = match trail_path {
        Some(path) => {
            let (table, table_diagnostics) = AdjacencyTable::load(path)?;
            diagnostics.extend(table_diagnostics);
            table
        }
        None => AdjacencyTable::linear(fallback),
    };
    let trail = Trail::from_table(&table)?;
    Ok((trail, table))
}

fn link_stage(
    independent: &[ChapterIndex],
    trail: &Trail,
    table: &AdjacencyTable,
    existing: &BTreeSet<ChapterId>,
    output_dir: &Path,
    link_min_length: usize,
    report: &mut PipelineReport,
) -> Result<()> {
    let graph = build_anchor_graph(independent, trail)?;
    report.links = graph.len();
    report.links_written = write_anchors(output_dir, &graph, link_min_length)?;
    report.files.push(output_dir.join(ANCHORS_FILE));

    let resolver = ChapterLinkResolver::new(table, |chapter: &ChapterId| existing.contains(chapter));
    let navigation = resolver.resolve_all();
    report.navigation = navigation.len();
    write_navigation(output_dir, &navigation)?;
    report.files.push(output_dir.join(NAVIGATION_FILE));
    Ok(())
}

/// `mine`: load the corpus, mine and filter, persist phrase files.
pub fn run_mine(config: &RunConfig) -> Result<PipelineReport> {
    #[cfg(feature = "parallel")]
    let multi = MultiProgress::new();

    let corpus = load_stage(
        config,
        #[cfg(feature = "parallel")]
        &multi,
    )?;

    let mut report = PipelineReport {
        chapters: corpus.len(),
        words: corpus.total_words(),
        ..Default::default()
    };

    let mined = mine_stage(
        &corpus,
        config,
        &mut report.diagnostics,
        #[cfg(feature = "parallel")]
        &multi,
    )?;
    report.record_lengths(&mined.raw, &mined.independent);

    create_output_dir(&config.output_dir)?;
    report.files = write_phrase_files(&config.output_dir, &mined.raw, &mined.independent)?;
    write_chapter_list(&config.output_dir, &corpus)?;
    report.files.push(config.output_dir.join(CHAPTERS_FILE));

    Ok(report)
}

/// Settings for `link`, which starts from persisted phrase files.
#[derive(Clone, Debug)]
pub struct LinkConfig {
    pub phrases_dir: PathBuf,
    pub trail: PathBuf,
    pub output_dir: PathBuf,
    pub link_min_length: usize,
    /// Chapters that exist in addition to those the phrase directory records.
    pub chapters: Vec<ChapterId>,
}

/// `link`: read independent phrase files and write anchors and navigation.
pub fn run_link(config: &LinkConfig) -> Result<PipelineReport> {
    let mut report = PipelineReport::default();

    let (indexes, read_diagnostics) =
        read_phrase_dir(&config.phrases_dir, PhraseFileKind::Independent)?;
    report.diagnostics.extend(read_diagnostics);

    let independent: Vec<ChapterIndex> = indexes.iter().map(PhraseIndex::to_chapter_index).collect();
    report.record_lengths(&[], &independent);

    let mut existing: BTreeSet<ChapterId> = read_chapter_list(&config.phrases_dir, &mut report.diagnostics)
        .into_iter()
        .collect();
    existing.extend(config.chapters.iter().cloned());
    for index in &independent {
        existing.extend(index.chapter_ids().cloned());
    }
    report.chapters = existing.len();

    let (trail, table) = trail_and_table(Some(config.trail.as_path()), &[], &mut report.diagnostics)?;

    create_output_dir(&config.output_dir)?;
    link_stage(
        &independent,
        &trail,
        &table,
        &existing,
        &config.output_dir,
        config.link_min_length,
        &mut report,
    )?;

    Ok(report)
}

/// `build`: every stage in one process.
pub fn run_build(config: &RunConfig) -> Result<PipelineReport> {
    #[cfg(feature = "parallel")]
    let multi = MultiProgress::new();

    let corpus = load_stage(
        config,
        #[cfg(feature = "parallel")]
        &multi,
    )?;

    let mut report = PipelineReport {
        chapters: corpus.len(),
        words: corpus.total_words(),
        ..Default::default()
    };

    let mined = mine_stage(
        &corpus,
        config,
        &mut report.diagnostics,
        #[cfg(feature = "parallel")]
        &multi,
    )?;
    report.record_lengths(&mined.raw, &mined.independent);

    let ids: Vec<ChapterId> = corpus.ids().cloned().collect();
    let (trail, table) = trail_and_table(config.trail.as_deref(), &ids, &mut report.diagnostics)?;
    let existing: BTreeSet<ChapterId> = ids.into_iter().collect();

    create_output_dir(&config.output_dir)?;
    report.files = write_phrase_files(&config.output_dir, &mined.raw, &mined.independent)?;
    write_chapter_list(&config.output_dir, &corpus)?;
    report.files.push(config.output_dir.join(CHAPTERS_FILE));

    link_stage(
        &mined.independent,
        &trail,
        &table,
        &existing,
        &config.output_dir,
        config.link_min_length,
        &mut report,
    )?;

    Ok(report)
}
