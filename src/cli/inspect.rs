// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `refrain inspect`: a boxed summary of one persisted phrase file.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use refrain::build::{parse_file_name, read_phrase_file};
use refrain::{ChapterId, Result};

use super::display::{
    format_count, format_size, frequency, pad_left, pad_right, row, section_bot, section_mid, section_top,
    themed, truncate_path, truncate_phrase, BOLD, GRAY,
};

const LABEL_WIDTH: usize = 12;
const PHRASE_WIDTH: usize = 66;
const COUNT_WIDTH: usize = 10;

fn field(label: &str, value: &str) {
    row(&format!("  {}{}", pad_right(&themed(GRAY, &[], label), LABEL_WIDTH), value));
}

pub fn inspect_phrase_file(path: &Path, top: usize) -> Result<()> {
    let (index, diagnostics) = read_phrase_file(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let kind = parse_file_name(&name).map(|(kind, _)| kind.to_string());
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let chapters: BTreeSet<&ChapterId> = index
        .iter()
        .flat_map(|(_, locations)| locations.iter().map(|l| &l.chapter))
        .collect();

    let mut by_frequency: Vec<(&str, usize)> = index
        .iter()
        .map(|(phrase, locations)| (phrase, locations.len()))
        .collect();
    by_frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    section_top("PHRASE FILE");
    field("path", &truncate_path(&path.display().to_string(), 60));
    field("kind", kind.as_deref().unwrap_or("-"));
    field("length", &format!("{} words", index.length()));
    field("size", &format_size(size));

    section_mid("COUNTS");
    let count = |n: usize| pad_left(&format_count(n), COUNT_WIDTH);
    field("phrases", &themed(super::display::GREEN, &[BOLD], &count(index.len())));
    field("locations", &count(index.total_locations()));
    field("chapters", &count(chapters.len()));
    field("skipped", &count(diagnostics.len()));

    if top > 0 && !by_frequency.is_empty() {
        section_mid("MOST FREQUENT");
        for (phrase, count) in by_frequency.iter().take(top) {
            row(&format!("  {}  {}", frequency(*count), truncate_phrase(phrase, PHRASE_WIDTH)));
        }
    }
    section_bot();

    for diagnostic in diagnostics.iter().take(top) {
        eprintln!("⚠️  {}", diagnostic);
    }
    Ok(())
}
