// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the refrain command-line interface.
//!
//! Four subcommands: `mine` persists repeated and independent phrase files,
//! `link` turns persisted independent phrases plus an ordering table into
//! anchors and navigation, `build` runs everything in one process, and
//! `inspect` summarizes a phrase file.

pub mod display;
pub mod inspect;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use refrain::build::Overrides;
use refrain::SubsumptionPolicy;

#[derive(Parser)]
#[command(
    name = "refrain",
    about = "Repeated-phrase miner and cross-chapter anchor builder",
    version
)]
pub struct Cli {
    /// More logging (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PolicyArg {
    /// Abort on an overlapped occurrence that no longer phrase contains
    Strict,
    /// Drop such occurrences and report them
    Lenient,
}

impl From<PolicyArg> for SubsumptionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => SubsumptionPolicy::Strict,
            PolicyArg::Lenient => SubsumptionPolicy::Lenient,
        }
    }
}

/// Flags shared by `mine` and `build`; each overrides manifest.json.
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Input directory containing manifest.json and the chapter files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for phrase files and JSON output
    #[arg(short, long)]
    pub output: PathBuf,

    /// Shortest phrase length to mine
    #[arg(long)]
    pub min_length: Option<usize>,

    /// Longest phrase length to mine (default: until nothing repeats)
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Ordering/adjacency table (predecessor<TAB>focus<TAB>successor)
    #[arg(long)]
    pub trail: Option<PathBuf>,

    /// What to do when subsumption finds an uncontained overlap
    #[arg(long, value_enum)]
    pub subsumption: Option<PolicyArg>,
}

impl RunArgs {
    pub fn overrides(&self, link_min_length: Option<usize>) -> Overrides {
        Overrides {
            min_length: self.min_length,
            max_length: self.max_length,
            link_min_length,
            trail: self.trail.clone(),
            subsumption: self.subsumption.map(Into::into),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mine repeated phrases and persist per-length phrase files
    Mine {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Build anchors.json and navigation.json from persisted phrase files
    Link {
        /// Directory holding independent-<L>.tsv files from `mine`
        #[arg(short, long)]
        phrases: PathBuf,

        /// Ordering/adjacency table
        #[arg(short, long)]
        trail: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Shortest phrase whose anchors are written
        #[arg(long, default_value_t = refrain::DEFAULT_MIN_LENGTH)]
        link_min_length: usize,

        /// Extra chapter that exists even without phrases (repeatable)
        #[arg(long = "chapter")]
        chapters: Vec<String>,
    },

    /// Run every stage: mine, filter, link, navigate
    Build {
        #[command(flatten)]
        run: RunArgs,

        /// Shortest phrase whose anchors are written
        #[arg(long)]
        link_min_length: Option<usize>,
    },

    /// Summarize a persisted phrase file
    Inspect {
        /// Path to a repeated-<L>.tsv or independent-<L>.tsv file
        file: PathBuf,

        /// How many of the most frequent phrases to list
        #[arg(long, default_value = "10")]
        top: usize,
    },
}
