use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};
use crate::mining::{LengthRange, DEFAULT_MIN_LENGTH};
use crate::subsumption::SubsumptionPolicy;

/// Manifest versions this build understands.
pub const MANIFEST_VERSION: u32 = 1;

fn default_min_length() -> usize {
    DEFAULT_MIN_LENGTH
}

/// `manifest.json` in the input directory.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InputManifest {
    pub version: u32,
    /// Chapter files, relative to the input directory, in natural order.
    pub chapters: Vec<String>,
    /// Ordering/adjacency table, relative to the input directory.
    #[serde(default)]
    pub trail: Option<String>,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Shortest phrase whose anchors are published. Defaults to `min_length`.
    #[serde(default)]
    pub link_min_length: Option<usize>,
    #[serde(default)]
    pub subsumption: SubsumptionPolicy,
}

impl InputManifest {
    pub fn load(input_dir: &Path) -> Result<Self> {
        let path = input_dir.join("manifest.json");
        let content = fs::read_to_string(&path).map_err(|e| BuildError::read(&path, e))?;
        let manifest: InputManifest =
            serde_json::from_str(&content).map_err(|source| BuildError::Json {
                path: path.clone(),
                source,
            })?;
        if manifest.version != MANIFEST_VERSION {
            return Err(BuildError::Config(format!(
                "{}: unsupported manifest version {} (expected {})",
                path.display(),
                manifest.version,
                MANIFEST_VERSION
            )));
        }
        Ok(manifest)
    }
}

/// Command-line values that take precedence over the manifest.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub link_min_length: Option<usize>,
    pub trail: Option<PathBuf>,
    pub subsumption: Option<SubsumptionPolicy>,
}

/// Fully resolved settings for one `mine` or `build` run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub chapters: Vec<PathBuf>,
    pub trail: Option<PathBuf>,
    pub range: LengthRange,
    pub link_min_length: usize,
    pub policy: SubsumptionPolicy,
}

impl RunConfig {
    pub fn resolve(
        manifest: InputManifest,
        input_dir: &Path,
        output_dir: &Path,
        overrides: &Overrides,
    ) -> Result<Self> {
        let min = overrides.min_length.unwrap_or(manifest.min_length);
        let max = overrides.max_length.or(manifest.max_length);
        let range = LengthRange::new(min, max)?;

        let link_min_length = overrides
            .link_min_length
            .or(manifest.link_min_length)
            .unwrap_or(min);

        let trail = overrides
            .trail
            .clone()
            .or_else(|| manifest.trail.as_ref().map(|t| input_dir.join(t)));

        Ok(RunConfig {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            chapters: manifest.chapters.iter().map(|c| input_dir.join(c)).collect(),
            trail,
            range,
            link_min_length,
            policy: overrides.subsumption.unwrap_or(manifest.subsumption),
        })
    }

    /// Read `manifest.json` from `input_dir` and apply `overrides`.
    pub fn load(input_dir: &Path, output_dir: &Path, overrides: &Overrides) -> Result<Self> {
        let manifest = InputManifest::load(input_dir)?;
        Self::resolve(manifest, input_dir, output_dir, overrides)
    }
}
