//! Configuration loading and parsing for `relnotes.toml` files.
//!
//! Every field has a compiled-in default, so the file is optional and may
//! override any subset of settings.
use log::*;
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};

use crate::{
    bump::BumpKind,
    error::{RelnotesError, Result},
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "relnotes.toml";

/// Number of recent commits inspected per run.
pub const DEFAULT_COMMIT_LIMIT: usize = 30;

/// Minimum days between minor bumps.
pub const DEFAULT_MINOR_BUMP_DAYS: i64 = 7;

/// Default notes file, relative to the repository root.
pub const DEFAULT_NOTES_FILE: &str = "release-notes.json";

/// Default manifest holding the project version.
pub const DEFAULT_MANIFEST_FILE: &str = "package.json";

/// Message used for the commit that records a generator run.
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore: update release notes";

/// Phrases marking version-control housekeeping commits.
pub const DEFAULT_SKIP_PHRASES: &[&str] =
    &["merge branch", "rebase branch", "pull request", "pr #"];

/// Root configuration structure for `relnotes.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of most recent commits to inspect.
    pub commit_limit: usize,
    /// Days that must pass since the last minor/patch release before another
    /// minor bump is allowed.
    pub minor_bump_days: i64,
    /// Path to the release notes JSON file.
    pub notes_file: String,
    /// Path to the JSON manifest carrying the `version` field.
    pub manifest_file: String,
    /// Commit message used when committing generated notes.
    pub commit_message: String,
    /// Case-insensitive phrases that exclude a commit from processing.
    pub skip_phrases: Vec<String>,
    /// Skips commits with more than one parent (default: true)
    pub skip_merge_commits: bool,
    /// Skips commits created by previous runs of this tool (default: true)
    pub skip_release_commits: bool,
    /// Additional or overriding entries for the tag to bump-kind table.
    pub bump_types: BTreeMap<String, BumpKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commit_limit: DEFAULT_COMMIT_LIMIT,
            minor_bump_days: DEFAULT_MINOR_BUMP_DAYS,
            notes_file: DEFAULT_NOTES_FILE.into(),
            manifest_file: DEFAULT_MANIFEST_FILE.into(),
            commit_message: DEFAULT_COMMIT_MESSAGE.into(),
            skip_phrases: DEFAULT_SKIP_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            skip_merge_commits: true,
            skip_release_commits: true,
            bump_types: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load `relnotes.toml` from the repository root, falling back to
    /// defaults when the file does not exist.
    pub fn load(repo_path: &Path) -> Result<Self> {
        let file_path = repo_path.join(DEFAULT_CONFIG_FILE);

        if !file_path.exists() {
            info!("repository configuration not found: using default");
            return Ok(Self::default());
        }

        debug!("loading configuration from {}", file_path.display());
        let content = fs::read_to_string(&file_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.commit_limit == 0 {
            return Err(RelnotesError::invalid_config(
                "commit_limit must be greater than 0",
            ));
        }

        if self.minor_bump_days < 0 {
            return Err(RelnotesError::invalid_config(
                "minor_bump_days must not be negative",
            ));
        }

        Ok(())
    }
}
