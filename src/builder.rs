//! Release note building.
//!
//! Turns a window of commit history into one release note per author,
//! threading the project version through each author in turn.
use chrono::{DateTime, Utc};
use log::*;
use semver::Version;

use crate::{
    bump::{BumpResolver, BumpTable, bump_version},
    classifier::{CommitType, classify},
    config::Config,
    error::Result,
    notes::{ReleaseNote, ReleaseNotes},
    repo::Commit,
};


/// Commits attributed to a single author within one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorGroup {
    pub author: String,
    pub commits: Vec<Commit>,
}

/// Accumulated result of a run: the notes collection and the version the
/// next author bumps from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub notes: ReleaseNotes,
    pub version: Version,
}

/// Filters history and builds per-author release notes.
pub struct ReleaseBuilder {
    resolver: BumpResolver,
    skip_phrases: Vec<String>,
    skip_merge_commits: bool,
    release_commit_message: Option<String>,
}

impl ReleaseBuilder {
    pub fn new(config: &Config) -> Self {
        let release_commit_message = config
            .skip_release_commits
            .then(|| config.commit_message.trim().to_lowercase());

        Self {
            resolver: BumpResolver::new(
                BumpTable::new(&config.bump_types),
                config.minor_bump_days,
            ),
            skip_phrases: config
                .skip_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            skip_merge_commits: config.skip_merge_commits,
            release_commit_message,
        }
    }

    /// Build the updated notes and version from `history`. Returns `None`
    /// when no commit survives filtering, meaning nothing should be written.
    pub fn build(
        &self,
        history: Vec<Commit>,
        existing: ReleaseNotes,
        current: Version,
        now: DateTime<Utc>,
    ) -> Result<Option<RunState>> {
        let commits = self.new_commits(history, &existing);

        if commits.is_empty() {
            info!("no new commits found since last release notes update");
            return Ok(None);
        }

        let groups = group_by_author(commits);
        info!(
            "processing {} author(s) starting from version {current}",
            groups.len()
        );

        let state = RunState {
            notes: existing,
            version: current,
        };

        let state = groups.iter().try_fold(state, |state, group| {
            self.apply_author(state, group, now)
        })?;

        Ok(Some(state))
    }

    /// Drop housekeeping commits and commits already present in `existing`.
    pub fn new_commits(
        &self,
        history: Vec<Commit>,
        existing: &[ReleaseNote],
    ) -> Vec<Commit> {
        let known = existing
            .iter()
            .flat_map(|n| n.changes.iter())
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect::<Vec<String>>();

        history
            .into_iter()
            .filter(|c| !self.is_housekeeping(c))
            .filter(|c| {
                let duplicate = is_duplicate(&c.message, &known);
                if duplicate {
                    debug!("skipping already recorded commit {}", c.hash);
                }
                !duplicate
            })
            .collect()
    }

    /// Merge, rebase and pull-request commits, plus this tool's own commits.
    pub fn is_housekeeping(&self, commit: &Commit) -> bool {
        let message = commit.message.to_lowercase();

        if self.skip_merge_commits && commit.merge_commit {
            debug!("skipping merge commit {}", commit.hash);
            return true;
        }

        if let Some(release_message) = &self.release_commit_message
            && message.trim() == release_message
        {
            debug!("skipping release notes commit {}", commit.hash);
            return true;
        }

        if let Some(phrase) =
            self.skip_phrases.iter().find(|p| message.contains(p.as_str()))
        {
            debug!("skipping commit {}: contains \"{phrase}\"", commit.hash);
            return true;
        }

        false
    }

    /// Resolve one author's bump against `state` and prepend their note.
    pub fn apply_author(
        &self,
        mut state: RunState,
        group: &AuthorGroup,
        now: DateTime<Utc>,
    ) -> Result<RunState> {
        let types = group
            .commits
            .iter()
            .map(|c| classify(&c.message))
            .collect::<Vec<CommitType>>();

        let Some(resolution) = self.resolver.resolve(&types, &state.notes, now)
        else {
            return Ok(state);
        };

        let next = bump_version(&state.version, resolution.kind)?;

        info!(
            "{}: {} commit(s), highest type {}, {} bump {} -> {}",
            group.author,
            group.commits.len(),
            resolution.highest_type,
            resolution.kind,
            state.version,
            next
        );

        let note = ReleaseNote {
            version: next.clone(),
            date: now,
            developer: group.author.clone(),
            changes: group.commits.iter().map(|c| c.message.clone()).collect(),
        };

        state.notes.insert(0, note);
        state.version = next;
        Ok(state)
    }
}

/// Whether `message` overlaps any known change entry. `known` entries must
/// already be lower-cased.
fn is_duplicate(message: &str, known: &[String]) -> bool {
    let message = message.trim().to_lowercase();

    if message.is_empty() {
        return false;
    }

    known
        .iter()
        .any(|k| k.contains(&message) || message.contains(k.as_str()))
}

/// Group commits by author display name, keeping first-seen author order and
/// each author's commit order.
pub fn group_by_author(commits: Vec<Commit>) -> Vec<AuthorGroup> {
    let mut groups: Vec<AuthorGroup> = vec![];

    for commit in commits {
        match groups.iter_mut().find(|g| g.author == commit.author_name) {
            Some(group) => group.commits.push(commit),
            None => groups.push(AuthorGroup {
                author: commit.author_name.clone(),
                commits: vec![commit],
            }),
        }
    }

    groups
}
