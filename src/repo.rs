//! Git repository operations.
//!
//! The generator only needs two things from version control: the most recent
//! commits reachable from HEAD, and a way to commit the files it rewrote.
//! Both sit behind the [`VersionControl`] trait so the note building pipeline
//! can be exercised without a real repository.
use chrono::{DateTime, Utc};
use git2::Sort;
use log::*;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[cfg(test)]
use mockall::automock;

/// Number of hash characters kept for display.
const SHORT_HASH_LEN: usize = 7;

/// Commit metadata read from history for a single generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    /// Abbreviated commit hash.
    pub hash: String,
    /// Author display name.
    pub author_name: String,
    /// Author email address.
    pub author_email: String,
    /// Commit time.
    pub timestamp: DateTime<Utc>,
    /// Subject line of the commit message.
    pub message: String,
    /// Whether the commit has more than one parent.
    pub merge_commit: bool,
}

/// Narrow interface over the version-control system.
#[cfg_attr(test, automock)]
pub trait VersionControl {
    /// Return up to `limit` commits reachable from HEAD, newest first.
    fn recent_history(&self, limit: usize) -> Result<Vec<Commit>>;

    /// Stage every working-tree change and commit it with `message`.
    fn commit_all(&self, message: &str) -> Result<()>;
}

/// [`VersionControl`] backed by a local git repository.
pub struct GitRepository {
    repo: git2::Repository,
}

impl GitRepository {
    /// Open the repository containing `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - The repository root or any directory below it
    ///
    /// # Errors
    ///
    /// Returns [`crate::RelnotesError::GitError`] when no repository is
    /// found at or above `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        Ok(Self { repo })
    }

    /// Working directory of the repository.
    ///
    /// Bare repositories have none; callers fall back to the path they
    /// opened.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Directory that holds `relnotes.toml`, the manifest and the notes
    /// file: the working directory, or `opened_from` for bare repositories.
    pub fn root(&self, opened_from: &Path) -> PathBuf {
        self.workdir().unwrap_or(opened_from).to_path_buf()
    }

    fn to_commit(commit: &git2::Commit) -> Commit {
        let author = commit.author();
        let hash = commit.id().to_string();

        Commit {
            hash: hash.chars().take(SHORT_HASH_LEN).collect(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            timestamp: DateTime::from_timestamp(commit.time().seconds(), 0)
                .unwrap_or_default(),
            message: commit.summary().unwrap_or("").to_string(),
            merge_commit: commit.parent_count() > 1,
        }
    }
}

/// Resolve the project root for `path`.
///
/// # Arguments
///
/// * `path` - Directory the command was pointed at
///
/// # Returns
///
/// The working directory of the enclosing git repository, or `path` itself
/// when it is not inside one.
pub fn discover_root(path: &Path) -> PathBuf {
    match GitRepository::open(path) {
        Ok(git) => git.root(path),
        Err(err) => {
            debug!("{} is not inside a git repository: {err}", path.display());
            path.to_path_buf()
        }
    }
}

impl VersionControl for GitRepository {
    fn recent_history(&self, limit: usize) -> Result<Vec<Commit>> {
        if self.repo.is_empty()? {
            debug!("repository has no commits yet");
            return Ok(vec![]);
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let mut commits = vec![];

        for oid in revwalk.take(limit) {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(Self::to_commit(&commit));
        }

        debug!("read {} commit(s) from history", commits.len());

        Ok(commits)
    }

    /// Uses `user.name` and `user.email` from git configuration for both
    /// author and committer.
    fn commit_all(&self, message: &str) -> Result<()> {
        debug!("adding changed files to index");
        let mut index = self.repo.index()?;
        index.add_all(["."], git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;

        debug!("committing changes with msg: {message}");
        let config = self.repo.config()?.snapshot()?;
        let user = config.get_str("user.name")?;
        let email = config.get_str("user.email")?;
        let committer = git2::Signature::now(user, email)?;

        let oid = index.write_tree()?;
        let tree = self.repo.find_tree(oid)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents = parent.iter().collect::<Vec<&git2::Commit>>();

        self.repo.commit(
            Some("HEAD"),
            &committer,
            &committer,
            message,
            &tree,
            &parents,
        )?;

        Ok(())
    }
}
