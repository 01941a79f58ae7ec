//! Release notes generation command implementation.
use chrono::{DateTime, Utc};
use log::*;
use semver::Version;
use std::path::Path;

use crate::{
    builder::ReleaseBuilder,
    cli::Args,
    config::Config,
    error::Result,
    repo::{GitRepository, VersionControl},
    store::NotesStore,
};

/// Summary of a generator run that produced new notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Version written to the manifest.
    pub version: Version,
    /// Number of notes added in this run.
    pub added: usize,
    /// Whether the sync commit was created.
    pub committed: bool,
}

/// Execute the generate command against the repository in `args`.
pub fn execute(args: &Args, dry_run: bool) -> Result<()> {
    let repo_path = Path::new(&args.repo);
    let git = GitRepository::open(repo_path)?;
    let root = git.root(repo_path);

    let config = Config::load(&root)?;
    let store = NotesStore::new(&root, &config);

    match run(&git, &store, &config, Utc::now(), dry_run)? {
        Some(outcome) if dry_run => {
            info!(
                "dry run: would add {} note(s) and set version {}",
                outcome.added, outcome.version
            );
        }
        Some(outcome) => {
            info!(
                "added {} note(s): version is now {}",
                outcome.added, outcome.version
            );
        }
        None => info!("release notes are up-to-date: nothing to do"),
    }

    Ok(())
}

/// Run one generation pass.
///
/// # Returns
///
/// `None` when there was nothing new to record, in which case neither file
/// is touched.
///
/// # Errors
///
/// A missing or malformed manifest, an unreadable notes file, a history
/// read failure or a version that cannot be bumped aborts the run before
/// anything is written. A failed commit does not.
pub fn run(
    vcs: &dyn VersionControl,
    store: &NotesStore,
    config: &Config,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<Option<Outcome>> {
    let mut manifest = store.load_manifest()?;
    let current = manifest.version()?;
    let existing = store.load_notes()?;
    let existing_count = existing.len();

    info!(
        "current version {current}, {existing_count} existing release note(s)"
    );

    let history = vcs.recent_history(config.commit_limit)?;
    debug!("inspecting {} recent commit(s)", history.len());

    let builder = ReleaseBuilder::new(config);
    let Some(state) = builder.build(history, existing, current, now)? else {
        return Ok(None);
    };

    let added = state.notes.len() - existing_count;

    if dry_run {
        for note in state.notes.iter().take(added) {
            info!(
                "dry run: new release note:\n{}",
                serde_json::to_string_pretty(note)?
            );
        }

        return Ok(Some(Outcome {
            version: state.version,
            added,
            committed: false,
        }));
    }

    manifest.set_version(&state.version);
    store.save(&state.notes, &manifest)?;

    // files stay written even when the commit fails
    let committed = match vcs.commit_all(&config.commit_message) {
        Ok(()) => {
            info!("committed release notes: {}", config.commit_message);
            true
        }
        Err(err) => {
            error!("failed to commit release notes: {err}");
            false
        }
    };

    Ok(Some(Outcome {
        version: state.version,
        added,
        committed,
    }))
}
