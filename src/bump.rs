//! Version bump resolution.
//!
//! Maps commit tags to a bump kind, applies the minor-bump cooldown against
//! the existing notes history, and advances semantic versions.
use chrono::{DateTime, Utc};
use log::*;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use crate::{
    classifier::CommitType,
    error::{RelnotesError, Result},
    notes::ReleaseNote,
};

/// Which semantic-version component to increment. Variants are ordered by
/// priority so `max` picks the strongest bump.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpKind::Patch => f.write_str("patch"),
            BumpKind::Minor => f.write_str("minor"),
            BumpKind::Major => f.write_str("major"),
        }
    }
}

const DEFAULT_BUMP_TYPES: &[(&str, BumpKind)] = &[
    ("feat", BumpKind::Minor),
    ("feature", BumpKind::Minor),
    ("fix", BumpKind::Patch),
    ("bugfix", BumpKind::Patch),
    ("hotfix", BumpKind::Patch),
    ("patch", BumpKind::Patch),
    ("style", BumpKind::Patch),
    ("refactor", BumpKind::Patch),
    ("perf", BumpKind::Patch),
    ("performance", BumpKind::Patch),
    ("chore", BumpKind::Patch),
    ("docs", BumpKind::Patch),
    ("documentation", BumpKind::Patch),
    ("test", BumpKind::Patch),
    ("testing", BumpKind::Patch),
    ("other", BumpKind::Patch),
    ("BREAKING", BumpKind::Major),
    ("BREAKING CHANGE", BumpKind::Major),
];

/// Lookup table from commit tag to bump kind.
#[derive(Debug, Clone)]
pub struct BumpTable {
    entries: HashMap<String, BumpKind>,
}

impl Default for BumpTable {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}

impl BumpTable {
    /// Build the default table with the given entries layered on top.
    pub fn new(overrides: &BTreeMap<String, BumpKind>) -> Self {
        let mut entries = DEFAULT_BUMP_TYPES
            .iter()
            .map(|(tag, kind)| (tag.to_string(), *kind))
            .collect::<HashMap<String, BumpKind>>();

        for (tag, kind) in overrides {
            entries.insert(tag.clone(), *kind);
        }

        Self { entries }
    }

    /// Bump kind for a tag; unknown tags are patch-level.
    pub fn kind_for(&self, tag: &str) -> BumpKind {
        self.entries.get(tag).copied().unwrap_or(BumpKind::Patch)
    }
}

/// Outcome of resolving one author's commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Bump kind after the minor cooldown was applied.
    pub kind: BumpKind,
    /// First tag that reached the winning priority.
    pub highest_type: String,
    /// True when a minor bump was downgraded to patch by the cooldown.
    pub downgraded: bool,
}

/// Resolves bump kinds for sets of commit tags.
#[derive(Debug, Clone)]
pub struct BumpResolver {
    table: BumpTable,
    minor_bump_days: i64,
}

impl BumpResolver {
    pub fn new(table: BumpTable, minor_bump_days: i64) -> Self {
        Self {
            table,
            minor_bump_days,
        }
    }

    /// Highest bump kind among the tags, with the earliest tag that reached
    /// it. Returns `None` for an empty slice.
    pub fn highest_priority<'t>(
        &self,
        tags: &[&'t str],
    ) -> Option<(BumpKind, &'t str)> {
        let mut highest: Option<(BumpKind, &'t str)> = None;

        for tag in tags {
            let kind = self.table.kind_for(tag);
            match highest {
                Some((current, _)) if kind <= current => {}
                _ => highest = Some((kind, *tag)),
            }
        }

        highest
    }

    /// Resolve the bump for one author's commits. `notes` is the collection as
    /// it stands before this author's note is added.
    pub fn resolve(
        &self,
        types: &[CommitType],
        notes: &[ReleaseNote],
        now: DateTime<Utc>,
    ) -> Option<Resolution> {
        let tags = types.iter().map(|t| t.as_str()).collect::<Vec<&str>>();
        let (kind, highest_type) = self.highest_priority(&tags)?;

        let mut resolution = Resolution {
            kind,
            highest_type: highest_type.to_string(),
            downgraded: false,
        };

        if kind == BumpKind::Minor
            && !minor_bump_allowed(notes, now, self.minor_bump_days)
        {
            debug!(
                "minor bump within {} day cooldown: downgrading to patch",
                self.minor_bump_days
            );
            resolution.kind = BumpKind::Patch;
            resolution.downgraded = true;
        }

        Some(resolution)
    }
}

/// Whether enough days have passed since the most recent minor or patch
/// release in `notes`. The first note with a non-zero minor or patch
/// component is taken as that release.
pub fn minor_bump_allowed(
    notes: &[ReleaseNote],
    now: DateTime<Utc>,
    threshold_days: i64,
) -> bool {
    match notes.iter().find(|n| n.has_minor_or_patch()) {
        Some(last) => {
            let elapsed = (now - last.date).num_days();
            debug!(
                "last minor bump {} was {elapsed} day(s) ago",
                last.version
            );
            elapsed >= threshold_days
        }
        None => true,
    }
}

/// Advance `current` by one step of `kind`, resetting lower components.
///
/// # Errors
///
/// Returns [`RelnotesError::VersionOverflow`] when the component being
/// incremented is already at its maximum.
pub fn bump_version(current: &Version, kind: BumpKind) -> Result<Version> {
    let overflow = || RelnotesError::VersionOverflow(current.to_string());

    let next = match kind {
        BumpKind::Major => Version::new(
            current.major.checked_add(1).ok_or_else(overflow)?,
            0,
            0,
        ),
        BumpKind::Minor => Version::new(
            current.major,
            current.minor.checked_add(1).ok_or_else(overflow)?,
            0,
        ),
        BumpKind::Patch => Version::new(
            current.major,
            current.minor,
            current.patch.checked_add(1).ok_or_else(overflow)?,
        ),
    };

    Ok(next)
}
