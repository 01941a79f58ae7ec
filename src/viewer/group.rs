//! Grouping of persisted notes for display.
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    classifier::{CommitType, classify_for_display},
    notes::ReleaseNote,
};

/// A single change message, flattened out of its note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitEntry {
    pub message: String,
    pub tag: CommitType,
    /// ISO timestamp of the originating note.
    pub date: String,
    /// Calendar day of the originating note, for display.
    pub day: String,
    #[serde(skip)]
    pub timestamp: DateTime<Utc>,
}

/// All of one developer's changes within a minor version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeveloperGroup {
    pub name: String,
    pub commit_count: usize,
    pub entries: Vec<CommitEntry>,
}

/// One collapsible section of the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionSection {
    /// Minor version key, e.g. "2.1".
    pub key: String,
    pub major: u64,
    pub minor: u64,
    pub expanded: bool,
    pub commit_count: usize,
    pub developers: Vec<DeveloperGroup>,
}

/// Group notes by minor version, newest version first. Notes within a group
/// are ordered newest first by date.
pub fn group_by_minor_version(
    notes: &[ReleaseNote],
) -> Vec<((u64, u64), Vec<&ReleaseNote>)> {
    let mut groups: BTreeMap<(u64, u64), Vec<&ReleaseNote>> = BTreeMap::new();

    for note in notes {
        groups
            .entry((note.version.major, note.version.minor))
            .or_default()
            .push(note);
    }

    groups
        .into_iter()
        .rev()
        .map(|(key, mut notes)| {
            notes.sort_by(|a, b| b.date.cmp(&a.date));
            (key, notes)
        })
        .collect()
}

/// Group a version's notes by developer in first-seen order. Entries are
/// sorted newest first.
pub fn group_by_developer(notes: &[&ReleaseNote]) -> Vec<DeveloperGroup> {
    let mut groups: Vec<DeveloperGroup> = vec![];

    for note in notes {
        let entries = note.changes.iter().map(|message| CommitEntry {
            message: message.clone(),
            tag: classify_for_display(message),
            date: note.date.to_rfc3339_opts(SecondsFormat::Millis, true),
            day: note.date.format("%Y-%m-%d").to_string(),
            timestamp: note.date,
        });

        match groups.iter_mut().find(|g| g.name == note.developer) {
            Some(group) => {
                group.commit_count += note.changes.len();
                group.entries.extend(entries);
            }
            None => groups.push(DeveloperGroup {
                name: note.developer.clone(),
                commit_count: note.changes.len(),
                entries: entries.collect(),
            }),
        }
    }

    for group in groups.iter_mut() {
        group.entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }

    groups
}

/// Build the page sections. Only the newest section starts expanded.
pub fn build_sections(notes: &[ReleaseNote]) -> Vec<VersionSection> {
    group_by_minor_version(notes)
        .into_iter()
        .enumerate()
        .map(|(index, ((major, minor), notes))| {
            let developers = group_by_developer(&notes);
            VersionSection {
                key: format!("{major}.{minor}"),
                major,
                minor,
                expanded: index == 0,
                commit_count: developers.iter().map(|d| d.commit_count).sum(),
                developers,
            }
        })
        .collect()
}
