//! Commit message classification.
//!
//! Two independent passes share the [`CommitType`] tag set:
//!
//! - [`classify`] is the authoritative pass used when building release notes
//!   and resolving version bumps. It understands conventional commit prefixes
//!   and a list of free-form keyword groups.
//! - [`classify_for_display`] is the lighter pass the viewer uses to decorate
//!   already-persisted messages. It may disagree with [`classify`] for the
//!   same message.
use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

/// Category tag assigned to a commit message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Style,
    Refactor,
    Perf,
    Chore,
    Docs,
    Test,
    Breaking,
    #[default]
    Other,
}

impl CommitType {
    /// Tag used by the note builder and the bump table. Breaking changes are
    /// upper-cased here.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Perf => "perf",
            CommitType::Chore => "chore",
            CommitType::Docs => "docs",
            CommitType::Test => "test",
            CommitType::Breaking => "BREAKING",
            CommitType::Other => "other",
        }
    }

    /// Lower-case tag shown next to entries in the viewer.
    pub fn display_tag(&self) -> &'static str {
        match self {
            CommitType::Breaking => "breaking",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CommitType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.display_tag())
    }
}

// Matches against an already lower-cased message.
static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(feat|fix|style|refactor|perf|chore|docs|test|breaking change)!?:",
    )
    .unwrap()
});

/// Ordered keyword groups checked as message prefixes. The first group with a
/// matching prefix decides the tag.
const KEYWORD_GROUPS: &[(CommitType, &[&str])] = &[
    (CommitType::Feat, &["feat", "feature", "add", "implement"]),
    (CommitType::Fix, &["fix", "bugfix", "bug", "hotfix"]),
    (CommitType::Chore, &["chore", "maintenance", "cleanup"]),
    (CommitType::Style, &["style", "format", "css", "ui"]),
    (CommitType::Refactor, &["refactor", "restructure"]),
    (CommitType::Perf, &["perf", "performance", "optimize"]),
    (CommitType::Test, &["test", "testing", "spec"]),
    (CommitType::Docs, &["docs", "documentation", "doc"]),
];

/// Prefixes recognized by the viewer, in check order.
const DISPLAY_PREFIXES: &[(CommitType, &str)] = &[
    (CommitType::Feat, "feat"),
    (CommitType::Fix, "fix"),
    (CommitType::Style, "style"),
    (CommitType::Refactor, "refactor"),
    (CommitType::Perf, "perf"),
    (CommitType::Chore, "chore"),
    (CommitType::Docs, "docs"),
    (CommitType::Test, "test"),
];

fn conventional_type(keyword: &str) -> CommitType {
    match keyword {
        "feat" => CommitType::Feat,
        "fix" => CommitType::Fix,
        "style" => CommitType::Style,
        "refactor" => CommitType::Refactor,
        "perf" => CommitType::Perf,
        "chore" => CommitType::Chore,
        "docs" => CommitType::Docs,
        "test" => CommitType::Test,
        "breaking change" => CommitType::Breaking,
        _ => CommitType::Other,
    }
}

/// Classify a commit message for note building and version resolution.
pub fn classify(message: &str) -> CommitType {
    let lower = message.to_lowercase();

    if let Some(caps) = CONVENTIONAL_REGEX.captures(&lower) {
        return conventional_type(&caps[1]);
    }

    for (commit_type, keywords) in KEYWORD_GROUPS {
        if keywords.iter().any(|k| lower.starts_with(k)) {
            return *commit_type;
        }
    }

    if lower.contains("breaking change") || lower.contains("breaking!") {
        return CommitType::Breaking;
    }

    CommitType::Other
}

/// Classify a persisted message for display purposes only.
pub fn classify_for_display(message: &str) -> CommitType {
    let lower = message.to_lowercase();

    for (commit_type, prefix) in DISPLAY_PREFIXES {
        if lower.starts_with(prefix) {
            return *commit_type;
        }
    }

    if lower.contains("breaking") {
        return CommitType::Breaking;
    }

    CommitType::Other
}
