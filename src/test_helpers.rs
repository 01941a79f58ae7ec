//! Common test helper functions shared across test modules.
use chrono::{DateTime, Duration, TimeZone, Utc};
use semver::Version;

use crate::{notes::ReleaseNote, repo::Commit};

/// Fixed "now" used by tests that depend on the run timestamp.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Creates a non-merge commit by `author` with a derived email and hash.
///
/// # Example
/// ```ignore
/// let commit = create_test_commit("alice", "feat: add search");
/// ```
pub fn create_test_commit(author: &str, message: &str) -> Commit {
    Commit {
        hash: format!("{:07x}", message.len() * 7919 + author.len()),
        author_name: author.to_string(),
        author_email: format!("{author}@example.com"),
        timestamp: test_now(),
        message: message.to_string(),
        merge_commit: false,
    }
}

/// Creates a release note dated `days_ago` days before [`test_now`].
pub fn create_test_note(
    version: &str,
    days_ago: i64,
    developer: &str,
    changes: &[&str],
) -> ReleaseNote {
    ReleaseNote {
        version: Version::parse(version).unwrap(),
        date: test_now() - Duration::days(days_ago),
        developer: developer.to_string(),
        changes: changes.iter().map(|c| c.to_string()).collect(),
    }
}
