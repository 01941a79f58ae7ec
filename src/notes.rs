//! Persisted release note records.
use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

/// One developer's contribution to a single generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNote {
    /// Version produced by this note's bump.
    pub version: Version,
    /// Timestamp of the run that created the note.
    #[serde(with = "iso_date")]
    pub date: DateTime<Utc>,
    /// Author display name.
    pub developer: String,
    /// Raw commit messages in original order.
    pub changes: Vec<String>,
}

impl ReleaseNote {
    /// Grouping key made of the first two version components, e.g. "2.1".
    pub fn minor_key(&self) -> String {
        format!("{}.{}", self.version.major, self.version.minor)
    }

    /// Whether this note's version carries a non-zero minor or patch
    /// component.
    pub fn has_minor_or_patch(&self) -> bool {
        self.version.minor != 0 || self.version.patch != 0
    }
}

/// Ordered collection of release notes, newest insertions first.
pub type ReleaseNotes = Vec<ReleaseNote>;

/// ISO-8601 timestamps with millisecond precision, e.g.
/// `2024-05-01T09:30:00.000Z`.
pub mod iso_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        date: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer
            .serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|d| d.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
