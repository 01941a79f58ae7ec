//! Reading and writing the notes file and the project manifest.
use log::*;
use semver::Version;
use serde_json::{Value, json};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    config::Config,
    error::{RelnotesError, Result},
    notes::{ReleaseNote, ReleaseNotes},
};

/// Version assumed when the manifest has no `version` field.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// JSON project manifest. Only the `version` field is ever modified; every
/// other field is written back untouched and in its original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: String,
    doc: Value,
}

impl Manifest {
    /// Parse manifest content.
    ///
    /// # Arguments
    ///
    /// * `path` - Manifest location, used in error messages
    /// * `content` - Raw JSON text of the manifest
    ///
    /// # Errors
    ///
    /// Returns [`RelnotesError::InvalidManifest`] when the content is not a
    /// JSON object or carries a non-string `version` field.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        let doc: Value = serde_json::from_str(content).map_err(|e| {
            RelnotesError::invalid_manifest(path, e.to_string())
        })?;

        if !doc.is_object() {
            return Err(RelnotesError::invalid_manifest(
                path,
                "expected a JSON object",
            ));
        }

        if let Some(version) = doc.get("version")
            && !version.is_string()
        {
            return Err(RelnotesError::invalid_manifest(
                path,
                "version field must be a string",
            ));
        }

        Ok(Self {
            path: path.to_string(),
            doc,
        })
    }

    /// Current version, defaulting to 0.0.0 when the field is absent.
    ///
    /// # Errors
    ///
    /// Fails when the version is not semver, or when it carries a
    /// pre-release or build suffix. Only plain `MAJOR.MINOR.PATCH` versions
    /// can be bumped.
    pub fn version(&self) -> Result<Version> {
        let raw = self
            .doc
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_VERSION);

        let version = Version::parse(raw)?;

        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(RelnotesError::invalid_manifest(
                self.path.clone(),
                format!("version {raw} must be plain MAJOR.MINOR.PATCH"),
            ));
        }

        Ok(version)
    }

    pub fn set_version(&mut self, version: &Version) {
        self.doc["version"] = json!(version.to_string());
    }

    fn to_pretty(&self) -> Result<String> {
        Ok(format!("{}\n", serde_json::to_string_pretty(&self.doc)?))
    }
}

/// File locations for one repository.
#[derive(Debug, Clone)]
pub struct NotesStore {
    notes_path: PathBuf,
    manifest_path: PathBuf,
}

impl NotesStore {
    /// Resolve the configured file names against the repository root.
    pub fn new(root: &Path, config: &Config) -> Self {
        Self {
            notes_path: root.join(&config.notes_file),
            manifest_path: root.join(&config.manifest_file),
        }
    }

    pub fn notes_path(&self) -> &Path {
        &self.notes_path
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Load the notes collection.
    ///
    /// # Returns
    ///
    /// The notes in file order, newest first, or an empty collection when
    /// the file does not exist yet.
    ///
    /// # Errors
    ///
    /// A file that exists but cannot be read or parsed is an error, so a
    /// corrupt collection is never silently replaced.
    pub fn load_notes(&self) -> Result<ReleaseNotes> {
        let content = match fs::read_to_string(&self.notes_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "notes file {} not found: starting with empty notes",
                    self.notes_path.display()
                );
                return Ok(vec![]);
            }
            Err(e) => return Err(e.into()),
        };

        let notes: ReleaseNotes = serde_json::from_str(&content)?;
        debug!(
            "loaded {} release note(s) from {}",
            notes.len(),
            self.notes_path.display()
        );

        Ok(notes)
    }

    /// Load the manifest. Missing or malformed manifests are fatal.
    pub fn load_manifest(&self) -> Result<Manifest> {
        let path = self.manifest_path.display().to_string();

        let content = fs::read_to_string(&self.manifest_path).map_err(|e| {
            RelnotesError::invalid_manifest(path.clone(), e.to_string())
        })?;

        Manifest::parse(&path, &content)
    }

    /// Overwrite both files with pretty-printed JSON, creating the notes
    /// directory if needed.
    ///
    /// # Arguments
    ///
    /// * `notes` - Full collection to persist, newest first
    /// * `manifest` - Manifest carrying the updated version
    pub fn save(&self, notes: &[ReleaseNote], manifest: &Manifest) -> Result<()> {
        let notes_json = format!("{}\n", serde_json::to_string_pretty(notes)?);

        if let Some(parent) = self.notes_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        info!("writing release notes to: {}", self.notes_path.display());
        fs::write(&self.notes_path, notes_json)?;

        info!("writing manifest to: {}", self.manifest_path.display());
        fs::write(&self.manifest_path, manifest.to_pretty()?)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> NotesStore {
        NotesStore::new(dir.path(), &Config::default())
    }

    #[test]
    fn test_missing_notes_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load_notes().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_notes_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("release-notes.json"), "[{").unwrap();
        let err = store(&dir).load_notes().unwrap_err();
        assert!(matches!(err, RelnotesError::JsonParseError(_)));
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = store(&dir).load_manifest().unwrap_err();
        assert!(matches!(err, RelnotesError::InvalidManifest { .. }));
    }

    #[test]
    fn test_manifest_rejects_non_objects_and_bad_versions() {
        assert!(Manifest::parse("package.json", "[]").is_err());
        assert!(Manifest::parse("package.json", "not json").is_err());
        assert!(Manifest::parse("package.json", r#"{"version": 1}"#).is_err());

        let manifest =
            Manifest::parse("package.json", r#"{"version": "one"}"#).unwrap();
        assert!(matches!(
            manifest.version().unwrap_err(),
            RelnotesError::InvalidVersion(_)
        ));
    }

    #[test]
    fn test_manifest_rejects_prerelease_and_build_metadata() {
        for raw in ["1.2.0-rc.1", "1.2.0+build.5"] {
            let manifest = Manifest::parse(
                "package.json",
                &format!(r#"{{"version": "{raw}"}}"#),
            )
            .unwrap();

            assert!(matches!(
                manifest.version().unwrap_err(),
                RelnotesError::InvalidManifest { .. }
            ));
        }
    }

    #[test]
    fn test_manifest_defaults_version() {
        let manifest =
            Manifest::parse("package.json", r#"{"name": "app"}"#).unwrap();
        assert_eq!(manifest.version().unwrap(), Version::new(0, 0, 0));
    }

    #[test]
    fn test_save_preserves_manifest_fields_and_order() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(
            store.manifest_path(),
            r#"{"name":"app","version":"1.2.0","private":true}"#,
        )
        .unwrap();

        let mut manifest = store.load_manifest().unwrap();
        manifest.set_version(&Version::new(1, 3, 1));

        let notes = vec![ReleaseNote {
            version: Version::new(1, 3, 1),
            date: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
            developer: "bob".into(),
            changes: vec!["chore: bump deps".into()],
        }];
        store.save(&notes, &manifest).unwrap();

        let written = fs::read_to_string(store.manifest_path()).unwrap();
        assert_eq!(
            written,
            "{\n  \"name\": \"app\",\n  \"version\": \"1.3.1\",\n  \"private\": true\n}\n"
        );

        let reloaded = store.load_notes().unwrap();
        assert_eq!(reloaded, notes);
        let raw = fs::read_to_string(store.notes_path()).unwrap();
        assert!(raw.contains("\"date\": \"2024-06-15T12:00:00.000Z\""));
    }

    #[test]
    fn test_save_creates_notes_directory() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            notes_file: "docs/notes/release-notes.json".into(),
            ..Config::default()
        };
        let store = NotesStore::new(dir.path(), &config);
        let manifest = Manifest::parse("package.json", "{}").unwrap();

        store.save(&[], &manifest).unwrap();

        assert_eq!(fs::read_to_string(store.notes_path()).unwrap(), "[]\n");
    }
}
