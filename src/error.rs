//! Custom error types for relnotes.

use thiserror::Error;

/// Main error type for relnotes operations.
#[derive(Error, Debug)]
pub enum RelnotesError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Manifest errors
    #[error("Invalid manifest {path}: {reason}")]
    InvalidManifest { path: String, reason: String },

    // Viewer errors
    #[error("Release notes unavailable: {0}")]
    NotesUnavailable(String),

    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    #[error("Version {0} cannot be bumped further")]
    VersionOverflow(String),

    // Version/parsing errors - automatic conversions via #[from]
    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] tera::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using RelnotesError
pub type Result<T> = std::result::Result<T, RelnotesError>;

impl RelnotesError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid manifest error for the given path
    pub fn invalid_manifest(
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a notes unavailable error
    pub fn notes_unavailable(msg: impl Into<String>) -> Self {
        Self::NotesUnavailable(msg.into())
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for RelnotesError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

impl From<reqwest::Error> for RelnotesError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        let err = RelnotesError::invalid_config("commit_limit must be > 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: commit_limit must be > 0"
        );

        let err = RelnotesError::invalid_manifest("package.json", "not found");
        assert_eq!(err.to_string(), "Invalid manifest package.json: not found");

        let err = RelnotesError::notes_unavailable("no candidate succeeded");
        assert_eq!(
            err.to_string(),
            "Release notes unavailable: no candidate succeeded"
        );
    }

    #[test]
    fn test_error_helpers() {
        let err = RelnotesError::invalid_manifest("package.json", "bad");
        assert!(matches!(err, RelnotesError::InvalidManifest { .. }));

        let err = RelnotesError::notes_unavailable("gone");
        assert!(matches!(err, RelnotesError::NotesUnavailable(_)));
    }

    #[test]
    fn test_from_conversions() {
        let semver_err = semver::Version::parse("invalid");
        assert!(semver_err.is_err());
        let err: RelnotesError = semver_err.unwrap_err().into();
        assert!(matches!(err, RelnotesError::InvalidVersion(_)));

        let io_err =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RelnotesError = io_err.into();
        assert!(matches!(err, RelnotesError::Other(_)));
    }
}
