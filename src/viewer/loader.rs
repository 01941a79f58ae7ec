//! Fetching the notes file for the viewer.
//!
//! The notes file may live next to the page, one directory up, or behind a
//! cache. Each candidate location is tried in order until one loads.
use async_trait::async_trait;
use log::*;
use std::path::PathBuf;
use tokio::fs;
use url::Url;

use crate::{
    error::{RelnotesError, Result},
    notes::ReleaseNotes,
};

#[cfg(test)]
use mockall::automock;

/// Source of raw notes file content.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotesLoader: Send + Sync {
    /// Load the content at a relative `location`. Any failure, including a
    /// non-success HTTP status, is an error.
    async fn fetch(&self, location: &str) -> Result<String>;
}

/// Ordered candidate locations for `file_name`, ending with a cache-busting
/// variant keyed on `cache_key`.
pub fn candidate_locations(file_name: &str, cache_key: i64) -> Vec<String> {
    vec![
        file_name.to_string(),
        format!("./{file_name}"),
        format!("../{file_name}"),
        format!("{file_name}?v={cache_key}"),
    ]
}

/// Try each candidate in order and parse the first one that loads.
pub async fn fetch_notes(
    loader: &dyn NotesLoader,
    candidates: &[String],
) -> Result<ReleaseNotes> {
    for location in candidates {
        match loader.fetch(location).await {
            Ok(content) => {
                info!("loaded release notes from {location}");
                let notes: ReleaseNotes = serde_json::from_str(&content)?;
                return Ok(notes);
            }
            Err(err) => {
                warn!("failed to load release notes from {location}: {err}");
            }
        }
    }

    Err(RelnotesError::notes_unavailable(format!(
        "tried {} location(s): {}",
        candidates.len(),
        candidates.join(", ")
    )))
}

/// Loads candidates relative to a local directory. Query strings are ignored.
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl NotesLoader for FileLoader {
    async fn fetch(&self, location: &str) -> Result<String> {
        let relative = location.split('?').next().unwrap_or(location);
        let path = self.root.join(relative);
        debug!("reading release notes from {}", path.display());
        Ok(fs::read_to_string(path).await?)
    }
}

/// Loads candidates relative to an HTTP base URL.
pub struct HttpLoader {
    base: Url,
    client: reqwest::Client,
}

impl HttpLoader {
    /// The base is treated as a directory even without a trailing slash.
    pub fn new(base: &str) -> Result<Self> {
        let mut base = Url::parse(base)?;

        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            client: reqwest::Client::new(),
        })
    }

    pub fn resolve(&self, location: &str) -> Result<Url> {
        Ok(self.base.join(location)?)
    }
}

#[async_trait]
impl NotesLoader for HttpLoader {
    async fn fetch(&self, location: &str) -> Result<String> {
        let url = self.resolve(location)?;
        debug!("requesting release notes from {url}");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RelnotesError::NetworkError(format!(
                "{url} responded with {status}"
            )));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use tempfile::TempDir;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    const NOTES_JSON: &str = r#"[
        {
            "version": "1.3.0",
            "date": "2024-06-15T12:00:00.000Z",
            "developer": "alice",
            "changes": ["feat: add search"]
        }
    ]"#;

    #[test]
    fn test_candidate_locations() {
        assert_eq!(
            candidate_locations("release-notes.json", 42),
            vec![
                "release-notes.json",
                "./release-notes.json",
                "../release-notes.json",
                "release-notes.json?v=42",
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_notes_falls_through_to_later_candidate() {
        let mut loader = MockNotesLoader::new();
        loader
            .expect_fetch()
            .with(eq("a.json"))
            .times(1)
            .returning(|_| Err(RelnotesError::NetworkError("404".into())));
        loader
            .expect_fetch()
            .with(eq("b.json"))
            .times(1)
            .returning(|_| Ok(NOTES_JSON.to_string()));

        let candidates = vec![
            "a.json".to_string(),
            "b.json".to_string(),
            "c.json".to_string(),
        ];
        let notes = fetch_notes(&loader, &candidates).await.unwrap();

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].developer, "alice");
    }

    #[tokio::test]
    async fn test_fetch_notes_exhausts_candidates() {
        let mut loader = MockNotesLoader::new();
        loader
            .expect_fetch()
            .times(2)
            .returning(|_| Err(RelnotesError::NetworkError("503".into())));

        let candidates = vec!["a.json".to_string(), "b.json".to_string()];
        let err = fetch_notes(&loader, &candidates).await.unwrap_err();

        assert!(matches!(err, RelnotesError::NotesUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_notes_rejects_malformed_content() {
        let mut loader = MockNotesLoader::new();
        loader
            .expect_fetch()
            .returning(|_| Ok("<html>not json</html>".to_string()));

        let err = fetch_notes(&loader, &["a.json".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, RelnotesError::JsonParseError(_)));
    }

    #[tokio::test]
    async fn test_file_loader_uses_parent_and_cache_busting_candidates() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site");
        std::fs::create_dir(&site).unwrap();
        std::fs::write(dir.path().join("release-notes.json"), NOTES_JSON)
            .unwrap();

        let loader = FileLoader::new(site);

        assert!(loader.fetch("release-notes.json").await.is_err());
        assert!(loader.fetch("../release-notes.json").await.is_ok());

        let notes =
            fetch_notes(&loader, &candidate_locations("release-notes.json", 1))
                .await
                .unwrap();
        assert_eq!(notes.len(), 1);

        let loader = FileLoader::new(dir.path().to_path_buf());
        assert!(loader.fetch("release-notes.json?v=99").await.is_ok());
    }

    /// Serve `routes` as 200 responses on a local port and answer 404 for
    /// every other path. Returns the base URL of the `/app` directory.
    async fn serve(routes: &'static [(&'static str, &'static str)]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let mut read = 0;

                    while read < buf.len() {
                        let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        read += n;
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..read]);
                    let target = request.split_whitespace().nth(1).unwrap_or("/");
                    let path = target.split('?').next().unwrap_or(target);

                    let (status, body) = routes
                        .iter()
                        .find(|(route, _)| *route == path)
                        .map(|(_, body)| ("200 OK", *body))
                        .unwrap_or(("404 Not Found", "not found"));

                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{addr}/app")
    }

    #[tokio::test]
    async fn test_http_loader_falls_through_non_success_responses() {
        let base = serve(&[("/release-notes.json", NOTES_JSON)]).await;
        let loader = HttpLoader::new(&base).unwrap();

        // the first two candidates resolve under /app and get a 404
        let err = loader.fetch("release-notes.json").await.unwrap_err();
        assert!(matches!(err, RelnotesError::NetworkError(_)));

        let notes =
            fetch_notes(&loader, &candidate_locations("release-notes.json", 3))
                .await
                .unwrap();

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].developer, "alice");
    }

    #[tokio::test]
    async fn test_http_loader_reports_unavailable_when_every_candidate_fails() {
        let base = serve(&[]).await;
        let loader = HttpLoader::new(&base).unwrap();

        let err =
            fetch_notes(&loader, &candidate_locations("release-notes.json", 3))
                .await
                .unwrap_err();

        assert!(matches!(err, RelnotesError::NotesUnavailable(_)));
    }

    #[test]
    fn test_http_loader_resolves_relative_candidates() {
        let loader = HttpLoader::new("https://example.com/app").unwrap();

        assert_eq!(
            loader.resolve("release-notes.json").unwrap().as_str(),
            "https://example.com/app/release-notes.json"
        );
        assert_eq!(
            loader.resolve("../release-notes.json").unwrap().as_str(),
            "https://example.com/release-notes.json"
        );
        assert_eq!(
            loader.resolve("release-notes.json?v=7").unwrap().as_str(),
            "https://example.com/app/release-notes.json?v=7"
        );
    }

    #[test]
    fn test_http_loader_rejects_bad_urls() {
        let err = HttpLoader::new("not a url").err().unwrap();
        assert!(matches!(err, RelnotesError::UrlError(_)));
    }
}
