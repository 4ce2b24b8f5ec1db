//! Saving generated book files to disk.

use anyhow::{Context, Result, anyhow};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;

/// Suffix for in-progress downloads
const PART_SUFFIX: &str = "part";

/// Minimum time between progress updates
const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Progress of an artifact download
#[derive(Debug, Clone, Default)]
pub struct DownloadProgress {
    pub bytes_downloaded: u64,
    /// Zero when the server did not send a length
    pub total_bytes: u64,
}

impl DownloadProgress {
    /// Download progress as a fraction (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.bytes_downloaded as f32 / self.total_bytes as f32
        }
    }
}

/// Result of a successful download
#[derive(Debug)]
pub struct DownloadResult {
    pub file_path: PathBuf,
    pub bytes: u64,
}

/// Path used while the download is still running
fn part_path(dest_path: &Path) -> PathBuf {
    let mut name = dest_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(PART_SUFFIX);
    dest_path.with_file_name(name)
}

/// Request URL for a backend-relative file path.
///
/// Each path component is percent-encoded, so names built from a book title
/// (`Why?.docx`, `Part #2.pdf`) stay in the path instead of turning into a
/// query or fragment. Use `outcome::join_url` for the display string.
pub fn artifact_url(base_url: &str, remote_path: &str) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(base_url)
        .with_context(|| format!("Invalid backend URL: {}", base_url))?;

    url.path_segments_mut()
        .map_err(|_| anyhow!("Backend URL cannot carry a file path: {}", base_url))?
        .pop_if_empty()
        .extend(remote_path.split(['/', '\\']).filter(|part| !part.is_empty()));

    Ok(url)
}

/// Download a generated artifact with progress tracking.
///
/// Streams to `<dest>.part`, then renames on success so a failed download
/// never leaves a truncated file under the final name. The part file is
/// removed again if anything after its creation fails.
pub async fn download_artifact(
    client: reqwest::Client,
    url: reqwest::Url,
    dest_path: PathBuf,
    progress_tx: watch::Sender<DownloadProgress>,
) -> Result<DownloadResult> {
    let start = Instant::now();

    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to connect to backend")?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Download failed with status: {} - {}",
            response.status(),
            response.status().canonical_reason().unwrap_or("Unknown error")
        );
    }

    let total_size = response.content_length().unwrap_or(0);
    let _ = progress_tx.send(DownloadProgress {
        bytes_downloaded: 0,
        total_bytes: total_size,
    });

    if let Some(parent) = dest_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .context("Failed to create destination directory")?;
    }

    let temp_path = part_path(&dest_path);
    let file = tokio::fs::File::create(&temp_path)
        .await
        .context("Failed to create temporary download file")?;

    let written = write_body(response, file, total_size, &progress_tx).await;
    let downloaded = match written {
        Ok(downloaded) => downloaded,
        Err(e) => {
            discard_part(&temp_path).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&temp_path, &dest_path).await {
        discard_part(&temp_path).await;
        return Err(e).context("Failed to finalize download");
    }

    let _ = progress_tx.send(DownloadProgress {
        bytes_downloaded: downloaded,
        total_bytes: total_size.max(downloaded),
    });

    tracing::info!(
        "Saved {} ({} bytes) in {:.1}s",
        dest_path.display(),
        downloaded,
        start.elapsed().as_secs_f32()
    );

    Ok(DownloadResult {
        file_path: dest_path,
        bytes: downloaded,
    })
}

/// Stream the response body into `file`, returning the number of bytes written
async fn write_body(
    response: reqwest::Response,
    mut file: tokio::fs::File,
    total_size: u64,
    progress_tx: &watch::Sender<DownloadProgress>,
) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;
    let mut last_progress_time = Instant::now();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.context("Error reading download stream")?;

        file.write_all(&chunk)
            .await
            .context("Failed to write to download file")?;

        downloaded += chunk.len() as u64;

        if last_progress_time.elapsed() >= PROGRESS_INTERVAL {
            let _ = progress_tx.send(DownloadProgress {
                bytes_downloaded: downloaded,
                total_bytes: total_size,
            });
            last_progress_time = Instant::now();
        }
    }

    file.sync_all()
        .await
        .context("Failed to sync download file")?;

    Ok(downloaded)
}

async fn discard_part(temp_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp_path).await {
        tracing::warn!("Failed to remove {}: {}", temp_path.display(), e);
    }
}

/// Final path component of a backend file path, used as the default save name
pub fn file_name_of(remote_path: &str) -> String {
    remote_path
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or("book")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/output/a.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 test".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("a.pdf");
        let (tx, rx) = watch::channel(DownloadProgress::default());

        let result = download_artifact(
            reqwest::Client::new(),
            artifact_url(&server.uri(), "output/a.pdf").unwrap(),
            dest.clone(),
            tx,
        )
        .await
        .unwrap();

        assert_eq!(result.bytes, 13);
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.7 test");
        assert!(!part_path(&dest).exists());
        assert_eq!(rx.borrow().bytes_downloaded, 13);
    }

    #[tokio::test]
    async fn test_download_fails_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.docx");
        let (tx, _rx) = watch::channel(DownloadProgress::default());

        let err = download_artifact(
            reqwest::Client::new(),
            artifact_url(&server.uri(), "missing.docx").unwrap(),
            dest.clone(),
            tx,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("404"));
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_download_title_with_question_mark() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/output/docs/Why%3F.docx"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"docx".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join(file_name_of("output/docs/Why?.docx"));
        let (tx, _rx) = watch::channel(DownloadProgress::default());

        let result = download_artifact(
            reqwest::Client::new(),
            artifact_url(&server.uri(), "output/docs/Why?.docx").unwrap(),
            dest.clone(),
            tx,
        )
        .await
        .unwrap();

        assert_eq!(result.bytes, 4);
        assert_eq!(std::fs::read(&dest).unwrap(), b"docx");
    }

    #[tokio::test]
    async fn test_failed_finalize_removes_part_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .mount(&server)
            .await;

        // An occupied directory under the final name makes the rename fail
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.pdf");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("keep"), b"x").unwrap();
        let (tx, _rx) = watch::channel(DownloadProgress::default());

        let err = download_artifact(
            reqwest::Client::new(),
            artifact_url(&server.uri(), "a.pdf").unwrap(),
            dest.clone(),
            tx,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("finalize"), "{err:#}");
        assert!(!part_path(&dest).exists());
        assert!(dest.join("keep").exists());
    }

    #[test]
    fn test_artifact_url_encodes_title_characters() {
        let url = artifact_url("http://localhost:8000", "output/docs/Part #2?.pdf").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/output/docs/Part%20%232%3F.pdf"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_artifact_url_keeps_base_path() {
        let url = artifact_url("http://h/api", "/a.docx").unwrap();
        assert_eq!(url.as_str(), "http://h/api/a.docx");

        let url = artifact_url("http://h", "books\\b.pdf").unwrap();
        assert_eq!(url.as_str(), "http://h/books/b.pdf");
    }

    #[test]
    fn test_part_path_keeps_extension() {
        let p = part_path(Path::new("/tmp/book.docx"));
        assert_eq!(p, PathBuf::from("/tmp/book.docx.part"));
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("output/My Book.docx"), "My Book.docx");
        assert_eq!(file_name_of("a.pdf"), "a.pdf");
        assert_eq!(file_name_of("books\\b.pdf"), "b.pdf");
        assert_eq!(file_name_of(""), "book");
    }

    #[test]
    fn test_fraction() {
        let progress = DownloadProgress {
            bytes_downloaded: 50,
            total_bytes: 200,
        };
        assert_eq!(progress.fraction(), 0.25);
        assert_eq!(DownloadProgress::default().fraction(), 0.0);
    }
}
