//! Artifact download state

use std::path::PathBuf;

use anyhow::Result;
use eframe::egui;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::download::{self, DownloadProgress, DownloadResult};
use crate::state::StateEvent;
use crate::task::{PollResult, poll_task};

/// State for saving a generated book file
#[derive(Default)]
pub struct DownloadState {
    task: Option<JoinHandle<Result<DownloadResult>>>,
    progress_rx: Option<watch::Receiver<DownloadProgress>>,
    /// Current download progress
    pub progress: DownloadProgress,
    /// Name of the file being saved
    pub file_name: Option<String>,
    /// Where the last successful download went
    pub last_saved: Option<PathBuf>,
    /// Error message from last download attempt
    pub error: Option<String>,
}

impl DownloadState {
    /// Check if a download is currently running
    pub fn is_downloading(&self) -> bool {
        self.task.is_some()
    }

    /// Start saving `url` to `dest`
    pub fn start(
        &mut self,
        client: &ApiClient,
        url: reqwest::Url,
        dest: PathBuf,
    ) -> Option<StateEvent> {
        if self.task.is_some() {
            return None;
        }

        let (progress_tx, progress_rx) = watch::channel(DownloadProgress::default());
        self.progress_rx = Some(progress_rx);
        self.progress = DownloadProgress::default();
        self.error = None;

        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| dest.display().to_string());
        self.file_name = Some(file_name.clone());

        tracing::info!("Saving {} to {}", url, dest.display());

        let http = client.client().clone();
        self.task = Some(tokio::spawn(download::download_artifact(
            http,
            url,
            dest,
            progress_tx,
        )));

        Some(StateEvent::StatusMessage(format!("Saving {}...", file_name)))
    }

    /// Poll the download task for progress and completion
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        if let Some(rx) = &mut self.progress_rx {
            if rx.has_changed().unwrap_or(false) {
                self.progress = rx.borrow_and_update().clone();
            }
        }

        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(Ok(result))) => {
                self.progress_rx = None;
                events.push(StateEvent::StatusMessage(format!(
                    "Saved {}",
                    result.file_path.display()
                )));
                self.last_saved = Some(result.file_path);
            }
            PollResult::Complete(Ok(Err(e))) => {
                self.progress_rx = None;
                let msg = format!("{:#}", e);
                events.push(StateEvent::LogError(format!("Download failed: {}", msg)));
                events.push(StateEvent::StatusMessage(format!("Download failed: {}", msg)));
                self.error = Some(msg);
            }
            PollResult::Complete(Err(e)) => {
                self.progress_rx = None;
                let msg = format!("Download task panicked: {}", e);
                events.push(StateEvent::LogError(msg.clone()));
                events.push(StateEvent::StatusMessage(msg.clone()));
                self.error = Some(msg);
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_state_round() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.docx"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"docx".to_vec()))
            .mount(&server)
            .await;

        let client = ApiClient::new(&BackendConfig {
            base_url: server.uri(),
        })
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.docx");
        let ctx = egui::Context::default();

        let mut state = DownloadState::default();
        assert!(
            state
                .start(
                    &client,
                    download::artifact_url(client.base_url(), "a.docx").unwrap(),
                    dest.clone()
                )
                .is_some()
        );
        assert!(state.is_downloading());
        assert_eq!(state.file_name.as_deref(), Some("a.docx"));

        for _ in 0..500 {
            state.poll(&ctx);
            if !state.is_downloading() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(!state.is_downloading());
        assert!(state.error.is_none());
        assert_eq!(state.last_saved.as_deref(), Some(dest.as_path()));
        assert_eq!(std::fs::read(&dest).unwrap(), b"docx");
    }
}
