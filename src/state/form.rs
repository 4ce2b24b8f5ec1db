//! Request form state: what the user typed, whether a request is running,
//! and how the last one ended.

use std::time::Instant;

use eframe::egui;
use tokio::task::JoinHandle;

use crate::api::{ApiClient, OperationKind, Submission, SubmitError, SuccessPayload};
use crate::outcome::{LastResult, Outcome};
use crate::state::StateEvent;
use crate::task::{PollResult, poll_task};

/// Request form state
///
/// Owned by the window and dropped with it. Mutated only by user actions and
/// by `poll` when a submission completes.
#[derive(Default)]
pub struct FormState {
    /// Selected operation
    pub operation: OperationKind,
    /// Free text for agent operations
    pub input_text: String,
    /// Book title (book generation only)
    pub title: String,
    /// Book topic (book generation only)
    pub topic: String,
    /// Most recent finished submission
    pub last_result: Option<LastResult>,
    /// Validation notice waiting to be acknowledged
    pub notice: Option<String>,
    /// In-flight submission
    task: Option<JoinHandle<Result<SuccessPayload, SubmitError>>>,
    /// When the in-flight submission was dispatched
    started_at: Option<Instant>,
}

impl FormState {
    /// Whether a submission is in flight
    pub fn is_loading(&self) -> bool {
        self.task.is_some()
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && self.notice.is_none()
    }

    /// Validate the current fields for the selected operation
    pub fn submission(&self) -> Result<Submission, SubmitError> {
        if self.operation.is_book() {
            Submission::book(&self.title, &self.topic)
        } else {
            Submission::agent(self.operation, &self.input_text)
        }
    }

    /// Handle the submit action.
    ///
    /// Blank input raises a notice and leaves the loading state alone.
    /// Otherwise the previous result is cleared and the request is spawned.
    pub fn submit(&mut self, client: &ApiClient) -> Option<StateEvent> {
        if self.is_loading() {
            tracing::debug!("Ignoring submit while a request is in flight");
            return None;
        }

        let submission = match self.submission() {
            Ok(submission) => submission,
            Err(e) => {
                debug_assert!(e.is_validation());
                tracing::debug!("Submission rejected: {}", e);
                self.notice = Some(e.to_string());
                return None;
            }
        };

        self.last_result = None;
        self.started_at = Some(Instant::now());

        let operation = submission.kind();
        let client = client.clone();
        self.task = Some(tokio::spawn(async move { client.submit(&submission).await }));

        Some(StateEvent::StatusMessage(format!("Running {}...", operation)))
    }

    /// Acknowledge the validation notice
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Poll the in-flight submission.
    ///
    /// Every completion path (success, failure, panicked task) stores a result
    /// and leaves the form idle.
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        let outcome = match poll_task(&mut self.task) {
            PollResult::Complete(Ok(result)) => Outcome::from(result),
            PollResult::Complete(Err(e)) => Outcome::Error(format!("Request task failed: {}", e)),
            PollResult::Pending => {
                ctx.request_repaint();
                return events;
            }
            PollResult::NoTask => return events,
        };

        let elapsed = self
            .started_at
            .take()
            .map(|start| start.elapsed())
            .unwrap_or_default();

        match &outcome {
            Outcome::Success(payload) => {
                events.push(StateEvent::LogInfo(format!("{} succeeded", payload.operation)));
            }
            Outcome::Error(message) => {
                events.push(StateEvent::LogError(format!("Request failed: {}", message)));
            }
        }

        let result = LastResult::new(outcome, elapsed);
        events.push(StateEvent::StatusMessage(result.summary()));
        self.last_result = Some(result);

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::outcome::ResultView;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(&BackendConfig {
            base_url: base_url.to_string(),
        })
        .unwrap()
    }

    /// Poll until the submission completes, checking the loading flag holds
    /// for the whole wait.
    async fn wait_for_completion(form: &mut FormState, ctx: &egui::Context) {
        for _ in 0..500 {
            form.poll(ctx);
            if !form.is_loading() {
                return;
            }
            assert!(form.last_result.is_none());
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("submission did not complete");
    }

    #[tokio::test]
    async fn test_write_scenario_shows_pretty_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agents/write"))
            .and(body_json(json!({"prompt": "Chapter 1 outline"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let ctx = egui::Context::default();
        let mut form = FormState {
            operation: OperationKind::Write,
            input_text: "Chapter 1 outline".into(),
            ..Default::default()
        };

        assert!(!form.is_loading());
        let event = form.submit(&client);
        assert!(matches!(event, Some(StateEvent::StatusMessage(_))));
        assert!(form.is_loading());
        assert!(!form.can_submit());

        wait_for_completion(&mut form, &ctx).await;

        assert!(!form.is_loading());
        let result = form.last_result.as_ref().unwrap();
        assert_eq!(
            ResultView::new(&result.outcome, client.base_url()),
            ResultView::Json("{\n  \"result\": \"ok\"\n}".into())
        );
    }

    #[tokio::test]
    async fn test_blank_review_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        for input in ["", "   \n\t"] {
            let mut form = FormState {
                operation: OperationKind::Review,
                input_text: input.into(),
                ..Default::default()
            };

            assert!(form.submit(&client).is_none());
            assert!(!form.is_loading());
            assert!(form.notice.is_some());
            assert!(!form.can_submit());

            form.dismiss_notice();
            assert!(form.can_submit());
        }
    }

    #[tokio::test]
    async fn test_blank_book_topic_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let mut form = FormState {
            operation: OperationKind::GenerateBook,
            title: "Rust for Writers".into(),
            topic: " ".into(),
            ..Default::default()
        };

        assert!(form.submit(&client_for(&server.uri())).is_none());
        assert!(!form.is_loading());
        assert_eq!(form.notice.as_deref(), Some("Please enter a book topic."));
    }

    #[tokio::test]
    async fn test_book_success_renders_links() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/books/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "T",
                "docx_file": "a.docx",
                "pdf_file": "a.pdf"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let ctx = egui::Context::default();
        let mut form = FormState {
            operation: OperationKind::GenerateBook,
            title: "T".into(),
            topic: "rust".into(),
            ..Default::default()
        };

        form.submit(&client);
        wait_for_completion(&mut form, &ctx).await;

        let result = form.last_result.as_ref().unwrap();
        match ResultView::new(&result.outcome, client.base_url()) {
            ResultView::Book {
                docx_url, pdf_url, ..
            } => {
                assert_eq!(docx_url, format!("{}/a.docx", server.uri()));
                assert_eq!(pdf_url, format!("{}/a.pdf", server.uri()));
            }
            other => panic!("expected book view, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_network_failure_becomes_error_message() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = client_for(&format!("http://127.0.0.1:{}", port));
        let ctx = egui::Context::default();
        let mut form = FormState {
            operation: OperationKind::Design,
            input_text: "cover art".into(),
            ..Default::default()
        };

        form.submit(&client);
        assert!(form.is_loading());
        wait_for_completion(&mut form, &ctx).await;

        assert!(!form.is_loading());
        let result = form.last_result.as_ref().unwrap();
        match &result.outcome {
            Outcome::Error(message) => assert!(message.starts_with("Network error")),
            other => panic!("expected error, got {:?}", other),
        }
        assert!(matches!(
            ResultView::new(&result.outcome, client.base_url()),
            ResultView::Error(_)
        ));
    }

    #[tokio::test]
    async fn test_resubmit_while_loading_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agents/write"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok"}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let ctx = egui::Context::default();
        let mut form = FormState {
            operation: OperationKind::Write,
            input_text: "once".into(),
            ..Default::default()
        };

        assert!(form.submit(&client).is_some());
        assert!(form.submit(&client).is_none());
        wait_for_completion(&mut form, &ctx).await;
        assert!(form.last_result.is_some());
    }

    #[tokio::test]
    async fn test_new_submission_clears_previous_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agents/review"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok"}))
                    .set_delay(Duration::from_millis(50)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let ctx = egui::Context::default();
        let mut form = FormState {
            operation: OperationKind::Review,
            input_text: "draft".into(),
            ..Default::default()
        };

        form.submit(&client);
        wait_for_completion(&mut form, &ctx).await;
        assert!(form.last_result.is_some());

        form.submit(&client);
        assert!(form.last_result.is_none());
        wait_for_completion(&mut form, &ctx).await;
        assert!(form.last_result.is_some());
    }
}
