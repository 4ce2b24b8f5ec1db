//! Finished submissions and how they are presented
//!
//! Shared by the GUI result panel and the CLI printers so both surfaces show
//! the same text for the same outcome.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::api::{SubmitError, SuccessPayload};

/// What a submission ended with
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(SuccessPayload),
    /// Human-readable failure description
    Error(String),
}

impl From<Result<SuccessPayload, SubmitError>> for Outcome {
    fn from(result: Result<SuccessPayload, SubmitError>) -> Self {
        match result {
            Ok(payload) => Outcome::Success(payload),
            Err(e) => Outcome::Error(e.to_string()),
        }
    }
}

/// The most recent finished submission
#[derive(Debug, Clone)]
pub struct LastResult {
    pub outcome: Outcome,
    pub finished_at: DateTime<Local>,
    pub elapsed: Duration,
}

impl LastResult {
    pub fn new(outcome: Outcome, elapsed: Duration) -> Self {
        Self {
            outcome,
            finished_at: Local::now(),
            elapsed,
        }
    }

    /// One-line summary for the status bar
    pub fn summary(&self) -> String {
        let verdict = match &self.outcome {
            Outcome::Success(payload) => format!("{} finished", payload.operation),
            Outcome::Error(_) => "Request failed".to_string(),
        };
        format!(
            "{} at {} ({:.1}s)",
            verdict,
            self.finished_at.format("%H:%M:%S"),
            self.elapsed.as_secs_f32()
        )
    }
}

/// Display form of an outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    /// Pretty-printed JSON body
    Json(String),
    /// Book generation with download links
    Book {
        title: String,
        /// Backend-relative paths, as returned
        docx_file: String,
        pdf_file: String,
        docx_url: String,
        pdf_url: String,
        json: String,
    },
    /// Failure text, already prefixed
    Error(String),
}

impl ResultView {
    pub fn new(outcome: &Outcome, base_url: &str) -> Self {
        match outcome {
            Outcome::Error(message) => ResultView::Error(error_text(message)),
            Outcome::Success(payload) => match payload.book() {
                Some(book) => ResultView::Book {
                    docx_url: join_url(base_url, &book.docx_file),
                    pdf_url: join_url(base_url, &book.pdf_file),
                    title: book.title,
                    docx_file: book.docx_file,
                    pdf_file: book.pdf_file,
                    json: payload.pretty(),
                },
                None => ResultView::Json(payload.pretty()),
            },
        }
    }

    /// Plain-text rendering for terminals
    pub fn text(&self) -> String {
        match self {
            ResultView::Json(json) => json.clone(),
            ResultView::Book {
                title,
                docx_url,
                pdf_url,
                ..
            } => format!(
                "Book generated: {}\n  DOCX: {}\n  PDF:  {}",
                title, docx_url, pdf_url
            ),
            ResultView::Error(text) => text.clone(),
        }
    }
}

/// Prefix a failure message for display
pub fn error_text(message: &str) -> String {
    format!("Error: {}", message)
}

/// Join a backend-relative file path onto the base URL with exactly one `/`.
///
/// The result is for display and is not percent-encoded; requests go through
/// `download::artifact_url`.
pub fn join_url(base_url: &str, file: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        file.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationKind;
    use serde_json::json;

    const BASE: &str = "http://localhost:8000";

    #[test]
    fn test_book_links_join_base_url() {
        let outcome = Outcome::Success(SuccessPayload {
            operation: OperationKind::GenerateBook,
            body: json!({"title": "T", "docx_file": "a.docx", "pdf_file": "a.pdf"}),
        });

        match ResultView::new(&outcome, BASE) {
            ResultView::Book {
                title,
                docx_file,
                docx_url,
                pdf_url,
                ..
            } => {
                assert_eq!(title, "T");
                assert_eq!(docx_file, "a.docx");
                assert_eq!(docx_url, "http://localhost:8000/a.docx");
                assert_eq!(pdf_url, "http://localhost:8000/a.pdf");
            }
            other => panic!("expected book view, got {:?}", other),
        }
    }

    #[test]
    fn test_book_without_files_falls_back_to_json() {
        let outcome = Outcome::Success(SuccessPayload {
            operation: OperationKind::GenerateBook,
            body: json!({"title": "T"}),
        });
        assert!(matches!(ResultView::new(&outcome, BASE), ResultView::Json(_)));
    }

    #[test]
    fn test_agent_result_is_pretty_json() {
        let outcome = Outcome::Success(SuccessPayload {
            operation: OperationKind::Write,
            body: json!({"result": "ok"}),
        });
        assert_eq!(
            ResultView::new(&outcome, BASE),
            ResultView::Json("{\n  \"result\": \"ok\"\n}".to_string())
        );
    }

    #[test]
    fn test_error_is_prefixed() {
        let view = ResultView::new(&Outcome::Error("connection refused".into()), BASE);
        assert_eq!(view, ResultView::Error("Error: connection refused".into()));
        assert_eq!(view.text(), "Error: connection refused");
    }

    #[test]
    fn test_join_url_single_slash() {
        assert_eq!(join_url("http://h/", "/out/a.pdf"), "http://h/out/a.pdf");
        assert_eq!(join_url("http://h", "out/a.pdf"), "http://h/out/a.pdf");
    }

    #[test]
    fn test_outcome_from_validation_error() {
        let result: Result<SuccessPayload, SubmitError> =
            Err(SubmitError::Validation("Please enter some text first.".into()));
        let outcome = Outcome::from(result);
        assert_eq!(outcome, Outcome::Error("Please enter some text first.".into()));
    }

    #[test]
    fn test_summary_mentions_operation() {
        let result = LastResult::new(
            Outcome::Success(SuccessPayload {
                operation: OperationKind::Review,
                body: json!({}),
            }),
            Duration::from_millis(1500),
        );
        let summary = result.summary();
        assert!(summary.starts_with("Reviewer finished at "), "{summary}");
        assert!(summary.ends_with("(1.5s)"), "{summary}");
    }
}
