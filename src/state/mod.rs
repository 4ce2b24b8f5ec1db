//! Application state modules
//!
//! Each state struct owns its related fields and poll methods. Poll methods
//! report back to `ScribeApp` through `StateEvent`s instead of mutating it.

mod download;
mod form;
mod ui;

pub use download::DownloadState;
pub use form::FormState;
pub use ui::UiState;

/// Events that state poll methods can return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateEvent {
    /// Update the status message
    StatusMessage(String),

    /// Log an error message
    LogError(String),

    /// Log an info message
    LogInfo(String),
}
