//! UI-related application state

use egui_commonmark::CommonMarkCache;

use crate::ui::theme::Theme;

/// UI-related state
#[derive(Default)]
pub struct UiState {
    /// Cache for markdown rendering of agent output
    pub markdown_cache: CommonMarkCache,
    /// Window palette
    pub theme: Theme,
    /// Whether to show the About dialog
    pub show_about_dialog: bool,
    /// Whether the result panel shows raw JSON instead of the Markdown preview
    pub show_raw_json: bool,
}
