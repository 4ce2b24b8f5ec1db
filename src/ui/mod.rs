//! UI modules for Scribe
//!
//! Rendering code for the request form, the result panel, and shared pieces.

mod components;
mod form_panel;
mod result_panel;
pub mod theme;

pub use components::{render_about_dialog, render_notice};
pub use form_panel::render_form;
pub use result_panel::render_result;
