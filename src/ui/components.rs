//! Shared UI components for Scribe

use eframe::egui::{self, RichText};

use crate::app::ScribeApp;
use crate::ui::theme::Theme;

/// Render a titled section frame around `content`
pub fn section_frame<F>(theme: &Theme, ui: &mut egui::Ui, title: &str, content: F)
where
    F: FnOnce(&mut egui::Ui),
{
    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::same(16))
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(theme.accent).size(13.0).strong());
            ui.add_space(12.0);
            content(ui);
        });
}

/// Render the blocking validation notice, if one is pending
pub fn render_notice(app: &mut ScribeApp, ctx: &egui::Context) {
    let Some(message) = app.form.notice.clone() else {
        return;
    };

    let theme = &app.ui.theme;
    let mut acknowledged = false;

    let response = egui::Modal::new(egui::Id::new("validation_notice")).show(ctx, |ui| {
        ui.set_width(280.0);
        ui.vertical_centered(|ui| {
            ui.add_space(4.0);
            ui.label(RichText::new("Missing input").strong().color(theme.accent));
            ui.add_space(8.0);
            ui.label(RichText::new(&message).color(theme.text_primary));
            ui.add_space(12.0);
            if ui.button("OK").clicked() {
                acknowledged = true;
            }
        });
    });

    if acknowledged || response.should_close() {
        app.form.dismiss_notice();
    }
}

/// Render the About dialog
pub fn render_about_dialog(app: &mut ScribeApp, ctx: &egui::Context) {
    if !app.ui.show_about_dialog {
        return;
    }

    let theme = &app.ui.theme;
    let mut close = false;

    egui::Window::new("About Scribe")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 220.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("Scribe").size(24.0).strong().color(theme.accent));
                ui.add_space(4.0);
                ui.label(
                    RichText::new("Book Writer AI client")
                        .size(14.0)
                        .color(theme.text_secondary),
                );
                ui.add_space(12.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme.text_muted),
                );
                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!("Backend: {}", app.client.base_url()))
                        .color(theme.text_muted),
                );
                ui.add_space(12.0);
                ui.label(
                    RichText::new("Built with Rust + egui")
                        .size(11.0)
                        .color(theme.text_muted),
                );
                ui.add_space(12.0);
                if ui.button("Close").clicked() {
                    close = true;
                }
                ui.add_space(8.0);
            });
        });

    if close {
        app.ui.show_about_dialog = false;
    }
}
