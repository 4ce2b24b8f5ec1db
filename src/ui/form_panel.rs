//! Request form rendering

use eframe::egui::{self, RichText};

use crate::api::OperationKind;
use crate::app::ScribeApp;
use crate::ui::components::section_frame;

/// Render the request form: operation picker, inputs, submit button
pub fn render_form(app: &mut ScribeApp, ui: &mut egui::Ui) {
    let theme = app.ui.theme.clone();
    let mut submit_clicked = false;

    section_frame(&theme, ui, "Request", |ui| {
        let loading = app.form.is_loading();

        ui.add_enabled_ui(!loading, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Operation:").color(theme.text_muted));
                egui::ComboBox::from_id_salt("operation_select")
                    .selected_text(app.form.operation.name())
                    .width(180.0)
                    .show_ui(ui, |ui| {
                        for op in OperationKind::all() {
                            ui.selectable_value(&mut app.form.operation, *op, op.name());
                        }
                    });
                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!("POST {}", app.form.operation.endpoint()))
                        .monospace()
                        .size(11.0)
                        .color(theme.text_muted),
                );
            });

            ui.add_space(8.0);

            if app.form.operation.is_book() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Title:").color(theme.text_muted));
                    ui.add(
                        egui::TextEdit::singleline(&mut app.form.title)
                            .hint_text("Enter Book Title")
                            .desired_width(f32::INFINITY),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Topic:").color(theme.text_muted));
                    ui.add(
                        egui::TextEdit::singleline(&mut app.form.topic)
                            .hint_text("Enter Topic")
                            .desired_width(f32::INFINITY),
                    );
                });
            } else {
                ui.add(
                    egui::TextEdit::multiline(&mut app.form.input_text)
                        .hint_text(app.form.operation.input_hint())
                        .desired_rows(8)
                        .desired_width(f32::INFINITY),
                );
            }
        });

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let label = match (loading, app.form.operation.is_book()) {
                (true, true) => "Generating...",
                (true, false) => "Running...",
                (false, true) => "Generate Book",
                (false, false) => "Run Agent",
            };

            let button = egui::Button::new(RichText::new(label).strong())
                .min_size(egui::vec2(140.0, 32.0));
            if ui.add_enabled(app.form.can_submit(), button).clicked() {
                submit_clicked = true;
            }

            if loading {
                ui.spinner();
            }
        });
    });

    if submit_clicked {
        if let Some(event) = app.form.submit(&app.client) {
            app.handle_event(event);
        }
    }
}
