//! Result panel rendering

use eframe::egui::{self, RichText};
use egui_commonmark::CommonMarkViewer;

use crate::app::ScribeApp;
use crate::download::{artifact_url, file_name_of};
use crate::outcome::{Outcome, ResultView};
use crate::ui::components::section_frame;

/// Something the user clicked on a book link, carrying the backend file path
enum LinkAction {
    Open(String),
    Save(String),
}

/// Render the last result, if any
pub fn render_result(app: &mut ScribeApp, ui: &mut egui::Ui) {
    let Some(result) = &app.form.last_result else {
        return;
    };

    let theme = app.ui.theme.clone();
    let view = ResultView::new(&result.outcome, app.client.base_url());
    let agent_output = match &result.outcome {
        Outcome::Success(payload) => payload.agent_output().map(str::to_string),
        Outcome::Error(_) => None,
    };

    let mut action = None;

    section_frame(&theme, ui, "Result", |ui| match &view {
        ResultView::Error(text) => {
            ui.label(RichText::new(text).color(theme.error));
        }
        ResultView::Book {
            title,
            docx_file,
            pdf_file,
            docx_url,
            pdf_url,
            json,
        } => {
            ui.label(
                RichText::new("Book generated successfully!")
                    .color(theme.success)
                    .strong(),
            );
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Title:").color(theme.text_muted));
                ui.label(RichText::new(title).color(theme.text_primary).strong());
            });
            ui.add_space(8.0);

            let links = [("DOCX", docx_file, docx_url), ("PDF", pdf_file, pdf_url)];
            for (label, file, url) in links {
                ui.horizontal(|ui| {
                    if ui.link(format!("Download {}", label)).clicked() {
                        action = Some(LinkAction::Open(file.clone()));
                    }
                    let saving = app.download.is_downloading();
                    if ui
                        .add_enabled(!saving, egui::Button::new(format!("Save {}...", label)))
                        .clicked()
                    {
                        action = Some(LinkAction::Save(file.clone()));
                    }
                    ui.label(RichText::new(url).monospace().size(11.0).color(theme.text_muted));
                });
            }

            ui.add_space(8.0);
            egui::CollapsingHeader::new("Response JSON")
                .id_salt("book_json")
                .show(ui, |ui| {
                    ui.label(RichText::new(json).monospace());
                });
        }
        ResultView::Json(json) => {
            if let Some(output) = &agent_output {
                ui.checkbox(&mut app.ui.show_raw_json, "Show raw JSON");
                ui.add_space(6.0);
                if !app.ui.show_raw_json {
                    egui::ScrollArea::vertical()
                        .id_salt("agent_output")
                        .max_height(400.0)
                        .show(ui, |ui| {
                            CommonMarkViewer::new().show(ui, &mut app.ui.markdown_cache, output);
                        });
                    return;
                }
            }

            egui::ScrollArea::vertical()
                .id_salt("result_json")
                .max_height(400.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(json).monospace().color(theme.text_primary));
                });
        }
    });

    render_download_status(app, ui);

    match action {
        Some(LinkAction::Open(file)) => open_artifact(app, &file),
        Some(LinkAction::Save(file)) => save_artifact(app, &file),
        None => {}
    }
}

/// Open an artifact link in the system browser
fn open_artifact(app: &mut ScribeApp, file: &str) {
    let result = artifact_url(app.client.base_url(), file)
        .and_then(|url| open::that(url.as_str()).map_err(anyhow::Error::from));

    if let Err(e) = result {
        tracing::warn!("Failed to open {}: {:#}", file, e);
        app.status_message = format!("Could not open browser: {:#}", e);
    }
}

/// Ask where to save an artifact and start the download
fn save_artifact(app: &mut ScribeApp, file: &str) {
    let url = match artifact_url(app.client.base_url(), file) {
        Ok(url) => url,
        Err(e) => {
            app.status_message = format!("Cannot download {}: {:#}", file, e);
            return;
        }
    };

    let Some(dest) = rfd::FileDialog::new()
        .set_title("Save generated book")
        .set_file_name(file_name_of(file))
        .save_file()
    else {
        return;
    };

    if let Some(event) = app.download.start(&app.client, url, dest) {
        app.handle_event(event);
    }
}

/// Progress, error, or confirmation for the current artifact download
fn render_download_status(app: &ScribeApp, ui: &mut egui::Ui) {
    let theme = &app.ui.theme;
    let download = &app.download;

    if download.is_downloading() {
        ui.add_space(8.0);
        let name = download.file_name.as_deref().unwrap_or("file");
        let bar = if download.progress.total_bytes > 0 {
            egui::ProgressBar::new(download.progress.fraction()).show_percentage()
        } else {
            egui::ProgressBar::new(0.0).animate(true)
        };
        ui.add(bar.text(format!("Saving {}", name)));
    } else if let Some(err) = &download.error {
        ui.add_space(8.0);
        ui.label(RichText::new(format!("Download failed: {}", err)).color(theme.error));
    } else if let Some(path) = &download.last_saved {
        ui.add_space(8.0);
        ui.label(
            RichText::new(format!("Saved to {}", path.display())).color(theme.text_secondary),
        );
    }
}
