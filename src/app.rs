use eframe::egui;

use crate::api::ApiClient;
use crate::state::{DownloadState, FormState, StateEvent, UiState};
use crate::ui::{render_about_dialog, render_form, render_notice, render_result};

/// Main application state
pub struct ScribeApp {
    /// Backend API client
    pub client: ApiClient,
    /// Request form
    pub form: FormState,
    /// Artifact downloads
    pub download: DownloadState,
    /// Palette, dialogs, render caches
    pub ui: UiState,
    /// Status message for the status bar
    pub status_message: String,
}

impl ScribeApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>, client: ApiClient) -> Self {
        let ui = UiState::default();
        ui.theme.apply(&cc.egui_ctx);
        let status_message = format!("Backend: {}", client.base_url());

        Self {
            client,
            form: FormState::default(),
            download: DownloadState::default(),
            ui,
            status_message,
        }
    }

    /// Apply an event reported by one of the state modules
    pub fn handle_event(&mut self, event: StateEvent) {
        match event {
            StateEvent::StatusMessage(msg) => self.status_message = msg,
            StateEvent::LogError(msg) => tracing::error!("{}", msg),
            StateEvent::LogInfo(msg) => tracing::info!("{}", msg),
        }
    }

    /// Poll background tasks
    fn poll_tasks(&mut self, ctx: &egui::Context) {
        let mut events = self.form.poll(ctx);
        events.extend(self.download.poll(ctx));
        for event in events {
            self.handle_event(event);
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.ui.show_about_dialog = true;
                        ui.close();
                    }
                });
            });
        });
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        let theme = &self.ui.theme;
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.status_message).color(theme.text_secondary));
                if self.form.is_loading() {
                    ui.spinner();
                }
            });
        });
    }
}

impl eframe::App for ScribeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_tasks(ctx);

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                render_form(self, ui);
                ui.add_space(12.0);
                render_result(self, ui);
            });
        });

        render_notice(self, ctx);
        render_about_dialog(self, ctx);
    }
}
