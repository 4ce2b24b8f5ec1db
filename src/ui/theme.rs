//! Window palette, applied once when the window opens

use eframe::egui::{self, Color32, Stroke, Visuals, style::WidgetVisuals};

/// Colors used by the panels and result text
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    pub success: Color32,
    pub error: Color32,

    pub border: Color32,
}

impl Default for Theme {
    /// Dark slate with an indigo accent
    fn default() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(14, 16, 24),
            bg_dark: Color32::from_rgb(22, 25, 36),
            bg_medium: Color32::from_rgb(31, 35, 50),
            bg_light: Color32::from_rgb(46, 52, 72),

            text_primary: Color32::from_rgb(236, 239, 248),
            text_secondary: Color32::from_rgb(196, 201, 220),
            text_muted: Color32::from_rgb(132, 139, 165),

            accent: Color32::from_rgb(99, 102, 241),
            accent_hover: Color32::from_rgb(129, 140, 248),
            accent_muted: Color32::from_rgb(67, 56, 202),

            success: Color32::from_rgb(52, 211, 153),
            error: Color32::from_rgb(248, 113, 113),

            border: Color32::from_rgb(58, 64, 88),
        }
    }
}

/// Fill, outline and text color for one widget state
fn paint(state: &mut WidgetVisuals, fill: Color32, outline: Color32, text: Color32) {
    state.bg_fill = fill;
    state.weak_bg_fill = fill;
    state.bg_stroke = Stroke::new(1.0, outline);
    state.fg_stroke = Stroke::new(1.0, text);
}

impl Theme {
    /// Build egui visuals from the palette
    pub fn visuals(&self) -> Visuals {
        let mut visuals = Visuals {
            window_fill: self.bg_dark,
            panel_fill: self.bg_dark,
            faint_bg_color: self.bg_medium,
            extreme_bg_color: self.bg_darkest,
            hyperlink_color: self.accent,
            window_stroke: Stroke::new(1.0, self.border),
            window_shadow: egui::epaint::Shadow::NONE,
            popup_shadow: egui::epaint::Shadow::NONE,
            ..Visuals::dark()
        };

        let w = &mut visuals.widgets;
        paint(&mut w.noninteractive, self.bg_medium, self.border, self.text_secondary);
        paint(&mut w.inactive, self.bg_light, self.border, self.text_primary);
        paint(&mut w.hovered, self.bg_light, self.accent, self.text_primary);
        paint(&mut w.active, self.accent_muted, self.accent_hover, self.text_primary);
        paint(&mut w.open, self.bg_light, self.accent, self.text_primary);

        visuals.selection.bg_fill = self.accent.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        visuals
    }

    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_visuals(self.visuals());
    }
}
