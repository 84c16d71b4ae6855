//! Canvas toolbar

use std::time::Duration;

use egui::RichText;

use crate::ui::theme::ThemeColors;

/// What the user asked for this frame
#[derive(Debug, Default, Clone, Copy)]
pub struct ToolbarActions {
    pub clear: bool,
    pub recognize: bool,
    pub brush_changed: bool,
}

/// Render the toolbar row. `brush_size` is the slider binding; the
/// caller writes it through to the surface when `brush_changed` is set.
pub fn render_toolbar(
    ui: &mut egui::Ui,
    brush_size: &mut u32,
    recognizing: bool,
    auto_interval: Option<Duration>,
) -> ToolbarActions {
    let mut actions = ToolbarActions::default();

    ui.horizontal(|ui| {
        ui.label(RichText::new("Brush").color(ThemeColors::TEXT_SECONDARY));
        actions.brush_changed = ui.add(egui::Slider::new(brush_size, 1..=20)).changed();

        ui.separator();

        if ui.button("Clear").clicked() {
            actions.clear = true;
        }

        if ui
            .add_enabled(!recognizing, egui::Button::new("Recognize"))
            .clicked()
        {
            actions.recognize = true;
        }

        if recognizing {
            ui.add(egui::Spinner::new().size(14.0));
            ui.label(RichText::new("Recognizing...").color(ThemeColors::TEXT_SECONDARY));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let status = match auto_interval {
                Some(period) => format!("Auto-recognize every {:.0}s", period.as_secs_f32()),
                None => "Auto-recognize off".to_string(),
            };
            ui.label(RichText::new(status).color(ThemeColors::TEXT_MUTED));
        });
    });

    actions
}
