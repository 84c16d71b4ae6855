//! Ranked predictions panel

use egui::{Rect, RichText, Rounding, Vec2};

use crate::recognition::Recognition;
use crate::ui::theme::{color_with_alpha, ThemeColors};

/// Render the ranking from the latest completed recognition. Order is
/// the service's own, top guess first.
pub fn render_results(ui: &mut egui::Ui, results: &[Recognition], recognizing: bool) {
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.heading("Guesses");
        if recognizing {
            ui.add(egui::Spinner::new().size(16.0));
        }
    });
    ui.add_space(8.0);

    if results.is_empty() {
        ui.label(
            RichText::new("Draw something and the recognizer will start guessing.")
                .color(ThemeColors::TEXT_MUTED),
        );
        return;
    }

    for (rank, result) in results.iter().enumerate() {
        render_result_row(ui, rank, result);
        ui.add_space(6.0);
    }
}

/// One prediction with a confidence bar
fn render_result_row(ui: &mut egui::Ui, rank: usize, result: &Recognition) {
    let top = rank == 0;
    let accent = if top {
        ThemeColors::ACCENT_SUCCESS
    } else {
        ThemeColors::ACCENT_PRIMARY
    };

    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(Rounding::same(6.0))
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_min_width(180.0);

            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("{}.", rank + 1)).color(ThemeColors::TEXT_MUTED),
                );

                let mut label = RichText::new(&result.label)
                    .size(if top { 17.0 } else { 14.0 })
                    .color(ThemeColors::TEXT_PRIMARY);
                if top {
                    label = label.strong();
                }
                ui.label(label);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!("{:.0}%", result.confidence * 100.0))
                            .color(accent),
                    );
                });
            });

            let desired = Vec2::new(ui.available_width(), 6.0);
            let (rect, _) = ui.allocate_exact_size(desired, egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, Rounding::same(3.0), ThemeColors::BG_DARK);

            let frac = result.confidence.clamp(0.0, 1.0);
            let filled =
                Rect::from_min_size(rect.min, Vec2::new(rect.width() * frac, rect.height()));
            ui.painter()
                .rect_filled(filled, Rounding::same(3.0), color_with_alpha(accent, 220));
        });
}
