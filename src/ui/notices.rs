//! Notice rendering
//!
//! Active notices hang off the top-right corner of the window and fade
//! with age.

use std::time::Duration;

use egui::{Align2, Color32, FontId, RichText, Rounding, Stroke, Vec2};

use crate::notices::{NoticeBoard, NoticeKind};
use crate::ui::theme::{color_with_alpha, ThemeColors};

const BASE_OPACITY: f32 = 0.92;

fn accent_for(kind: NoticeKind) -> Color32 {
    match kind {
        NoticeKind::CanvasCleared => ThemeColors::ACCENT_PRIMARY,
        NoticeKind::RecognitionSucceeded => ThemeColors::ACCENT_SUCCESS,
        NoticeKind::RecognitionFailedNetwork => ThemeColors::ACCENT_ERROR,
        NoticeKind::RecognitionFailedOther => ThemeColors::ACCENT_WARNING,
        NoticeKind::NothingToRecognize => ThemeColors::ACCENT_WARNING,
    }
}

/// Draw active notices and drop expired ones
pub fn render_notices(ctx: &egui::Context, board: &mut NoticeBoard) {
    board.prune();
    if board.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("notices"))
        .anchor(Align2::RIGHT_TOP, Vec2::new(-16.0, 16.0))
        .show(ctx, |ui| {
            ui.set_max_width(320.0);

            for notice in board.iter() {
                let opacity = notice.opacity(BASE_OPACITY);
                let alpha = (opacity * 255.0) as u8;
                let accent = accent_for(notice.kind);

                egui::Frame::none()
                    .fill(color_with_alpha(ThemeColors::BG_MEDIUM, alpha))
                    .rounding(Rounding::same(6.0))
                    .stroke(Stroke::new(1.0, color_with_alpha(accent, alpha)))
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(&notice.message)
                                .color(color_with_alpha(ThemeColors::TEXT_PRIMARY, alpha))
                                .font(FontId::proportional(14.0)),
                        );
                    });
                ui.add_space(6.0);
            }
        });

    // Keep repainting while notices fade
    ctx.request_repaint_after(Duration::from_millis(50));
}
