//! Drawing canvas view
//!
//! Mirrors the raster surface into a GPU texture and maps pointer
//! activity back onto it through the coordinate mapper. The raster is
//! re-uploaded only when its revision changes.

use std::sync::Arc;

use egui::{
    Color32, ColorImage, Pos2, Rect, Rounding, Sense, Stroke, TextureHandle, TextureOptions, Vec2,
};
use parking_lot::RwLock;

use crate::canvas::{surface_point, CanvasBounds, Point, PointerInput};
use crate::shared::SharedSketchState;
use crate::ui::theme::ThemeColors;

/// Canvas widget state kept across frames
#[derive(Default)]
pub struct CanvasView {
    texture: Option<TextureHandle>,
    uploaded_revision: u64,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out the drawing surface and apply this frame's pointer events
    pub fn show(&mut self, ui: &mut egui::Ui, shared: &Arc<RwLock<SharedSketchState>>) {
        let logical = shared.read().surface.logical_size();
        let size = Vec2::new(logical.0 as f32, logical.1 as f32);

        ui.with_layout(
            egui::Layout::centered_and_justified(egui::Direction::TopDown),
            |ui| {
                let (rect, response) = ui.allocate_exact_size(size, Sense::drag());

                self.handle_pointer(ui, rect, &response, shared);
                self.sync_texture(ui.ctx(), shared);

                if let Some(texture) = &self.texture {
                    ui.painter().image(
                        texture.id(),
                        rect,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
                ui.painter().rect_stroke(
                    rect,
                    Rounding::same(2.0),
                    Stroke::new(1.0, ThemeColors::BORDER),
                );
            },
        );
    }

    /// Route pointer activity into stroke calls
    fn handle_pointer(
        &self,
        ui: &egui::Ui,
        rect: Rect,
        response: &egui::Response,
        shared: &Arc<RwLock<SharedSketchState>>,
    ) {
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };

        // Touch positions arrive in window coordinates, same space as
        // the canvas rect
        let touches: Vec<Point> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Touch { phase, pos, .. }
                        if !matches!(
                            phase,
                            egui::TouchPhase::End | egui::TouchPhase::Cancel
                        ) =>
                    {
                        Some(Point::new(pos.x, pos.y))
                    }
                    _ => None,
                })
                .collect()
        });

        let bounds = Some(CanvasBounds {
            left: rect.min.x,
            top: rect.min.y,
        });
        let input = if touches.is_empty() {
            PointerInput::Mouse {
                offset: Point::new(pos.x - rect.min.x, pos.y - rect.min.y),
            }
        } else {
            PointerInput::Touch { touches }
        };
        let point = surface_point(&input, bounds);

        let mut state = shared.write();
        if response.drag_started() {
            state.begin_stroke_at(point);
        } else if response.drag_stopped() {
            state.end_stroke();
        } else if response.dragged() {
            if rect.contains(pos) {
                state.extend_stroke_to(point);
            } else if state.draw.is_drawing() {
                // Leaving the surface mid-stroke ends the stroke
                state.end_stroke();
            }
        }
    }

    /// Re-upload the raster when its revision moved past the texture
    fn sync_texture(&mut self, ctx: &egui::Context, shared: &Arc<RwLock<SharedSketchState>>) {
        let state = shared.read();
        let revision = state.surface.revision();
        if self.texture.is_some() && revision == self.uploaded_revision {
            return;
        }

        let (width, height) = state.surface.dimensions();
        let image = ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            state.surface.pixels(),
        );

        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("sketch-surface", image, TextureOptions::LINEAR));
            }
        }
        self.uploaded_revision = revision;
    }
}
