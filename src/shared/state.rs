//! Shared application state between the UI and the recognition worker

use crate::canvas::{DrawState, Point, SketchSurface, SurfaceSnapshot};
use crate::config::AppConfig;

/// Central shared state: the drawing surface and its draw state, guarded
/// by one lock so the raster and the ink latch can never drift apart.
///
/// The UI thread takes short write locks per input event; the scheduler
/// takes read locks to test the latch and copy snapshots.
#[derive(Debug, Clone)]
pub struct SharedSketchState {
    /// Application configuration
    pub config: AppConfig,
    /// The persistent drawing surface
    pub surface: SketchSurface,
    /// Stroke progress and ink latch
    pub draw: DrawState,
}

impl Default for SharedSketchState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl SharedSketchState {
    /// Create shared state with a surface sized from the configuration
    pub fn new(config: AppConfig) -> Self {
        let surface = SketchSurface::new(
            config.canvas.width,
            config.canvas.height,
            config.canvas.pixel_scale,
            config.brush.size,
        );

        Self {
            config,
            surface,
            draw: DrawState::new(),
        }
    }

    /// Start a stroke at `p` and latch the ink flag
    pub fn begin_stroke_at(&mut self, p: Point) {
        self.surface.begin_stroke(p);
        self.draw.begin_stroke();
    }

    /// Continue the active stroke to `p`; no-op when not drawing
    pub fn extend_stroke_to(&mut self, p: Point) {
        if self.draw.is_drawing() {
            self.surface.extend_stroke(p);
        }
    }

    /// End the active stroke (release or pointer leaving the canvas)
    pub fn end_stroke(&mut self) {
        self.surface.end_stroke();
        self.draw.end_stroke();
    }

    /// Wipe the surface to white and reset the ink latch
    pub fn clear_canvas(&mut self) {
        self.surface.clear();
        self.draw.clear_ink();
    }

    /// Update the brush width in both config and surface. Rendering
    /// parameters only: the raster and the scheduler are untouched.
    pub fn set_brush_size(&mut self, size: u32) {
        let size = size.max(1);
        self.config.brush.size = size;
        self.surface.set_brush_size(size);
    }

    pub fn has_ink(&self) -> bool {
        self.draw.has_ink()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.surface.snapshot()
    }
}
