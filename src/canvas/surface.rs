//! Stroke rasterization onto a persistent RGBA surface
//!
//! The raster is the single source of truth for the drawing: strokes are
//! rasterized immediately and never retained as vector objects, so there
//! is no per-stroke undo. The buffer is allocated at `pixel_scale` times
//! the logical canvas size and logical points are scaled on the way in.

use std::time::Instant;

const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
const INK: [u8; 4] = [0, 0, 0, 255];

use super::input::Point;

/// Persistent drawing surface.
#[derive(Debug, Clone)]
pub struct SketchSurface {
    /// Raw RGBA pixel data, row-major
    pixels: Vec<u8>,
    /// Raster width in pixels
    width: u32,
    /// Raster height in pixels
    height: u32,
    /// Backing-store multiplier applied to logical coordinates
    scale: u32,
    /// Stroke width in logical pixels
    brush_size: u32,
    /// Current stroke anchor in raster coordinates
    path: Option<(f32, f32)>,
    /// Bumped on every visible mutation so the UI knows to re-upload
    revision: u64,
}

impl SketchSurface {
    /// Allocate a white surface of `logical_width x logical_height`
    /// logical pixels at the given backing-store scale.
    pub fn new(logical_width: u32, logical_height: u32, scale: u32, brush_size: u32) -> Self {
        let scale = scale.max(1);
        let width = logical_width.max(1) * scale;
        let height = logical_height.max(1) * scale;
        Self {
            pixels: vec_filled(width, height, BACKGROUND),
            width,
            height,
            scale,
            brush_size: brush_size.max(1),
            path: None,
            revision: 0,
        }
    }

    /// Start a new stroke at `p`. Draws nothing by itself: a zero-length
    /// path is invisible, so a click without movement leaves no mark.
    pub fn begin_stroke(&mut self, p: Point) {
        self.path = Some(self.to_raster(p));
    }

    /// Rasterize a segment from the current stroke anchor to `p` and
    /// advance the anchor. No-op if no stroke is active.
    pub fn extend_stroke(&mut self, p: Point) {
        let Some(from) = self.path else {
            return;
        };
        let to = self.to_raster(p);
        self.fill_capsule(from, to);
        self.path = Some(to);
        self.revision += 1;
    }

    /// Drop the stroke anchor. Pixels already drawn stay.
    pub fn end_stroke(&mut self) {
        self.path = None;
    }

    /// Fill the whole surface with the background color, irrecoverably
    /// discarding all strokes. Idempotent.
    pub fn clear(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&BACKGROUND);
        }
        self.revision += 1;
    }

    /// Update the stroke width. Touches rendering parameters only: the
    /// raster is not reallocated and existing ink is untouched.
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.max(1);
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Raster dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Displayed size in logical pixels
    pub fn logical_size(&self) -> (u32, u32) {
        (self.width / self.scale, self.height / self.scale)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Copy the current raster for a recognition attempt. The copy is
    /// immutable from the caller's point of view; later strokes do not
    /// affect it.
    pub fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot::new(self.pixels.clone(), self.width, self.height)
    }

    fn to_raster(&self, p: Point) -> (f32, f32) {
        (p.x * self.scale as f32, p.y * self.scale as f32)
    }

    /// Ink every pixel within brush radius of the segment. Covering the
    /// endpoints gives round caps, and abutting segments overlap into
    /// round joins.
    fn fill_capsule(&mut self, from: (f32, f32), to: (f32, f32)) {
        let brush_px = self.brush_size * self.scale;
        let radius = (brush_px.saturating_sub(1) / 2) as f32;
        let radius_sq = radius * radius;
        let pad = radius.ceil() as i64 + 1;

        let min_x = (from.0.min(to.0).floor() as i64 - pad).max(0);
        let max_x = (from.0.max(to.0).ceil() as i64 + pad).min(self.width as i64 - 1);
        let min_y = (from.1.min(to.1).floor() as i64 - pad).max(0);
        let max_y = (from.1.max(to.1).ceil() as i64 + pad).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if point_segment_distance_sq((x as f32, y as f32), from, to) <= radius_sq {
                    let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
                    self.pixels[idx..idx + 4].copy_from_slice(&INK);
                }
            }
        }
    }
}

/// An owned copy of the raster taken for one recognition attempt
#[derive(Debug, Clone)]
pub struct SurfaceSnapshot {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Snapshot width in pixels
    pub width: u32,
    /// Snapshot height in pixels
    pub height: u32,
    /// Timestamp when the snapshot was taken
    pub timestamp: Instant,
}

impl SurfaceSnapshot {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    /// Snapshot dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn vec_filled(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
    for px in pixels.chunks_exact_mut(4) {
        px.copy_from_slice(&color);
    }
    pixels
}

fn point_segment_distance_sq(point: (f32, f32), start: (f32, f32), end: (f32, f32)) -> f32 {
    let (px, py) = point;
    let (x0, y0) = start;
    let (x1, y1) = end;
    let vx = x1 - x0;
    let vy = y1 - y0;
    let wx = px - x0;
    let wy = py - y0;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        let dx = px - x0;
        let dy = py - y0;
        return dx * dx + dy * dy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let cx = x0 + vx * t;
    let cy = y0 + vy * t;
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(surface: &SketchSurface, x: u32, y: u32) -> [u8; 4] {
        let (w, _) = surface.dimensions();
        let idx = ((y * w + x) * 4) as usize;
        surface.pixels()[idx..idx + 4].try_into().unwrap()
    }

    fn is_white(surface: &SketchSurface) -> bool {
        surface.pixels().chunks_exact(4).all(|px| px == BACKGROUND)
    }

    #[test]
    fn new_surface_is_white_at_scaled_size() {
        let surface = SketchSurface::new(64, 48, 2, 5);
        assert_eq!(surface.dimensions(), (128, 96));
        assert_eq!(surface.logical_size(), (64, 48));
        assert!(is_white(&surface));
    }

    #[test]
    fn begin_stroke_draws_nothing() {
        let mut surface = SketchSurface::new(64, 64, 1, 5);
        surface.begin_stroke(Point::new(10.0, 10.0));
        assert!(is_white(&surface));
        assert_eq!(surface.revision(), 0);
    }

    #[test]
    fn extend_stroke_inks_the_segment() {
        let mut surface = SketchSurface::new(64, 64, 1, 5);
        surface.begin_stroke(Point::new(10.0, 10.0));
        surface.extend_stroke(Point::new(30.0, 10.0));

        assert_eq!(pixel(&surface, 20, 10), INK);
        assert_eq!(pixel(&surface, 10, 10), INK);
        assert_eq!(pixel(&surface, 30, 10), INK);
        assert!(surface.revision() > 0);
    }

    #[test]
    fn extend_without_begin_is_noop() {
        let mut surface = SketchSurface::new(64, 64, 1, 5);
        surface.extend_stroke(Point::new(30.0, 10.0));
        assert!(is_white(&surface));
    }

    #[test]
    fn extend_after_end_is_noop() {
        let mut surface = SketchSurface::new(64, 64, 1, 5);
        surface.begin_stroke(Point::new(10.0, 10.0));
        surface.end_stroke();
        surface.extend_stroke(Point::new(30.0, 10.0));
        assert!(is_white(&surface));
    }

    #[test]
    fn caps_extend_past_the_endpoint() {
        // brush 5 => radius 2: the cap reaches two pixels beyond the end
        let mut surface = SketchSurface::new(64, 64, 1, 5);
        surface.begin_stroke(Point::new(10.0, 10.0));
        surface.extend_stroke(Point::new(30.0, 10.0));

        assert_eq!(pixel(&surface, 32, 10), INK);
        assert_eq!(pixel(&surface, 34, 10), BACKGROUND);
        // and sideways from the segment body
        assert_eq!(pixel(&surface, 20, 12), INK);
        assert_eq!(pixel(&surface, 20, 14), BACKGROUND);
    }

    #[test]
    fn logical_points_scale_to_raster_pixels() {
        let mut surface = SketchSurface::new(64, 64, 2, 5);
        surface.begin_stroke(Point::new(10.0, 10.0));
        surface.extend_stroke(Point::new(20.0, 10.0));

        // Logical midpoint (15, 10) lands at raster (30, 20)
        assert_eq!(pixel(&surface, 30, 20), INK);
    }

    #[test]
    fn clear_restores_background_and_is_idempotent() {
        let mut surface = SketchSurface::new(64, 64, 1, 5);
        surface.begin_stroke(Point::new(10.0, 10.0));
        surface.extend_stroke(Point::new(30.0, 10.0));
        assert!(!is_white(&surface));

        surface.clear();
        assert!(is_white(&surface));

        surface.clear();
        assert!(is_white(&surface));
    }

    #[test]
    fn brush_size_change_keeps_pixels_and_dimensions() {
        let mut surface = SketchSurface::new(64, 64, 2, 5);
        surface.begin_stroke(Point::new(10.0, 10.0));
        surface.extend_stroke(Point::new(20.0, 10.0));
        let before = surface.pixels().to_vec();

        surface.set_brush_size(17);

        assert_eq!(surface.brush_size(), 17);
        assert_eq!(surface.dimensions(), (128, 128));
        assert_eq!(surface.pixels(), &before[..]);
    }

    #[test]
    fn brush_size_clamps_to_one() {
        let mut surface = SketchSurface::new(64, 64, 1, 5);
        surface.set_brush_size(0);
        assert_eq!(surface.brush_size(), 1);
    }

    #[test]
    fn snapshot_copies_current_pixels() {
        let mut surface = SketchSurface::new(32, 32, 1, 5);
        surface.begin_stroke(Point::new(5.0, 5.0));
        surface.extend_stroke(Point::new(20.0, 5.0));

        let snap = surface.snapshot();
        assert_eq!(snap.dimensions(), (32, 32));
        assert_eq!(snap.data, surface.pixels());

        // Later drawing does not affect the snapshot
        surface.extend_stroke(Point::new(20.0, 25.0));
        assert_ne!(snap.data, surface.pixels());
    }
}
