//! Drawing Surface Layer
//!
//! Owns everything between raw pointer input and the pixel buffer:
//! coordinate normalization, stroke rasterization, and the draw state
//! machine that tracks stroke progress and the ink latch.

pub mod input;
pub mod state;
pub mod surface;

pub use input::{surface_point, CanvasBounds, Point, PointerInput};
pub use state::{DrawPhase, DrawState};
pub use surface::{SketchSurface, SurfaceSnapshot};
