//! Sketchpad UI
//!
//! egui views for the drawing surface, the toolbar, the ranked results
//! panel, and transient notices.

pub mod canvas;
pub mod notices;
pub mod results;
pub mod theme;
pub mod toolbar;

pub use canvas::CanvasView;
pub use notices::render_notices;
pub use results::render_results;
pub use toolbar::{render_toolbar, ToolbarActions};
