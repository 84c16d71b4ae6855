//! Draw state machine
//!
//! Tracks two independent facts: whether a stroke is currently in
//! progress (`DrawPhase`), and whether any ink has been committed since
//! the last clear (the ink latch). Recognition gates on the latch, not
//! the phase, so a finished drawing stays recognizable after release.

/// Whether a stroke is currently being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPhase {
    #[default]
    Idle,
    Drawing,
}

/// Stroke progress plus the ink latch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawState {
    phase: DrawPhase,
    has_ink: bool,
}

impl DrawState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stroke began. Latches ink; the latch stays set until `clear_ink`.
    pub fn begin_stroke(&mut self) {
        self.phase = DrawPhase::Drawing;
        self.has_ink = true;
    }

    /// The stroke ended: pointer released, or it left the surface while a
    /// button was held (treated as a release).
    pub fn end_stroke(&mut self) {
        self.phase = DrawPhase::Idle;
    }

    /// Reset the ink latch. Only an explicit canvas clear does this.
    pub fn clear_ink(&mut self) {
        self.has_ink = false;
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        self.phase == DrawPhase::Drawing
    }

    pub fn has_ink(&self) -> bool {
        self.has_ink
    }
}
