//! Transient notices
//!
//! Short status messages raised by canvas and recognition activity.
//! The app pushes them onto a board; the UI fades them in and out and
//! drops them once their display time is up.

use std::time::{Duration, Instant};

use crate::recognition::{Recognition, RecognizeError};

/// How long a notice stays on screen
pub const NOTICE_DURATION: Duration = Duration::from_millis(4000);

/// Maximum number of notices visible at once
pub const MAX_NOTICES: usize = 4;

/// The distinct events surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The canvas was wiped back to the background
    CanvasCleared,
    /// A recognition attempt produced a ranking
    RecognitionSucceeded,
    /// The recognition service could not be reached
    RecognitionFailedNetwork,
    /// The recognition service answered but the attempt failed
    RecognitionFailedOther,
    /// Recognize was requested with nothing on the canvas
    NothingToRecognize,
}

/// A single on-screen notice with display timing
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    shown_at: Instant,
    expires_at: Instant,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        let shown_at = Instant::now();
        Self {
            kind,
            message: message.into(),
            shown_at,
            expires_at: shown_at + NOTICE_DURATION,
        }
    }

    pub fn canvas_cleared() -> Self {
        Self::new(NoticeKind::CanvasCleared, "Canvas cleared")
    }

    pub fn recognized(top: &Recognition) -> Self {
        Self::new(
            NoticeKind::RecognitionSucceeded,
            format!("Recognized: {} ({:.0}%)", top.label, top.confidence * 100.0),
        )
    }

    /// Map a recognition failure to the notice the user should see.
    /// Unreachable and rejected get different wording so the user knows
    /// whether to check the service or the drawing.
    pub fn from_error(err: &RecognizeError) -> Self {
        match err {
            RecognizeError::Network(_) => Self::new(
                NoticeKind::RecognitionFailedNetwork,
                "Recognition service unreachable",
            ),
            RecognizeError::Service(detail) => Self::new(
                NoticeKind::RecognitionFailedOther,
                format!("Recognition failed: {detail}"),
            ),
            RecognizeError::NothingDrawn => Self::new(
                NoticeKind::NothingToRecognize,
                "Draw something before recognizing",
            ),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }

    fn age_secs(&self) -> f32 {
        self.shown_at.elapsed().as_secs_f32()
    }

    fn remaining_secs(&self) -> f32 {
        self.expires_at
            .saturating_duration_since(Instant::now())
            .as_secs_f32()
    }

    /// Opacity with fade-in and fade-out ramps
    pub fn opacity(&self, base_opacity: f32) -> f32 {
        // Fade in during the first 0.3 seconds
        let fade_in = (self.age_secs() / 0.3).min(1.0);

        // Fade out during the last 0.5 seconds before expiry
        let remaining = self.remaining_secs();
        let fade_out = if remaining < 0.5 { remaining / 0.5 } else { 1.0 };

        base_opacity * fade_in * fade_out
    }
}

/// Bounded queue of active notices, oldest first
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
        while self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    /// Drop notices past their display time
    pub fn prune(&mut self) {
        self.notices.retain(|n| !n.is_expired());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
