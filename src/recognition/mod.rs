//! Recognition Layer
//!
//! Turns the drawing surface into ranked label predictions by way of a
//! remote classification service:
//! - `client` encodes a surface snapshot to PNG and performs the HTTP call
//! - `scheduler` decides when attempts happen and enforces the
//!   one-in-flight gate

pub mod client;
pub mod scheduler;

pub use client::RecognitionClient;
pub use scheduler::{RecognitionScheduler, SchedulerStatus};

use thiserror::Error;

/// One ranked prediction from the classification service.
///
/// Confidence is normalized to the 0.0 - 1.0 range. Sequences of these
/// keep the service-assigned order; element 0 is the top prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// Class label, e.g. "cat"
    pub label: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
}

/// Why a recognition attempt failed.
///
/// `Network` and `Service` deserve different user messaging ("service
/// unreachable" vs "service rejected the request"), so transport failures
/// are kept distinct from everything the service itself got wrong.
#[derive(Debug, Error)]
pub enum RecognizeError {
    /// Could not reach the service at the transport level
    #[error("recognition service unreachable: {0}")]
    Network(#[source] reqwest::Error),
    /// The service was reached but the request failed: bad status,
    /// malformed body, missing endpoint configuration, or a local
    /// encoding failure before the call
    #[error("recognition failed: {0}")]
    Service(String),
    /// Manual recognize was requested with no ink on the canvas
    #[error("nothing has been drawn yet")]
    NothingDrawn,
}
