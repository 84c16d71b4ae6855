//! Message types for communication between the UI and the scheduler

use crate::recognition::{Recognition, RecognizeError};

/// Commands sent from the UI to the recognition scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// User asked for a recognition right now
    Recognize,
}

/// Events sent from the scheduler back to the UI
#[derive(Debug)]
pub enum RecognitionEvent {
    /// An attempt began; the UI should show its busy indicator. Emitted
    /// before the snapshot is encoded.
    Started,
    /// The service answered with a ranked prediction list
    Completed(Vec<Recognition>),
    /// The attempt failed; the busy indicator must be cleared
    Failed(RecognizeError),
}
