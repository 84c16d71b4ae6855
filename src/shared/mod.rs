//! Shared state and messaging between the UI and the recognition worker
//!
//! This module provides thread-safe shared state and message passing
//! for communication between the egui thread and the scheduler thread.

pub mod state;
pub mod messages;

pub use state::SharedSketchState;
pub use messages::{RecognitionEvent, SchedulerCommand};
