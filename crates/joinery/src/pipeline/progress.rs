use std::sync::Arc;

use tokio::sync::broadcast;

use crate::broadcast::build_progress::{BuildProgressEvent, BuildProgressTracker};

/// Events emitted by the pipeline while a build runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A step is about to start.
    Task { message: String, progress: u8 },
    /// The artifact set is final.
    Store { files: Vec<String> },
    /// The build aborted.
    Error { error: String },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Bridges pipeline events to a broadcast channel.
pub struct BroadcastProgress {
    tracker: BuildProgressTracker,
}

impl BroadcastProgress {
    pub fn new(
        build_id: &str,
        name: &str,
        sender: Arc<broadcast::Sender<BuildProgressEvent>>,
    ) -> Self {
        Self {
            tracker: BuildProgressTracker::new(build_id, name, sender),
        }
    }
}

impl ProgressReporter for BroadcastProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Task { message, progress } => self.tracker.task(&message, progress),
            ProgressEvent::Store { files } => self.tracker.stored(&files),
            ProgressEvent::Error { error } => self.tracker.failed(&error),
        }
    }
}
