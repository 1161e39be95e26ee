//! Build progress broadcaster for real-time build status streaming.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Kind of build event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BuildEventKind {
    Task,
    Store,
    Error,
}

impl std::fmt::Display for BuildEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildEventKind::Task => write!(f, "task"),
            BuildEventKind::Store => write!(f, "store"),
            BuildEventKind::Error => write!(f, "error"),
        }
    }
}

/// Progress event for a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildProgressEvent {
    /// Unique build identifier.
    pub build_id: String,
    /// Package name being built.
    pub name: String,
    pub kind: BuildEventKind,
    /// Step name for task events, a summary otherwise.
    pub message: String,
    /// Percentage of steps started, 0-100 (task events only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Finalized filenames (store events only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Error message (error events only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl BuildProgressEvent {
    pub fn task(build_id: &str, name: &str, message: &str, progress: u8) -> Self {
        Self {
            build_id: build_id.to_string(),
            name: name.to_string(),
            kind: BuildEventKind::Task,
            message: message.to_string(),
            progress: Some(progress),
            files: vec![],
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn store(build_id: &str, name: &str, files: &[String]) -> Self {
        Self {
            build_id: build_id.to_string(),
            name: name.to_string(),
            kind: BuildEventKind::Store,
            message: format!("{} files finalized", files.len()),
            progress: None,
            files: files.to_vec(),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(build_id: &str, name: &str, error: &str) -> Self {
        Self {
            build_id: build_id.to_string(),
            name: name.to_string(),
            kind: BuildEventKind::Error,
            message: "Build failed".to_string(),
            progress: None,
            files: vec![],
            error: Some(error.to_string()),
            timestamp: Utc::now(),
        }
    }
}

/// Broadcasts build progress events for streaming.
#[derive(Clone)]
pub struct BuildProgressBroadcaster {
    sender: Arc<broadcast::Sender<BuildProgressEvent>>,
}

impl BuildProgressBroadcaster {
    /// Creates a new build progress broadcaster with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Creates a new subscriber for progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<BuildProgressEvent> {
        self.sender.subscribe()
    }

    /// Creates a tracker bound to one build.
    pub fn start_build(&self, build_id: &str, name: &str) -> BuildProgressTracker {
        BuildProgressTracker::new(build_id, name, Arc::clone(&self.sender))
    }

    pub fn sender(&self) -> Arc<broadcast::Sender<BuildProgressEvent>> {
        Arc::clone(&self.sender)
    }
}

impl Default for BuildProgressBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Tracks progress for a single build.
pub struct BuildProgressTracker {
    build_id: String,
    name: String,
    sender: Arc<broadcast::Sender<BuildProgressEvent>>,
}

impl BuildProgressTracker {
    pub fn new(
        build_id: &str,
        name: &str,
        sender: Arc<broadcast::Sender<BuildProgressEvent>>,
    ) -> Self {
        Self {
            build_id: build_id.to_string(),
            name: name.to_string(),
            sender,
        }
    }

    pub fn task(&self, message: &str, progress: u8) {
        self.send(BuildProgressEvent::task(
            &self.build_id,
            &self.name,
            message,
            progress,
        ));
    }

    pub fn stored(&self, files: &[String]) {
        self.send(BuildProgressEvent::store(&self.build_id, &self.name, files));
    }

    pub fn failed(&self, error: &str) {
        self.send(BuildProgressEvent::error(&self.build_id, &self.name, error));
    }

    fn send(&self, event: BuildProgressEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(event);
    }
}
