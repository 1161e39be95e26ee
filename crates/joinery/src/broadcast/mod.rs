//! Broadcasting of build events to any number of subscribers.

pub mod build_progress;

pub use build_progress::{
    BuildEventKind, BuildProgressBroadcaster, BuildProgressEvent, BuildProgressTracker,
};
