pub mod context;
pub mod export;
pub mod progress;
pub mod runner;
pub mod sequencer;

pub use context::BuildContext;
pub use export::ExportedFile;
pub use progress::{BroadcastProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::Pipeline;
pub use sequencer::Step;
