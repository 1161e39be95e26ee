use crate::error::BuildError;

use super::runner::Pipeline;

/// Message of the event emitted after the last step succeeds.
pub const COMPLETE: &str = "complete";

type Action = Box<dyn FnOnce(&mut Pipeline) -> Result<(), BuildError> + Send>;

/// A named unit of work run against the pipeline by [`Pipeline::line`].
pub struct Step {
    pub(crate) name: String,
    pub(crate) action: Action,
}

impl Step {
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: FnOnce(&mut Pipeline) -> Result<(), BuildError> + Send + 'static,
    {
        Self {
            name: name.into(),
            action: Box::new(action),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// `round(100 * completed / total)`, held below 100 until every step is done.
pub fn progress(completed: usize, total: usize) -> u8 {
    if total == 0 || completed >= total {
        return 100;
    }
    ((200 * completed + total) / (2 * total)).min(99) as u8
}
