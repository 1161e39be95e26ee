use std::sync::Arc;

use super::is_minified;

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Decides which artifacts are candidates for minification.
///
/// The default rejects files that already carry the `.min` marker. A user
/// predicate either composes with that default (both must accept) or replaces it.
#[derive(Clone, Default)]
pub struct FileFilter {
    user: Option<Predicate>,
    replace_default: bool,
}

impl FileFilter {
    pub fn composed<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            user: Some(Arc::new(predicate)),
            replace_default: false,
        }
    }

    pub fn replacing<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            user: Some(Arc::new(predicate)),
            replace_default: true,
        }
    }

    pub fn accepts(&self, filename: &str) -> bool {
        if !self.replace_default && is_minified(filename) {
            return false;
        }
        self.user.as_ref().map_or(true, |f| f(filename))
    }
}

impl std::fmt::Debug for FileFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileFilter")
            .field("user", &self.user.is_some())
            .field("replace_default", &self.replace_default)
            .finish()
    }
}
