pub mod entry;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::config::Environment;
use crate::error::BundleError;
use crate::store::ArtifactStore;

pub use entry::EntryBundler;

/// Everything a bundler worker gets to see about the build.
#[derive(Debug, Clone, Copy)]
pub struct BundleRequest<'a> {
    pub entry: &'a Path,
    pub source: &'a str,
    pub source_root: &'a Path,
    pub dest_root: &'a Path,
    pub env: Environment,
    pub options: &'a serde_json::Value,
}

/// Filename to content, as produced by a bundler.
pub type BundleOutput = BTreeMap<String, Vec<u8>>;

/// Resolves an entry file's dependency graph into output artifacts.
pub trait Bundler: Send + Sync {
    fn bundle(&self, request: &BundleRequest<'_>) -> Result<BundleOutput, BundleError>;
}

/// Runs `bundler` and stocks everything it returns. Errors pass through untouched.
pub fn assemble(
    bundler: &dyn Bundler,
    request: &BundleRequest<'_>,
    store: &mut ArtifactStore,
) -> Result<usize, BundleError> {
    let output = bundler.bundle(request)?;
    let count = output.len();

    for (filename, content) in output {
        debug!(filename = %filename, bytes = content.len(), "Stocking bundler output");
        store.stock(filename, content);
    }

    Ok(count)
}
