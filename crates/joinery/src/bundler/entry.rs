use crate::bundler::{BundleOutput, BundleRequest, Bundler};
use crate::error::BundleError;

/// Emits the entry source as the only artifact, named after the entry file.
///
/// Useful for packages that ship a single prebuilt file.
pub struct EntryBundler;

impl EntryBundler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EntryBundler {
    fn default() -> Self {
        Self::new()
    }
}

impl Bundler for EntryBundler {
    fn bundle(&self, request: &BundleRequest<'_>) -> Result<BundleOutput, BundleError> {
        let filename = request
            .entry
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                BundleError::Failed(format!(
                    "Entry path has no file name: {}",
                    request.entry.display()
                ))
            })?;

        let mut output = BundleOutput::new();
        output.insert(filename.to_string(), request.source.as_bytes().to_vec());
        Ok(output)
    }
}
