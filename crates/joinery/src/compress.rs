//! gzip view of the artifact store.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::{write::GzEncoder, Compression};

use crate::error::CompressError;
use crate::store::ArtifactStore;

/// Filename to gzip bytes, one entry per artifact.
pub type CompressedStore = BTreeMap<String, Vec<u8>>;

pub fn gzip(filename: &str, content: &[u8]) -> Result<Vec<u8>, CompressError> {
    let wrap = |e| CompressError::Gzip {
        filename: filename.to_string(),
        source: e,
    };

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content).map_err(wrap)?;
    encoder.finish().map_err(wrap)
}

/// Compresses the final content of every artifact, keyed like the store.
pub fn pack(store: &ArtifactStore) -> Result<CompressedStore, CompressError> {
    store
        .iter()
        .map(|(filename, payload)| Ok((filename.clone(), gzip(filename, payload.content())?)))
        .collect()
}
