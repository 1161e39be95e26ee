pub mod filter;

use std::collections::BTreeMap;

pub use filter::FileFilter;

const MINIFIED_MARKER: &str = ".min";

/// Stored form of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Bundler output or any file that was never transformed.
    Raw(Vec<u8>),
    /// Minified output and its source maps.
    Fingerprinted { content: Vec<u8>, fingerprint: String },
}

impl Payload {
    pub fn content(&self) -> &[u8] {
        match self {
            Self::Raw(content) => content,
            Self::Fingerprinted { content, .. } => content,
        }
    }

    pub fn fingerprint(&self) -> Option<&str> {
        match self {
            Self::Raw(_) => None,
            Self::Fingerprinted { fingerprint, .. } => Some(fingerprint),
        }
    }
}

/// Output filename to payload, ordered by filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactStore {
    entries: BTreeMap<String, Payload>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `filename` with raw bytes. Last write wins.
    pub fn stock(&mut self, filename: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.entries
            .insert(filename.into(), Payload::Raw(content.into()));
    }

    pub fn insert(&mut self, filename: impl Into<String>, payload: Payload) {
        self.entries.insert(filename.into(), payload);
    }

    pub fn get(&self, filename: &str) -> Option<&Payload> {
        self.entries.get(filename)
    }

    pub fn content(&self, filename: &str) -> Option<&[u8]> {
        self.entries.get(filename).map(Payload::content)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    pub fn filenames(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Payload)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn split_extension(filename: &str) -> Option<(&str, &str)> {
    let dot = filename.rfind('.')?;
    let stem = &filename[..dot];
    // Dotfiles such as `.babelrc` have no extension.
    if stem.is_empty() || stem.ends_with('/') {
        return None;
    }
    Some((stem, &filename[dot + 1..]))
}

/// Final extension of `filename`, without the dot.
pub fn extension(filename: &str) -> Option<&str> {
    split_extension(filename).map(|(_, ext)| ext)
}

/// Whether `filename` already carries the `.min` marker before its extension.
pub fn is_minified(filename: &str) -> bool {
    split_extension(filename)
        .map(|(stem, _)| stem.ends_with(MINIFIED_MARKER))
        .unwrap_or(false)
}

/// `index.js` -> `index.min.js`. Files without an extension get a `.min` suffix.
pub fn minified_name(filename: &str) -> String {
    match split_extension(filename) {
        Some((stem, ext)) => format!("{}{}.{}", stem, MINIFIED_MARKER, ext),
        None => format!("{}{}", filename, MINIFIED_MARKER),
    }
}

/// `index.min.js` -> `index.min.js.map`.
pub fn source_map_name(filename: &str) -> String {
    format!("{}.map", filename)
}
