//! Minimal view of a package's `package.json`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReadError;

pub const MANIFEST_FILE: &str = "package.json";

const DEFAULT_ENTRY: &str = "index.js";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Manifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl Manifest {
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self, ReadError> {
        let path = root.as_ref().join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| ReadError::ReadManifest {
            path: path.clone(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ReadError::ParseManifest { path, source: e })
    }

    /// Declared entry point, falling back to `index.js`.
    pub fn entry(&self) -> &str {
        self.main
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ENTRY)
    }
}
