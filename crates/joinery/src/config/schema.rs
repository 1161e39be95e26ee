use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::minifier::ContentKind;
use crate::store::FileFilter;

/// Environment label of a build. Only `Prod` enables minification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Test,
    Staging,
    Prod,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Prod)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            "staging" => Ok(Self::Staging),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

fn default_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn default_minify() -> bool {
    true
}

/// Caller-supplied description of a single build request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    #[serde(default = "default_id")]
    pub id: String,
    pub name: String,
    /// Directory holding one sub-directory per package; the package root is `source/name`.
    pub source: PathBuf,
    pub dest_dir: PathBuf,
    #[serde(default)]
    pub target: PathBuf,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_minify")]
    pub minify: bool,
    /// Entry file relative to the package root; defaults to the manifest's `main`.
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(skip)]
    pub filter: FileFilter,
}

impl BuildOptions {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            id: default_id(),
            name: name.into(),
            source: source.into(),
            dest_dir: std::env::temp_dir(),
            target: PathBuf::new(),
            env: Environment::default(),
            minify: default_minify(),
            entry: None,
            filter: FileFilter::default(),
        }
    }

    pub fn source_root(&self) -> PathBuf {
        self.source.join(&self.name)
    }
}

/// Minifier selection and passthrough options, after layer resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MinifyConfig {
    pub script: Option<String>,
    pub stylesheet: Option<String>,
    pub markup: Option<String>,
    pub options: BTreeMap<String, serde_json::Value>,
}

impl MinifyConfig {
    /// Worker explicitly selected for a content kind, if any.
    pub fn selection(&self, kind: ContentKind) -> Option<&str> {
        match kind {
            ContentKind::Script => self.script.as_deref(),
            ContentKind::Stylesheet => self.stylesheet.as_deref(),
            ContentKind::Markup => self.markup.as_deref(),
        }
    }

    /// Options for the named worker; an empty object when none are configured.
    pub fn options_for(&self, worker: &str) -> serde_json::Value {
        self.options
            .get(worker)
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()))
    }
}

/// The immutable configuration of one build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ResolvedConfig {
    pub minify: MinifyConfig,
    pub bundler: serde_json::Value,
}
