pub mod dispatch;
pub mod markup;
pub mod script;
pub mod source_map;
pub mod stylesheet;

use std::sync::Arc;

use crate::config::MinifyConfig;
use crate::error::MinifyError;
use crate::store;

pub use dispatch::{minify_artifacts, MinifyReport};
pub use markup::MarkupMinifier;
pub use script::ScriptMinifier;
pub use stylesheet::StylesheetMinifier;

/// Content types that have a minification transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentKind {
    Script,
    Stylesheet,
    Markup,
}

impl ContentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::Script),
            "css" => Some(Self::Stylesheet),
            "html" | "htm" => Some(Self::Markup),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        store::extension(filename).and_then(Self::from_extension)
    }

    /// Scripts and stylesheets are renamed and fingerprinted; markup is minified in place.
    pub fn is_fingerprinted(&self) -> bool {
        !matches!(self, Self::Markup)
    }

    /// Trailing annotation that links minified content to its source map.
    pub fn source_map_comment(&self, map_filename: &str) -> Option<String> {
        match self {
            Self::Script => Some(format!("\n//# sourceMappingURL={}", map_filename)),
            Self::Stylesheet => Some(format!("\n/*# sourceMappingURL={} */", map_filename)),
            Self::Markup => None,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Script => write!(f, "script"),
            ContentKind::Stylesheet => write!(f, "stylesheet"),
            ContentKind::Markup => write!(f, "markup"),
        }
    }
}

/// Input handed to a minifier worker.
#[derive(Debug, Clone, Copy)]
pub struct MinifyRequest<'a> {
    pub content: &'a [u8],
    /// Source map found under `<filename>.map`, if any.
    pub source_map: Option<&'a [u8]>,
    /// Original artifact name.
    pub filename: &'a str,
    /// Name the minified artifact will be stored under.
    pub destination: &'a str,
    pub options: &'a serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinifiedContent {
    pub content: Vec<u8>,
    pub source_map: Option<Vec<u8>>,
}

pub trait Minifier: Send + Sync {
    fn minify(&self, request: &MinifyRequest<'_>) -> Result<MinifiedContent, MinifyError>;
    fn supports(&self, kind: ContentKind) -> bool;
}

/// Boolean worker option, `default` when absent or not a bool.
pub(crate) fn option_flag(options: &serde_json::Value, key: &str, default: bool) -> bool {
    options.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

/// Named minifier workers, selected per content kind by configuration.
#[derive(Clone, Default)]
pub struct MinifierRegistry {
    minifiers: Vec<(String, Arc<dyn Minifier>)>,
}

impl MinifierRegistry {
    /// Registry with the built-in workers, one per content kind.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(script::NAME, ScriptMinifier::new());
        registry.register(stylesheet::NAME, StylesheetMinifier::new());
        registry.register(markup::NAME, MarkupMinifier::new());
        registry
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers `minifier` under `name`, replacing any worker of the same name.
    pub fn register<M: Minifier + 'static>(&mut self, name: impl Into<String>, minifier: M) {
        let name = name.into();
        let minifier: Arc<dyn Minifier> = Arc::new(minifier);
        match self.minifiers.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = minifier,
            None => self.minifiers.push((name, minifier)),
        }
    }

    pub fn with<M: Minifier + 'static>(mut self, name: impl Into<String>, minifier: M) -> Self {
        self.register(name, minifier);
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.minifiers.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Worker for `kind`: the configured one, else the first registered that supports it.
    pub fn select(
        &self,
        kind: ContentKind,
        config: &MinifyConfig,
    ) -> Result<Option<(&str, Arc<dyn Minifier>)>, MinifyError> {
        if let Some(name) = config.selection(kind) {
            let (name, minifier) = self
                .minifiers
                .iter()
                .find(|(n, _)| n == name)
                .ok_or_else(|| MinifyError::UnknownMinifier {
                    name: name.to_string(),
                    kind,
                })?;

            if !minifier.supports(kind) {
                return Err(MinifyError::UnsupportedKind {
                    name: name.clone(),
                    kind,
                });
            }
            return Ok(Some((name.as_str(), Arc::clone(minifier))));
        }

        Ok(self
            .minifiers
            .iter()
            .find(|(_, m)| m.supports(kind))
            .map(|(n, m)| (n.as_str(), Arc::clone(m))))
    }
}
