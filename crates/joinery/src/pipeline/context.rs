use std::path::{Path, PathBuf};

use crate::compress::CompressedStore;
use crate::config::{BuildOptions, Environment, ResolvedConfig};
use crate::manifest::Manifest;
use crate::store::{ArtifactStore, FileFilter};

use super::export::ExportedFile;

/// Per-build state threaded through every step. Owned by one pipeline run.
pub struct BuildContext {
    // Input
    pub id: String,
    pub name: String,
    pub(crate) source_root: PathBuf,
    pub dest_root: PathBuf,
    pub target: PathBuf,
    pub env: Environment,
    pub minify_enabled: bool,
    pub entry_override: Option<String>,
    pub filter: FileFilter,
    pub(crate) config: ResolvedConfig,

    // init, Some once step `init` has run
    pub manifest: Option<Manifest>,
    pub entry_path: Option<PathBuf>,

    // exists
    pub entry_size: Option<u64>,

    // read
    pub source_text: Option<String>,

    // assemble, minify
    pub artifacts: ArtifactStore,

    // pack
    pub compressed: CompressedStore,
    pub packed: bool,

    // files
    pub exported: Option<Vec<ExportedFile>>,
}

impl BuildContext {
    pub fn new(options: BuildOptions, config: ResolvedConfig) -> Self {
        let source_root = options.source_root();
        Self {
            id: options.id,
            name: options.name,
            source_root,
            dest_root: options.dest_dir,
            target: options.target,
            env: options.env,
            minify_enabled: options.minify,
            entry_override: options.entry,
            filter: options.filter,
            config,
            manifest: None,
            entry_path: None,
            entry_size: None,
            source_text: None,
            artifacts: ArtifactStore::new(),
            compressed: CompressedStore::new(),
            packed: false,
            exported: None,
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Minification runs only for production builds with the flag set.
    pub fn should_minify(&self) -> bool {
        self.env.is_production() && self.minify_enabled
    }
}
