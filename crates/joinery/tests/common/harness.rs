//! Test harness for isolated test execution.
//!
//! The `TestHarness` struct lays out a source directory holding one package
//! (manifest, entry file, optional `joinery.toml`) and builds pipelines
//! pointed at it.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use joinery::config::PROJECT_CONFIG_FILE;
use joinery::minifier::{stylesheet, StylesheetMinifier};
use joinery::{BuildOptions, Bundler, Environment, MinifierRegistry, Pipeline};

use super::workers::{RecordingProgress, SquashMinifier};

pub struct TestHarness {
    /// Temporary directory containing source/dest subdirectories.
    temp_dir: TempDir,
    /// Directory holding package directories.
    pub source_dir: PathBuf,
    /// Destination root handed to the bundler.
    pub dest_dir: PathBuf,
    /// Package name, also the package's directory under `source_dir`.
    pub name: String,
}

impl TestHarness {
    /// Create a harness with an empty package named `name`.
    pub fn new(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source_dir = temp_dir.path().join("source");
        let dest_dir = temp_dir.path().join("dest");

        std::fs::create_dir_all(source_dir.join(name)).expect("Failed to create package dir");
        std::fs::create_dir_all(&dest_dir).expect("Failed to create dest dir");

        Self {
            temp_dir,
            source_dir,
            dest_dir,
            name: name.to_string(),
        }
    }

    /// Create a harness with a manifest whose `main` is `index.js` and that file present.
    pub fn with_entry(name: &str, source: &str) -> Self {
        let harness = Self::new(name);
        harness.write_manifest("index.js");
        harness.write_file("index.js", source);
        harness
    }

    pub fn package_dir(&self) -> PathBuf {
        self.source_dir.join(&self.name)
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_manifest(&self, main: &str) -> PathBuf {
        self.write_file(
            "package.json",
            &format!(
                r#"{{
                    "name": "{}",
                    "version": "1.0.0",
                    "description": "ES6 React Test module",
                    "main": "{}",
                    "dependencies": {{ "react": "~0.13.3" }}
                }}"#,
                self.name, main
            ),
        )
    }

    /// Write a file relative to the package directory.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.package_dir().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn write_project_config(&self, toml: &str) -> PathBuf {
        self.write_file(PROJECT_CONFIG_FILE, toml)
    }

    pub fn options(&self, env: Environment) -> BuildOptions {
        let mut options = BuildOptions::new(&self.name, &self.source_dir);
        options.id = format!("{}-build", self.name);
        options.dest_dir = self.dest_dir.clone();
        options.target = PathBuf::from("/tmp");
        options.env = env;
        options
    }

    /// Pipeline with the whitespace-squashing worker for scripts and markup, and
    /// the built-in stylesheet worker.
    pub fn pipeline(
        &self,
        options: BuildOptions,
        bundler: Arc<dyn Bundler>,
    ) -> (Pipeline, Arc<RecordingProgress>) {
        let progress = Arc::new(RecordingProgress::default());
        let pipeline = Pipeline::from_options(options, bundler)
            .expect("Failed to create pipeline")
            .with_minifiers(
                MinifierRegistry::empty()
                    .with("squash", SquashMinifier)
                    .with(stylesheet::NAME, StylesheetMinifier::new()),
            )
            .with_progress(progress.clone());
        (pipeline, progress)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new("webpack")
    }
}
