use std::path::PathBuf;
use thiserror::Error;

use crate::minifier::ContentKind;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    #[error("Minify error: {0}")]
    Minify(#[from] MinifyError),

    #[error("Compression error: {0}")]
    Compress(#[from] CompressError),

    #[error("Step '{step}' requires '{requires}' to run first")]
    StepOrder {
        step: &'static str,
        requires: &'static str,
    },

    #[error("{0}")]
    Step(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config TOML: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("Failed to convert config layer: {0}")]
    Layer(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Unknown environment '{0}'")]
    UnknownEnvironment(String),
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to read package manifest '{path}': {source}")]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse package manifest '{path}': {source}")]
    ParseManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to resolve entry path '{path}': {source}")]
    ResolveEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Entry file does not exist: {0}")]
    EntryNotFound(PathBuf),

    #[error("Entry is not a regular file: {0}")]
    EntryNotFile(PathBuf),

    #[error("Failed to read entry file '{path}': {source}")]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("{0}")]
    Failed(String),

    #[error("Bundler could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum MinifyError {
    #[error("Failed to minify '{filename}': {message}")]
    Transform { filename: String, message: String },

    #[error("No minifier named '{name}' is registered for {kind}")]
    UnknownMinifier { name: String, kind: ContentKind },

    #[error("Minifier '{name}' does not support {kind}")]
    UnsupportedKind { name: String, kind: ContentKind },
}

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Failed to gzip '{filename}': {source}")]
    Gzip {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BuildError>;
