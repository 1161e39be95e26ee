pub mod broadcast;
pub mod bundler;
pub mod compress;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod manifest;
pub mod minifier;
pub mod pipeline;
pub mod sanitize;
pub mod store;

pub use broadcast::{BuildProgressBroadcaster, BuildProgressEvent};
pub use bundler::{BundleRequest, Bundler, EntryBundler};
pub use config::{BuildOptions, Environment, ResolvedConfig};
pub use error::{
    BuildError, BundleError, CompressError, ConfigError, MinifyError, ReadError, Result,
};
pub use fingerprint::fingerprint;
pub use minifier::{ContentKind, MinifiedContent, Minifier, MinifierRegistry, MinifyRequest};
pub use pipeline::{BuildContext, ExportedFile, Pipeline, ProgressEvent, ProgressReporter, Step};
pub use store::{ArtifactStore, FileFilter, Payload};
