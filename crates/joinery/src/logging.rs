//! Tracing subscriber setup for binaries and services embedding the pipeline.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global subscriber filtered by `RUST_LOG` (default `info`).
///
/// Records emitted through the `log` facade are forwarded to tracing. Returns
/// `false` when a global subscriber was already installed.
pub fn init_tracing(json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        tracing::subscriber::set_global_default(registry.with(fmt::layer().json())).is_ok()
    } else {
        tracing::subscriber::set_global_default(registry.with(fmt::layer())).is_ok()
    };

    if installed {
        let _ = tracing_log::LogTracer::init();
    }
    installed
}
