//! Stand-in workers for the bundler and minifier seams.

#![allow(dead_code)]

use std::sync::Mutex;

use joinery::bundler::BundleOutput;
use joinery::{
    BundleError, BundleRequest, Bundler, ContentKind, MinifiedContent, MinifyError, Minifier,
    MinifyRequest, ProgressEvent, ProgressReporter,
};

/// Emits a fixed set of files, ignoring the entry.
pub struct StaticBundler {
    pub files: Vec<(String, String)>,
}

impl StaticBundler {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(n, c)| (n.to_string(), c.to_string()))
                .collect(),
        }
    }
}

impl Bundler for StaticBundler {
    fn bundle(&self, _request: &BundleRequest<'_>) -> Result<BundleOutput, BundleError> {
        Ok(self
            .files
            .iter()
            .map(|(n, c)| (n.clone(), c.clone().into_bytes()))
            .collect())
    }
}

/// Always fails the way a bundler reports a syntax error.
pub struct BrokenBundler(pub &'static str);

impl Bundler for BrokenBundler {
    fn bundle(&self, _request: &BundleRequest<'_>) -> Result<BundleOutput, BundleError> {
        Err(BundleError::Failed(self.0.to_string()))
    }
}

/// Collapses whitespace in scripts and markup; answers a supplied map with a new one.
pub struct SquashMinifier;

impl Minifier for SquashMinifier {
    fn minify(&self, request: &MinifyRequest<'_>) -> Result<MinifiedContent, MinifyError> {
        let text = std::str::from_utf8(request.content).map_err(|e| MinifyError::Transform {
            filename: request.filename.to_string(),
            message: e.to_string(),
        })?;
        let squashed = text.split_whitespace().collect::<Vec<_>>().join(" ");

        let source_map = request.source_map.map(|_| {
            serde_json::json!({
                "version": 3,
                "file": request.destination,
                "mappings": "AAAA",
            })
            .to_string()
            .into_bytes()
        });

        Ok(MinifiedContent {
            content: squashed.into_bytes(),
            source_map,
        })
    }

    fn supports(&self, kind: ContentKind) -> bool {
        matches!(kind, ContentKind::Script | ContentKind::Markup)
    }
}

/// Fails for one filename, squashes the rest.
pub struct FailingMinifier {
    pub fail_on: &'static str,
}

impl Minifier for FailingMinifier {
    fn minify(&self, request: &MinifyRequest<'_>) -> Result<MinifiedContent, MinifyError> {
        if request.filename == self.fail_on {
            return Err(MinifyError::Transform {
                filename: request.filename.to_string(),
                message: "SyntaxError: Unexpected token".to_string(),
            });
        }
        SquashMinifier.minify(request)
    }

    fn supports(&self, kind: ContentKind) -> bool {
        matches!(kind, ContentKind::Script)
    }
}

/// Records every event for later assertions.
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Task { progress, .. } => Some(progress),
                _ => None,
            })
            .collect()
    }

    pub fn task_messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Task { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
