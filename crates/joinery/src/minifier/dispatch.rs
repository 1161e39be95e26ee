use std::collections::BTreeMap;

use tracing::{debug, info_span, warn};

use crate::config::MinifyConfig;
use crate::error::MinifyError;
use crate::fingerprint::fingerprint;
use crate::minifier::{ContentKind, MinifiedContent, MinifierRegistry, MinifyRequest};
use crate::store::{minified_name, source_map_name, ArtifactStore, FileFilter, Payload};

/// What a minify pass did to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinifyReport {
    /// New `.min` keys written, source maps included.
    pub written: Vec<String>,
    /// Markup files overwritten in place.
    pub in_place: Vec<String>,
    /// Transformable files left alone (filtered out or no worker available).
    pub skipped: Vec<String>,
    /// Bundler output that a minified file was written over.
    pub replaced: Vec<String>,
}

/// Minifies every transformable artifact that passes `filter`.
///
/// Each file commits on its own: when a worker fails, the error is returned
/// and files minified earlier in the pass stay in the store. A kind's worker
/// is only resolved once one of its files passes the filter.
pub fn minify_artifacts(
    store: &mut ArtifactStore,
    filter: &FileFilter,
    config: &MinifyConfig,
    registry: &MinifierRegistry,
) -> Result<MinifyReport, MinifyError> {
    let mut report = MinifyReport::default();

    for (kind, filenames) in group_by_kind(store) {
        let (accepted, filtered): (Vec<String>, Vec<String>) =
            filenames.into_iter().partition(|f| filter.accepts(f));
        for filename in &filtered {
            debug!(filename = %filename, "Filtered out of minification");
        }
        report.skipped.extend(filtered);

        if accepted.is_empty() {
            continue;
        }

        let Some((worker, minifier)) = registry.select(kind, config)? else {
            debug!(kind = %kind, "No minifier registered, leaving files untouched");
            report.skipped.extend(accepted);
            continue;
        };
        let options = config.options_for(worker);

        for filename in accepted {
            let _span =
                info_span!("minify_file", filename = %filename, worker = %worker).entered();

            let destination = if kind.is_fingerprinted() {
                minified_name(&filename)
            } else {
                filename.clone()
            };

            let output = {
                let Some(content) = store.content(&filename) else {
                    continue;
                };
                let map_key = source_map_name(&filename);
                minifier.minify(&MinifyRequest {
                    content,
                    source_map: store.content(&map_key),
                    filename: &filename,
                    destination: &destination,
                    options: &options,
                })?
            };

            if kind.is_fingerprinted() {
                if let Some(Payload::Raw(_)) = store.get(&destination) {
                    warn!(
                        filename = %destination,
                        source = %filename,
                        "Overwriting bundler output with minified artifact"
                    );
                    report.replaced.push(destination.clone());
                }
                report
                    .written
                    .extend(commit_fingerprinted(store, kind, destination, output));
            } else {
                store.stock(filename.clone(), output.content);
                report.in_place.push(filename);
            }
        }
    }

    Ok(report)
}

fn group_by_kind(store: &ArtifactStore) -> BTreeMap<ContentKind, Vec<String>> {
    let mut groups: BTreeMap<ContentKind, Vec<String>> = BTreeMap::new();
    for filename in store.filenames() {
        if let Some(kind) = ContentKind::from_filename(&filename) {
            groups.entry(kind).or_default().push(filename);
        }
    }
    groups
}

/// Stores the minified file and its map; returns the keys written.
fn commit_fingerprinted(
    store: &mut ArtifactStore,
    kind: ContentKind,
    destination: String,
    output: MinifiedContent,
) -> Vec<String> {
    let mut written = Vec::with_capacity(2);
    let mut content = output.content;

    if let Some(map) = output.source_map {
        let map_filename = source_map_name(&destination);
        if let Some(comment) = kind.source_map_comment(&map_filename) {
            content.extend_from_slice(comment.as_bytes());
        }

        let map_fingerprint = fingerprint(&map);
        store.insert(
            map_filename.clone(),
            Payload::Fingerprinted {
                content: map,
                fingerprint: map_fingerprint,
            },
        );
        written.push(map_filename);
    }

    let content_fingerprint = fingerprint(&content);
    debug!(
        filename = %destination,
        fingerprint = %content_fingerprint,
        bytes = content.len(),
        "Committed minified artifact"
    );
    store.insert(
        destination.clone(),
        Payload::Fingerprinted {
            content,
            fingerprint: content_fingerprint,
        },
    );
    written.insert(0, destination);
    written
}
