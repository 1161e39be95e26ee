//! Source map finishing shared by the built-in workers.

use sourcemap::SourceMap;
use tracing::warn;

/// Names `generated` after `file` and chains it onto the artifact's own map.
///
/// With an incoming map the result resolves minified positions to the
/// original sources rather than the bundler output. An incoming map that
/// does not parse is dropped with a warning.
pub fn finish(
    generated: &[u8],
    incoming: Option<&[u8]>,
    file: &str,
) -> Result<Vec<u8>, sourcemap::Error> {
    let generated = SourceMap::from_slice(generated)?;

    let mut map = match incoming.map(SourceMap::from_slice) {
        Some(Ok(mut upstream)) => {
            upstream.adjust_mappings(&generated);
            upstream
        }
        Some(Err(e)) => {
            warn!(file, error = %e, "Ignoring unreadable input source map");
            generated
        }
        None => generated,
    };
    map.set_file(Some(file));

    let mut out = Vec::new();
    map.to_writer(&mut out)?;
    Ok(out)
}
