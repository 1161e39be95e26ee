use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use parcel_sourcemap::SourceMap;

use crate::error::MinifyError;
use crate::minifier::{
    option_flag, source_map, ContentKind, MinifiedContent, Minifier, MinifyRequest,
};

pub const NAME: &str = "lightningcss";

/// Stylesheet minifier backed by lightningcss.
///
/// Recognised options: `error_recovery` (bool) keeps going past invalid rules.
/// Always emits a source map, chained onto the bundler's map when present.
pub struct StylesheetMinifier;

impl StylesheetMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StylesheetMinifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Minifier for StylesheetMinifier {
    fn minify(&self, request: &MinifyRequest<'_>) -> Result<MinifiedContent, MinifyError> {
        let fail = |message: String| MinifyError::Transform {
            filename: request.filename.to_string(),
            message,
        };

        let source = std::str::from_utf8(request.content)
            .map_err(|e| fail(format!("stylesheet is not valid UTF-8: {}", e)))?;

        let error_recovery = option_flag(request.options, "error_recovery", false);

        let parser_options = ParserOptions {
            filename: request.filename.to_string(),
            error_recovery,
            ..ParserOptions::default()
        };

        let mut sheet =
            StyleSheet::parse(source, parser_options).map_err(|e| fail(e.to_string()))?;

        sheet
            .minify(MinifyOptions::default())
            .map_err(|e| fail(e.to_string()))?;

        let mut generated = SourceMap::new("/");
        let source_index = generated.add_source(request.filename);
        generated
            .set_source_content(source_index as usize, source)
            .map_err(|e| fail(e.to_string()))?;

        let printed = sheet
            .to_css(PrinterOptions {
                minify: true,
                source_map: Some(&mut generated),
                ..PrinterOptions::default()
            })
            .map_err(|e| fail(e.to_string()))?;

        let generated = generated.to_json(None).map_err(|e| fail(e.to_string()))?;
        let map = source_map::finish(
            generated.as_bytes(),
            request.source_map,
            request.destination,
        )
        .map_err(|e| fail(e.to_string()))?;

        Ok(MinifiedContent {
            content: printed.code.into_bytes(),
            source_map: Some(map),
        })
    }

    fn supports(&self, kind: ContentKind) -> bool {
        matches!(kind, ContentKind::Stylesheet)
    }
}
