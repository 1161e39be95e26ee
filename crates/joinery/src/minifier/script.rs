use std::path::PathBuf;

use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier as OxcMinifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::MinifyError;
use crate::minifier::{
    option_flag, source_map, ContentKind, MinifiedContent, Minifier, MinifyRequest,
};

pub const NAME: &str = "oxc";

/// Script minifier backed by the oxc parser, minifier and code generator.
///
/// Recognised options: `mangle` and `compress` (bool, both on by default).
/// Always emits a source map, chained onto the bundler's map when present.
pub struct ScriptMinifier;

impl ScriptMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScriptMinifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Minifier for ScriptMinifier {
    fn minify(&self, request: &MinifyRequest<'_>) -> Result<MinifiedContent, MinifyError> {
        let fail = |message: String| MinifyError::Transform {
            filename: request.filename.to_string(),
            message,
        };

        let source = std::str::from_utf8(request.content)
            .map_err(|e| fail(format!("script is not valid UTF-8: {}", e)))?;

        let source_type = SourceType::from_path(request.filename).unwrap_or_default();
        let allocator = Allocator::default();

        let parsed = Parser::new(&allocator, source, source_type).parse();
        if !parsed.errors.is_empty() {
            let errors: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
            return Err(fail(errors.join("\n")));
        }
        let mut program = parsed.program;

        let options = MinifierOptions {
            mangle: option_flag(request.options, "mangle", true).then(MangleOptions::default),
            compress: option_flag(request.options, "compress", true)
                .then(CompressOptions::default),
            ..MinifierOptions::default()
        };
        let minified = OxcMinifier::new(options).minify(&allocator, &mut program);

        let output = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                source_map_path: Some(PathBuf::from(request.filename)),
                ..CodegenOptions::default()
            })
            .with_scoping(minified.scoping)
            .build(&program);

        let generated = output
            .map
            .map(|map| map.to_json_string())
            .ok_or_else(|| fail("code generator produced no source map".to_string()))?;
        let map = source_map::finish(
            generated.as_bytes(),
            request.source_map,
            request.destination,
        )
        .map_err(|e| fail(e.to_string()))?;

        Ok(MinifiedContent {
            content: output.code.into_bytes(),
            source_map: Some(map),
        })
    }

    fn supports(&self, kind: ContentKind) -> bool {
        matches!(kind, ContentKind::Script)
    }
}
