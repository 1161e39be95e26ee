use minify_html::{minify, Cfg};

use crate::error::MinifyError;
use crate::minifier::{option_flag, ContentKind, MinifiedContent, Minifier, MinifyRequest};

pub const NAME: &str = "minify-html";

/// HTML minifier backed by minify-html. Output replaces the file in place.
///
/// Recognised options: `keep_comments` (default off), `minify_css` and
/// `minify_js` for inline blocks (default on).
pub struct MarkupMinifier;

impl MarkupMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkupMinifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Minifier for MarkupMinifier {
    fn minify(&self, request: &MinifyRequest<'_>) -> Result<MinifiedContent, MinifyError> {
        let mut cfg = Cfg::new();
        cfg.keep_comments = option_flag(request.options, "keep_comments", false);
        cfg.minify_css = option_flag(request.options, "minify_css", true);
        cfg.minify_js = option_flag(request.options, "minify_js", true);

        Ok(MinifiedContent {
            content: minify(request.content, &cfg),
            source_map: None,
        })
    }

    fn supports(&self, kind: ContentKind) -> bool {
        matches!(kind, ContentKind::Markup)
    }
}
