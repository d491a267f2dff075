//! Input and output types of the rendering pipeline.

use markward_core::RenderDefaults;
use serde::Serialize;

use crate::frontmatter::block_content;

// ============================================================================
// RenderOptions
// ============================================================================

/// Per-document rendering switches.
///
/// `sanitize` has no implicit fallback: every constructor names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Strip a uniform leading indentation before conversion.
    pub normalize_whitespace: bool,
    /// Scrub converter output of scriptable markup.
    pub sanitize: bool,
    /// Emit `pragma-line-N` ids on block elements.
    pub use_pragma_lines: bool,
}

impl RenderOptions {
    /// Options with whitespace normalization on and pragma lines off.
    pub fn new(sanitize: bool) -> Self {
        Self {
            normalize_whitespace: true,
            sanitize,
            use_pragma_lines: false,
        }
    }

    /// Sanitized output, the setting for anything shown in a browser.
    pub fn sanitized() -> Self {
        Self::new(true)
    }

    /// Raw converter output, for trusted documents only.
    pub fn unsanitized() -> Self {
        Self::new(false)
    }

    /// Set whitespace normalization.
    pub fn with_normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    /// Set pragma line ids.
    pub fn with_pragma_lines(mut self, pragma_lines: bool) -> Self {
        self.use_pragma_lines = pragma_lines;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::sanitized()
    }
}

impl From<&RenderDefaults> for RenderOptions {
    fn from(defaults: &RenderDefaults) -> Self {
        Self {
            normalize_whitespace: defaults.normalize_whitespace,
            sanitize: defaults.sanitize,
            use_pragma_lines: defaults.use_pragma_lines,
        }
    }
}

// ============================================================================
// SourceInfo / RawDocument
// ============================================================================

/// Where a document came from, as reported by the host. Opaque to the
/// pipeline; copied into the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInfo {
    /// Physical path of the source file
    pub source_path: Option<String>,
    /// Path relative to the site or request root
    pub relative_path: Option<String>,
}

impl SourceInfo {
    /// Source info with both paths set.
    pub fn new(source_path: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            source_path: Some(source_path.into()),
            relative_path: Some(relative_path.into()),
        }
    }
}

/// A document to render. Never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    text: String,
    options: RenderOptions,
    source: SourceInfo,
}

impl RawDocument {
    /// A document with no source information.
    pub fn new(text: impl Into<String>, options: RenderOptions) -> Self {
        Self {
            text: text.into(),
            options,
            source: SourceInfo::default(),
        }
    }

    /// Attach source information.
    pub fn with_source(mut self, source: SourceInfo) -> Self {
        self.source = source;
        self
    }

    /// The Markdown text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Rendering switches.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Source information.
    pub fn source(&self) -> &SourceInfo {
        &self.source
    }
}

// ============================================================================
// DocumentModel
// ============================================================================

/// A rendered document, ready to hand to a page template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentModel {
    /// From the front matter `title:` field or the first `# heading`
    pub title: Option<String>,
    /// Converter output, sanitized when requested
    pub rendered_html: String,
    /// The Markdown exactly as supplied
    pub raw_markdown: String,
    /// Front matter block, `---` delimiters included
    pub front_matter: Option<String>,
    /// Physical path of the source file
    pub source_path: Option<String>,
    /// Path relative to the site or request root
    pub relative_path: Option<String>,
}

impl DocumentModel {
    /// An empty document carrying only source information.
    pub fn empty(source: SourceInfo) -> Self {
        Self {
            source_path: source.source_path,
            relative_path: source.relative_path,
            ..Self::default()
        }
    }

    /// Front matter with the delimiter lines removed, for display.
    ///
    /// Same result as [`FrontMatter::content`](crate::FrontMatter::content).
    pub fn front_matter_content(&self) -> Option<String> {
        self.front_matter.as_deref().map(block_content)
    }

    /// `true` when nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.rendered_html.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_constructors() {
        let options = RenderOptions::sanitized();
        assert!(options.sanitize);
        assert!(options.normalize_whitespace);
        assert!(!options.use_pragma_lines);
        assert!(!RenderOptions::unsanitized().sanitize);
        assert_eq!(RenderOptions::default(), RenderOptions::sanitized());
    }

    #[test]
    fn test_render_options_builders() {
        let options = RenderOptions::new(true)
            .with_normalize_whitespace(false)
            .with_pragma_lines(true);
        assert!(!options.normalize_whitespace);
        assert!(options.use_pragma_lines);
    }

    #[test]
    fn test_render_options_from_defaults() {
        let defaults = RenderDefaults {
            normalize_whitespace: false,
            sanitize: false,
            use_pragma_lines: true,
        };
        let options = RenderOptions::from(&defaults);
        assert!(!options.normalize_whitespace);
        assert!(!options.sanitize);
        assert!(options.use_pragma_lines);
    }

    #[test]
    fn test_raw_document_accessors() {
        let doc = RawDocument::new("# Hi", RenderOptions::sanitized())
            .with_source(SourceInfo::new("/srv/docs/hi.md", "/docs/hi.md"));
        assert_eq!(doc.text(), "# Hi");
        assert!(doc.options().sanitize);
        assert_eq!(doc.source().relative_path.as_deref(), Some("/docs/hi.md"));
    }

    #[test]
    fn test_empty_model_keeps_source() {
        let model = DocumentModel::empty(SourceInfo::new("/a.md", "a.md"));
        assert!(model.is_empty());
        assert_eq!(model.source_path.as_deref(), Some("/a.md"));
        assert!(model.title.is_none());
    }

    #[test]
    fn test_front_matter_content() {
        let model = DocumentModel {
            front_matter: Some("---\ntitle: T\ntags: [a]\n---".to_string()),
            ..DocumentModel::default()
        };
        assert_eq!(model.front_matter_content().unwrap(), "title: T\ntags: [a]");
        assert!(DocumentModel::default().front_matter_content().is_none());
    }

    #[test]
    fn test_front_matter_content_matches_extraction() {
        let text = "---\ntitle: T\nrule: ---\n---\nbody";
        let extracted = crate::frontmatter::extract(text);
        let block = extracted.front_matter().unwrap();
        let model = DocumentModel {
            front_matter: Some(block.raw_block().to_string()),
            ..DocumentModel::default()
        };
        assert_eq!(model.front_matter_content().unwrap(), block.content());
        assert_eq!(block.content(), "title: T\nrule: ---");
    }

    #[test]
    fn test_model_serializes() {
        let model = DocumentModel {
            title: Some("T".to_string()),
            rendered_html: "<p>x</p>".to_string(),
            ..DocumentModel::default()
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["rendered_html"], "<p>x</p>");
        assert!(json["front_matter"].is_null());
    }
}
