//! End-to-end document rendering.
//!
//! [`DocumentPipeline`] chains the stages in a fixed order:
//!
//! 1. whitespace normalization (optional, [`crate::normalize`])
//! 2. front matter and title extraction ([`crate::frontmatter`])
//! 3. Markdown conversion of the full normalized text ([`crate::convert`])
//! 4. HTML sanitization (optional, [`crate::sanitize`])
//!
//! A pipeline holds no per-document state and is safe to share across
//! threads behind an `Arc`.
//!
//! # Example
//!
//! ```rust
//! use markward_content::{DocumentPipeline, RenderOptions};
//!
//! let pipeline = DocumentPipeline::new();
//! let doc = pipeline
//!     .render("---\ntitle: Notes\n---\n# Heading\n", &RenderOptions::sanitized())
//!     .unwrap();
//! assert_eq!(doc.title.as_deref(), Some("Notes"));
//! assert!(doc.rendered_html.contains("<h1"));
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use markward_core::{MarkwardConfig, Result};

use crate::convert::{ConverterCache, MarkdownConverter};
use crate::frontmatter::FrontMatterExtractor;
use crate::model::{DocumentModel, RawDocument, RenderOptions, SourceInfo};
use crate::normalize::normalize;
use crate::sanitize::SanitizationRuleSet;

/// Renders Markdown documents into [`DocumentModel`]s.
#[derive(Debug)]
pub struct DocumentPipeline {
    converter: ConverterCache,
    rules: Arc<SanitizationRuleSet>,
    extractor: FrontMatterExtractor,
}

impl DocumentPipeline {
    /// Pipeline with the built-in converter and default rules.
    pub fn new() -> Self {
        Self {
            converter: ConverterCache::new(Default::default()),
            rules: SanitizationRuleSet::default_rules(),
            extractor: FrontMatterExtractor::default(),
        }
    }

    /// Pipeline configured from a [`MarkwardConfig`].
    ///
    /// Fails when the configured blocked tags are invalid.
    pub fn from_config(config: &MarkwardConfig) -> Result<Self> {
        Ok(Self {
            converter: ConverterCache::new(config.converter.clone()),
            rules: SanitizationRuleSet::shared_for(&config.sanitizer)?,
            extractor: FrontMatterExtractor::new(config.front_matter),
        })
    }

    /// Replace the converter cache, e.g. to plug in a custom converter.
    pub fn with_converter(mut self, converter: ConverterCache) -> Self {
        self.converter = converter;
        self
    }

    /// Replace the sanitization rules.
    pub fn with_rules(mut self, rules: Arc<SanitizationRuleSet>) -> Self {
        self.rules = rules;
        self
    }

    /// The sanitization rules in use.
    pub fn rules(&self) -> &SanitizationRuleSet {
        &self.rules
    }

    /// The converter cache.
    pub fn converter(&self) -> &ConverterCache {
        &self.converter
    }

    /// Render `raw` with no source information.
    pub fn render(&self, raw: &str, options: &RenderOptions) -> Result<DocumentModel> {
        self.render_source(raw, options, SourceInfo::default())
    }

    /// Render a [`RawDocument`].
    pub fn render_document(&self, document: &RawDocument) -> Result<DocumentModel> {
        self.render_source(document.text(), document.options(), document.source().clone())
    }

    /// Render `raw`, copying `source` into the result.
    ///
    /// # Errors
    ///
    /// A conversion failure is returned as is; no partially rendered HTML is
    /// produced.
    pub fn render_source(
        &self,
        raw: &str,
        options: &RenderOptions,
        source: SourceInfo,
    ) -> Result<DocumentModel> {
        if raw.is_empty() {
            log::debug!("Empty document, skipping render");
            return Ok(DocumentModel::empty(source));
        }

        let text = if options.normalize_whitespace {
            normalize(raw)
        } else {
            Cow::Borrowed(raw)
        };

        let (front_matter, title, _) = self.extractor.extract(&text).into_parts();

        let converter = self.converter.get()?;
        let html = converter.convert(&text, options.use_pragma_lines)?;
        let rendered_html = if options.sanitize {
            self.rules.sanitize(&html)
        } else {
            html
        };

        log::debug!(
            "Rendered {} bytes of Markdown into {} bytes of HTML (title: {:?})",
            raw.len(),
            rendered_html.len(),
            title
        );

        Ok(DocumentModel {
            title,
            rendered_html,
            raw_markdown: raw.to_string(),
            front_matter: front_matter.map(|fm| fm.raw_block().to_string()),
            source_path: source.source_path,
            relative_path: source.relative_path,
        })
    }

    /// Render `raw` and return only the HTML.
    pub fn render_html(&self, raw: &str, options: &RenderOptions) -> Result<String> {
        Ok(self.render(raw, options)?.rendered_html)
    }

    /// Sanitize an HTML fragment with this pipeline's rules.
    pub fn sanitize(&self, html: &str) -> String {
        self.rules.sanitize(html)
    }

    /// Build a fresh converter and swap it in for subsequent renders.
    pub fn rebuild_converter(&self) -> Result<Arc<dyn MarkdownConverter>> {
        self.converter.rebuild()
    }
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new()
    }
}
