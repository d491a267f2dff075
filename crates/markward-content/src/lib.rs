//! Markdown preprocessing, conversion, and HTML sanitization.
//!
//! This crate turns raw Markdown into a [`DocumentModel`] a page template can
//! render: indentation is normalized, front matter and a title are pulled out,
//! the text is converted to HTML, and the HTML is scrubbed of scriptable
//! markup.
//!
//! # Modules
//!
//! - [`normalize`]: Leading-indentation normalization
//! - [`frontmatter`]: Front matter block and title extraction
//! - [`convert`]: The converter seam, the built-in converter, and its cache
//! - [`sanitize`]: Blacklist HTML sanitizer
//! - [`model`]: Render options and the rendered document
//! - [`pipeline`]: The stages chained together
//!
//! # Example
//!
//! ```rust
//! use markward_content::{DocumentPipeline, RenderOptions};
//!
//! let pipeline = DocumentPipeline::new();
//! let doc = pipeline
//!     .render("    # Hello\n\n    <script>x()</script>\n", &RenderOptions::sanitized())
//!     .unwrap();
//! assert_eq!(doc.title.as_deref(), Some("Hello"));
//! assert!(!doc.rendered_html.contains("<script"));
//! ```

pub mod convert;
pub mod frontmatter;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod sanitize;

// Re-export commonly used types
pub use convert::{CmarkConverter, ConverterCache, MarkdownConverter};
pub use frontmatter::{Extraction, FrontMatter, FrontMatterExtractor};
pub use model::{DocumentModel, RawDocument, RenderOptions, SourceInfo};
pub use normalize::normalize;
pub use pipeline::DocumentPipeline;
pub use sanitize::{SanitizationRuleSet, sanitize_html};
