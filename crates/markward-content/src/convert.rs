//! Markdown to HTML conversion.
//!
//! The pipeline treats conversion as a black box behind [`MarkdownConverter`].
//! [`CmarkConverter`] is the built-in implementation on top of
//! `pulldown-cmark`, with the extensions selected in [`ConverterConfig`] plus
//! two post-processing features:
//!
//! - **Pragma lines**: block elements get `id="pragma-line-N"` (zero-based
//!   source line) so an editor preview can scroll in sync. Covered blocks are
//!   paragraphs, headings, block quotes, lists, list items, code blocks and
//!   thematic breaks. Tables, footnote definitions and raw HTML blocks are
//!   left without an id.
//! - **Font Awesome shorthand**: `@icon-name` becomes
//!   `<i class="fa fa-name"></i>`.
//!
//! Converters are built lazily and shared through a [`ConverterCache`], which
//! also supports swapping in a freshly built instance at runtime.
//!
//! # Example
//!
//! ```rust
//! use markward_content::convert::{CmarkConverter, MarkdownConverter};
//! use markward_core::ConverterConfig;
//!
//! let converter = CmarkConverter::new(ConverterConfig::default());
//! let html = converter.convert("# Hello\n\nWorld", false).unwrap();
//! assert_eq!(html, "<h1 id=\"hello\">Hello</h1>\n<p>World</p>\n");
//! ```

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, RwLock};

use markward_core::{ConverterConfig, Error, Result, SlugRegistry};
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

static FONT_AWESOME_ICON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@icon-([A-Za-z0-9_-]+)").expect("icon regex"));

// ============================================================================
// MarkdownConverter
// ============================================================================

/// A Markdown-to-HTML engine.
///
/// Implementations must be shareable across threads; one instance serves
/// every render until it is rebuilt.
pub trait MarkdownConverter: Send + Sync {
    /// Convert `markdown` to HTML.
    ///
    /// With `use_pragma_lines`, block elements carry `pragma-line-N` ids.
    /// Errors are passed to the caller unchanged.
    fn convert(&self, markdown: &str, use_pragma_lines: bool) -> Result<String>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

/// Id attribute value for a zero-based source line.
pub fn pragma_id(line: usize) -> String {
    format!("pragma-line-{line}")
}

// ============================================================================
// CmarkConverter
// ============================================================================

/// `pulldown-cmark` backed converter.
#[derive(Debug, Clone)]
pub struct CmarkConverter {
    config: ConverterConfig,
    options: Options,
}

impl CmarkConverter {
    /// Create a converter with the given extensions.
    pub fn new(config: ConverterConfig) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        if config.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if config.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if config.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if config.task_lists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if config.smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        Self { config, options }
    }

    /// The extension configuration.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Add pragma and slug ids to the event stream.
    fn annotate<'a>(
        &self,
        markdown: &str,
        events: impl Iterator<Item = (Event<'a>, Range<usize>)>,
        use_pragma_lines: bool,
    ) -> Vec<Event<'a>> {
        let lines = LineIndex::new(markdown);
        let mut slugs = SlugRegistry::new();
        let mut open_heading: Option<(usize, String)> = None;
        let mut out = Vec::new();

        for (event, range) in events {
            match event {
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    let id = id.or_else(|| {
                        use_pragma_lines
                            .then(|| CowStr::from(pragma_id(lines.line_of(range.start))))
                    });
                    if id.is_none() && self.config.auto_identifiers {
                        open_heading = Some((out.len(), String::new()));
                    }
                    out.push(Event::Start(Tag::Heading {
                        level,
                        id,
                        classes,
                        attrs,
                    }));
                }
                Event::Start(tag) if use_pragma_lines => {
                    let id = pragma_id(lines.line_of(range.start));
                    match pragma_start_tag(&tag, &id) {
                        Some(html) => out.push(Event::Html(html.into())),
                        None => out.push(Event::Start(tag)),
                    }
                }
                Event::Rule if use_pragma_lines => {
                    let id = pragma_id(lines.line_of(range.start));
                    out.push(Event::Html(format!("<hr id=\"{id}\" />\n").into()));
                }
                Event::Text(ref text) | Event::Code(ref text) => {
                    if let Some((_, heading)) = open_heading.as_mut() {
                        heading.push_str(text);
                    }
                    out.push(event);
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((index, text)) = open_heading.take()
                        && let Some(Event::Start(Tag::Heading { id, .. })) = out.get_mut(index)
                    {
                        *id = Some(slugs.unique(&text).into());
                    }
                    out.push(event);
                }
                other => out.push(other),
            }
        }

        out
    }
}

impl Default for CmarkConverter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl MarkdownConverter for CmarkConverter {
    fn convert(&self, markdown: &str, use_pragma_lines: bool) -> Result<String> {
        if markdown.is_empty() {
            return Ok(String::new());
        }

        let parser = Parser::new_ext(markdown, self.options).into_offset_iter();
        let events = self.annotate(markdown, parser, use_pragma_lines);

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());

        if self.config.font_awesome_icons {
            out = expand_font_awesome_icons(&out);
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "pulldown-cmark"
    }
}

/// Opening HTML for a block element carrying a pragma id, or `None` for
/// blocks whose rendering depends on writer state.
fn pragma_start_tag(tag: &Tag<'_>, id: &str) -> Option<String> {
    let html = match tag {
        Tag::Paragraph => format!("<p id=\"{id}\">"),
        Tag::BlockQuote(None) => format!("<blockquote id=\"{id}\">\n"),
        Tag::List(None) => format!("<ul id=\"{id}\">\n"),
        Tag::List(Some(1)) => format!("<ol id=\"{id}\">\n"),
        Tag::List(Some(start)) => format!("<ol id=\"{id}\" start=\"{start}\">\n"),
        Tag::Item => format!("<li id=\"{id}\">"),
        Tag::CodeBlock(kind) => {
            let lang = match kind {
                CodeBlockKind::Fenced(info) => info.split(' ').next().unwrap_or_default(),
                CodeBlockKind::Indented => "",
            };
            if lang.is_empty() {
                format!("<pre id=\"{id}\"><code>")
            } else {
                format!(
                    "<pre id=\"{id}\"><code class=\"language-{}\">",
                    escape_attribute(lang)
                )
            }
        }
        _ => return None,
    };
    Some(html)
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Replace `@icon-name` shorthands with Font Awesome `<i>` elements.
pub fn expand_font_awesome_icons(html: &str) -> String {
    FONT_AWESOME_ICON
        .replace_all(html, r#"<i class="fa fa-$1"></i>"#)
        .into_owned()
}

/// Maps byte offsets to zero-based line numbers.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset) - 1
    }
}

// ============================================================================
// ConverterCache
// ============================================================================

/// Builds a converter from configuration.
pub type ConverterFactory =
    dyn Fn(&ConverterConfig) -> Result<Arc<dyn MarkdownConverter>> + Send + Sync;

/// Lazily built, shared converter instance.
///
/// The first [`get`](Self::get) builds the converter under a write lock, so
/// concurrent first use builds it once. [`rebuild`](Self::rebuild) builds a
/// replacement outside the lock and swaps it in; renders already holding the
/// previous instance finish with it.
pub struct ConverterCache {
    config: ConverterConfig,
    factory: Box<ConverterFactory>,
    current: RwLock<Option<Arc<dyn MarkdownConverter>>>,
    builds: AtomicUsize,
}

impl ConverterCache {
    /// Cache for the built-in [`CmarkConverter`].
    pub fn new(config: ConverterConfig) -> Self {
        Self::with_factory(config, |config| {
            Ok(Arc::new(CmarkConverter::new(config.clone())) as Arc<dyn MarkdownConverter>)
        })
    }

    /// Cache for a custom converter factory.
    pub fn with_factory<F>(config: ConverterConfig, factory: F) -> Self
    where
        F: Fn(&ConverterConfig) -> Result<Arc<dyn MarkdownConverter>> + Send + Sync + 'static,
    {
        Self {
            config,
            factory: Box::new(factory),
            current: RwLock::new(None),
            builds: AtomicUsize::new(0),
        }
    }

    /// The shared converter, building it on first use.
    pub fn get(&self) -> Result<Arc<dyn MarkdownConverter>> {
        {
            let current = self.current.read().map_err(|e| lock_error(&e))?;
            if let Some(converter) = current.as_ref() {
                return Ok(Arc::clone(converter));
            }
        }

        let mut current = self.current.write().map_err(|e| lock_error(&e))?;
        if let Some(converter) = current.as_ref() {
            return Ok(Arc::clone(converter));
        }
        let converter = self.build()?;
        *current = Some(Arc::clone(&converter));
        Ok(converter)
    }

    /// Build a new converter and replace the shared one.
    ///
    /// On failure the previous instance stays in place.
    pub fn rebuild(&self) -> Result<Arc<dyn MarkdownConverter>> {
        let converter = self.build()?;
        let mut current = self.current.write().map_err(|e| lock_error(&e))?;
        *current = Some(Arc::clone(&converter));
        Ok(converter)
    }

    /// Whether a converter has been built yet.
    pub fn is_built(&self) -> bool {
        self.current
            .read()
            .map(|current| current.is_some())
            .unwrap_or(false)
    }

    /// Number of converters built so far.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    fn build(&self) -> Result<Arc<dyn MarkdownConverter>> {
        let converter = (self.factory)(&self.config)?;
        let builds = self.builds.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("Built {} converter (build #{builds})", converter.name());
        Ok(converter)
    }
}

impl std::fmt::Debug for ConverterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterCache")
            .field("config", &self.config)
            .field("built", &self.is_built())
            .field("builds", &self.build_count())
            .finish()
    }
}

fn lock_error(e: &dyn std::fmt::Display) -> Error {
    Error::conversion(format!("converter cache lock poisoned: {e}"))
}
