//! Front matter and title extraction.
//!
//! Front matter is a metadata block at the very start of a document,
//! delimited by `---` lines:
//!
//! ```markdown
//! ---
//! title: My Document
//! tags: [rust, markdown]
//! ---
//!
//! # Document Content
//! ```
//!
//! The block is kept as opaque text; only a `title:` line is read out of it.
//! When the block has no title, the first `# heading` among the opening
//! lines of the document is used instead. The block's own lines count
//! toward that window and are searched too.
//!
//! Both searches are bounded ([`FrontMatterLimits`]) since front matter only
//! ever sits at the start of a document.
//!
//! # Usage
//!
//! ```rust
//! use markward_content::frontmatter::extract;
//!
//! let result = extract("---\ntitle: Hello World\n---\nBody text");
//! assert_eq!(result.title(), Some("Hello World"));
//! assert_eq!(result.front_matter().unwrap().content(), "title: Hello World");
//! assert_eq!(result.body(), "Body text");
//!
//! let result = extract("# My Title\n\nbody");
//! assert!(result.front_matter().is_none());
//! assert_eq!(result.title(), Some("My Title"));
//! ```

use markward_core::FrontMatterLimits;

/// Opening and closing delimiter of a front matter block.
pub const DELIMITER: &str = "---";

// ============================================================================
// FrontMatter
// ============================================================================

/// A front matter block, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    raw_block: String,
}

impl FrontMatter {
    fn new(raw_block: impl Into<String>) -> Self {
        Self {
            raw_block: raw_block.into(),
        }
    }

    /// The block exactly as it appeared, `---` lines included.
    pub fn raw_block(&self) -> &str {
        &self.raw_block
    }

    /// The block without its delimiter lines, trimmed.
    pub fn content(&self) -> String {
        block_content(&self.raw_block)
    }

    /// Value of a top-level `key: value` line, trimmed.
    ///
    /// This is a line match, not YAML: nested keys, multi-line values and
    /// quoting are not interpreted.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.lines()
            .filter_map(|line| line.strip_prefix(key)?.strip_prefix(':'))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    /// The `title:` field, if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.field("title")
    }

    fn lines(&self) -> impl Iterator<Item = &str> {
        self.raw_block.lines()
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Result of scanning a document for front matter and a title.
#[derive(Debug, Clone)]
pub struct Extraction<'a> {
    front_matter: Option<FrontMatter>,
    title: Option<String>,
    body: &'a str,
}

impl<'a> Extraction<'a> {
    /// The front matter block, if one was found and closed in time.
    pub fn front_matter(&self) -> Option<&FrontMatter> {
        self.front_matter.as_ref()
    }

    /// The resolved document title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Text after the front matter block, or the whole text without one.
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Split into owned parts.
    pub fn into_parts(self) -> (Option<FrontMatter>, Option<String>, &'a str) {
        (self.front_matter, self.title, self.body)
    }
}

/// Front matter and title extractor with configurable scan windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontMatterExtractor {
    limits: FrontMatterLimits,
}

impl FrontMatterExtractor {
    /// Create an extractor with the given scan windows.
    pub fn new(limits: FrontMatterLimits) -> Self {
        Self { limits }
    }

    /// The scan windows in use.
    pub fn limits(&self) -> FrontMatterLimits {
        self.limits
    }

    /// Extract front matter and title from `text`.
    ///
    /// # Behavior
    ///
    /// - Text not starting with `---`: no front matter, heading fallback only.
    /// - Opening `---` without a closing `---` line inside the block window:
    ///   no front matter (logged at debug), heading fallback only.
    /// - A `title:` line in the block wins over any heading.
    pub fn extract<'a>(&self, text: &'a str) -> Extraction<'a> {
        let window: Vec<Line<'a>> = lines_with_offsets(text)
            .take(self.limits.block_scan_lines)
            .collect();

        let mut front_matter = None;
        let mut body = text;

        if text.starts_with(DELIMITER) {
            let closing = window
                .iter()
                .skip(1)
                .find(|line| line.text.trim_end() == DELIMITER);

            match closing {
                Some(line) => {
                    front_matter = Some(FrontMatter::new(&text[..line.end]));
                    body = &text[line.next..];
                }
                None => log::debug!(
                    "Front matter opening delimiter found but no closing delimiter within {} lines",
                    self.limits.block_scan_lines
                ),
            }
        }

        let title = front_matter
            .as_ref()
            .and_then(|fm| fm.title())
            .map(String::from)
            .or_else(|| {
                window
                    .iter()
                    .take(self.limits.heading_scan_lines)
                    .find_map(|line| heading_title(line.text))
            });

        Extraction {
            front_matter,
            title,
            body,
        }
    }
}

/// A raw front matter block without its first and last lines, trimmed.
pub(crate) fn block_content(raw_block: &str) -> String {
    let mut lines: Vec<&str> = raw_block.lines().collect();
    if !lines.is_empty() {
        lines.remove(0);
    }
    lines.pop();
    lines.join("\n").trim().to_string()
}

/// Extract with the default scan windows.
pub fn extract(text: &str) -> Extraction<'_> {
    FrontMatterExtractor::default().extract(text)
}

/// Title of a level-one `# heading` line, if the line is one.
fn heading_title(line: &str) -> Option<String> {
    if !line.trim_start().starts_with("# ") {
        return None;
    }
    let title = line.trim_start_matches([' ', '\t', '#']).trim_end();
    (!title.is_empty()).then(|| title.to_string())
}

/// A line without its terminator, plus byte offsets into the source.
struct Line<'a> {
    text: &'a str,
    /// End of the line content, before `\r\n` / `\n`.
    end: usize,
    /// Start of the following line.
    next: usize,
}

fn lines_with_offsets(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut start = 0;
    text.split_inclusive('\n').map(move |segment| {
        let content = segment.trim_end_matches('\n').trim_end_matches('\r');
        let line = Line {
            text: content,
            end: start + content.len(),
            next: start + segment.len(),
        };
        start = line.next;
        line
    })
}

// ============================================================================
// Tests
// ============================================================================
