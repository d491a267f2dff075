//! Page templates.
//!
//! A template is plain text with `{{name}}` placeholders:
//!
//! | Placeholder          | Value                                  |
//! |----------------------|----------------------------------------|
//! | `{{title}}`          | document title, HTML-escaped           |
//! | `{{content}}`        | rendered HTML, inserted as is          |
//! | `{{front_matter}}`   | front matter without delimiters, escaped |
//! | `{{relative_path}}`  | path as given on the command line, escaped |
//!
//! Substitution is a single pass, so placeholder text inside the document
//! itself is never expanded. Unknown placeholders are left untouched.

use std::path::Path;
use std::sync::LazyLock;

use markward_content::DocumentModel;
use markward_core::{Error, Result};
use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").expect("placeholder regex")
});

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{title}}</title>
</head>
<body>
{{content}}
</body>
</html>
"#;

/// A loaded page template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    source: String,
}

impl PageTemplate {
    /// Wrap template text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read a template file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        tracing::debug!(path = %path.display(), "Loaded page template");
        Ok(Self::new(source))
    }

    /// The template at `path`, or the built-in one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Fill the placeholders from `doc`.
    pub fn render(&self, doc: &DocumentModel) -> String {
        PLACEHOLDER
            .replace_all(&self.source, |caps: &Captures<'_>| match &caps[1] {
                "title" => escape_html(doc.title.as_deref().unwrap_or_default()),
                "content" => doc.rendered_html.clone(),
                "front_matter" => escape_html(&doc.front_matter_content().unwrap_or_default()),
                "relative_path" => escape_html(doc.relative_path.as_deref().unwrap_or_default()),
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn doc() -> DocumentModel {
        DocumentModel {
            title: Some("Fish & <Chips>".to_string()),
            rendered_html: "<p>{{title}}</p>".to_string(),
            front_matter: Some("---\ntitle: x\n---".to_string()),
            relative_path: Some("menu.md".to_string()),
            ..DocumentModel::default()
        }
    }

    #[test]
    fn test_default_template() {
        let page = PageTemplate::default().render(&doc());
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Fish &amp; &lt;Chips&gt;</title>"));
        assert!(page.contains("<body>\n<p>{{title}}</p>\n</body>"));
    }

    #[test]
    fn test_content_placeholders_not_expanded() {
        let page = PageTemplate::new("{{content}}|{{title}}").render(&doc());
        assert_eq!(page, "<p>{{title}}</p>|Fish &amp; &lt;Chips&gt;");
    }

    #[test]
    fn test_all_placeholders() {
        let page = PageTemplate::new("{{ relative_path }}\n{{front_matter}}").render(&doc());
        assert_eq!(page, "menu.md\ntitle: x");
    }

    #[test]
    fn test_unknown_placeholder_kept() {
        let page = PageTemplate::new("{{author}} {{title}}").render(&DocumentModel::default());
        assert_eq!(page, "{{author}} ");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<h1>{{title}}</h1>").unwrap();

        let template = PageTemplate::load(Some(&path)).unwrap();
        assert_eq!(template.render(&doc()), "<h1>Fish &amp; &lt;Chips&gt;</h1>");
    }

    #[test]
    fn test_from_missing_file() {
        let err = PageTemplate::from_file(Path::new("/nonexistent/page.html")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/page.html"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a"b'c"#), "a&quot;b&#39;c");
        assert_eq!(escape_html("plain"), "plain");
    }
}
