//! Leading-indentation normalization.
//!
//! Markdown embedded in templates or source code usually carries the
//! indentation of its surroundings:
//!
//! ```text
//!         # Welcome
//!
//!         Some text.
//! ```
//!
//! Left alone, every line would be an indented code block. [`normalize`]
//! measures the indentation of the first non-empty line and removes that many
//! characters from every line.
//!
//! # Example
//!
//! ```rust
//! use markward_content::normalize::normalize;
//!
//! assert_eq!(normalize("    # Title\n    body"), "# Title\nbody\n");
//!
//! // Already flush-left text is returned untouched.
//! assert_eq!(normalize("# Title\n  body"), "# Title\n  body");
//! ```

use std::borrow::Cow;

/// Remove the indentation of the first non-empty line from every line.
///
/// - `\r\n` line endings are canonicalized to `\n` before measuring.
/// - Empty or whitespace-only text, or text whose first non-empty line has no
///   leading space/tab, is returned unchanged (borrowed).
/// - A line longer than the reference width `w` loses exactly `w` leading
///   characters; a line of `w` characters or fewer becomes empty.
/// - Every output line is terminated with `\n`.
pub fn normalize(text: &str) -> Cow<'_, str> {
    if text.trim().is_empty() {
        return Cow::Borrowed(text);
    }

    let canonical = text.replace("\r\n", "\n");
    let width = match canonical.split('\n').find(|line| !line.is_empty()) {
        Some(first) => indent_width(first),
        None => 0,
    };
    if width == 0 {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(canonical.len());
    for line in canonical.split('\n') {
        out.push_str(strip_prefix_chars(line, width));
        out.push('\n');
    }

    log::debug!("Normalized leading indentation of {width} characters");
    Cow::Owned(out)
}

/// Count of leading space and tab characters.
pub fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| matches!(c, ' ' | '\t')).count()
}

/// Drop `width` leading characters, or everything if the line is not longer.
fn strip_prefix_chars(line: &str, width: usize) -> &str {
    match line.char_indices().nth(width) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ------------------------------------------------------------------------
    // No-op cases
    // ------------------------------------------------------------------------

    #[test]
    fn test_empty_text() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_whitespace_only_text() {
        let text = "   \n\t\n  ";
        assert!(matches!(normalize(text), Cow::Borrowed(_)));
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_flush_left_unchanged() {
        let text = "# Title\n    indented code\n";
        assert!(matches!(normalize(text), Cow::Borrowed(_)));
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_flush_left_keeps_crlf() {
        let text = "line one\r\n  line two\r\n";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_leading_empty_lines_skipped() {
        let text = "\n\nflush\n    indented";
        assert_eq!(normalize(text), text);
    }

    // ------------------------------------------------------------------------
    // Stripping
    // ------------------------------------------------------------------------

    #[test]
    fn test_uniform_indent() {
        let text = "    # Title\n\n    Paragraph text.\n";
        assert_eq!(normalize(text), "# Title\n\nParagraph text.\n\n");
    }

    #[test]
    fn test_deeper_lines_keep_relative_indent() {
        let text = "  - item\n      code";
        assert_eq!(normalize(text), "- item\n    code\n");
    }

    #[test]
    fn test_clamp_short_lines() {
        assert_eq!(normalize("    a\n  b\nc"), "a\n\n\n");
    }

    #[test]
    fn test_line_longer_than_width_loses_exact_width() {
        // "  hello" is longer than 4 characters, so 4 characters go, not 2.
        assert_eq!(normalize("    a\n  hello"), "a\nllo\n");
    }

    #[test]
    fn test_crlf_canonicalized() {
        assert_eq!(normalize("  a\r\n  b\r\n"), "a\nb\n\n");
    }

    #[test]
    fn test_tabs_count_as_indent() {
        assert_eq!(normalize("\t\tx\n\t\ty"), "x\ny\n");
    }

    #[test]
    fn test_first_line_of_spaces_sets_width() {
        assert_eq!(normalize("   \n   abc"), "\nabc\n");
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(normalize("  日本\n  語x"), "日本\n語x\n");
    }

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("  \t x"), 4);
        assert_eq!(indent_width("x  "), 0);
        assert_eq!(indent_width(""), 0);
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    proptest! {
        #[test]
        fn test_flush_left_is_identity(first in "[a-z#*][a-z ]{0,20}", rest in "[ a-z\n]{0,80}") {
            let text = format!("{first}\n{rest}");
            prop_assert_eq!(normalize(&text), text.as_str());
        }

        #[test]
        fn test_normalized_lines_never_grow(text in "[ \ta-z\n]{0,120}") {
            let out = normalize(&text);
            if matches!(out, Cow::Owned(_)) {
                prop_assert!(out.ends_with('\n'));
                prop_assert_eq!(out.matches('\n').count(), text.matches('\n').count() + 1);
                for (before, after) in text.split('\n').zip(out.split('\n')) {
                    prop_assert!(after.len() <= before.len());
                }
            }
        }
    }
}
