//! Best-effort HTML sanitization.
//!
//! Scrubs converter output of the most common script-injection vectors:
//!
//! 1. Blocked elements (`script`, `iframe`, `object`, `embed`, `form` by
//!    default) are removed together with their content.
//! 2. `javascript:` schemes in `href`, `src`, `dynsrc` and `lowsrc` values,
//!    plain or written with numeric character references, are replaced with
//!    `unsupported:`.
//! 3. Quoted `on*` event-handler attributes are removed.
//!
//! This is pattern matching over text, not an HTML parser. Markup the
//! patterns do not recognize passes through: unclosed blocked elements,
//! unquoted handler values, and schemes obfuscated in ways other than numeric
//! character references. Use a dedicated allowlist sanitizer when the input is
//! hostile rather than merely untrusted-by-default.
//!
//! # Example
//!
//! ```rust
//! use markward_content::sanitize::SanitizationRuleSet;
//!
//! let rules = SanitizationRuleSet::default_rules();
//! assert_eq!(rules.sanitize("<p>ok</p><script>alert(1)</script>"), "<p>ok</p>");
//! assert_eq!(
//!     rules.sanitize("<a href='javascript:alert(1)'>x</a>"),
//!     "<a href='unsupported:alert(1)'>x</a>"
//! );
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

use markward_core::{Error, Result, SanitizerConfig};
use regex::Regex;

/// Replacement for a neutralized script scheme.
pub const UNSUPPORTED_SCHEME: &str = "unsupported:";

const SCRIPT_SCHEME: &str = "javascript:";

/// A start tag. Quoted attribute values may contain `<` and `>`; a stray
/// quote with no partner is taken as a plain character.
static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[A-Za-z](?:[^<>"']|"[^"]*"|'[^']*'|["'])*>"#).expect("start tag regex")
});

/// A URI-bearing attribute up to the first character of its value.
static URI_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s(?:href|src|dynsrc|lowsrc)\s*=\s*["']?\s*"#).expect("URI attribute regex")
});

/// An `on*` event handler with a quoted value, including leading whitespace.
static EVENT_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on\w{4,12}\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("event attribute regex")
});

static DEFAULT_RULES: LazyLock<Arc<SanitizationRuleSet>> = LazyLock::new(|| {
    Arc::new(
        SanitizationRuleSet::new(SanitizerConfig::default_blocked_tags())
            .expect("default blocked tags are valid tag names"),
    )
});

// ============================================================================
// SanitizationRuleSet
// ============================================================================

/// Blocked tags and the matchers compiled from them.
///
/// Construction compiles one regex per blocked tag; the set is immutable
/// afterwards and cheap to share behind an [`Arc`].
#[derive(Debug, Clone)]
pub struct SanitizationRuleSet {
    blocked_tags: BTreeSet<String>,
    open_tag: Option<Regex>,
    close_tags: BTreeMap<String, Regex>,
}

impl SanitizationRuleSet {
    /// Compile a rule set for the given blocked tag names.
    ///
    /// Names are lowercased. A name that is empty or is not of the form
    /// `[a-z][a-z0-9-]*` yields [`Error::InvalidRule`].
    pub fn new<I, S>(blocked_tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags = BTreeSet::new();
        for tag in blocked_tags {
            let tag = tag.as_ref().trim().to_ascii_lowercase();
            validate_tag_name(&tag)?;
            tags.insert(tag);
        }

        let mut close_tags = BTreeMap::new();
        for tag in &tags {
            let close = Regex::new(&format!(r"(?i)</{}\s*>", regex::escape(tag)))
                .map_err(|e| Error::invalid_rule(tag.clone(), e.to_string()))?;
            close_tags.insert(tag.clone(), close);
        }

        let open_tag = if tags.is_empty() {
            None
        } else {
            let alternation = tags
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)<({alternation})\b");
            Some(Regex::new(&pattern).map_err(|e| Error::invalid_rule(alternation, e.to_string()))?)
        };

        log::debug!("Compiled sanitizer rules for {} blocked tags", tags.len());
        Ok(Self {
            blocked_tags: tags,
            open_tag,
            close_tags,
        })
    }

    /// Compile a rule set from configuration.
    pub fn from_config(config: &SanitizerConfig) -> Result<Self> {
        Self::new(&config.blocked_tags)
    }

    /// The process-wide rule set for the default blocked tags.
    pub fn default_rules() -> Arc<SanitizationRuleSet> {
        Arc::clone(&DEFAULT_RULES)
    }

    /// The shared default rules when `config` uses the default tags,
    /// otherwise a freshly compiled set.
    pub fn shared_for(config: &SanitizerConfig) -> Result<Arc<SanitizationRuleSet>> {
        if config.uses_default_tags() {
            Ok(Self::default_rules())
        } else {
            Ok(Arc::new(Self::from_config(config)?))
        }
    }

    /// Lowercased blocked tag names.
    pub fn blocked_tags(&self) -> &BTreeSet<String> {
        &self.blocked_tags
    }

    /// Sanitize `html`.
    ///
    /// All passes are repeated until the output no longer changes, so
    /// removing one construct cannot splice together another one. Every
    /// changing pass either deletes markup or rewrites a script scheme into
    /// one no pass matches again, so the loop ends.
    pub fn sanitize(&self, html: &str) -> String {
        let mut current = html.to_string();
        let mut passes = 1;
        loop {
            let next = self.sanitize_once(&current);
            if next == current {
                break;
            }
            current = next.into_owned();
            passes += 1;
        }
        if passes > 2 {
            log::debug!("Sanitizer output stable after {passes} passes");
        }
        current
    }

    fn sanitize_once<'a>(&self, html: &'a str) -> Cow<'a, str> {
        let stripped = self.remove_blocked_elements(html);
        let rewritten = match rewrite_start_tags(&stripped) {
            Cow::Borrowed(_) => None,
            Cow::Owned(s) => Some(s),
        };
        match rewritten {
            Some(s) => Cow::Owned(s),
            None => stripped,
        }
    }

    /// Remove every `<tag ...> ... </tag>` span of a blocked tag, ending at
    /// the first matching close tag. An open tag without a close tag is left
    /// in place.
    fn remove_blocked_elements<'a>(&self, html: &'a str) -> Cow<'a, str> {
        let Some(open_tag) = &self.open_tag else {
            return Cow::Borrowed(html);
        };

        let mut out = String::new();
        let mut copied = 0;
        let mut search = 0;

        while let Some(caps) = open_tag.captures_at(html, search) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let close = self
                .close_tags
                .get(&name.as_str().to_ascii_lowercase())
                .and_then(|re| re.find_at(html, whole.end()));

            match close {
                Some(close) => {
                    out.push_str(&html[copied..whole.start()]);
                    copied = close.end();
                    search = close.end();
                }
                None => {
                    log::debug!("Unclosed <{}> left in place", name.as_str());
                    search = whole.end();
                }
            }
        }

        if copied == 0 {
            return Cow::Borrowed(html);
        }
        out.push_str(&html[copied..]);
        Cow::Owned(out)
    }
}

impl Default for SanitizationRuleSet {
    fn default() -> Self {
        (*Self::default_rules()).clone()
    }
}

/// Sanitize `html` against `blocked_tags`, or the default tags when `None`.
///
/// Fails only when a custom tag name cannot be compiled into a matcher.
pub fn sanitize_html(html: &str, blocked_tags: Option<&BTreeSet<String>>) -> Result<String> {
    match blocked_tags {
        None => Ok(SanitizationRuleSet::default_rules().sanitize(html)),
        Some(tags) if *tags == SanitizerConfig::default_blocked_tags() => {
            Ok(SanitizationRuleSet::default_rules().sanitize(html))
        }
        Some(tags) => Ok(SanitizationRuleSet::new(tags)?.sanitize(html)),
    }
}

fn validate_tag_name(tag: &str) -> Result<()> {
    let mut chars = tag.chars();
    match chars.next() {
        None => Err(Error::invalid_rule(tag, "tag name is empty")),
        Some(first) if !first.is_ascii_alphabetic() => {
            Err(Error::invalid_rule(tag, "tag name must start with a letter"))
        }
        Some(_) if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-') => Err(
            Error::invalid_rule(tag, "tag name may only contain letters, digits and '-'"),
        ),
        Some(_) => Ok(()),
    }
}

// ============================================================================
// Attribute passes
// ============================================================================

/// Neutralize script URIs and drop event handlers inside every start tag.
fn rewrite_start_tags(html: &str) -> Cow<'_, str> {
    START_TAG.replace_all(html, |caps: &regex::Captures<'_>| {
        let tag = &caps[0];
        let tag = neutralize_script_uris(tag);
        EVENT_ATTRIBUTE.replace_all(&tag, "").into_owned()
    })
}

fn neutralize_script_uris(tag: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut copied = 0;

    for attr in URI_ATTRIBUTE.find_iter(tag) {
        if attr.start() < copied {
            continue;
        }
        if let Some(len) = script_scheme_len(&tag[attr.end()..]) {
            out.push_str(&tag[copied..attr.end()]);
            out.push_str(UNSUPPORTED_SCHEME);
            copied = attr.end() + len;
        }
    }

    if copied == 0 {
        return Cow::Borrowed(tag);
    }
    out.push_str(&tag[copied..]);
    Cow::Owned(out)
}

/// Byte length of a leading `javascript:` scheme in `value`, where each
/// character may be literal or a numeric character reference (`&#106;`,
/// `&#x6A;`, trailing `;` optional). Case-insensitive.
fn script_scheme_len(value: &str) -> Option<usize> {
    let mut pos = 0;
    for expected in SCRIPT_SCHEME.chars() {
        let rest = &value[pos..];
        let (c, len) = match decode_numeric_reference(rest) {
            Some(decoded) => decoded,
            None => {
                let c = rest.chars().next()?;
                (c, c.len_utf8())
            }
        };
        if !c.eq_ignore_ascii_case(&expected) {
            return None;
        }
        pos += len;
    }
    Some(pos)
}

/// Decode a numeric character reference at the start of `s`.
fn decode_numeric_reference(s: &str) -> Option<(char, usize)> {
    let body = s.strip_prefix("&#")?;
    let (radix, digits_at) = match body.chars().next() {
        Some('x' | 'X') => (16, 3),
        _ => (10, 2),
    };

    let digits = s[digits_at..]
        .chars()
        .take_while(|c| c.is_digit(radix))
        .count();
    if digits == 0 {
        return None;
    }

    let number = u32::from_str_radix(&s[digits_at..digits_at + digits], radix).ok()?;
    let c = char::from_u32(number)?;

    let mut len = digits_at + digits;
    if s[len..].starts_with(';') {
        len += 1;
    }
    Some((c, len))
}
