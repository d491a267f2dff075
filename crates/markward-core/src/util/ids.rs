//! Heading identifier utilities.
//!
//! Converts heading text into stable anchor ids in the style GitHub uses,
//! so links written against rendered READMEs keep working.

use std::collections::HashMap;

/// Convert heading text to a GitHub-style slug.
///
/// Performs the following transformations:
/// 1. Trims leading/trailing whitespace
/// 2. Converts to lowercase
/// 3. Drops punctuation other than `-` and `_`
/// 4. Replaces each remaining space with a hyphen
///
/// # Examples
///
/// ```
/// use markward_core::util::ids::slugify;
///
/// assert_eq!(slugify("My Title"), "my-title");
/// assert_eq!(slugify("What's new?"), "whats-new");
/// assert_eq!(slugify("snake_case stays"), "snake_case-stays");
/// ```
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Hands out unique slugs within one document.
///
/// The first occurrence of a slug is returned as-is; repeats get `-1`, `-2`,
/// and so on. Empty slugs become `section`.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugify `text` and make the result unique within this registry.
    pub fn unique(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }

        let Some(&last) = self.seen.get(&base) else {
            self.seen.insert(base.clone(), 0);
            return base;
        };

        let mut count = last;
        let candidate = loop {
            count += 1;
            let candidate = format!("{base}-{count}");
            if !self.seen.contains_key(&candidate) {
                break candidate;
            }
        };
        self.seen.insert(base, count);
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}
