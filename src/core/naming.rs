//! core::naming
//!
//! Alias text rules: cleaning, character-safe truncation and suffixing.
//!
//! All lengths here are counted in `char`s, but cuts only land on extended
//! grapheme cluster boundaries. A multi-byte character is never split and a
//! combining mark is never separated from its base.

use unicode_segmentation::UnicodeSegmentation;

/// Minimum number of characters kept in front of a word-safe cut.
const MIN_WORDSAFE_LENGTH: usize = 1;

/// Whether `c` is a place a word-safe truncation may cut before.
fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation()
}

/// Truncate to at most `max_chars` characters without splitting a grapheme.
///
/// # Example
///
/// ```
/// use domain_alias::core::naming::truncate_chars;
///
/// assert_eq!(truncate_chars("/héllo", 3), "/hé");
/// assert_eq!(truncate_chars("/a", 10), "/a");
/// // "e" plus a combining acute accent stays whole or goes whole
/// assert_eq!(truncate_chars("/e\u{301}x", 2), "/");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    let mut kept = 0;
    for (byte_idx, grapheme) in text.grapheme_indices(true) {
        kept += grapheme.chars().count();
        if kept > max_chars {
            return &text[..byte_idx];
        }
    }
    text
}

/// Truncate to at most `max_chars` characters, preferring a word boundary.
///
/// When the text is too long, the cut is placed before the last whitespace
/// or ASCII punctuation grapheme that still leaves at least one character
/// and at most `max_chars`. Without such a boundary the text is cut hard at
/// the last grapheme boundary within `max_chars`.
///
/// # Example
///
/// ```
/// use domain_alias::core::naming::truncate_wordsafe;
///
/// assert_eq!(truncate_wordsafe("/about-our-company", 12), "/about-our");
/// assert_eq!(truncate_wordsafe("/aboutourcompany", 8), "/aboutou");
/// assert_eq!(truncate_wordsafe("/short", 50), "/short");
/// ```
pub fn truncate_wordsafe(text: &str, max_chars: usize) -> &str {
    if text.chars().count() <= max_chars {
        return text;
    }

    let mut chars_before = 0;
    let mut cut = None;
    for (byte_idx, grapheme) in text.grapheme_indices(true) {
        if chars_before > max_chars {
            break;
        }
        if chars_before >= MIN_WORDSAFE_LENGTH && grapheme.starts_with(is_word_boundary) {
            cut = Some(byte_idx);
        }
        chars_before += grapheme.chars().count();
    }

    match cut {
        Some(byte_idx) => &text[..byte_idx],
        None => truncate_chars(text, max_chars),
    }
}

/// Build the `counter`-th suffixed variant of `original`.
///
/// The base is truncated so that base plus `separator` plus `counter` fits
/// in `max_chars`. Returns `None` when nothing of the base would survive.
///
/// # Example
///
/// ```
/// use domain_alias::core::naming::suffixed;
///
/// assert_eq!(suffixed("/contact", "-", 0, 100).as_deref(), Some("/contact-0"));
/// assert_eq!(suffixed("/contact", "-", 12, 8).as_deref(), Some("/cont-12"));
/// assert_eq!(suffixed("/contact", "-", 0, 2), None);
/// ```
pub fn suffixed(original: &str, separator: &str, counter: u32, max_chars: usize) -> Option<String> {
    let suffix = format!("{separator}{counter}");
    let keep = max_chars.checked_sub(suffix.chars().count())?;
    let base = truncate_wordsafe(original, keep);
    if base.is_empty() {
        return None;
    }
    Some(format!("{base}{suffix}"))
}

/// Normalise a raw alias string.
///
/// - Surrounding whitespace is trimmed
/// - Runs of `/` collapse to one
/// - A leading `/` is added
/// - The result is truncated word-safe to `max_chars`
/// - Trailing `/` and whitespace left by truncation are dropped
///
/// An input with no path content yields an empty string.
///
/// # Example
///
/// ```
/// use domain_alias::core::naming::clean_alias;
///
/// assert_eq!(clean_alias("  blog//post/ ", 100), "/blog/post");
/// assert_eq!(clean_alias("///", 100), "");
/// ```
pub fn clean_alias(raw: &str, max_chars: usize) -> String {
    let collapsed = raw
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if collapsed.is_empty() {
        return String::new();
    }

    let rooted = format!("/{collapsed}");
    let truncated = truncate_wordsafe(&rooted, max_chars)
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace());
    truncated.to_string()
}
