//! String helpers: tokenizing, wildcard matching, width-aware truncation.
//!
//! # Invariants
//!
//! 1. **split drops noise**: tokens are trimmed and empty tokens are
//!    discarded, so `split` never yields `""` and never yields a token with
//!    leading or trailing whitespace.
//! 2. **split preserves order**: surviving tokens appear in their original
//!    left-to-right order.
//! 3. **wildcard_match is iterative**: `*` backtracking uses a saved
//!    position, not recursion, so pathological patterns cannot overflow the
//!    stack.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Split `input` on `sep`, trimming each token and dropping empty ones.
///
/// ```
/// use keel_util::strings::split;
///
/// assert_eq!(split(",,one, ,two,,", ','), vec!["one", "two"]);
/// ```
#[must_use]
pub fn split(input: &str, sep: char) -> Vec<&str> {
    input
        .split(sep)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Join items with a separator. The inverse-ish of [`split`] for clean
/// token lists.
#[must_use]
pub fn join<I, S>(items: I, sep: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(item.as_ref());
    }
    out
}

/// Whether the string is empty or all-whitespace.
#[must_use]
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

/// Glob-style matching: `*` matches any run (including empty), `?` matches
/// exactly one character. Case-sensitive.
///
/// ```
/// use keel_util::strings::wildcard_match;
///
/// assert!(wildcard_match("*.png", "logo.png"));
/// assert!(wildcard_match("msg_??.txt", "msg_en.txt"));
/// assert!(!wildcard_match("*.png", "logo.jpg"));
/// ```
#[must_use]
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();

    let mut p = 0; // position in pattern
    let mut t = 0; // position in text
    let mut star: Option<usize> = None; // pattern index after last '*'
    let mut mark = 0; // text index the last '*' is currently bound to

    while t < txt.len() {
        if p < pat.len() && (pat[p] == '?' || pat[p] == txt[t]) {
            p += 1;
            t += 1;
        } else if p < pat.len() && pat[p] == '*' {
            star = Some(p + 1);
            mark = t;
            p += 1;
        } else if let Some(resume) = star {
            // Widen the last '*' by one character and retry.
            p = resume;
            mark += 1;
            t = mark;
        } else {
            return false;
        }
    }

    // Only trailing '*'s may remain.
    pat[p..].iter().all(|&c| c == '*')
}

/// Truncate to `max_width` display columns, appending `…` when truncated.
///
/// Grapheme-aware: never cuts inside a grapheme cluster. A `max_width` of
/// zero yields the empty string.
#[must_use]
pub fn ellipsize(input: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(input) <= max_width {
        return Cow::Borrowed(input);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // Reserve one column for the ellipsis.
    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in input.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('…');
    Cow::Owned(out)
}

/// Longest common prefix of two strings, on char boundaries.
#[must_use]
pub fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let mut end = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        end += ca.len_utf8();
    }
    &a[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_drops_empty_and_trims() {
        assert_eq!(split(",,one, ,two,,", ','), vec!["one", "two"]);
        assert_eq!(split("a;b; c ;", ';'), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_of_blank_is_empty() {
        assert!(split("", ',').is_empty());
        assert!(split(", , ,", ',').is_empty());
    }

    #[test]
    fn join_inserts_separator_between() {
        assert_eq!(join(["a", "b", "c"], ", "), "a, b, c");
        assert_eq!(join(Vec::<&str>::new(), ","), "");
        assert_eq!(join(["solo"], ","), "solo");
    }

    #[test]
    fn wildcard_literal_and_question() {
        assert!(wildcard_match("abc", "abc"));
        assert!(!wildcard_match("abc", "abd"));
        assert!(wildcard_match("a?c", "abc"));
        assert!(!wildcard_match("a?c", "ac"));
    }

    #[test]
    fn wildcard_star_runs() {
        assert!(wildcard_match("*", ""));
        assert!(wildcard_match("*", "anything"));
        assert!(wildcard_match("*.png", "logo.png"));
        assert!(!wildcard_match("*.png", "logo.png.bak"));
        assert!(wildcard_match("a*b*c", "a-x-b-y-c"));
        assert!(!wildcard_match("a*b*c", "a-x-c"));
    }

    #[test]
    fn wildcard_star_backtracks() {
        // First '*' must give back characters for the suffix to match.
        assert!(wildcard_match("*ab", "aab"));
        assert!(wildcard_match("*aab", "aaab"));
    }

    #[test]
    fn ellipsize_short_input_is_borrowed() {
        assert_eq!(ellipsize("hello", 10), "hello");
        assert!(matches!(ellipsize("hello", 5), Cow::Borrowed(_)));
    }

    #[test]
    fn ellipsize_truncates_with_ellipsis() {
        assert_eq!(ellipsize("hello world", 6), "hello…");
        assert_eq!(ellipsize("abc", 0), "");
    }

    #[test]
    fn ellipsize_respects_wide_chars() {
        // Each CJK char is two columns; budget of 3 fits one char + ellipsis.
        assert_eq!(ellipsize("日本語", 3), "日…");
    }

    #[test]
    fn common_prefix_on_char_boundary() {
        assert_eq!(common_prefix("config.xml", "config.properties"), "config.");
        assert_eq!(common_prefix("abc", "xyz"), "");
        assert_eq!(common_prefix("日本語", "日本酒"), "日本");
    }
}
