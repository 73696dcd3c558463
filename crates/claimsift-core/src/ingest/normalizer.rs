use regex::Regex;
use std::sync::LazyLock;

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("blank line pattern cannot fail"));
static TAB_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t+").expect("tab pattern cannot fail"));

/// Canonicalizes whitespace left behind by PDF text extraction.
///
/// Non-breaking spaces become plain spaces, runs of blank lines collapse to a
/// single paragraph break, tab runs become one space, and the result is
/// trimmed.
pub fn normalize_text(raw: &str) -> String {
    let text = raw.replace('\u{a0}', " ");
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    let text = TAB_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NBSP: char = '\u{a0}';

    #[test]
    fn test_replaces_non_breaking_spaces() {
        assert_eq!(normalize_text("a\u{a0}b\u{a0}\u{a0}c"), "a b  c");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(normalize_text("one\n\n\n\ntwo\nthree"), "one\n\ntwo\nthree");
    }

    #[test]
    fn test_collapses_tabs() {
        assert_eq!(normalize_text("key\t\t\tvalue\tx"), "key value x");
    }

    #[test]
    fn test_trims() {
        assert_eq!(normalize_text("\n\n  body \t\n"), "body");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \u{a0}\t "), "");
    }

    proptest! {
        #[test]
        fn prop_no_nbsp_or_triple_newline(raw in "[a-z \t\n\u{a0}]{0,200}") {
            let out = normalize_text(&raw);
            prop_assert!(!out.contains(NBSP), "non-breaking space survived in {:?}", out);
            prop_assert!(!out.contains("\n\n\n"), "blank line run survived in {:?}", out);
            prop_assert!(!out.contains('\t'), "tab survived in {:?}", out);
            prop_assert_eq!(out.trim(), out.as_str());
        }

        #[test]
        fn prop_idempotent(raw in "[a-z \t\n\u{a0}]{0,200}") {
            let once = normalize_text(&raw);
            prop_assert_eq!(normalize_text(&once), once);
        }
    }
}
