use std::borrow::Cow;

use super::algorithm::{is_separator, SegmentKind, Segments};

/// Result of applying the word budget to a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation<'a> {
    pub text: Cow<'a, str>,
    pub was_truncated: bool,
}

/// Plain whitespace-split word count.
///
/// Kept separate from [`super::tokenize`] so the truncation threshold uses the
/// same simple count the editor displays.
pub fn count_words(text: &str) -> usize {
    text.trim_matches(is_separator)
        .split(is_separator)
        .filter(|piece| !piece.is_empty())
        .count()
}

/// Cuts `text` down to at most `limit` words without rewriting any character.
///
/// The cut lands right after the `limit`-th word, extended over the whitespace
/// run that immediately follows it in the source. Text within budget is
/// returned borrowed.
pub fn truncate(text: &str, limit: usize) -> Truncation<'_> {
    if count_words(text) <= limit {
        return Truncation {
            text: Cow::Borrowed(text),
            was_truncated: false,
        };
    }

    let mut emitted_words = 0usize;
    let mut cut = 0usize;
    let mut segments = Segments::new(text).peekable();

    while emitted_words < limit {
        let Some((kind, run)) = segments.next() else {
            break;
        };
        cut += run.len();
        if kind == SegmentKind::Word {
            emitted_words += 1;
        }
    }

    if let Some((SegmentKind::Separator, run)) = segments.peek() {
        cut += run.len();
    }

    Truncation {
        text: Cow::Borrowed(&text[..cut]),
        was_truncated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::tokenize;

    #[test]
    fn counts_ignore_surrounding_and_repeated_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t "), 0);
        assert_eq!(count_words("one"), 1);
        assert_eq!(count_words("  one  two\n\nthree  "), 3);
    }

    #[test]
    fn within_budget_is_borrowed_unchanged() {
        let result = truncate("one two three", 2000);
        assert!(!result.was_truncated);
        assert!(matches!(result.text, Cow::Borrowed("one two three")));
    }

    #[test]
    fn exactly_at_budget_is_not_truncated() {
        let result = truncate("a b c", 3);
        assert!(!result.was_truncated);
        assert_eq!(result.text, "a b c");
    }

    #[test]
    fn keeps_the_whitespace_run_after_the_last_word() {
        let result = truncate("one two\n\n  three four", 2);
        assert!(result.was_truncated);
        assert_eq!(result.text, "one two\n\n  ");
    }

    #[test]
    fn leading_whitespace_is_preserved() {
        let result = truncate("\n  alpha beta gamma", 1);
        assert_eq!(result.text, "\n  alpha ");
        assert_eq!(count_words(&result.text), 1);
    }

    #[test]
    fn zero_budget_keeps_only_leading_whitespace() {
        assert_eq!(truncate("  a b", 0).text, "  ");
        assert_eq!(truncate("a b", 0).text, "");
    }

    #[test]
    fn simple_count_agrees_with_tokenizer() {
        let samples = [
            "",
            "single",
            "  padded  words \n",
            "tabs\tand\r\nnewlines",
            "nbsp\u{a0}split and\u{2003}em space",
            "bom\u{feff}split",
            "next\u{85}line stays joined",
            "punctuation, dashes - and... dots",
        ];

        for sample in samples {
            assert_eq!(
                count_words(sample),
                tokenize(sample).word_count(),
                "counts disagree for {sample:?}"
            );
        }
    }
}
