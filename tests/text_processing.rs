use speedread_lib::{
    calculate_reading_time, count_words, tokenize, truncate, SegmentKind, TextLimits,
};

/// Deterministic text with `words` words and mixed separator runs.
fn sample_text(words: usize) -> String {
    let separators = [" ", "  ", "\n", "\t", " \n\n ", "\u{a0}"];
    let mut text = String::from("  ");
    for i in 0..words {
        text.push_str(&format!("word{i}"));
        text.push_str(separators[i % separators.len()]);
    }
    text
}

#[test]
fn short_text_is_left_alone() {
    let result = truncate("one two three", TextLimits::default().word_limit);
    assert!(!result.was_truncated);
    assert_eq!(result.text, "one two three");
}

#[test]
fn one_word_over_the_limit_is_cut_to_the_limit() {
    let limit = TextLimits::default().word_limit;
    let text = sample_text(limit + 1);
    assert_eq!(count_words(&text), limit + 1);

    let result = truncate(&text, limit);
    assert!(result.was_truncated);
    assert_eq!(count_words(&result.text), limit);
    assert!(text.starts_with(result.text.as_ref()));

    // The kept tail is exactly the whitespace run after the last kept word.
    let last_word = format!("word{}", limit - 1);
    let tail_start = result.text.rfind(&last_word).unwrap() + last_word.len();
    let tail = &result.text[tail_start..];
    assert!(!tail.is_empty());
    assert!(tail.chars().all(char::is_whitespace));
    assert!(text[result.text.len()..].starts_with(&format!("word{limit}")));
}

#[test]
fn truncation_never_rewrites_the_prefix() {
    for words in [1, 5, 17, 64] {
        let text = sample_text(words);
        for limit in 0..words {
            let result = truncate(&text, limit);
            assert!(result.was_truncated);
            assert!(text.starts_with(result.text.as_ref()));
            assert_eq!(count_words(&result.text), limit);
        }
        let whole = truncate(&text, words);
        assert!(!whole.was_truncated);
        assert_eq!(whole.text, text.as_str());
    }
}

#[test]
fn tokenize_round_trips_and_counts_agree() {
    for words in [0, 1, 2, 9, 40] {
        let text = sample_text(words);
        let document = tokenize(&text);
        assert_eq!(document.text(), text);
        assert_eq!(document.words().len(), words);
        assert_eq!(count_words(&text), document.word_count());
        assert_eq!(document.segments().first().map(|s| s.kind), {
            if text.is_empty() {
                None
            } else {
                Some(SegmentKind::Separator)
            }
        });
    }
}

#[test]
fn reading_time_examples() {
    assert_eq!(calculate_reading_time(120, 60), "00:02:00");
    assert_eq!(calculate_reading_time(120, 0), "00:00:00");
    assert_eq!(calculate_reading_time(9_000, 30), "05:00:00");
}
