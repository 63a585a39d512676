use std::ops::Index;
use std::slice;

use serde::{Deserialize, Serialize};

/// Whitespace class used for every word boundary decision in the crate.
///
/// Matches the ECMAScript `\s` class: Unicode `White_Space` minus U+0085
/// (NEXT LINE), plus U+FEFF (ZERO WIDTH NO-BREAK SPACE).
pub fn is_separator(ch: char) -> bool {
    match ch {
        '\u{85}' => false,
        '\u{feff}' => true,
        _ => ch.is_whitespace(),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKind {
    Word,
    Separator,
}

impl SegmentKind {
    fn of(ch: char) -> Self {
        if is_separator(ch) {
            SegmentKind::Separator
        } else {
            SegmentKind::Word
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    pub fn is_word(&self) -> bool {
        self.kind == SegmentKind::Word
    }
}

/// Borrowing scanner over maximal word / separator runs of a string.
///
/// Yields `(kind, slice)` pairs in source order. Slices are never empty and
/// concatenate back to the scanned string.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Segments<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = (SegmentKind, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let kind = SegmentKind::of(first);
        let end = self
            .rest
            .char_indices()
            .find(|&(_, ch)| SegmentKind::of(ch) != kind)
            .map_or(self.rest.len(), |(idx, _)| idx);

        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some((kind, run))
    }
}

/// Ordered words of a [`Document`]; the addressing space for playback.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordList(Vec<String>);

impl WordList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl Index<usize> for WordList {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a WordList {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<String> for WordList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Immutable tokenization of one input string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn word_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_word()).count()
    }

    pub fn words(&self) -> WordList {
        self.segments
            .iter()
            .filter(|s| s.is_word())
            .map(|s| s.text.clone())
            .collect()
    }

    /// Reassembles the source text from its segments.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Splits `text` into alternating maximal word / separator segments.
pub fn tokenize(text: &str) -> Document {
    let segments = Segments::new(text)
        .map(|(kind, run)| Segment {
            kind,
            text: run.to_string(),
        })
        .collect();

    Document { segments }
}
