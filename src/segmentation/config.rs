use serde::{Deserialize, Serialize};

/// Word budgets applied to the editing buffer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextLimits {
    /// Maximum words kept in the buffer; extra words are cut on input.
    pub word_limit: usize,

    /// A reading session refuses to start below this many words.
    pub min_words_for_start: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            word_limit: 2000,
            min_words_for_start: 10,
        }
    }
}
