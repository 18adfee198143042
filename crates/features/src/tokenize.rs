//! Word tokenization for the vectorizer.

use crate::stop_words::ENGLISH_STOP_WORDS;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Two or more word characters between word boundaries.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

/// Lower-casing word tokenizer with a stop-word list.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<&'static str>,
}

impl Tokenizer {
    /// Tokenizer that drops the standard English stop words.
    pub fn english() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Split `text` into lower-case tokens, in order, stop words removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.is_stop_word(token))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::english()
    }
}
