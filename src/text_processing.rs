//! # Text Processing Module
//!
//! ## Purpose
//! Text normalization helpers and keyword extraction for ruling documents:
//! accent folding for exact-match comparison, title casing for chamber names,
//! and frequency-ranked salient-term extraction.
//!
//! ## Input/Output Specification
//! - **Input**: Raw ruling text, strings to normalize
//! - **Output**: Folded/cased strings, frequency-ranked keyword lists
//! - **Determinism**: Identical input always yields identical output;
//!   frequency ties keep first-encountered order

use std::collections::{HashMap, HashSet};

/// Normalize a string for accent- and case-insensitive comparison.
///
/// Lowercases the input and maps each accented vowel and the cedilla to its
/// unaccented base letter, so that e.g. "NÃO CONHECIDO" and "nao conhecido"
/// compare equal.
pub fn fold_accents(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ã' | 'â' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'õ' | 'ô' => 'o',
            'ú' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Title-case a phrase: uppercase the first letter of each word, lowercase
/// the rest. Used to normalize matched chamber names.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

/// Frequency-ranked keyword extraction over ruling text
pub struct KeywordExtractor {
    stopwords: HashSet<&'static str>,
    min_token_chars: usize,
}

impl KeywordExtractor {
    /// Create a new extractor with the fixed Portuguese legal stopword set
    pub fn new() -> Self {
        let stopwords = [
            "de", "da", "do", "dos", "das", "a", "o", "e", "que", "em", "para", "com", "por",
            "no", "na", "ao", "à", "os", "as", "um", "uma", "se", "foi", "ser", "ter", "está",
            "são", "pelo", "pela", "pelos", "pelas", "mais", "como", "ou", "não", "sua", "seu",
            "seus", "suas",
        ]
        .into_iter()
        .collect();

        Self {
            stopwords,
            min_token_chars: 4,
        }
    }

    /// Extract up to `limit` keywords, most frequent first.
    ///
    /// Punctuation is stripped, tokens are lowercased, tokens shorter than
    /// four characters or in the stopword set are discarded. Frequency ties
    /// keep first-encountered order.
    pub fn extract(&self, text: &str, limit: usize) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '_' {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        // (count, first-seen rank) per token
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut next_rank = 0usize;

        for token in cleaned.split_whitespace() {
            if token.chars().count() < self.min_token_chars || self.stopwords.contains(token) {
                continue;
            }
            counts
                .entry(token)
                .and_modify(|(count, _)| *count += 1)
                .or_insert_with(|| {
                    let rank = next_rank;
                    next_rank += 1;
                    (1, rank)
                });
        }

        let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

        ranked
            .into_iter()
            .take(limit)
            .map(|(token, _)| token.to_string())
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}
