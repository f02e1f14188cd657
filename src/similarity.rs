//! # Similarity Scorer Module
//!
//! ## Purpose
//! Normalized textual-similarity scoring between two strings, used by the
//! query engine to fuzzy-match criterion values against indexed metadata.
//!
//! ## Input/Output Specification
//! - **Input**: Two strings (compared case-insensitively)
//! - **Output**: A ratio in `[0.0, 1.0]`; deterministic for identical inputs
//!
//! The ratio is the longest-common-subsequence length over the summed input
//! lengths (`2·lcs / (|a| + |b|)`), which tracks the matching-blocks ratio the
//! classification thresholds were tuned against.

/// Compute a normalized similarity ratio between two strings.
///
/// Both inputs are case-folded before comparison. Two empty strings are
/// considered identical (ratio 1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();

    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let lcs = lcs_length(&a, &b);
    (2.0 * lcs as f64) / (len_a + len_b) as f64
}

/// Length of the longest common subsequence, space-optimized to two rows.
fn lcs_length(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 || n == 0 {
        return 0;
    }

    let mut prev: Vec<usize> = vec![0; n + 1];
    let mut curr: Vec<usize> = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = 0;
        for j in 1..=n {
            if a_chars[i - 1] == b_chars[j - 1] {
                curr[j] = prev[j - 1] + 1;
            } else {
                curr[j] = prev[j].max(curr[j - 1]);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
