//! Text canonicalization.
//!
//! Every speaker name and message body passes through [`normalize`] before it
//! is stored, and every comparison goes through [`fold`], so strings that only
//! differ in Unicode encoding, dash style or surrounding whitespace compare
//! equal.

use unicode_normalization::UnicodeNormalization;

const EN_DASH: char = '\u{2013}';
const EM_DASH: char = '\u{2014}';

/// Canonicalize text for storage.
///
/// Applies NFKD, replaces en and em dashes with `-` and trims surrounding
/// whitespace. Case is preserved. Idempotent.
pub fn normalize(text: &str) -> String {
    let decomposed: String = text
        .nfkd()
        .map(|c| match c {
            EN_DASH | EM_DASH => '-',
            other => other,
        })
        .collect();
    decomposed.trim().to_string()
}

/// Comparison key: [`normalize`], lowercase, and internal whitespace runs
/// collapsed to a single space.
pub fn fold(text: &str) -> String {
    normalize(text)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
