//! Tag normalization and the default controlled vocabulary.
//!
//! Every tag that reaches storage goes through [`normalize_tag`]: NFC
//! canonical composition, whitespace trim, lowercase. The vocabulary table
//! itself lives in the repository layer; this module is pure string work.

use unicode_normalization::UnicodeNormalization;

/// Seed vocabulary installed on first initialization.
///
/// Domain categories plus a catch-all. Already in normalized form.
pub const DEFAULT_TAGS: &[&str] = &[
    "lung", "immune", "liver", "heart", "brain", "kidneys", "lymph", "misc",
];

/// Normalize a single tag: NFC-compose, trim, lowercase.
///
/// Total over all inputs; the empty string normalizes to the empty string.
pub fn normalize_tag(raw: &str) -> String {
    raw.nfc().collect::<String>().trim().to_lowercase()
}

/// Normalize a sequence of tags, dropping entries that normalize to empty.
///
/// Order is preserved. Duplicates are kept; deduplication is a vocabulary
/// concern, not a per-record one.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|t| normalize_tag(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}
