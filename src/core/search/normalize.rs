//! Accent- and case-insensitive text folding.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strip diacritics: NFD-decompose and drop combining marks.
pub fn remove_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Remove accents and lowercase. Both sides of a comparison go through this.
pub fn fold(s: &str) -> String {
    remove_accents(s).to_lowercase()
}

/// Whether `haystack` contains `needle_folded` once folded.
///
/// `needle_folded` must already be the output of [`fold`].
pub fn contains_folded(haystack: &str, needle_folded: &str) -> bool {
    fold(haystack).contains(needle_folded)
}
