//! Lower-case whitespace tokenization.

/// Lower-case `text` and split it on Unicode whitespace.
///
/// # Examples
///
/// ```
/// use rankfeat::analysis::tokenize;
///
/// assert_eq!(tokenize("Hamburg  City\tPort"), vec!["hamburg", "city", "port"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Count non-overlapping occurrences of `needle` inside `haystack`.
///
/// An empty needle never matches.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
