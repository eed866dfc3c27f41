//! Free-text input hygiene.
//!
//! Names and descriptions are stored as plain text but rendered into HTML
//! by the storefront, so angle brackets are stripped on the way in.

/// Trim surrounding whitespace and strip `<` and `>`.
pub(crate) fn clean_text(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .collect()
}

/// Clean an optional field, mapping blank input to `None`.
pub(crate) fn clean_optional(input: Option<String>) -> Option<String> {
    input
        .map(|value| clean_text(&value))
        .filter(|value| !value.is_empty())
}
