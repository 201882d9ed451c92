//! Exact-phrase query normalization
//!
//! Audiosearch treats a double-quoted phrase as an exact-match filter, and
//! answers with a 500 when the phrase itself contains stray quotes. Queries
//! are therefore stripped of every `"` before being wrapped in one pair.

const QUOTE: char = '"';

/// Strip all double quotes from `query` and wrap the remainder in quotes.
///
/// Never fails. An empty input yields `""` (two quote characters), so callers
/// must reject empty queries beforehand.
pub fn normalize(query: &str) -> String {
    let mut normalized = String::with_capacity(query.len() + 2);
    normalized.push(QUOTE);
    normalized.extend(query.chars().filter(|c| *c != QUOTE));
    normalized.push(QUOTE);
    normalized
}
