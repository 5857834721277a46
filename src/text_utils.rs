//! Text splitting helpers for the reading session.

/// Split raw input into the ordered list of readable lines.
///
/// Pieces are trimmed and blank ones dropped; relative order is preserved.
/// An empty result means there is nothing to read and no session may start.
pub fn segment_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of whitespace-separated words in a line.
pub fn count_words(line: &str) -> u64 {
    line.split_whitespace().count() as u64
}
