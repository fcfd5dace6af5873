//! Greedy word wrapping.

use crate::metrics::TextMetrics;

/// Wrap `text` into lines no wider than `max_width_px` where possible.
///
/// Words are appended to the current line while the measured line stays
/// within the limit; otherwise a new line starts. A word wider than the
/// limit gets a line of its own. Every run of whitespace, newlines
/// included, counts as one word gap, so re-wrapping the returned lines
/// joined by spaces gives the same lines. Always returns at least one
/// line.
pub fn wrap_words(
    text: &str,
    max_width_px: f32,
    size_px: f32,
    metrics: &dyn TextMetrics,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if metrics.measure(&candidate, size_px) <= max_width_px {
            line = candidate;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    lines.push(line);

    lines
}
