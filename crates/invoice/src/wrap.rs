//! Greedy word wrap against measured text widths

/// Split text into lines that fit within `max_width`
///
/// Greedy line fill: words are appended to the current line while the
/// measured candidate still fits. A single word wider than `max_width` is
/// force-fitted onto its own line rather than broken. Empty (or
/// whitespace-only) input yields the input verbatim as one line, so callers
/// always get at least one line back.
///
/// `measure` reports the rendered width of a string under the current font;
/// it is injected so the algorithm stays independent of the canvas.
pub fn wrap_text<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(text.to_string());
    }

    lines
}
