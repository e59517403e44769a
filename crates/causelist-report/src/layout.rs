//! Cell cleaning, approximate text metrics, and word wrapping.

/// Strips every embedded "View" substring (a stray UI-action label captured
/// during extraction) to a fixed point, then trims. Idempotent for any
/// input: stripping again removes nothing new, and trim is stable.
pub fn clean_cell(raw: &str) -> String {
    let mut text = raw.to_string();
    while text.contains("View") {
        text = text.replace("View", "");
    }
    text.trim().to_string()
}

/// Coarse Helvetica advance widths in 1/1000 em. Exact metrics are not
/// worth carrying for an 8 pt docket table; wrapping just has to stay
/// inside the column.
fn char_advance(c: char) -> f32 {
    match c {
        ' ' | 'i' | 'j' | 'l' | 't' | 'f' | 'I' | '.' | ',' | ':' | ';' | '!' | '\'' | '('
        | ')' | '[' | ']' | '-' | '/' => 300.0,
        'm' | 'w' | 'M' | 'W' | '@' => 900.0,
        'A'..='Z' | '0'..='9' => 650.0,
        _ => 550.0,
    }
}

/// Approximate rendered width of `text` at `size` points.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_advance).sum::<f32>() * size / 1000.0
}

/// Greedy word wrap into `max_width` points. Words wider than the column
/// are hard-broken; nothing is ever truncated. Always yields at least one
/// (possibly empty) line so every cell occupies a grid box.
pub fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        for piece in break_word(word, max_width, size) {
            let candidate = if current.is_empty() {
                piece.clone()
            } else {
                format!("{current} {piece}")
            };
            if text_width(&candidate, size) <= max_width || current.is_empty() {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = piece;
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits a single word into pieces no wider than `max_width`.
fn break_word(word: &str, max_width: f32, size: f32) -> Vec<String> {
    if text_width(word, size) <= max_width {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        let mut candidate = current.clone();
        candidate.push(c);
        if text_width(&candidate, size) > max_width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
