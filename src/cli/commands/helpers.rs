//! Shared helper functions for CLI commands.

/// Shorten `text` to at most `max_chars` characters on one line, marking cuts
/// with an ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let kept: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Star bar for a 1-5 rating; out-of-range values are shown numerically.
pub fn stars(rating: i32) -> String {
    match usize::try_from(rating) {
        Ok(n @ 1..=5) => format!("{}{}", "★".repeat(n), "☆".repeat(5 - n)),
        _ => format!("({})", rating),
    }
}
