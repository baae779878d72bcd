//! Text processing utilities.
//!
//! This module contains utilities for normalizing user input before matching
//! and for shortening text for display.

use regex::Regex;
use std::sync::OnceLock;

fn arabic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\p{Arabic}").expect("static pattern is valid"))
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("static pattern is valid"))
}

/// Returns true if the text contains any Arabic script character, which the
/// UI renders right-aligned.
///
pub fn contains_arabic(text: &str) -> bool {
    arabic_pattern().is_match(text)
}

/// Normalize text for matching: trim, collapse inner whitespace and fold case.
/// Arabic script has no case and passes through unchanged.
///
/// # Arguments
/// * `text` - The text to normalize
///
/// # Returns
/// The normalized text, empty if the input was blank.
pub fn normalize(text: &str) -> String {
    whitespace_pattern()
        .replace_all(text.trim(), " ")
        .to_lowercase()
}

/// Shorten text to at most `max_chars` characters, ending with "..." when cut.
///
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
