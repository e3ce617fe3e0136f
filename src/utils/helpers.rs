//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

/// Case-, accent- and inflection-insensitive term matching used by the
/// filter stages
///
/// A term matches when it is a substring of the normalized text, or when a
/// single-word term shares a stem with any word of the text, so a
/// configured "usado" also catches "Usada" and "usados". Multi-word terms
/// match as substrings only.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let text = normalize(haystack);
    let term = normalize(needle);

    if term.is_empty() {
        return false;
    }

    if text.contains(&term) {
        return true;
    }

    if term.split_whitespace().count() > 1 {
        return false;
    }

    let term_stem = stem(&term);
    text.split_whitespace().any(|word| stem(word) == term_stem)
}

/// Lowercase the text and fold Portuguese accented characters
fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Strip plural and gender suffixes so inflected forms compare equal
/// ("usado", "usada" and "usados" all stem to "usad")
fn stem(word: &str) -> &str {
    let singular = word.strip_suffix('s').unwrap_or(word);
    let base = singular
        .strip_suffix(|c| matches!(c, 'a' | 'o' | 'e'))
        .unwrap_or(singular);

    // Very short stems match too loosely; keep the singular form instead
    if base.chars().count() >= 3 {
        base
    } else {
        singular
    }
}

/// Format a price in Brazilian real notation (R$ 1.234,56)
pub fn format_price_brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = (cents % 100).abs();

    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if whole < 0 { "-" } else { "" };
    format!("R$ {}{},{:02}", sign, grouped, frac)
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
