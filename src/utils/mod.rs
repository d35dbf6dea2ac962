//! Utility functions and helpers.

pub mod http;
pub mod url;

/// Uppercase the first character of a phrase, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extract the first number embedded in a string.
///
/// Accepts thousands separators and a decimal comma: `"R$ 1.250,50"`
/// yields `1250.5` and `"2 quartos"` yields `2.0`.
pub fn first_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let token: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let token = token.trim_end_matches(['.', ',']);

    let decimal = match (token.rfind(','), token.rfind('.')) {
        (Some(comma), Some(dot)) => Some(if comma > dot { ',' } else { '.' }),
        (Some(i), None) | (None, Some(i)) => {
            let sep = char::from(token.as_bytes()[i]);
            // a lone separator followed by exactly three digits groups thousands
            let grouped = token.matches(sep).count() > 1 || token.len() - i - 1 == 3;
            (!grouped).then_some(sep)
        }
        (None, None) => None,
    };

    let normalized: String = token
        .chars()
        .filter_map(|c| match c {
            '.' | ',' if Some(c) == decimal => Some('.'),
            '.' | ',' => None,
            other => Some(other),
        })
        .collect();

    normalized.parse().ok()
}
