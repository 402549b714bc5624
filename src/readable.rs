// Copyright 2025 Cowboy AI, LLC.

//! Readable text: turn identifiers into transcript sentences
//!
//! Pure helpers used by the narration of steps, personas and scenario titles.
//! Casing is preserved; only word boundaries are made visible.

/// Column width of the label section of every transcript line
pub const LABEL_WIDTH: usize = 9;

/// Insert spaces at the word boundaries of a `PascalCase`/`snake_case` identifier
///
/// Boundaries are: an underscore, a lower-case letter or digit followed by an
/// upper-case letter, the last capital of an acronym followed by a lower-case
/// letter, and the edges of digit runs. Existing whitespace is kept as-is, so
/// padded label columns survive the conversion; trailing whitespace is dropped.
///
/// ```rust
/// use cim_narrative::expand_to_readable;
///
/// assert_eq!(expand_to_readable("IWantToLogIn"), "I Want To Log In");
/// assert_eq!(expand_to_readable("submit_credentials"), "submit credentials");
/// assert_eq!(expand_to_readable("HTTPServer2Ready"), "HTTP Server 2 Ready");
/// ```
pub fn expand_to_readable(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' {
            push_space(&mut out);
            continue;
        }

        if i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = if ch.is_uppercase() {
                prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next.is_some_and(char::is_lowercase))
            } else if ch.is_ascii_digit() {
                prev.is_alphabetic()
            } else if ch.is_alphabetic() {
                prev.is_ascii_digit()
            } else {
                false
            };
            if boundary {
                push_space(&mut out);
            }
        }
        out.push(ch);
    }
    out.truncate(out.trim_end().len());
    out
}

fn push_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Convert a `snake_case` or single-word identifier to `PascalCase`
///
/// Input without underscores only gains an upper-case first letter.
pub fn to_pascal_case(text: &str) -> String {
    if !text.contains('_') {
        return upper_first(text);
    }
    text.split('_')
        .filter(|part| !part.is_empty())
        .map(upper_first)
        .collect()
}

/// Upper-case the first character
pub fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character
pub fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Right-align a label in the label column, followed by one separating space
///
/// ```rust
/// use cim_narrative::{pad_label, LABEL_WIDTH};
///
/// assert_eq!(pad_label("Given"), "    Given ");
/// assert_eq!(pad_label("As").len(), LABEL_WIDTH + 1);
/// ```
pub fn pad_label(label: &str) -> String {
    format!("{label:>width$} ", width = LABEL_WIDTH)
}
