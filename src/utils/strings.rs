//! String helpers for slot specs and markup text

/// Split `input` on `delimiter`, where `escape` makes the next character literal
///
/// Empty pieces are dropped. Returns `None` if `delimiter` and `escape` are the
/// same character.
pub fn split_with_escape(input: &str, delimiter: char, escape: char) -> Option<Vec<String>> {
    if delimiter == escape {
        return None;
    }

    let mut parts = Vec::new();
    let mut buffer = String::new();
    let mut escaping = false;

    for ch in input.chars() {
        if escaping {
            escaping = false;
            buffer.push(ch);
        } else if ch == escape {
            escaping = true;
        } else if ch == delimiter {
            if !buffer.is_empty() {
                parts.push(std::mem::take(&mut buffer));
            }
        } else {
            buffer.push(ch);
        }
    }

    if !buffer.is_empty() {
        parts.push(buffer);
    }

    Some(parts)
}

/// Escape every markup metacharacter so `input` renders verbatim
pub fn escapify(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());

    for ch in input.chars() {
        if matches!(ch, '{' | '}' | '>' | '|' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    escaped
}
