//! Markdown escaping for script text.
//!
//! Dialogue and titles are free text written for the game client, and
//! routinely contain asterisks, underscores and parentheses that pandoc
//! would otherwise read as emphasis, links or headings.

/// Characters that get a backslash in front of them.
pub const MARKDOWN_SPECIAL: [char; 8] = ['\\', '*', '_', '<', '>', '(', ')', '#'];

/// Escape markdown-significant characters in `text`.
///
/// Each of `\ * _ < > ( ) #` is prefixed with a backslash. All other
/// characters are kept as-is and in order.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    push_escaped(&mut escaped, text);
    escaped
}

/// Append the escaped form of `text` to `out`.
pub fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}
