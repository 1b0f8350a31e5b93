//! Terminal output sanitization utilities
//!
//! Repository names, descriptions and topics come straight from the GitHub API
//! and are attacker-controlled. Anything printed to the terminal or drawn in
//! the TUI goes through [`strip_ansi_codes`] first so embedded escape
//! sequences cannot move the cursor, clear the screen or restyle output.

/// Strips ANSI CSI escape sequences and control characters (except tab,
/// newline and carriage return).
///
/// # Examples
///
/// ```
/// use github_repo_explorer::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Skip parameters up to and including the final letter
            while let Some(next_ch) = chars.next() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' && ch != '\r' {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Sanitize and flatten text to one line of at most `max_chars` characters,
/// appending `…` when truncated.
pub fn single_line(text: &str, max_chars: usize) -> String {
    let cleaned = strip_ansi_codes(text);
    let flattened = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if flattened.chars().count() <= max_chars {
        return flattened;
    }

    let mut truncated: String = flattened.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
