//! Quote-aware tokenizer for operator input

/// Splits a line on spaces and tabs.
///
/// Either quote character toggles a quoted span in which whitespace is kept;
/// the quote characters themselves are dropped. An unterminated quote runs
/// to the end of the line.
pub fn split_quoted(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut in_quote = false;

    for c in line.chars() {
        match c {
            '"' | '\'' => in_quote = !in_quote,
            ' ' | '\t' if !in_quote => {
                if !buf.is_empty() {
                    tokens.push(std::mem::take(&mut buf));
                }
            }
            _ => buf.push(c),
        }
    }
    if !buf.is_empty() {
        tokens.push(buf);
    }
    tokens
}
