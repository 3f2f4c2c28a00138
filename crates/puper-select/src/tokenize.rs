//! Splitting user input into selector tokens.
//!
//! The engine consumes a flat token list. Users type selectors the CSS way
//! (`article > p, h1 + p`), so the CLI runs every `--selector` value through
//! [`tokenize`] first.

/// Split a selector string into tokens.
///
/// Splits on ASCII whitespace and additionally isolates `>`, `+` and `,` as
/// standalone tokens, except inside `[...]` or quotes where they belong to an
/// attribute value.
///
/// ```
/// use puper_select::tokenize;
///
/// assert_eq!(tokenize("div>p, a"), vec!["div", ">", "p", ",", "a"]);
/// assert_eq!(tokenize("a[title='x > y']"), vec!["a[title='x > y']"]);
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in input.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        if let Some(q) = quote {
            current.push(c);
            match c {
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\\' => {
                current.push(c);
                escaped = true;
            }
            '"' | '\'' if bracket_depth > 0 => {
                current.push(c);
                quote = Some(c);
            }
            '[' => {
                bracket_depth += 1;
                current.push(c);
            }
            ']' => {
                bracket_depth = bracket_depth.saturating_sub(1);
                current.push(c);
            }
            _ if bracket_depth > 0 => current.push(c),
            _ if c.is_ascii_whitespace() => flush(&mut current, &mut tokens),
            '>' | '+' | ',' => {
                flush(&mut current, &mut tokens);
                tokens.push(c.to_string());
            }
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}
