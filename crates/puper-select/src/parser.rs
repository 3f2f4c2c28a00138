//! Selector expression compiler.
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! Turns one selector expression token into a [`CompiledSelector`]. Tokens
//! never contain combinators: whitespace, `>`, `+` and `,` are split off by
//! the CLI layer and handled by the [match program](crate::program).

use std::iter::Peekable;
use std::str::Chars;

use crate::error::SelectorSyntaxError;
use crate::selector::{AttributeSelector, CompiledSelector, SimpleSelector};

type Cursor<'a> = Peekable<Chars<'a>>;

/// Compile a selector expression such as `div.note#main[lang=en]`.
///
/// Supports:
/// - Type selectors: `div`, `p`, `span`
/// - Universal selector inside a compound: `*.note`
/// - Class selectors: `.class`
/// - ID selectors: `#id`
/// - Attribute selectors: `[attr]`, `[attr=value]`, `[attr="quoted value"]`
///   and the `~=`, `|=`, `^=`, `$=`, `*=` operators
/// - Compound selectors: `div.class#id`
///
/// # Errors
///
/// Returns a [`SelectorSyntaxError`] naming the whole expression if it is
/// empty, contains a character outside this grammar, or has an unterminated
/// attribute selector or quoted string.
pub fn compile_selector(raw: &str) -> Result<CompiledSelector, SelectorSyntaxError> {
    let error = |reason: &str| SelectorSyntaxError::new(raw, reason);

    if raw.is_empty() {
        return Err(error("empty selector"));
    }

    let mut chars = raw.chars().peekable();
    let mut compound = Vec::new();

    while let Some(&c) = chars.peek() {
        match c {
            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            '.' => {
                let _ = chars.next();
                let name = consume_ident(&mut chars);
                if name.is_empty() {
                    return Err(error("expected a class name after '.'"));
                }
                compound.push(SimpleSelector::Class(name));
            }

            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            '#' => {
                let _ = chars.next();
                let name = consume_ident(&mut chars);
                if name.is_empty() {
                    return Err(error("expected an id after '#'"));
                }
                compound.push(SimpleSelector::Id(name));
            }

            // [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
            '*' => {
                let _ = chars.next();
                if !compound.is_empty() {
                    return Err(error("'*' must come first in a compound selector"));
                }
                compound.push(SimpleSelector::Universal);
            }

            // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
            '[' => {
                let _ = chars.next();
                let attribute = parse_attribute(&mut chars).map_err(error)?;
                compound.push(SimpleSelector::Attribute(attribute));
            }

            // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
            // A type selector can only open a compound: `div.note`, never `.notediv`.
            _ if is_ident_start_char(c) || c == '-' || c == '\\' => {
                if !compound.is_empty() {
                    return Err(error("a type selector must come first in a compound selector"));
                }
                let name = consume_ident(&mut chars);
                if name.is_empty() {
                    return Err(error("expected an element name"));
                }
                compound.push(SimpleSelector::Type(name));
            }

            ':' => return Err(error("pseudo-classes are not supported")),
            _ if c.is_whitespace() => {
                return Err(error("unexpected whitespace; pass combinators as separate tokens"));
            }
            '>' | '+' | '~' | ',' => {
                return Err(error(&format!(
                    "unexpected combinator '{c}'; pass combinators as separate tokens"
                )));
            }
            _ => return Err(error(&format!("unexpected character '{c}'"))),
        }
    }

    Ok(CompiledSelector::new(raw.to_string(), compound))
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// Consume identifier characters. A backslash escapes the next character,
/// so `#a\.b` is the id `a.b`.
fn consume_ident(chars: &mut Cursor<'_>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if c == '\\' {
            let _ = chars.next();
            if let Some(escaped) = chars.next() {
                ident.push(escaped);
            }
        } else if is_ident_char(c) {
            ident.push(c);
            let _ = chars.next();
        } else {
            break;
        }
    }
    ident
}

fn skip_whitespace(chars: &mut Cursor<'_>) {
    while chars.next_if(|ch| ch.is_ascii_whitespace()).is_some() {}
}

/// Parse the inside of `[...]`, the opening bracket already consumed.
fn parse_attribute(chars: &mut Cursor<'_>) -> Result<AttributeSelector, &'static str> {
    skip_whitespace(chars);
    let name = consume_ident(chars);
    if name.is_empty() {
        return Err("expected an attribute name after '['");
    }
    skip_whitespace(chars);

    // Check what follows: ']', '=', '~=', '|=', '^=', '$=', '*='
    let operator = match chars.next() {
        Some(']') => return Ok(AttributeSelector::Exists(name)),
        Some('=') => '=',
        Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
            if chars.next() != Some('=') {
                return Err("expected '=' after attribute operator");
            }
            op
        }
        Some(_) => return Err("unexpected character in attribute selector"),
        None => return Err("unterminated attribute selector"),
    };

    let value = parse_attr_value(chars)?;
    skip_whitespace(chars);
    if chars.next() != Some(']') {
        return Err("unterminated attribute selector");
    }

    Ok(match operator {
        '~' => AttributeSelector::Includes(name, value),
        '|' => AttributeSelector::DashMatch(name, value),
        '^' => AttributeSelector::PrefixMatch(name, value),
        '$' => AttributeSelector::SuffixMatch(name, value),
        '*' => AttributeSelector::SubstringMatch(name, value),
        _ => AttributeSelector::Equals(name, value),
    })
}

/// Parse an attribute value inside `[attr=value]`.
/// Handles both quoted (`"val"`, `'val'`) and unquoted ident values.
fn parse_attr_value(chars: &mut Cursor<'_>) -> Result<String, &'static str> {
    skip_whitespace(chars);

    match chars.peek() {
        Some(&q @ ('"' | '\'')) => {
            let _ = chars.next();
            let mut val = String::new();
            while let Some(ch) = chars.next() {
                match ch {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            val.push(escaped);
                        }
                    }
                    _ if ch == q => return Ok(val),
                    _ => val.push(ch),
                }
            }
            Err("unterminated quoted attribute value")
        }
        Some(_) => {
            let mut val = String::new();
            while let Some(ch) = chars.next_if(|&ch| is_ident_char(ch) || ch == '.') {
                val.push(ch);
            }
            if val.is_empty() {
                Err("expected an attribute value")
            } else {
                Ok(val)
            }
        }
        None => Err("unterminated attribute selector"),
    }
}
