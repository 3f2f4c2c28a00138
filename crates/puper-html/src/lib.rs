//! HTML decoding and parsing for puper.
//!
//! # Scope
//!
//! This crate implements:
//! - **Charset handling** ([WHATWG § 13.2.3](https://html.spec.whatwg.org/multipage/parsing.html#the-input-byte-stream))
//!   - explicit labels via the Encoding Standard
//!   - BOM sniffing and a `<meta charset>` prescan when no label is given
//! - **Tree construction** by html5ever, converted into a [`puper_dom::DomTree`]
//!
//! The converted tree keeps everything the serializer needs to reproduce the
//! document: the doctype, comments, and every text node including
//! whitespace-only ones.

pub mod charset;
pub mod parser;

use thiserror::Error;

pub use charset::decode;
pub use parser::parse_html;

use puper_dom::DomTree;

/// Errors produced while turning bytes into a tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The requested charset label is not known to the Encoding Standard.
    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),
}

/// Decode `bytes` (see [`decode`]) and parse the result into a tree.
///
/// # Errors
///
/// Returns [`ParseError::UnsupportedCharset`] if `charset` is given and is not
/// a known encoding label.
pub fn parse_document(bytes: &[u8], charset: Option<&str>) -> Result<DomTree, ParseError> {
    let text = decode(bytes, charset)?;
    Ok(parse_html(&text))
}
