//! Byte stream decoding.
//!
//! [§ 13.2.3 The input byte stream](https://html.spec.whatwg.org/multipage/parsing.html#the-input-byte-stream)

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252, X_USER_DEFINED};
use puper_common::warn_once;

use crate::ParseError;

/// "The user agent may wait for more bytes of the resource to be available
/// [...] 1024 bytes is a reasonable limit for the prescan."
const PRESCAN_LIMIT: usize = 1024;

/// Decode raw document bytes into a string.
///
/// With an explicit `charset` label the label wins. Without one the encoding
/// is sniffed: byte order mark first, then a `<meta>` prescan of the first
/// 1024 bytes, then UTF-8. Malformed sequences become U+FFFD.
///
/// # Errors
///
/// Returns [`ParseError::UnsupportedCharset`] if `charset` is not a label the
/// [Encoding Standard](https://encoding.spec.whatwg.org/#names-and-labels) knows.
pub fn decode(bytes: &[u8], charset: Option<&str>) -> Result<String, ParseError> {
    let label = charset.map(str::trim).filter(|label| !label.is_empty());

    let text = if let Some(label) = label {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| ParseError::UnsupportedCharset(label.to_string()))?;
        tracing::debug!(encoding = encoding.name(), "decoding with requested charset");
        let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
        report_errors(encoding, had_errors);
        text
    } else {
        let encoding = sniff(bytes);
        // A BOM always wins over the sniffed encoding, as in the spec's decode.
        let (text, used, had_errors) = encoding.decode(bytes);
        tracing::debug!(encoding = used.name(), "decoding with sniffed charset");
        report_errors(used, had_errors);
        text
    };

    Ok(text.into_owned())
}

fn report_errors(encoding: &'static Encoding, had_errors: bool) {
    if had_errors {
        let _ = warn_once(
            "charset",
            &format!(
                "input is not valid {}; malformed bytes were replaced",
                encoding.name()
            ),
        );
    }
}

/// [§ 13.2.3.2 Determining the character encoding](https://html.spec.whatwg.org/multipage/parsing.html#determining-the-character-encoding)
#[must_use]
pub fn sniff(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let Some(label) = prescan_meta_charset(bytes) else {
        return UTF_8;
    };

    match Encoding::for_label(label.as_bytes()) {
        // "If charset is UTF-16BE/LE, then set charset to UTF-8."
        Some(encoding) if encoding == UTF_16BE || encoding == UTF_16LE => UTF_8,
        // "If charset is x-user-defined, then set charset to windows-1252."
        Some(encoding) if encoding == X_USER_DEFINED => WINDOWS_1252,
        Some(encoding) => encoding,
        None => {
            let _ = warn_once(
                "charset",
                &format!("document declares unknown charset \"{label}\"; assuming UTF-8"),
            );
            UTF_8
        }
    }
}

/// [§ 13.2.3.3 Prescan a byte stream](https://html.spec.whatwg.org/multipage/parsing.html#prescan-a-byte-stream-to-determine-its-encoding)
///
/// A simplified prescan: looks at each `<meta ...>` tag in the first 1024
/// bytes for either `charset=...` or `content="...; charset=..."`.
fn prescan_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(PRESCAN_LIMIT)];
    let lower = head.to_ascii_lowercase();

    let mut rest = lower.as_slice();
    while let Some(start) = find(rest, b"<meta") {
        let tag = &rest[start + b"<meta".len()..];
        let end = tag.iter().position(|&b| b == b'>').unwrap_or(tag.len());
        if let Some(label) = charset_in(&tag[..end]) {
            return Some(label);
        }
        rest = &tag[end..];
    }
    None
}

/// Find `charset` followed by `=` in a tag's attribute text and read the label.
fn charset_in(attrs: &[u8]) -> Option<String> {
    let mut rest = attrs;
    while let Some(pos) = find(rest, b"charset") {
        rest = &rest[pos + b"charset".len()..];
        let after = trim_start(rest);
        let Some(value) = after.strip_prefix(b"=") else {
            continue;
        };
        let value = trim_start(value);
        let value = value
            .strip_prefix(b"\"")
            .or_else(|| value.strip_prefix(b"'"))
            .unwrap_or(value);
        let len = value
            .iter()
            .position(|&b| matches!(b, b'"' | b'\'' | b';' | b'/' | b'>') || b.is_ascii_whitespace())
            .unwrap_or(value.len());
        if len > 0 {
            return Some(String::from_utf8_lossy(&value[..len]).into_owned());
        }
    }
    None
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    &bytes[skip..]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
