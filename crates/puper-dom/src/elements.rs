//! Static element classification.
//!
//! [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#elements-2)
//!
//! The serializer needs three yes/no questions answered about a tag name:
//! is it void, is it preformatted, and is it an inline span wrapper.

use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString};

/// [§ 13.1.2 Void elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified for
/// void elements."
///
/// The set also carries the obsolete `command` and `keygen` elements, which
/// older documents still contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VoidElement {
    /// `<area>`
    Area,
    /// `<base>`
    Base,
    /// `<br>`
    Br,
    /// `<col>`
    Col,
    /// `<command>` (obsolete)
    Command,
    /// `<embed>`
    Embed,
    /// `<hr>`
    Hr,
    /// `<img>`
    Img,
    /// `<input>`
    Input,
    /// `<keygen>` (obsolete)
    Keygen,
    /// `<link>`
    Link,
    /// `<meta>`
    Meta,
    /// `<param>`
    Param,
    /// `<source>`
    Source,
    /// `<track>`
    Track,
    /// `<wbr>`
    Wbr,
}

/// Returns true if `tag` names a void element: it never has children and
/// never gets a closing tag.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VoidElement::from_str(tag).is_ok()
}

/// [§ 4.4.3 The pre element](https://html.spec.whatwg.org/multipage/grouping-content.html#the-pre-element)
///
/// "The pre element represents a block of preformatted text, in which
/// structure is represented by typographic conventions rather than by elements."
#[must_use]
pub fn is_preformatted(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("pre")
}

/// [§ 4.5.26 The span element](https://html.spec.whatwg.org/multipage/text-level-semantics.html#the-span-element)
///
/// "The span element doesn't mean anything on its own", which is why the
/// serializer can drop the wrapper and keep its content.
#[must_use]
pub fn is_inline_span(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("span")
}
