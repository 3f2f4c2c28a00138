//! Compiled selectors and the node matching predicate.
//!
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/), restricted to
//! compound selectors: combinators are handled one level up, by the
//! [match program](crate::program).

use std::fmt;

use puper_dom::{DomTree, ElementData, NodeId};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Examples: `div`, `p`, `span`, `body`, `h1`
    Type(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    ///
    /// Only seen inside a compound such as `*.note`; a bare `*` token never
    /// reaches the compiler.
    Universal,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    ///
    /// Examples: `.highlight`, `.btn`, `.nav-item`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    ///
    /// Examples: `#main`, `#header`, `#nav-bar`
    Id(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[type=text]`, `[class~=active]`, `[lang|=en]`,
    /// `[href^=https]`, `[src$=".png"]`, `[data-theme*=dark]`
    Attribute(AttributeSelector),
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Attribute names compare ASCII case-insensitively, values exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// [attr]: "Represents an element with the att attribute"
    Exists(String),

    /// [attr=value]: "Represents an element with the att attribute whose value
    /// is exactly 'val'."
    Equals(String, String),

    /// [attr~=value]: "Represents an element with the att attribute whose value
    /// is a whitespace-separated list of words, one of which is exactly 'val'."
    Includes(String, String),

    /// [attr|=value]: "Represents an element with the att attribute, its value
    /// either being exactly 'val' or beginning with 'val' immediately followed by '-'."
    DashMatch(String, String),

    /// [attr^=value]: "Represents an element with the att attribute whose value
    /// begins with the prefix 'val'."
    PrefixMatch(String, String),

    /// [attr$=value]: "Represents an element with the att attribute whose value
    /// ends with the suffix 'val'."
    SuffixMatch(String, String),

    /// [attr*=value]: "Represents an element with the att attribute whose value
    /// contains at least one instance of the substring 'val'."
    SubstringMatch(String, String),
}

impl AttributeSelector {
    /// The attribute name this selector tests.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Exists(name)
            | Self::Equals(name, _)
            | Self::Includes(name, _)
            | Self::DashMatch(name, _)
            | Self::PrefixMatch(name, _)
            | Self::SuffixMatch(name, _)
            | Self::SubstringMatch(name, _) => name,
        }
    }

    fn matches(&self, element: &ElementData) -> bool {
        let Some(value) = element.attr(self.name()) else {
            return false;
        };
        match self {
            Self::Exists(_) => true,
            Self::Equals(_, val) => value == val,
            Self::Includes(_, val) => value.split_ascii_whitespace().any(|w| w == val),
            Self::DashMatch(_, val) => {
                value == val
                    || value
                        .strip_prefix(val.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            // "If 'val' is the empty string then the selector does not represent anything."
            Self::PrefixMatch(_, val) => !val.is_empty() && value.starts_with(val.as_str()),
            Self::SuffixMatch(_, val) => !val.is_empty() && value.ends_with(val.as_str()),
            Self::SubstringMatch(_, val) => !val.is_empty() && value.contains(val.as_str()),
        }
    }
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
            // HTML element names are ASCII case-insensitive.
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Universal => true,
            Self::Class(class_name) => element.has_class(class_name),
            Self::Id(id) => element.id().is_some_and(|el_id| el_id == id),
            Self::Attribute(attr_sel) => attr_sel.matches(element),
        }
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
///
/// Built by [`compile_selector`](crate::compile_selector); immutable after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSelector {
    source: String,
    simple_selectors: Vec<SimpleSelector>,
}

impl CompiledSelector {
    pub(crate) const fn new(source: String, simple_selectors: Vec<SimpleSelector>) -> Self {
        Self {
            source,
            simple_selectors,
        }
    }

    /// The selector expression this was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The simple selectors that must all hold.
    #[must_use]
    pub fn simple_selectors(&self) -> &[SimpleSelector] {
        &self.simple_selectors
    }

    /// Match against element data directly.
    #[must_use]
    pub fn matches_element(&self, element: &ElementData) -> bool {
        self.simple_selectors.iter().all(|s| s.matches(element))
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Only elements can match; documents, doctypes, text and comments never do.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        tree.as_element(node_id)
            .is_some_and(|element| self.matches_element(element))
    }
}

impl fmt::Display for CompiledSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
