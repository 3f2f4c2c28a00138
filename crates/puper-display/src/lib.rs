//! Structural serializer for puper.
//!
//! Writes the nodes a selector program picked out of a [`DomTree`] as
//! indented pseudo-markup: one tag or text run per line, one space of
//! indentation per nesting level. `<pre>` subtrees are written verbatim.
//!
//! ```text
//! <div class="note">
//!  <p>
//!   Hi
//!  </p>
//! </div>
//! ```
//!
//! [`markdown::to_markdown`] turns that markup into Markdown.
//!
//! [`DomTree`]: puper_dom::DomTree

pub mod markdown;
pub mod policy;
pub mod serializer;

pub use policy::FormattingPolicy;
pub use serializer::Serializer;
