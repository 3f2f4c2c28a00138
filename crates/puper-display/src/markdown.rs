//! Markdown output.
//!
//! The serializer's markup is converted with [`htmd`]. Text runs are written
//! raw by the serializer, so stray markup-like strings such as the `<<` of a
//! "previous page" link can confuse the converter; those are stripped first.

use std::io;

use htmd::HtmlToMarkdown;

/// Stripped when no other removals are configured.
pub const DEFAULT_REMOVAL: &str = "<<";

/// Elements dropped together with their content.
const SKIPPED_TAGS: [&str; 1] = ["button"];

/// Strip every string in `removals` from `html`, then convert it to Markdown.
///
/// # Errors
///
/// Whatever the converter reports for input it cannot handle.
pub fn to_markdown(html: &str, removals: &[String]) -> io::Result<String> {
    let html = strip(html, removals);
    tracing::debug!(bytes = html.len(), "converting selection to markdown");
    HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build()
        .convert(&html)
}

/// Removals apply in order; empty strings are ignored.
fn strip(html: &str, removals: &[String]) -> String {
    removals
        .iter()
        .filter(|removal| !removal.is_empty())
        .fold(html.to_owned(), |acc, removal| acc.replace(removal.as_str(), ""))
}
