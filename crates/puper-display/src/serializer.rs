//! The node walker.
//!
//! Two rendering modes share one walk:
//!
//! - **Normal**: every tag and every non-blank text run on its own line,
//!   indented one space per level. Text is trimmed.
//! - **Preformatted**: entered at a `<pre>` element. Text is written raw,
//!   tags get no indentation and no line breaks, and only the closing tag of
//!   a preformatted element ends the line.
//!
//! The walk uses an explicit work stack, so document depth is bounded by
//! memory rather than by the call stack.

use std::io::{self, Write};

use puper_dom::{DomTree, ElementData, NodeId, NodeType, is_preformatted};

use crate::policy::FormattingPolicy;

/// One pending action of the walk.
enum Work<'a> {
    /// Render a node and schedule its children.
    Open {
        node: NodeId,
        level: usize,
        pre: bool,
    },
    /// Write the closing tag of an element whose children are done.
    Close {
        tag: &'a str,
        level: usize,
        pre: bool,
    },
}

/// Renders nodes of one [`DomTree`] under a [`FormattingPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'a> {
    tree: &'a DomTree,
    policy: FormattingPolicy,
}

impl<'a> Serializer<'a> {
    /// Create a serializer over `tree`.
    #[must_use]
    pub const fn new(tree: &'a DomTree, policy: FormattingPolicy) -> Self {
        Self { tree, policy }
    }

    /// The policy this serializer applies.
    #[must_use]
    pub const fn policy(&self) -> FormattingPolicy {
        self.policy
    }

    /// Write every node of a selection, each starting at level 0, in order.
    ///
    /// # Errors
    ///
    /// Returns the first error of `sink`. Whatever was written before the
    /// failure stays written.
    pub fn write_nodes<W: Write + ?Sized>(&self, sink: &mut W, nodes: &[NodeId]) -> io::Result<()> {
        tracing::debug!(nodes = nodes.len(), policy = ?self.policy, "serializing selection");
        for &node in nodes {
            self.write_node(sink, node, 0)?;
        }
        Ok(())
    }

    /// Write `node` and its subtree, starting at indentation `level`.
    ///
    /// # Errors
    ///
    /// Returns the first error of `sink`.
    pub fn write_node<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        node: NodeId,
        level: usize,
    ) -> io::Result<()> {
        let mut stack = vec![Work::Open {
            node,
            level,
            pre: false,
        }];

        while let Some(work) = stack.pop() {
            match work {
                Work::Open { node, level, pre } => self.open(sink, &mut stack, node, level, pre)?,
                Work::Close { tag, level, pre } => write_close_tag(sink, tag, level, pre)?,
            }
        }
        Ok(())
    }

    /// Render a selection into a string.
    ///
    /// # Errors
    ///
    /// Only what [`Serializer::write_nodes`] reports; an in-memory buffer
    /// itself never fails.
    pub fn render(&self, nodes: &[NodeId]) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write_nodes(&mut buf, nodes)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn open<W: Write + ?Sized>(
        &self,
        sink: &mut W,
        stack: &mut Vec<Work<'a>>,
        node: NodeId,
        level: usize,
        pre: bool,
    ) -> io::Result<()> {
        let tree: &'a DomTree = self.tree;
        let Some(data) = tree.get(node) else {
            return Ok(());
        };

        match &data.node_type {
            NodeType::Document | NodeType::Doctype(_) => self.push_children(stack, node, level, pre),

            NodeType::Text(text) if pre => sink.write_all(text.as_bytes())?,
            NodeType::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    write_indent(sink, level)?;
                    writeln!(sink, "{text}")?;
                }
            }

            NodeType::Comment(text) => {
                if pre {
                    write!(sink, "<!--{text}-->")?;
                } else {
                    write_indent(sink, level)?;
                    writeln!(sink, "<!--{text}-->")?;
                }
                self.push_children(stack, node, level, pre);
            }

            NodeType::Element(element) => {
                if element.is_inline_span() && !self.policy.show_inline_span {
                    // Unwrapped: the children take the span's place and level.
                    self.push_children(stack, node, level, pre);
                    return Ok(());
                }

                let child_pre = pre || element.is_preformatted();
                if !pre {
                    write_indent(sink, level)?;
                }
                self.write_open_tag(sink, element)?;
                if !child_pre {
                    sink.write_all(b"\n")?;
                }

                if !element.is_void() {
                    stack.push(Work::Close {
                        tag: &element.tag_name,
                        level,
                        pre: child_pre,
                    });
                    self.push_children(stack, node, level + 1, child_pre);
                }
            }
        }
        Ok(())
    }

    /// Schedule the children of `node` so they pop in document order.
    fn push_children(&self, stack: &mut Vec<Work<'a>>, node: NodeId, level: usize, pre: bool) {
        let tree: &'a DomTree = self.tree;
        stack.extend(
            tree.children(node)
                .iter()
                .rev()
                .map(|&child| Work::Open {
                    node: child,
                    level,
                    pre,
                }),
        );
    }

    fn write_open_tag<W: Write + ?Sized>(&self, sink: &mut W, element: &ElementData) -> io::Result<()> {
        write!(sink, "<{}", element.tag_name)?;
        for attr in element
            .attrs
            .iter()
            .filter(|attr| self.policy.shows_attribute(&attr.name))
        {
            write!(sink, " {}=\"{}\"", attr.name, attr.value)?;
        }
        sink.write_all(b">")
    }
}

fn write_close_tag<W: Write + ?Sized>(sink: &mut W, tag: &str, level: usize, pre: bool) -> io::Result<()> {
    if pre {
        write!(sink, "</{tag}>")?;
        if is_preformatted(tag) {
            sink.write_all(b"\n")?;
        }
        Ok(())
    } else {
        write_indent(sink, level)?;
        writeln!(sink, "</{tag}>")
    }
}

fn write_indent<W: Write + ?Sized>(sink: &mut W, level: usize) -> io::Result<()> {
    write!(sink, "{:level$}", "")
}
