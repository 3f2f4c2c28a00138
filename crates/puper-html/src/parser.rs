//! Tree construction via html5ever's `RcDom`, converted to the arena DOM.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use puper_dom::{Attribute, DomTree, ElementData, NodeId, NodeType};

/// Parse a decoded HTML document into a [`DomTree`].
///
/// html5ever never fails: malformed markup is repaired the way browsers
/// repair it, so a fragment such as `<p>Hi` still yields
/// `html > head + body > p`.
#[must_use]
pub fn parse_html(html: &str) -> DomTree {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    let mut tree = DomTree::new();
    convert(&dom.document, &mut tree);

    tracing::debug!(nodes = tree.len(), "parsed HTML document");
    tree
}

/// Copy the `RcDom` below `document` into `tree`.
///
/// Walks with an explicit stack of `(handle, parent)` pairs; children are
/// pushed in reverse so they are appended in document order.
fn convert(document: &Handle, tree: &mut DomTree) {
    let mut stack: Vec<(Handle, NodeId)> = push_order(document)
        .into_iter()
        .map(|child| (child, NodeId::ROOT))
        .collect();

    while let Some((handle, parent)) = stack.pop() {
        let node_type = match &handle.data {
            NodeData::Document => None,
            NodeData::Doctype { name, .. } => Some(NodeType::Doctype(name.to_string())),
            NodeData::Text { contents } => Some(NodeType::Text(contents.borrow().to_string())),
            NodeData::Comment { contents } => Some(NodeType::Comment(contents.to_string())),
            NodeData::Element { name, attrs, .. } => Some(NodeType::Element(ElementData {
                tag_name: name.local.to_string(),
                attrs: attrs
                    .borrow()
                    .iter()
                    .map(|attr| Attribute::new(attr.name.local.to_string(), attr.value.to_string()))
                    .collect(),
            })),
            // Processing instructions only exist in XML; nothing to keep.
            NodeData::ProcessingInstruction { .. } => continue,
        };

        let id = node_type.map_or(parent, |node_type| tree.append(parent, node_type));
        stack.extend(push_order(&handle).into_iter().map(|child| (child, id)));
    }
}

/// Children of `handle` in reverse document order, ready to push on a stack.
///
/// A `<template>` keeps its content in a separate fragment; it is spliced in
/// as the element's children.
fn push_order(handle: &Handle) -> Vec<Handle> {
    let mut children: Vec<Handle> = handle.children.borrow().iter().cloned().collect();
    if let NodeData::Element {
        template_contents, ..
    } = &handle.data
        && let Some(fragment) = template_contents.borrow().as_ref()
    {
        children.extend(fragment.children.borrow().iter().cloned());
    }
    children.reverse();
    children
}
