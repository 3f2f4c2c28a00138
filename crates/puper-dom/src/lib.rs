//! DOM tree implementation for puper.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Parents
//! own their children through the arena; parent and sibling links are plain
//! indices used only for traversal.
//!
//! Trees are built once by the parser and are read-only afterwards: selection
//! and serialization only ever borrow a [`DomTree`] immutably.

pub mod elements;

pub use elements::{VoidElement, is_inline_span, is_preformatted, is_void_element};

/// Index of a node in its [`DomTree`] arena.
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node; every tree has one at index 0.
    pub const ROOT: Self = Self(0);
}

/// One arena slot: the node's payload plus its links.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone)]
pub struct Node {
    /// What the node is.
    pub node_type: NodeType,

    /// `None` only for the document.
    pub parent: Option<NodeId>,

    /// Children in document order.
    pub children: Vec<NodeId>,

    /// Following node under the same parent, of any kind.
    pub next_sibling: Option<NodeId>,

    /// Preceding node under the same parent, of any kind.
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    /// "Doctypes have an associated name"
    Doctype(String),
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    /// "Comment nodes are known as comments."
    Comment(String),
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// A single `name="value"` pair, kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "An attribute's local name"
    pub name: String,
    /// "An attribute's value"
    pub value: String,
}

impl Attribute {
    /// Create an attribute from a name and a value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Element-specific data.
///
/// NOTE: We only store the local name and the attribute list. Attributes are
/// kept as an ordered list rather than a map: serialization must reproduce
/// source order, and malformed documents can repeat a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// Create element data with no attributes.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: Vec::new(),
        }
    }

    /// Builder-style helper that appends an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute::new(name, value));
        self
    }

    /// Returns the value of the first attribute called `name`.
    ///
    /// [§ 4.9](https://dom.spec.whatwg.org/#concept-element-attributes-get-by-name)
    /// "Return the first attribute in element's attribute list whose
    /// qualified name is qualifiedName; otherwise null."
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Returns true if the element carries an attribute called `name`.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Returns the class names from the class attribute, in order.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_ascii_whitespace()
    }

    /// Returns true if `class` is one of the element's class names.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// See [`is_void_element`].
    #[must_use]
    pub fn is_void(&self) -> bool {
        is_void_element(&self.tag_name)
    }

    /// See [`is_preformatted`].
    #[must_use]
    pub fn is_preformatted(&self) -> bool {
        is_preformatted(&self.tag_name)
    }

    /// See [`is_inline_span`].
    #[must_use]
    pub fn is_inline_span(&self) -> bool {
        is_inline_span(&self.tag_name)
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite hierarchical
/// tree structure."
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        Self {
            nodes: vec![document],
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, updating all relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Allocate `node_type` and append it to `parent` in one step.
    pub fn append(&mut self, parent: NodeId, node_type: NodeType) -> NodeId {
        let id = self.alloc(node_type);
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-nextelementsibling)
    ///
    /// "The nextElementSibling getter steps are to return the first following
    /// sibling that is an element; otherwise null."
    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(sibling) = current {
            if self.as_element(sibling).is_some() {
                return Some(sibling);
            }
            current = self.next_sibling(sibling);
        }
        None
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Iterate over every descendant of `id` (excluding `id` itself) in
    /// [tree order](https://dom.spec.whatwg.org/#concept-tree-order):
    /// preorder, depth-first.
    ///
    /// The walk keeps its own stack, so arbitrarily deep documents do not
    /// exhaust the call stack.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the descendants of a node, in tree order.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
