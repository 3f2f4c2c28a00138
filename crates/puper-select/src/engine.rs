//! Combinator execution engine.
//!
//! Runs a [`MatchProgram`] against a [`DomTree`]. Each step is a pure
//! function of (current node set, combinator, predicate); the only state
//! carried between steps is the current set itself and the finished union
//! branches.

use puper_dom::{DomTree, NodeId};

use crate::error::SelectorSyntaxError;
use crate::program::{MatchProgram, StepKind};
use crate::selector::CompiledSelector;

/// Selected nodes, in discovery order.
///
/// Document order within a branch; branches concatenated in token order.
/// Duplicates are kept: a node reached from two context nodes, or selected by
/// two branches, appears twice.
pub type NodeSet = Vec<NodeId>;

impl MatchProgram {
    /// Run the program with `root` as the scope of every union branch.
    ///
    /// An empty program selects `[root]`.
    #[must_use]
    pub fn execute(&self, tree: &DomTree, root: NodeId) -> NodeSet {
        let mut result = NodeSet::new();
        let mut current = vec![root];

        for step in self.steps() {
            match (step.kind, &step.selector) {
                (StepKind::UnionSplit, _) => {
                    result.append(&mut current);
                    current.push(root);
                }
                (kind, Some(selector)) => current = apply(tree, &current, kind, selector),
                // `*`, and any marker step without a predicate, passes the set through.
                (_, None) => {}
            }
        }

        result.append(&mut current);
        tracing::debug!(selected = result.len(), "executed selector program");
        result
    }
}

/// Compile `tokens` and run them from the document root.
///
/// # Errors
///
/// Returns the [`SelectorSyntaxError`] of the first malformed expression;
/// nothing is matched in that case.
pub fn select<S: AsRef<str>>(tree: &DomTree, tokens: &[S]) -> Result<NodeSet, SelectorSyntaxError> {
    let program = MatchProgram::compile(tokens)?;
    Ok(program.execute(tree, tree.root()))
}

/// Apply one combinator + predicate to every context node, concatenating the
/// matches in context order.
fn apply(
    tree: &DomTree,
    context: &[NodeId],
    kind: StepKind,
    selector: &CompiledSelector,
) -> NodeSet {
    let matches = |id: &NodeId| selector.matches(tree, *id);
    let mut next = NodeSet::new();

    for &node in context {
        match kind {
            // [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
            // Whole subtree, excluding the context node itself, in tree order.
            StepKind::Descendant => next.extend(tree.descendants(node).filter(matches)),

            // [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
            StepKind::Child => next.extend(tree.children(node).iter().copied().filter(matches)),

            // [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
            // Exactly one candidate: the next element sibling. Whitespace text
            // and comments in between do not break adjacency.
            StepKind::NextSibling => next.extend(tree.next_element_sibling(node).filter(matches)),

            StepKind::SelectAll | StepKind::UnionSplit => next.push(node),
        }
    }

    next
}
