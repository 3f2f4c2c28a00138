//! Integration tests for the match program and the combinator engine.

use pretty_assertions::assert_eq;
use puper_dom::{DomTree, ElementData, NodeId, NodeType};
use puper_html::parse_html;
use puper_select::{MatchProgram, NodeSet, StepKind, select};

/// Build an element under `parent`, with an optional class.
fn el(tree: &mut DomTree, parent: NodeId, tag: &str, class: Option<&str>) -> NodeId {
    let mut data = ElementData::new(tag);
    if let Some(class) = class {
        data = data.with_attr("class", class);
    }
    tree.append(parent, NodeType::Element(data))
}

fn text(tree: &mut DomTree, parent: NodeId, content: &str) -> NodeId {
    tree.append(parent, NodeType::Text(content.to_string()))
}

fn run(tree: &DomTree, tokens: &[&str]) -> NodeSet {
    select(tree, tokens).unwrap()
}

fn tags(tree: &DomTree, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .map(|&id| tree.as_element(id).map_or_else(|| format!("{id:?}"), |e| e.tag_name.clone()))
        .collect()
}

/// ```text
/// div.outer
///   p#1
///   "\n"
///   p#2
///   section
///     div.inner
///       p#3
///     p#4
/// ```
struct Fixture {
    tree: DomTree,
    outer: NodeId,
    p1: NodeId,
    p2: NodeId,
    section: NodeId,
    inner: NodeId,
    p3: NodeId,
    p4: NodeId,
}

fn fixture() -> Fixture {
    let mut tree = DomTree::new();
    let outer = el(&mut tree, NodeId::ROOT, "div", Some("outer"));
    let p1 = el(&mut tree, outer, "p", None);
    let _ = text(&mut tree, outer, "\n");
    let p2 = el(&mut tree, outer, "p", None);
    let section = el(&mut tree, outer, "section", None);
    let inner = el(&mut tree, section, "div", Some("inner"));
    let p3 = el(&mut tree, inner, "p", None);
    let p4 = el(&mut tree, section, "p", None);
    Fixture {
        tree,
        outer,
        p1,
        p2,
        section,
        inner,
        p3,
        p4,
    }
}

// ========== compile ==========

#[test]
fn test_compile_resolves_pending_combinators() {
    let program = MatchProgram::compile(&["div", ">", "p", "+", "a", ",", "*", "b"]).unwrap();
    let kinds: Vec<StepKind> = program.steps().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            StepKind::Descendant,
            StepKind::Child,
            StepKind::NextSibling,
            StepKind::UnionSplit,
            StepKind::SelectAll,
            StepKind::Descendant,
        ]
    );
    assert_eq!(program.to_string(), "div > p + a , * b");
}

#[test]
fn test_compile_fails_fast_on_bad_expression() {
    let err = MatchProgram::compile(&["div", ",", "[bad", ",", "p"]).unwrap_err();
    assert_eq!(err.selector, "[bad");
}

#[test]
fn test_compile_empty_token_list() {
    let program = MatchProgram::compile::<&str>(&[]).unwrap();
    assert!(program.is_empty());
}

// ========== select all ==========

#[test]
fn test_empty_tokens_select_root() {
    let f = fixture();
    assert_eq!(run(&f.tree, &[]), vec![NodeId::ROOT]);
}

#[test]
fn test_star_only_selects_root() {
    let f = fixture();
    assert_eq!(run(&f.tree, &["*"]), vec![NodeId::ROOT]);
    assert_eq!(run(&f.tree, &["*", "*", "*"]), vec![NodeId::ROOT]);
}

#[test]
fn test_star_does_not_reset_pending_combinator() {
    let f = fixture();
    assert_eq!(run(&f.tree, &["section", ">", "*", "p"]), vec![f.p4]);
}

// ========== descendant ==========

#[test]
fn test_descendant_search_in_document_order() {
    let f = fixture();
    assert_eq!(run(&f.tree, &["p"]), vec![f.p1, f.p2, f.p3, f.p4]);
    assert_eq!(run(&f.tree, &["section", "p"]), vec![f.p3, f.p4]);
}

#[test]
fn test_descendant_excludes_context_node() {
    let f = fixture();
    assert_eq!(run(&f.tree, &["div", "div"]), vec![f.inner]);
}

#[test]
fn test_overlapping_contexts_are_not_deduplicated() {
    let f = fixture();
    // Both div.outer and div.inner contain p#3.
    assert_eq!(run(&f.tree, &["div", "p"]), vec![f.p1, f.p2, f.p3, f.p4, f.p3]);
}

// ========== child ==========

#[test]
fn test_child_matches_direct_children_only() {
    let f = fixture();
    assert_eq!(run(&f.tree, &["div", ">", "p"]), vec![f.p1, f.p2, f.p3]);
    assert_eq!(run(&f.tree, &[".outer", ">", "p"]), vec![f.p1, f.p2]);
    assert_eq!(run(&f.tree, &[".outer", ">", "section"]), vec![f.section]);
}

#[test]
fn test_child_combinator_does_not_reach_grandchildren() {
    let f = fixture();
    assert!(run(&f.tree, &[".outer", ">", "div"]).is_empty());
}

// ========== next sibling ==========

#[test]
fn test_next_sibling_matches_exactly_one_sibling() {
    let f = fixture();
    // p#1 is followed (past a text node) by p#2; p#2 by section.
    assert_eq!(run(&f.tree, &["p", "+", "p"]), vec![f.p2]);
    assert_eq!(run(&f.tree, &["p", "+", "section"]), vec![f.section]);
    // div.inner + p#4 are adjacent.
    assert_eq!(run(&f.tree, &[".inner", "+", "p"]), vec![f.p4]);
}

#[test]
fn test_next_sibling_never_skips_to_later_siblings() {
    let f = fixture();
    assert!(run(&f.tree, &[".outer", ">", "p", "+", "div"]).is_empty());
    assert_eq!(run(&f.tree, &["p", "+", "div"]), Vec::<NodeId>::new());
}

// ========== union ==========

#[test]
fn test_union_concatenates_independent_branches() {
    let f = fixture();
    let union = run(&f.tree, &["div", ",", "p"]);
    let mut expected = run(&f.tree, &["div"]);
    expected.extend(run(&f.tree, &["p"]));
    assert_eq!(union, expected);
    assert_eq!(tags(&f.tree, &union), vec!["div", "div", "p", "p", "p", "p"]);
}

#[test]
fn test_union_branch_restarts_from_root() {
    let f = fixture();
    assert_eq!(run(&f.tree, &["section", ",", "p"]), vec![f.section, f.p1, f.p2, f.p3, f.p4]);
}

#[test]
fn test_union_resets_pending_combinator() {
    let f = fixture();
    // The dangling '>' must not turn the next branch into a child search of root.
    assert_eq!(run(&f.tree, &["section", ">", ",", "p"]), vec![f.section, f.p1, f.p2, f.p3, f.p4]);
}

#[test]
fn test_empty_branches_yield_root() {
    let f = fixture();
    assert_eq!(run(&f.tree, &[",", "section"]), vec![NodeId::ROOT, f.section]);
    assert_eq!(run(&f.tree, &["section", ","]), vec![f.section, NodeId::ROOT]);
}

#[test]
fn test_union_keeps_duplicates() {
    let f = fixture();
    assert_eq!(run(&f.tree, &["section", ",", "section"]), vec![f.section, f.section]);
}

// ========== edge cases ==========

#[test]
fn test_trailing_combinator_is_ignored() {
    let f = fixture();
    assert_eq!(run(&f.tree, &["section", ">"]), vec![f.section]);
    assert_eq!(run(&f.tree, &["section", "+"]), vec![f.section]);
}

#[test]
fn test_no_match_yields_empty_set() {
    let f = fixture();
    assert!(run(&f.tree, &["table"]).is_empty());
    assert!(run(&f.tree, &["table", "p"]).is_empty());
}

#[test]
fn test_execute_from_a_subtree_root() {
    let f = fixture();
    let program = MatchProgram::compile(&["p"]).unwrap();
    assert_eq!(program.execute(&f.tree, f.section), vec![f.p3, f.p4]);
    assert_eq!(program.execute(&f.tree, f.outer).len(), 4);
}

#[test]
fn test_syntax_error_aborts_selection() {
    let f = fixture();
    let err = select(&f.tree, &["p", "[bad"]).unwrap_err();
    assert_eq!(err.selector, "[bad");
}

// ========== parsed documents ==========

#[test]
fn test_selection_over_parsed_html() {
    let tree = parse_html(
        r#"<ul id="menu">
             <li class="item"><a href="/a">A</a></li>
             <li class="item active"><a href="/b">B</a></li>
           </ul>
           <p>after</p>"#,
    );
    let links = run(&tree, &["#menu", ">", "li.active", "a"]);
    assert_eq!(links.len(), 1);
    assert_eq!(tree.as_element(links[0]).unwrap().attr("href"), Some("/b"));

    let after = run(&tree, &["ul", "+", "p"]);
    assert_eq!(tags(&tree, &after), vec!["p"]);

    let hrefs = run(&tree, &["a[href^='/']"]);
    assert_eq!(hrefs.len(), 2);
}
