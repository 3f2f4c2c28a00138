//! Tests for decoding bytes and building the DOM tree with html5ever.

use puper_dom::{DomTree, NodeId, NodeType};
use puper_html::{ParseError, decode, parse_document, parse_html};

/// Find the first element with `tag` in tree order.
fn find(tree: &DomTree, tag: &str) -> NodeId {
    tree.descendants(NodeId::ROOT)
        .find(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == tag))
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

fn element_children(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.as_element(child))
        .map(|e| e.tag_name.clone())
        .collect()
}

// ========== tree construction ==========

#[test]
fn test_fragment_is_wrapped_in_html_head_body() {
    let tree = parse_html("<div><p>Hi</p></div>");
    let html = tree.document_element().unwrap();
    assert_eq!(element_children(&tree, html), vec!["head", "body"]);

    let body = find(&tree, "body");
    assert_eq!(element_children(&tree, body), vec!["div"]);

    let p = find(&tree, "p");
    let text = tree.first_child(p).unwrap();
    assert_eq!(tree.as_text(text), Some("Hi"));
}

#[test]
fn test_doctype_and_comments_are_kept() {
    let tree = parse_html("<!DOCTYPE html><!-- top --><html><body>x</body></html>");
    let kinds: Vec<&NodeType> = tree
        .children(NodeId::ROOT)
        .iter()
        .map(|&id| &tree.get(id).unwrap().node_type)
        .collect();
    assert!(matches!(kinds[0], NodeType::Doctype(name) if name == "html"));
    assert!(matches!(kinds[1], NodeType::Comment(text) if text == " top "));
    assert!(matches!(kinds[2], NodeType::Element(_)));
}

#[test]
fn test_whitespace_text_nodes_are_kept() {
    let tree = parse_html("<body><pre>  a\n   b  </pre><p>one</p> <p>two</p></body>");
    let pre = find(&tree, "pre");
    let text = tree.first_child(pre).unwrap();
    assert_eq!(tree.as_text(text), Some("  a\n   b  "));

    let body = find(&tree, "body");
    let between = tree.children(body)[2];
    assert_eq!(tree.as_text(between), Some(" "));
}

#[test]
fn test_attributes_keep_source_order() {
    let tree = parse_html(r#"<a id="x" href="/y" class="c d" data-k="v">link</a>"#);
    let a = tree.as_element(find(&tree, "a")).unwrap();
    let names: Vec<&str> = a.attrs.iter().map(|attr| attr.name.as_str()).collect();
    assert_eq!(names, vec!["id", "href", "class", "data-k"]);
    assert!(a.has_class("d"));
}

#[test]
fn test_tag_names_are_lowercased() {
    let tree = parse_html("<DIV CLASS=Box><SPAN>x</SPAN></DIV>");
    let div = tree.as_element(find(&tree, "div")).unwrap();
    assert_eq!(div.attr("class"), Some("Box"));
    let _ = find(&tree, "span");
}

#[test]
fn test_template_contents_become_children() {
    let tree = parse_html("<body><template><p>inside</p></template></body>");
    let template = find(&tree, "template");
    assert_eq!(element_children(&tree, template), vec!["p"]);
}

#[test]
fn test_void_elements_have_no_children() {
    let tree = parse_html("<body><br>after</body>");
    let br = find(&tree, "br");
    assert!(tree.children(br).is_empty());
    let text = tree.next_sibling(br).unwrap();
    assert_eq!(tree.as_text(text), Some("after"));
}

// ========== decoding ==========

#[test]
fn test_decode_with_explicit_label() {
    let text = decode(b"caf\xE9", Some("latin1")).unwrap();
    assert_eq!(text, "café");
}

#[test]
fn test_decode_unknown_label_fails() {
    let err = decode(b"x", Some("klingon-8")).unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedCharset(ref label) if label == "klingon-8"));
    assert_eq!(err.to_string(), "unsupported charset: klingon-8");
}

#[test]
fn test_decode_sniffs_meta_charset() {
    let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>caf\xE9</body></html>";
    let text = decode(bytes, None).unwrap();
    assert!(text.contains("café"));
}

#[test]
fn test_decode_defaults_to_utf8_and_strips_bom() {
    let text = decode("\u{FEFF}<p>naïve</p>".as_bytes(), None).unwrap();
    assert_eq!(text, "<p>naïve</p>");
}

#[test]
fn test_decode_replaces_malformed_utf8() {
    let text = decode(b"ok\xFFok", None).unwrap();
    assert_eq!(text, "ok\u{FFFD}ok");
}

#[test]
fn test_blank_label_means_sniff() {
    let text = decode(b"plain", Some("  ")).unwrap();
    assert_eq!(text, "plain");
}

#[test]
fn test_parse_document_decodes_then_parses() {
    let tree = parse_document(b"<p>caf\xE9</p>", Some("iso-8859-1")).unwrap();
    let p = find(&tree, "p");
    assert_eq!(tree.as_text(tree.first_child(p).unwrap()), Some("café"));
}
