//! Integration tests for selector expression compilation and matching.

use puper_dom::{DomTree, ElementData, NodeId, NodeType};
use puper_select::{AttributeSelector, SimpleSelector, compile_selector};

fn make_element(tag: &str, id: Option<&str>, classes: &[&str]) -> ElementData {
    let mut element = ElementData::new(tag);
    if let Some(id_val) = id {
        element = element.with_attr("id", id_val);
    }
    if !classes.is_empty() {
        element = element.with_attr("class", classes.join(" "));
    }
    element
}

fn matches(selector: &str, element: &ElementData) -> bool {
    compile_selector(selector).unwrap().matches_element(element)
}

// ========== parsing ==========

#[test]
fn test_parse_type_selector() {
    let selector = compile_selector("body").unwrap();
    assert_eq!(selector.simple_selectors(), &[SimpleSelector::Type("body".into())]);
    assert_eq!(selector.source(), "body");
}

#[test]
fn test_parse_class_and_id_selectors() {
    assert_eq!(
        compile_selector(".highlight").unwrap().simple_selectors(),
        &[SimpleSelector::Class("highlight".into())]
    );
    assert_eq!(
        compile_selector("#main-content").unwrap().simple_selectors(),
        &[SimpleSelector::Id("main-content".into())]
    );
}

#[test]
fn test_parse_compound_selector() {
    let selector = compile_selector("div.highlight#main[lang=en]").unwrap();
    assert_eq!(
        selector.simple_selectors(),
        &[
            SimpleSelector::Type("div".into()),
            SimpleSelector::Class("highlight".into()),
            SimpleSelector::Id("main".into()),
            SimpleSelector::Attribute(AttributeSelector::Equals("lang".into(), "en".into())),
        ]
    );
}

#[test]
fn test_parse_attribute_operators() {
    let cases = [
        ("[href]", AttributeSelector::Exists("href".into())),
        ("[type=text]", AttributeSelector::Equals("type".into(), "text".into())),
        ("[class~=active]", AttributeSelector::Includes("class".into(), "active".into())),
        ("[lang|=en]", AttributeSelector::DashMatch("lang".into(), "en".into())),
        ("[href^=https]", AttributeSelector::PrefixMatch("href".into(), "https".into())),
        (r#"[src$=".png"]"#, AttributeSelector::SuffixMatch("src".into(), ".png".into())),
        ("[data-theme*='dark mode']", AttributeSelector::SubstringMatch(
            "data-theme".into(),
            "dark mode".into(),
        )),
        ("[ title = 'x' ]", AttributeSelector::Equals("title".into(), "x".into())),
    ];
    for (raw, expected) in cases {
        let selector = compile_selector(raw).unwrap();
        assert_eq!(
            selector.simple_selectors(),
            &[SimpleSelector::Attribute(expected)],
            "parsing {raw}"
        );
    }
}

#[test]
fn test_parse_universal_inside_compound() {
    let selector = compile_selector("*.note").unwrap();
    assert_eq!(
        selector.simple_selectors(),
        &[SimpleSelector::Universal, SimpleSelector::Class("note".into())]
    );
}

// ========== syntax errors ==========

#[test]
fn test_unterminated_attribute_is_a_syntax_error() {
    let err = compile_selector("[bad").unwrap_err();
    assert_eq!(err.selector, "[bad");
    assert!(err.to_string().contains("\"[bad\""));
}

#[test]
fn test_malformed_selectors_are_rejected() {
    for raw in [
        "",
        "[",
        "[]",
        "[=x]",
        "[a=]",
        "[a='x]",
        "[a!=x]",
        "[a=x",
        ".",
        "#",
        "div.",
        "a:hover",
        "div p",
        "div>p",
        "a~b",
        ".note div",
        "p*",
        "%",
    ] {
        let err = compile_selector(raw).unwrap_err();
        assert_eq!(err.selector, raw);
    }
}

// ========== matching ==========

#[test]
fn test_type_selector_ignores_ascii_case() {
    let element = make_element("DIV", None, &[]);
    assert!(matches("div", &element));
    assert!(!matches("span", &element));
}

#[test]
fn test_class_selector_matches_one_token() {
    let element = make_element("p", None, &["lead", "note"]);
    assert!(matches(".note", &element));
    assert!(matches(".lead.note", &element));
    assert!(!matches(".not", &element));
    assert!(!matches(".Note", &element));
}

#[test]
fn test_id_selector_is_case_sensitive() {
    let element = make_element("section", Some("Main"), &[]);
    assert!(matches("#Main", &element));
    assert!(!matches("#main", &element));
}

#[test]
fn test_compound_requires_every_part() {
    let element = make_element("div", Some("main"), &["box"]);
    assert!(matches("div.box#main", &element));
    assert!(!matches("div.box#other", &element));
    assert!(!matches("span.box#main", &element));
}

#[test]
fn test_attribute_matching() {
    let element = ElementData::new("a")
        .with_attr("href", "https://example.com/a.png")
        .with_attr("lang", "en-US")
        .with_attr("rel", "nofollow noopener");

    assert!(matches("[href]", &element));
    assert!(matches("[HREF]", &element));
    assert!(!matches("[title]", &element));
    assert!(matches("[lang=en-US]", &element));
    assert!(!matches("[lang=en-us]", &element));
    assert!(matches("[lang|=en]", &element));
    assert!(!matches("[lang|=e]", &element));
    assert!(matches("[rel~=noopener]", &element));
    assert!(!matches("[rel~=noop]", &element));
    assert!(matches("[href^=https]", &element));
    assert!(matches(r#"[href$=".png"]"#, &element));
    assert!(matches("[href*=example]", &element));
    assert!(!matches("[href*='']", &element));
}

#[test]
fn test_only_elements_match() {
    let mut tree = DomTree::new();
    let p = tree.append(NodeId::ROOT, NodeType::Element(ElementData::new("p")));
    let text = tree.append(p, NodeType::Text("p".to_string()));
    let comment = tree.append(p, NodeType::Comment("p".to_string()));

    let selector = compile_selector("p").unwrap();
    assert!(selector.matches(&tree, p));
    assert!(!selector.matches(&tree, text));
    assert!(!selector.matches(&tree, comment));
    assert!(!selector.matches(&tree, NodeId::ROOT));

    let universal = compile_selector("*.x").unwrap();
    assert!(!universal.matches(&tree, text));
}
