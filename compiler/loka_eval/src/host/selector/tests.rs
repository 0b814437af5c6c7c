#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

/// ```text
/// <main id="root">
///   <nav class="menu">
///     <a class="item active" href="/">
///     <a class="item">
///   <section>
///     <p class="item active">
/// ```
fn document() -> (Element, Vec<Element>) {
    let root = Element::new("main").with_id("root");
    let nav = Element::new("nav").with_class("menu");
    let home = Element::new("a")
        .with_class("item")
        .with_class("active")
        .with_attribute("href", "/");
    let about = Element::new("a").with_class("item");
    let section = Element::new("section");
    let para = Element::new("p").with_class("item").with_class("active");
    root.append_child(&nav);
    nav.append_child(&home);
    nav.append_child(&about);
    root.append_child(&section);
    section.append_child(&para);
    (root, vec![nav, home, about, section, para])
}

fn ids(found: &[Element], all: &[Element]) -> Vec<usize> {
    found
        .iter()
        .map(|el| all.iter().position(|x| x.ptr_eq(el)).unwrap())
        .collect()
}

#[test]
fn test_class_query_in_document_order() {
    let (root, all) = document();
    let found = Selector::parse(".active").unwrap().query_all(&root);
    assert_eq!(ids(&found, &all), vec![1, 4]);
}

#[test]
fn test_compound_and_type_selectors() {
    let (root, all) = document();
    let found = Selector::parse("a.item").unwrap().query_all(&root);
    assert_eq!(ids(&found, &all), vec![1, 2]);
    let found = Selector::parse("*").unwrap().query_all(&root);
    assert_eq!(found.len(), 5);
}

#[test]
fn test_combinators() {
    let (root, all) = document();
    let found = Selector::parse("nav .active").unwrap().query_all(&root);
    assert_eq!(ids(&found, &all), vec![1]);
    let found = Selector::parse("main > .item").unwrap().query_all(&root);
    assert!(found.is_empty());
    let found = Selector::parse("#root>section>p").unwrap().query_all(&root);
    assert_eq!(ids(&found, &all), vec![4]);
}

#[test]
fn test_attribute_selectors() {
    let (root, all) = document();
    let found = Selector::parse("[href]").unwrap().query_all(&root);
    assert_eq!(ids(&found, &all), vec![1]);
    let found = Selector::parse("a[href='/']").unwrap().query_all(&root);
    assert_eq!(ids(&found, &all), vec![1]);
    let found = Selector::parse("[href=x]").unwrap().query_all(&root);
    assert!(found.is_empty());
}

#[test]
fn test_selector_list() {
    let (root, all) = document();
    let found = Selector::parse("p, nav").unwrap().query_all(&root);
    assert_eq!(ids(&found, &all), vec![0, 4]);
}

#[test]
fn test_query_excludes_scope() {
    let (_, all) = document();
    let nav = &all[0];
    let found = Selector::parse(".menu, .item").unwrap().query_all(nav);
    assert_eq!(ids(&found, &all), vec![1, 2]);
}

#[test]
fn test_invalid_selectors() {
    for text in ["", "a,", "..x", "#", "[x", "> a", "a >", "a!"] {
        let err = Selector::parse(text).unwrap_err();
        assert_eq!(err.selector, text);
    }
}

#[test]
fn test_matches() {
    let (_, all) = document();
    let selector = Selector::parse("nav > a.active").unwrap();
    assert!(selector.matches(&all[1]));
    assert!(!selector.matches(&all[2]));
    assert!(!selector.matches(&all[4]));
}
