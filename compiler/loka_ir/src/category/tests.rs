use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_every_tag_belongs_to_exactly_one_category() {
    let total: usize = Category::ALL.into_iter().map(|c| c.tags().count()).sum();
    assert_eq!(total, NodeTag::ALL.len());
}

#[test]
fn test_control_category_owns_signal_commands() {
    let tags: Vec<_> = Category::Control.tags().collect();
    for tag in [
        NodeTag::Halt,
        NodeTag::Break,
        NodeTag::Continue,
        NodeTag::Return,
        NodeTag::Exit,
    ] {
        assert!(tags.contains(&tag), "{tag} should be a control node");
    }
}

#[test]
fn test_category_names_round_trip_through_from_str() {
    for category in Category::ALL {
        assert_eq!(category.as_str().parse::<Category>(), Ok(category));
    }
    assert_eq!(
        "widgets".parse::<Category>(),
        Err(UnknownCategory("widgets".to_string()))
    );
}

#[test]
fn test_tag_names_are_distinct() {
    let mut names: Vec<_> = NodeTag::ALL.iter().map(|t| t.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), NodeTag::ALL.len());
}

#[test]
fn test_operator_spellings_normalize() {
    use crate::{BinaryOp, UnaryOp};
    assert_eq!(BinaryOp::from_spelling("is"), Some(BinaryOp::Eq));
    assert_eq!(BinaryOp::from_spelling("=="), Some(BinaryOp::Eq));
    assert_eq!(BinaryOp::from_spelling("is not"), Some(BinaryOp::NotEq));
    assert_eq!(BinaryOp::from_spelling("!="), Some(BinaryOp::NotEq));
    assert_eq!(BinaryOp::from_spelling("match"), Some(BinaryOp::Matches));
    assert_eq!(BinaryOp::from_spelling("matches"), Some(BinaryOp::Matches));
    assert_eq!(BinaryOp::from_spelling("mod"), Some(BinaryOp::Mod));
    assert_eq!(BinaryOp::from_spelling("=~"), None);
    assert_eq!(UnaryOp::from_spelling("!"), Some(UnaryOp::Not));
    assert_eq!(UnaryOp::from_spelling("no"), Some(UnaryOp::No));
}
