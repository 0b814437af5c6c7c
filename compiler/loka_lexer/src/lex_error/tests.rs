use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_error_construction() {
    let span = Span::new(10, 15);
    let err = LexError::unterminated_string(span);
    assert_eq!(err.span, span);
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.to_string(), "Unterminated string literal");
    assert!(err.suggestion().is_some());
}

#[test]
fn test_ampersand_suggests_keyword_operator() {
    let err = LexError::invalid_character(Span::new(2, 3), '&');
    assert_eq!(err.to_string(), "Unexpected character `&`");
    assert_eq!(err.suggestion().as_deref(), Some("use `and` or `&&`"));
}

#[test]
fn test_unknown_character_has_no_suggestion() {
    let err = LexError::invalid_character(Span::new(0, 1), '~');
    assert_eq!(err.suggestion(), None);
}

#[test]
fn test_empty_reference_names_sigil() {
    let err = LexError::empty_reference(Span::new(0, 1), '#');
    assert_eq!(err.to_string(), "Expected a name after `#`");
}
