use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert_eq!(span.to_range(), 10..20);
}

#[test]
fn test_span_merge() {
    let merged = Span::new(10, 20).merge(Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));
}

#[test]
fn test_location_first_line() {
    let src = "5 + 3";
    let index = LineIndex::new(src);
    assert_eq!(index.location(src, 0), Location::new(1, 1));
    assert_eq!(index.location(src, 4), Location::new(1, 5));
}

#[test]
fn test_location_after_newline() {
    let src = "set x to 1\nlog x";
    let index = LineIndex::new(src);
    assert_eq!(index.line_count(), 2);
    assert_eq!(index.location(src, 11), Location::new(2, 1));
    assert_eq!(index.location(src, 15), Location::new(2, 5));
}

#[test]
fn test_location_clamps_past_end() {
    let src = "5 +";
    let index = LineIndex::new(src);
    assert_eq!(index.location(src, 99), Location::new(1, 4));
}

#[test]
fn test_location_counts_chars() {
    let src = "'ñu' + x";
    let index = LineIndex::new(src);
    // 'ñ' is two bytes, so the `+` at byte 6 has five chars before it.
    assert_eq!(index.location(src, 6), Location::new(1, 6));
    assert_eq!(index.location(src, 5), Location::new(1, 5));
}

#[test]
fn test_line_text() {
    let src = "if x\r\n  log x\nend";
    let index = LineIndex::new(src);
    assert_eq!(index.line_text(src, 1), Some("if x"));
    assert_eq!(index.line_text(src, 2), Some("  log x"));
    assert_eq!(index.line_text(src, 3), Some("end"));
    assert_eq!(index.line_text(src, 4), None);
    assert_eq!(index.line_text(src, 0), None);
}
