use super::super::combinators::sequence_of;
use super::super::error::ParseErrorKind;
use super::*;

fn kind_of<R>(state: &ParseState<'_, str, R>) -> Option<ParseErrorKind> {
    state.error().map(ParseError::kind)
}

#[test]
fn test_literal_match() {
    let state = literal("some").run("somestring");
    assert_eq!(state.result(), Some(&"some".to_string()));
    assert_eq!(state.index(), 4);
}

#[test]
fn test_literal_sequence() {
    let p = sequence_of(vec![literal("some"), literal("string")]);
    let state = p.run("somestring");
    assert_eq!(
        state.result(),
        Some(&vec!["some".to_string(), "string".to_string()])
    );
    assert_eq!(state.index(), 10);
}

#[test]
fn test_literal_end_of_input() {
    let p = literal("a").then(literal("b"));
    let state = p.run("a");
    assert_eq!(kind_of(&state), Some(ParseErrorKind::UnexpectedEndOfInput));
    assert_eq!(state.index(), 1);
    assert!(state
        .error()
        .map(|e| e.message().contains("unexpected end of input"))
        .unwrap_or(false));
}

#[test]
fn test_literal_mismatch_quotes_ten_characters() {
    let state = literal("hello").run("abcdefghijklmnop");
    assert_eq!(kind_of(&state), Some(ParseErrorKind::LiteralMismatch));
    let message = state.error().map(ParseError::message).unwrap_or_default();
    assert!(message.contains("\"hello\""), "{message}");
    assert!(message.contains("\"abcdefghij\""), "{message}");
    assert!(!message.contains("abcdefghijk"), "{message}");
    assert_eq!(state.index(), 0);
}

#[test]
fn test_literal_partial_input_is_a_mismatch() {
    let state = literal("hello").run("hel");
    assert_eq!(kind_of(&state), Some(ParseErrorKind::LiteralMismatch));
}

#[test]
#[should_panic(expected = "literal")]
fn test_empty_literal_panics() {
    let _ = literal("");
}

#[test]
fn test_try_literal_rejects_empty() {
    assert_eq!(try_literal("").err(), Some(ConstructionError::EmptyLiteral));
    assert!(try_literal("x").is_ok());
}

#[test]
fn test_letters_greedy() {
    let state = letters().run("abcDEF123");
    assert_eq!(state.result(), Some(&"abcDEF".to_string()));
    assert_eq!(state.index(), 6);
}

#[test]
fn test_letters_excludes_punctuation() {
    // [A-z] would also have matched '[' and '_'.
    let state = letters().run("ab_cd");
    assert_eq!(state.result(), Some(&"ab".to_string()));
}

#[test]
fn test_letters_failures() {
    assert_eq!(
        kind_of(&letters().run("")),
        Some(ParseErrorKind::UnexpectedEndOfInput)
    );
    assert_eq!(
        kind_of(&letters().run("123")),
        Some(ParseErrorKind::ClassMismatch)
    );
}

#[test]
fn test_digits() {
    let state = digits().run("2024-10");
    assert_eq!(state.result(), Some(&"2024".to_string()));
    assert_eq!(state.index(), 4);
    assert_eq!(
        kind_of(&digits().run("x1")),
        Some(ParseErrorKind::ClassMismatch)
    );
}

#[test]
fn test_class_matchers_start_at_cursor() {
    let p = digits().then(letters()).then(digits());
    let state = p.run("12ab34");
    assert_eq!(state.index(), 6);
    assert_eq!(
        state.result(),
        Some(&(("12".to_string(), "ab".to_string()), "34".to_string()))
    );
}

#[test]
fn test_regex() {
    let hex = regex("[0-9a-f]+").expect("valid pattern");
    let state = hex.run("c0ffee!");
    assert_eq!(state.result(), Some(&"c0ffee".to_string()));
    assert_eq!(state.index(), 6);
    assert_eq!(kind_of(&hex.run("xyz")), Some(ParseErrorKind::ClassMismatch));
}

#[test]
fn test_regex_zero_length_match_fails() {
    let maybe_spaces = regex(" *").expect("valid pattern");
    assert_eq!(
        kind_of(&maybe_spaces.run("abc")),
        Some(ParseErrorKind::ClassMismatch)
    );
}

#[test]
fn test_regex_invalid_pattern() {
    assert!(matches!(
        regex("(unclosed"),
        Err(ConstructionError::InvalidPattern { .. })
    ));
}

#[test]
fn test_succeed_consumes_nothing() {
    let state = succeed::<str, _>(42_u32).run("abc");
    assert_eq!(state.result(), Some(&42));
    assert_eq!(state.index(), 0);
}

#[test]
fn test_fail_consumes_nothing() {
    let state = fail::<str, u32>("always").run("abc");
    assert_eq!(kind_of(&state), Some(ParseErrorKind::Custom));
    assert_eq!(state.error().map(ParseError::message), Some("always"));
    assert_eq!(state.index(), 0);
}

#[test]
fn test_errors_are_not_cleared() {
    // Once something has failed, later primitives must not replace
    // the error with their own success.
    let p = fail::<str, String>("first").then(succeed(1_u8));
    let state = p.run("");
    assert_eq!(state.error().map(ParseError::message), Some("first"));
}

#[test]
fn test_end_of_input() {
    let p = letters().then(end_of_input());
    assert!(!p.run("abc").is_error());
    let state = p.run("abc1");
    assert_eq!(kind_of(&state), Some(ParseErrorKind::TrailingInput));
    assert_eq!(state.index(), 3);
}

#[test]
fn test_end_of_input_on_bytes() {
    let bytes: [u8; 0] = [];
    assert!(!end_of_input::<[u8]>().run(&bytes[..]).is_error());
    assert!(end_of_input::<[u8]>().run(&[0_u8][..]).is_error());
}
