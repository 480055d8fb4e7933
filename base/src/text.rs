//! Primitive parsers.
//!
//! Most of these work on text (`str` targets).  [`succeed`],
//! [`fail`] and [`end_of_input`] consume nothing and so work with
//! any target.

use super::error::{ConstructionError, ParseError, ParseErrorKind};
use super::parser::Parser;
use super::rx::{compile_anchored, matching_prefix, CharClass};
use super::state::{ParseState, Target};

/// How many characters of the input we quote when a literal fails
/// to match.
const CONTEXT_CHARS: usize = 10;

static LETTERS: CharClass = CharClass::new("letters", "[A-Za-z]+");
static DIGITS: CharClass = CharClass::new("digits", "[0-9]+");

/// The unconsumed text at the cursor.  An index which is past the
/// end (or which is not on a character boundary) leaves nothing to
/// read.
fn remaining<'t>(state: &ParseState<'t, str>) -> &'t str {
    state.target().get(state.index()..).unwrap_or_default()
}

/// Matches exactly `s`, producing `s`.
///
/// # Panics
///
/// Panics if `s` is empty; an empty literal would match anywhere
/// and is always a mistake in the grammar.  Use [`try_literal`] to
/// get an error instead.
pub fn literal(s: &str) -> Parser<str, String> {
    match try_literal(s) {
        Ok(p) => p,
        Err(e) => panic!("literal({s:?}): {e}"),
    }
}

/// Like [`literal`], but reports an empty `s` as an error.
///
/// # Errors
///
/// Returns [`ConstructionError::EmptyLiteral`] if `s` is empty.
pub fn try_literal(s: &str) -> Result<Parser<str, String>, ConstructionError> {
    if s.is_empty() {
        return Err(ConstructionError::EmptyLiteral);
    }
    let expected = s.to_string();
    Ok(Parser::new(move |state: ParseState<'_, str>| {
        let (state, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        let rest = remaining(&state);
        if rest.is_empty() {
            let msg = format!("literal: tried to match {expected:?}, but got unexpected end of input");
            state.fail_with(ParseError::new(ParseErrorKind::UnexpectedEndOfInput, msg))
        } else if rest.starts_with(expected.as_str()) {
            let next = state.index() + expected.len();
            state.advance(next, expected.clone())
        } else {
            let context: String = rest.chars().take(CONTEXT_CHARS).collect();
            let msg = format!(
                "literal: tried to match {expected:?}, but got {context:?} @ index {}",
                state.index()
            );
            state.fail_with(ParseError::new(ParseErrorKind::LiteralMismatch, msg))
        }
    }))
}

fn class_parser(class: &'static CharClass) -> Parser<str, String> {
    Parser::new(move |state: ParseState<'_, str>| {
        let (state, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        match_prefix(state, class.name(), class.regex())
    })
}

fn match_prefix<'t>(
    state: ParseState<'t, str>,
    name: &str,
    rx: &regex::Regex,
) -> ParseState<'t, str, String> {
    let rest = remaining(&state);
    if rest.is_empty() {
        let msg = format!("{name}: got unexpected end of input");
        return state.fail_with(ParseError::new(ParseErrorKind::UnexpectedEndOfInput, msg));
    }
    match matching_prefix(rx, rest) {
        Some(matched) => {
            let next = state.index() + matched.len();
            state.advance(next, matched.to_string())
        }
        None => {
            let msg = format!("{name}: couldn't match {name} @ index {}", state.index());
            state.fail_with(ParseError::new(ParseErrorKind::ClassMismatch, msg))
        }
    }
}

/// Matches the longest run of ASCII letters at the cursor.  At
/// least one letter is needed.
pub fn letters() -> Parser<str, String> {
    class_parser(&LETTERS)
}

/// Matches the longest run of decimal digits at the cursor.  At
/// least one digit is needed.
pub fn digits() -> Parser<str, String> {
    class_parser(&DIGITS)
}

/// Matches the text at the cursor against a regular expression.
/// The match is anchored at the cursor, and an empty match counts
/// as a failure, just as with [`letters`] and [`digits`].
///
/// # Errors
///
/// Returns [`ConstructionError::InvalidPattern`] if `pattern` does
/// not compile.
pub fn regex(pattern: &str) -> Result<Parser<str, String>, ConstructionError> {
    let rx = compile_anchored(pattern)?;
    let name = format!("regex /{pattern}/");
    Ok(Parser::new(move |state: ParseState<'_, str>| {
        let (state, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        match_prefix(state, &name, &rx)
    }))
}

/// Always succeeds with `value`, consuming nothing.
pub fn succeed<T, R>(value: R) -> Parser<T, R>
where
    T: ?Sized + 'static,
    R: Clone + Send + Sync + 'static,
{
    Parser::new(move |state: ParseState<'_, T>| match state.split() {
        Ok((state, ())) => state.with_result(value.clone()),
        Err(failed) => failed,
    })
}

/// Always fails with `message`, consuming nothing.
pub fn fail<T, R>(message: &str) -> Parser<T, R>
where
    T: ?Sized + 'static,
    R: 'static,
{
    let message = message.to_string();
    Parser::new(move |state: ParseState<'_, T>| match state.split() {
        Ok((state, ())) => {
            state.fail_with(ParseError::new(ParseErrorKind::Custom, message.as_str()))
        }
        Err(failed) => failed,
    })
}

/// Succeeds only when all of the input has been consumed.
pub fn end_of_input<T>() -> Parser<T, ()>
where
    T: ?Sized + Target + 'static,
{
    Parser::new(|state: ParseState<'_, T>| {
        let (state, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        let end = state.target().end();
        if state.index() >= end {
            state.with_result(())
        } else {
            let msg = format!(
                "end_of_input: expected end of input @ index {} but input continues to index {end}",
                state.index()
            );
            state.fail_with(ParseError::new(ParseErrorKind::TrailingInput, msg))
        }
    })
}

#[cfg(test)]
mod tests;
