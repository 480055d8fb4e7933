//! Example grammars.  These use only the public interface of the
//! `base` and `bits` crates, the same way any other program would.
//!
//! - [`tagged`]: tokens like `number:42` and `diceroll:2d6`, where the
//!   tag decides how the rest of the token is parsed.
//! - [`array`]: nested array literals like `[1,[2,[3],4],5]`.
//! - [`sexpr`]: arithmetic s-expressions like `(+ (* 10 2) 3)`, and
//!   an evaluator for them.
//! - [`ipv4`]: the fixed part (plus options) of an IPv4 header.
#![deny(unsafe_code)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::pedantic)]

use base::prelude::*;

pub mod array;
pub mod ipv4;
pub mod sexpr;
pub mod tagged;

/// How deeply arrays and s-expressions may be nested.  Every level
/// of nesting takes several kilobytes of stack, and this keeps the
/// deepest parse well inside the 2 MiB given to spawned threads.
pub const MAX_NESTING: usize = 64;

/// Runs `parser` and then requires that there is no input left.
pub fn complete<T, R>(parser: Parser<T, R>) -> Parser<T, R>
where
    T: ?Sized + Target + 'static,
    R: 'static,
{
    parser.then(end_of_input()).map(|(value, ())| value)
}

/// Parses decimal digits into a number of type `N`, failing (rather
/// than wrapping round) if the number does not fit.
pub(crate) fn number<N>() -> Parser<str, N>
where
    N: std::str::FromStr + Clone + Send + Sync + 'static,
{
    digits().chain(|d| match d.parse::<N>() {
        Ok(n) => succeed(n),
        Err(_) => fail(&format!("number: {d} is out of range")),
    })
}

#[test]
fn test_complete() {
    let p = complete(letters());
    assert!(!p.run("abc").is_error());
    assert_eq!(
        p.run("abc1").error().map(ParseError::kind),
        Some(ParseErrorKind::TrailingInput)
    );
}

#[test]
fn test_number_out_of_range() {
    assert_eq!(number::<u8>().run("255").result(), Some(&255));
    let state = number::<u8>().run("256");
    assert_eq!(state.error().map(ParseError::kind), Some(ParseErrorKind::Custom));
}
