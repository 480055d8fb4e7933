//! Literal strings stored as bytes.

use base::prelude::*;

use super::integer::uint;
use super::width::BitWidth;

/// Reads one byte, which must hold `expected`.  On a mismatch the
/// error is reported at the index where the byte started.
fn expect_char(expected: char) -> Parser<[u8], char> {
    let byte = uint(BitWidth::new::<8>());
    Parser::new(move |state: ParseState<'_, [u8]>| {
        let (start, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        match byte.apply(start.clone()).split() {
            Ok((next, value)) if value == u32::from(expected) => next.with_result(expected),
            Ok((_, value)) => {
                let got = char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER);
                let msg = format!(
                    "raw_string: expected character {expected:?}, but got {got:?} @ index {}",
                    start.index()
                );
                start.fail_with(ParseError::new(ParseErrorKind::LiteralMismatch, msg))
            }
            Err(failed) => failed,
        }
    })
}

/// Matches the bytes of `s`, one byte per character, producing `s`.
/// Only byte-aligned strings are supported; characters which do not
/// fit in a byte can never match.
///
/// # Panics
///
/// Panics if `s` is empty.  Use [`try_raw_string`] to get an error
/// instead.
pub fn raw_string(s: &str) -> Parser<[u8], String> {
    match try_raw_string(s) {
        Ok(p) => p,
        Err(e) => panic!("raw_string({s:?}): {e}"),
    }
}

/// Like [`raw_string`], but reports an empty `s` as an error.
///
/// # Errors
///
/// Returns [`ConstructionError::EmptyLiteral`] if `s` is empty.
pub fn try_raw_string(s: &str) -> Result<Parser<[u8], String>, ConstructionError> {
    if s.is_empty() {
        return Err(ConstructionError::EmptyLiteral);
    }
    let chars: Vec<Parser<[u8], char>> = s.chars().map(expect_char).collect();
    Ok(sequence_of(chars).map(|matched| matched.into_iter().collect::<String>()))
}
