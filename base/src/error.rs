//! Error reporting.
//!
//! Two quite different things can go wrong.  A parser can fail to
//! match its input; that is an ordinary outcome and is recorded in
//! the [`ParseState`](crate::state::ParseState) as a [`ParseError`].
//! Or a grammar can be built from arguments which make no sense (an
//! empty literal, a 40-bit integer field); that is a programming
//! error, reported when the parser is constructed as a
//! [`ConstructionError`].

use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use serde::Serialize;

/// The kinds of parse failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ParseErrorKind {
    /// A primitive tried to read beyond the end of the input.
    UnexpectedEndOfInput,
    /// A literal string (or byte string) did not match.
    LiteralMismatch,
    /// A character-class matcher matched nothing.
    ClassMismatch,
    /// A bit had the wrong value for `zero()` or `one()`.
    BitConstraintViolation,
    /// None of the alternatives of a `choice` matched.
    CombinatorExhausted,
    /// `many_one` or `sep_by_one` collected no results.
    EmptyRepetition,
    /// Raised explicitly by the grammar, via `fail`.
    Custom,
    /// Input remained where the end of input was required.
    TrailingInput,
    /// A repeated parser succeeded without consuming any input, so
    /// repeating it would never terminate.
    NoProgress,
    /// A `recursive` rule was nested more deeply than its limit
    /// allows.  Backtracking combinators pass this on rather than
    /// trying something else.
    RecursionLimit,
}

impl ParseErrorKind {
    /// Fatal errors end the parse.  `choice` does not try further
    /// alternatives after one, and the repetition combinators do not
    /// treat one as the end of the repetition.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, ParseErrorKind::RecursionLimit)
    }
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            ParseErrorKind::UnexpectedEndOfInput => "unexpected end of input",
            ParseErrorKind::LiteralMismatch => "literal mismatch",
            ParseErrorKind::ClassMismatch => "character class mismatch",
            ParseErrorKind::BitConstraintViolation => "bit constraint violation",
            ParseErrorKind::CombinatorExhausted => "no alternative matched",
            ParseErrorKind::EmptyRepetition => "empty repetition",
            ParseErrorKind::Custom => "rejected by grammar",
            ParseErrorKind::TrailingInput => "trailing input",
            ParseErrorKind::NoProgress => "no progress",
            ParseErrorKind::RecursionLimit => "nested too deeply",
        })
    }
}

/// A failure to parse, carried in the parse state.  The message is
/// meant for humans; programs should look at the kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
}

impl ParseError {
    pub fn new<S: Into<String>>(kind: ParseErrorKind, message: S) -> ParseError {
        ParseError {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Replaces the message but keeps the kind.
    #[must_use]
    pub fn with_message(self, message: String) -> ParseError {
        ParseError {
            kind: self.kind,
            message,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.message.as_str())
    }
}

impl Error for ParseError {}

/// Signals that a parser could not be built because its arguments
/// are outside the range the parser supports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstructionError {
    /// Literal matchers need at least one character to match.
    EmptyLiteral,
    /// Integer fields must be between 1 and 32 bits wide.
    BitWidth(u32),
    /// A character-class pattern is not a valid regular expression.
    InvalidPattern { pattern: String, reason: String },
}

impl Display for ConstructionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            ConstructionError::EmptyLiteral => {
                f.write_str("a literal matcher needs at least one character")
            }
            ConstructionError::BitWidth(n) => {
                write!(f, "bit width {n} is outside the supported range 1..=32")
            }
            ConstructionError::InvalidPattern { pattern, reason } => {
                write!(f, "'{pattern}' is not a valid regular expression: {reason}")
            }
        }
    }
}

impl Error for ConstructionError {}

#[test]
fn test_error_map_keeps_kind() {
    let e = ParseError::new(ParseErrorKind::ClassMismatch, "original");
    let e = e.with_message("replaced".to_string());
    assert_eq!(e.kind(), ParseErrorKind::ClassMismatch);
    assert_eq!(e.to_string(), "replaced");
}

#[test]
fn test_only_recursion_limit_is_fatal() {
    assert!(ParseErrorKind::RecursionLimit.is_fatal());
    assert!(!ParseErrorKind::CombinatorExhausted.is_fatal());
    assert!(!ParseErrorKind::NoProgress.is_fatal());
}

#[test]
fn test_construction_error_display() {
    assert_eq!(
        ConstructionError::BitWidth(33).to_string(),
        "bit width 33 is outside the supported range 1..=32"
    );
}
