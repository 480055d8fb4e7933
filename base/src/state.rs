//! The parse state threaded through every parsing step.
//!
//! A [`ParseState`] is a snapshot: parsers take one by value and
//! return a new one.  Nothing ever modifies a snapshot which some
//! other part of the parse may still want to look at; when a
//! combinator needs to retry from the same place (for example
//! `choice` trying its next alternative) it keeps a clone of the
//! pre-attempt snapshot.
//!
//! Once an error has been recorded, the index is frozen and no
//! result is available.  Every parser must hand an errored state on
//! unchanged; [`ParseState::split`] is the usual way to do that.

use std::fmt::{self, Debug, Formatter};

use super::error::ParseError;

/// Something a parser can run over.
pub trait Target {
    /// The index one past the last position a parser can read.
    fn end(&self) -> usize;
}

/// Text is addressed by byte offset.  Text grammars in this crate
/// only deal in single-byte characters, so that is also the
/// character offset.
impl Target for str {
    fn end(&self) -> usize {
        self.len()
    }
}

/// Binary buffers are addressed by bit offset, most significant bit
/// of each byte first.
impl Target for [u8] {
    fn end(&self) -> usize {
        self.len() * 8
    }
}

pub struct ParseState<'t, T: ?Sized, R = ()> {
    target: &'t T,
    index: usize,
    outcome: Result<R, ParseError>,
}

impl<'t, T: ?Sized> ParseState<'t, T> {
    /// The state a parse starts from: index 0, no error.
    pub fn new(target: &'t T) -> ParseState<'t, T> {
        ParseState {
            target,
            index: 0,
            outcome: Ok(()),
        }
    }
}

impl<'t, T: ?Sized, R> ParseState<'t, T, R> {
    #[must_use]
    pub fn target(&self) -> &'t T {
        self.target
    }

    /// For text this is a byte offset, for binary input a bit offset.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The value produced by the most recent successful step, or
    /// `None` if an error has been recorded.
    #[must_use]
    pub fn result(&self) -> Option<&R> {
        self.outcome.as_ref().ok()
    }

    #[must_use]
    pub fn error(&self) -> Option<&ParseError> {
        self.outcome.as_ref().err()
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }

    /// # Errors
    ///
    /// Returns the recorded error, if there is one.
    pub fn into_result(self) -> Result<R, ParseError> {
        self.outcome
    }

    /// Moves the cursor to `index` and records `value` as the result.
    pub fn advance<R2>(self, index: usize, value: R2) -> ParseState<'t, T, R2> {
        debug_assert!(index >= self.index, "the cursor must not move backwards");
        ParseState {
            target: self.target,
            index,
            outcome: Ok(value),
        }
    }

    /// Replaces the result, leaving the cursor where it is.
    pub fn with_result<R2>(self, value: R2) -> ParseState<'t, T, R2> {
        ParseState {
            target: self.target,
            index: self.index,
            outcome: Ok(value),
        }
    }

    /// Records an error at the current index.
    pub fn fail_with<R2>(self, error: ParseError) -> ParseState<'t, T, R2> {
        ParseState {
            target: self.target,
            index: self.index,
            outcome: Err(error),
        }
    }

    /// Separates a successful state into its value and a state (at
    /// the same index) from which parsing can continue.  An errored
    /// state is handed back, unchanged apart from its result type,
    /// so that the caller can return it.
    ///
    /// # Errors
    ///
    /// Returns the errored state if an error has been recorded.
    pub fn split<R2>(self) -> Result<(ParseState<'t, T>, R), ParseState<'t, T, R2>> {
        let ParseState {
            target,
            index,
            outcome,
        } = self;
        match outcome {
            Ok(value) => Ok((
                ParseState {
                    target,
                    index,
                    outcome: Ok(()),
                },
                value,
            )),
            Err(e) => Err(ParseState {
                target,
                index,
                outcome: Err(e),
            }),
        }
    }
}

impl<T: ?Sized, R: Clone> Clone for ParseState<'_, T, R> {
    fn clone(&self) -> Self {
        ParseState {
            target: self.target,
            index: self.index,
            outcome: self.outcome.clone(),
        }
    }
}

impl<T: ?Sized, R: PartialEq> PartialEq for ParseState<'_, T, R> {
    /// Two states are equal when they are over the same target (the
    /// same object, not merely equal contents) and agree on the
    /// index and the outcome.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(self.target as *const T, other.target as *const T)
            && self.index == other.index
            && self.outcome == other.outcome
    }
}

impl<T: ?Sized, R: Debug> Debug for ParseState<'_, T, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let mut d = f.debug_struct("ParseState");
        d.field("index", &self.index);
        match &self.outcome {
            Ok(value) => d.field("result", value),
            Err(e) => d.field("error", e),
        };
        d.finish_non_exhaustive()
    }
}
