//! The [`Parser`] type.
//!
//! A parser is nothing more than a shared, pure function from one
//! [`ParseState`] to the next.  It holds no mutable state, so one
//! parser value can be cloned freely, kept in a `static`-like
//! grammar definition and run over any number of unrelated inputs,
//! from any number of threads.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use tracing::{event, Level};

use super::state::ParseState;

type Transition<T, R> =
    dyn for<'t> Fn(ParseState<'t, T>) -> ParseState<'t, T, R> + Send + Sync + 'static;

/// A parser over targets of type `T` (`str` or `[u8]`) which
/// produces results of type `R`.
pub struct Parser<T: ?Sized, R> {
    transition: Arc<Transition<T, R>>,
}

impl<T: ?Sized, R> Clone for Parser<T, R> {
    fn clone(&self) -> Self {
        Parser {
            transition: Arc::clone(&self.transition),
        }
    }
}

impl<T: ?Sized, R> Debug for Parser<T, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str("Parser")
    }
}

impl<T: ?Sized + 'static, R: 'static> Parser<T, R> {
    /// Wraps a state transition function.  This is how primitives
    /// are made; the function must hand an incoming errored state on
    /// unchanged (see [`ParseState::split`]).
    pub fn new<F>(transition: F) -> Parser<T, R>
    where
        F: for<'t> Fn(ParseState<'t, T>) -> ParseState<'t, T, R> + Send + Sync + 'static,
    {
        Parser {
            transition: Arc::new(transition),
        }
    }

    /// Applies this parser to a state part-way through a parse.
    pub fn apply<'t>(&self, state: ParseState<'t, T>) -> ParseState<'t, T, R> {
        (self.transition)(state)
    }

    /// Parses `target` from the beginning.  Parse failures are
    /// reported in the returned state, never by panicking.
    pub fn run<'t>(&self, target: &'t T) -> ParseState<'t, T, R> {
        let final_state = self.apply(ParseState::new(target));
        match final_state.error() {
            Some(e) => {
                event!(
                    Level::TRACE,
                    index = final_state.index(),
                    kind = %e.kind(),
                    "parse failed: {e}"
                );
            }
            None => {
                event!(
                    Level::TRACE,
                    index = final_state.index(),
                    "parse succeeded"
                );
            }
        }
        final_state
    }

    /// Transforms the result of a successful parse.
    #[must_use]
    pub fn map<R2, F>(self, f: F) -> Parser<T, R2>
    where
        R2: 'static,
        F: Fn(R) -> R2 + Send + Sync + 'static,
    {
        Parser::new(move |state| match self.apply(state).split() {
            Ok((state, value)) => state.with_result(f(value)),
            Err(failed) => failed,
        })
    }

    /// Chooses the parser to run next according to the result of
    /// this one.
    ///
    /// This is what makes context-sensitive grammars possible (for
    /// example a tag which says how the rest of a token should be
    /// parsed).  Combined with [`succeed`](crate::text::succeed) and
    /// [`fail`](crate::text::fail) it is also how a decoded value is
    /// validated.
    #[must_use]
    pub fn chain<R2, F>(self, f: F) -> Parser<T, R2>
    where
        R2: 'static,
        F: Fn(R) -> Parser<T, R2> + Send + Sync + 'static,
    {
        Parser::new(move |state| match self.apply(state).split() {
            Ok((state, value)) => f(value).apply(state),
            Err(failed) => failed,
        })
    }

    /// Rewrites the message of an error.  `f` receives the current
    /// message and the index at which the error was recorded.  The
    /// kind of error and the index are kept.
    #[must_use]
    pub fn error_map<F>(self, f: F) -> Parser<T, R>
    where
        F: Fn(&str, usize) -> String + Send + Sync + 'static,
    {
        Parser::new(move |state| {
            let next = self.apply(state);
            match next.error() {
                None => next,
                Some(e) => {
                    let message = f(e.message(), next.index());
                    let e = e.clone().with_message(message);
                    next.fail_with(e)
                }
            }
        })
    }

    /// Runs `self` and then `next`, producing both results.
    #[must_use]
    pub fn then<R2>(self, next: Parser<T, R2>) -> Parser<T, (R, R2)>
    where
        R2: 'static,
    {
        Parser::new(move |state| {
            let (state, first) = match self.apply(state).split() {
                Ok(parts) => parts,
                Err(failed) => return failed,
            };
            match next.apply(state).split() {
                Ok((state, second)) => state.with_result((first, second)),
                Err(failed) => failed,
            }
        })
    }
}
