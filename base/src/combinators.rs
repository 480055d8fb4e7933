//! Combinators: functions which build new parsers out of existing
//! ones.
//!
//! Each of them starts by checking the incoming state for an error
//! and, if there is one, returns it unchanged.  Nothing else in the
//! engine stops a failed parse from carrying on.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{event, Level};

use super::error::{ParseError, ParseErrorKind};
use super::parser::Parser;
use super::state::ParseState;

/// Runs `parsers` one after the other, collecting their results.
/// The first failure ends the sequence; later parsers are not run.
pub fn sequence_of<T, R>(parsers: Vec<Parser<T, R>>) -> Parser<T, Vec<R>>
where
    T: ?Sized + 'static,
    R: 'static,
{
    Parser::new(move |state: ParseState<'_, T>| {
        let (mut state, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        let mut results: Vec<R> = Vec::with_capacity(parsers.len());
        for p in &parsers {
            match p.apply(state).split() {
                Ok((next, value)) => {
                    results.push(value);
                    state = next;
                }
                Err(failed) => {
                    return failed;
                }
            }
        }
        state.with_result(results)
    })
}

/// Tries each of `parsers` in turn, each from the same starting
/// point, and produces the result of the first which succeeds.  If
/// none do, the error says so; the errors of the individual
/// alternatives are not kept.  A [fatal](ParseErrorKind::is_fatal)
/// error ends the search and is passed on as it is.
pub fn choice<T, R>(parsers: Vec<Parser<T, R>>) -> Parser<T, R>
where
    T: ?Sized + 'static,
    R: 'static,
{
    Parser::new(move |state: ParseState<'_, T>| {
        let (start, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        for p in &parsers {
            let attempt = p.apply(start.clone());
            if !attempt.is_error() || is_fatal(&attempt) {
                return attempt;
            }
        }
        event!(
            Level::TRACE,
            index = start.index(),
            alternatives = parsers.len(),
            "choice exhausted"
        );
        let msg = format!(
            "choice: unable to match with any parser @ index {}",
            start.index()
        );
        start.fail_with(ParseError::new(ParseErrorKind::CombinatorExhausted, msg))
    })
}

fn is_fatal<T: ?Sized, R>(state: &ParseState<'_, T, R>) -> bool {
    state.error().is_some_and(|e| e.kind().is_fatal())
}

fn no_progress<'t, T: ?Sized, R>(
    state: ParseState<'t, T>,
    combinator: &str,
) -> ParseState<'t, T, R> {
    let msg = format!(
        "{combinator}: parser succeeded without consuming input @ index {}, so repeating it would never finish",
        state.index()
    );
    state.fail_with(ParseError::new(ParseErrorKind::NoProgress, msg))
}

/// The repetition shared by [`many`] and [`many_one`].  The outer
/// `Err` is a state which must be returned as-is.
fn repeat<'t, T, R>(
    parser: &Parser<T, R>,
    start: ParseState<'t, T>,
    combinator: &str,
) -> Result<(ParseState<'t, T>, Vec<R>), ParseState<'t, T, Vec<R>>>
where
    T: ?Sized + 'static,
    R: 'static,
{
    let mut state = start;
    let mut results: Vec<R> = Vec::new();
    loop {
        let before = state.index();
        match parser.apply(state.clone()).split::<Vec<R>>() {
            Ok((next, value)) => {
                if next.index() == before {
                    return Err(no_progress(next, combinator));
                }
                results.push(value);
                state = next;
            }
            Err(failed) if is_fatal(&failed) => return Err(failed),
            Err(_) => {
                // The failed attempt is discarded; we carry on from
                // where it started.
                return Ok((state, results));
            }
        }
    }
}

/// Matches `parser` zero or more times.  This never fails because
/// `parser` stops matching.
///
/// It does fail if `parser` succeeds without consuming any input,
/// since otherwise it would go round forever, and it passes on a
/// fatal error from `parser`.
pub fn many<T, R>(parser: Parser<T, R>) -> Parser<T, Vec<R>>
where
    T: ?Sized + 'static,
    R: 'static,
{
    Parser::new(move |state: ParseState<'_, T>| {
        let (start, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        match repeat(&parser, start, "many") {
            Ok((state, results)) => state.with_result(results),
            Err(failed) => failed,
        }
    })
}

/// Matches `parser` one or more times.
pub fn many_one<T, R>(parser: Parser<T, R>) -> Parser<T, Vec<R>>
where
    T: ?Sized + 'static,
    R: 'static,
{
    Parser::new(move |state: ParseState<'_, T>| {
        let (start, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        match repeat(&parser, start.clone(), "many_one") {
            Ok((_, results)) if results.is_empty() => {
                let msg = format!(
                    "many_one: unable to match any input using parser @ index {}",
                    start.index()
                );
                start.fail_with(ParseError::new(ParseErrorKind::EmptyRepetition, msg))
            }
            Ok((state, results)) => state.with_result(results),
            Err(failed) => failed,
        }
    })
}

/// The separated repetition shared by [`sep_by`] and [`sep_by_one`].
fn repeat_separated<'t, T, S, R>(
    separator: &Parser<T, S>,
    value: &Parser<T, R>,
    start: ParseState<'t, T>,
    combinator: &str,
) -> Result<(ParseState<'t, T>, Vec<R>), ParseState<'t, T, Vec<R>>>
where
    T: ?Sized + 'static,
    S: 'static,
    R: 'static,
{
    let mut state = start;
    let mut results: Vec<R> = Vec::new();
    loop {
        let before = state.index();
        let after_value = match value.apply(state.clone()).split::<Vec<R>>() {
            Ok((next, v)) => {
                results.push(v);
                next
            }
            Err(failed) if is_fatal(&failed) => return Err(failed),
            Err(_) => break,
        };
        match separator.apply(after_value.clone()).split::<Vec<R>>() {
            Ok((next, _)) => {
                if next.index() == before {
                    return Err(no_progress(next, combinator));
                }
                state = next;
            }
            Err(failed) if is_fatal(&failed) => return Err(failed),
            Err(_) => {
                state = after_value;
                break;
            }
        }
    }
    Ok((state, results))
}

/// Matches zero or more `value`s separated by `separator`.  Use it
/// like this:
///
/// ```
/// use base::prelude::*;
///
/// let numbers = sep_by(literal(","))(digits());
/// let state = numbers.run("1,22,333");
/// assert_eq!(state.result(), Some(&vec!["1".to_string(), "22".to_string(), "333".to_string()]));
/// ```
///
/// A separator which is not followed by another value is still
/// consumed.
pub fn sep_by<T, S, R>(separator: Parser<T, S>) -> impl Fn(Parser<T, R>) -> Parser<T, Vec<R>>
where
    T: ?Sized + 'static,
    S: 'static,
    R: 'static,
{
    move |value: Parser<T, R>| {
        let separator = separator.clone();
        Parser::new(move |state: ParseState<'_, T>| {
            let (start, ()) = match state.split() {
                Ok(parts) => parts,
                Err(failed) => return failed,
            };
            match repeat_separated(&separator, &value, start, "sep_by") {
                Ok((state, results)) => state.with_result(results),
                Err(failed) => failed,
            }
        })
    }
}

/// Matches one or more `value`s separated by `separator`.
pub fn sep_by_one<T, S, R>(separator: Parser<T, S>) -> impl Fn(Parser<T, R>) -> Parser<T, Vec<R>>
where
    T: ?Sized + 'static,
    S: 'static,
    R: 'static,
{
    move |value: Parser<T, R>| {
        let separator = separator.clone();
        Parser::new(move |state: ParseState<'_, T>| {
            let (start, ()) = match state.split() {
                Ok(parts) => parts,
                Err(failed) => return failed,
            };
            match repeat_separated(&separator, &value, start.clone(), "sep_by_one") {
                Ok((_, results)) if results.is_empty() => {
                    let msg = format!(
                        "sep_by_one: unable to capture any results @ index {}",
                        start.index()
                    );
                    start.fail_with(ParseError::new(ParseErrorKind::EmptyRepetition, msg))
                }
                Ok((state, results)) => state.with_result(results),
                Err(failed) => failed,
            }
        })
    }
}

/// Matches `left`, then the content, then `right`, keeping only the
/// result of the content.
///
/// ```
/// use base::prelude::*;
///
/// let in_brackets = between(literal("("), literal(")"));
/// assert_eq!(in_brackets(letters()).run("(abc)").result(), Some(&"abc".to_string()));
/// ```
pub fn between<T, L, Rt, R>(
    left: Parser<T, L>,
    right: Parser<T, Rt>,
) -> impl Fn(Parser<T, R>) -> Parser<T, R>
where
    T: ?Sized + 'static,
    L: 'static,
    Rt: 'static,
    R: 'static,
{
    move |content: Parser<T, R>| {
        left.clone()
            .then(content)
            .then(right.clone())
            .map(|((_, content), _)| content)
    }
}

/// Defers building a parser until it is first used.
///
/// Grammars which refer to themselves (an array whose elements may
/// be arrays, an expression whose operands are expressions) cannot
/// be built eagerly: building the rule would first need the rule to
/// exist.  Wrapping the reference in `lazy` breaks the cycle.
/// `thunk` is called once, the first time the parser runs, and the
/// parser it returns is kept for later runs.
///
/// Each `lazy` keeps its own copy of what `thunk` built.  If `thunk`
/// builds the enclosing rule again (rather than returning a clone of
/// an existing parser) every nesting level gets a new copy; use
/// [`recursive`] for rules which refer to themselves.
pub fn lazy<T, R, F>(thunk: F) -> Parser<T, R>
where
    T: ?Sized + 'static,
    R: 'static,
    F: Fn() -> Parser<T, R> + Send + Sync + 'static,
{
    let resolved: OnceLock<Parser<T, R>> = OnceLock::new();
    Parser::new(move |state: ParseState<'_, T>| {
        let (state, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        let parser = resolved.get_or_init(|| {
            event!(Level::TRACE, "resolving lazy parser");
            thunk()
        });
        parser.apply(state)
    })
}

thread_local! {
    /// For each `recursive` rule being applied on this thread, how
    /// deeply it is nested.  Keyed by the address of the rule's cell.
    static NESTING: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());
}

/// Holds one level of nesting of a `recursive` rule, giving it up
/// when dropped.
struct NestingGuard {
    rule: usize,
}

impl NestingGuard {
    fn enter(rule: usize, max_depth: usize) -> Option<NestingGuard> {
        NESTING.with(|nesting| {
            let mut nesting = nesting.borrow_mut();
            let depth = nesting.get(&rule).copied().unwrap_or(0);
            if depth >= max_depth {
                None
            } else {
                nesting.insert(rule, depth + 1);
                Some(NestingGuard { rule })
            }
        })
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        let _ = NESTING.try_with(|nesting| {
            let mut nesting = nesting.borrow_mut();
            if let Some(depth) = nesting.get_mut(&self.rule) {
                *depth -= 1;
                if *depth == 0 {
                    nesting.remove(&self.rule);
                }
            }
        });
    }
}

type RuleCell<T, R> = OnceLock<Parser<T, R>>;

fn apply_rule<'t, T, R>(
    rule: &Arc<RuleCell<T, R>>,
    max_depth: usize,
    state: ParseState<'t, T>,
) -> ParseState<'t, T, R>
where
    T: ?Sized + 'static,
    R: 'static,
{
    let (state, ()) = match state.split() {
        Ok(parts) => parts,
        Err(failed) => return failed,
    };
    let Some(body) = rule.get() else {
        let msg = format!(
            "recursive: rule used before its definition was complete @ index {}",
            state.index()
        );
        return state.fail_with(ParseError::new(ParseErrorKind::Custom, msg));
    };
    let key = Arc::as_ptr(rule) as usize;
    let Some(_level) = NestingGuard::enter(key, max_depth) else {
        event!(
            Level::DEBUG,
            index = state.index(),
            max_depth,
            "recursion limit reached"
        );
        let msg = format!(
            "recursive: nested more than {max_depth} levels deep @ index {}",
            state.index()
        );
        return state.fail_with(ParseError::new(ParseErrorKind::RecursionLimit, msg));
    };
    body.apply(state)
}

/// Builds a rule which refers to itself.
///
/// `define` is called once, straight away, with a parser standing
/// for the rule being defined, and returns the body of the rule.
/// Both refer to the same single copy of the body, however often and
/// however deeply the rule is used.
///
/// Each parser in the chain of calls made while applying the rule
/// uses some stack, so nesting has to be limited.  Entering the rule
/// while it is already being applied `max_depth` times (on the same
/// thread) fails with [`ParseErrorKind::RecursionLimit`].  That error
/// is fatal, so `choice` and the repetition combinators do not hide
/// it.
///
/// ```
/// use base::prelude::*;
///
/// // Counts matched pairs of parentheses: "((()))" gives 3.
/// let parens = recursive(16, |parens: Parser<str, usize>| {
///     choice(vec![
///         between(literal("("), literal(")"))(parens).map(|depth| depth + 1),
///         succeed(0),
///     ])
/// });
/// assert_eq!(parens.run("((()))").result(), Some(&3));
/// let too_deep = "(".repeat(20);
/// assert_eq!(
///     parens.run(too_deep.as_str()).error().map(ParseError::kind),
///     Some(ParseErrorKind::RecursionLimit)
/// );
/// ```
pub fn recursive<T, R, F>(max_depth: usize, define: F) -> Parser<T, R>
where
    T: ?Sized + 'static,
    R: 'static,
    F: FnOnce(Parser<T, R>) -> Parser<T, R>,
{
    let rule: Arc<RuleCell<T, R>> = Arc::new(OnceLock::new());
    // The body only holds a weak reference to itself; the parser
    // returned from here owns it.
    let handle = {
        let rule = Arc::downgrade(&rule);
        Parser::new(move |state: ParseState<'_, T>| match rule.upgrade() {
            Some(rule) => apply_rule(&rule, max_depth, state),
            None => match state.split() {
                Ok((state, ())) => {
                    let msg = format!(
                        "recursive: rule used after it was dropped @ index {}",
                        state.index()
                    );
                    state.fail_with(ParseError::new(ParseErrorKind::Custom, msg))
                }
                Err(failed) => failed,
            },
        })
    };
    if rule.set(define(handle)).is_err() {
        unreachable!("a recursive rule is defined only once");
    }
    Parser::new(move |state: ParseState<'_, T>| apply_rule(&rule, max_depth, state))
}
