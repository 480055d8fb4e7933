//! The `base` crate is a parser-combinator engine.  Grammars are
//! built by composing small parsers with combinators, rather than
//! by writing a recursive-descent parser for each grammar.
//!
//! Every parser is a pure function from one [`state::ParseState`]
//! to the next, wrapped up as a [`parser::Parser`].  Failure is
//! never signalled by panicking or by returning early; it is
//! recorded in the state and carried through to the end of the
//! parse.
//!
//! The text primitives here work on `str`.  The `bits` crate adds
//! primitives which work on bit-addressed byte buffers.
#![deny(unsafe_code)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::return_self_not_must_use)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod combinators;
pub mod error;
pub mod parser;
pub mod prelude;
mod rx;
pub mod state;
pub mod text;
