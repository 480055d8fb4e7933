//! The prelude exports the parser type, the parse state and all of
//! the primitives and combinators.  Grammars normally need nothing
//! else from this crate.
pub use super::combinators::{
    between, choice, lazy, many, many_one, recursive, sep_by, sep_by_one, sequence_of,
};
pub use super::error::{ConstructionError, ParseError, ParseErrorKind};
pub use super::parser::Parser;
pub use super::state::{ParseState, Target};
pub use super::text::{
    digits, end_of_input, fail, letters, literal, regex, succeed, try_literal,
};
