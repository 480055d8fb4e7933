//! Nested arrays of unsigned numbers, like `[1,[2,[3],4],5]`.  No
//! whitespace is allowed.
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use base::prelude::*;

use super::{number, MAX_NESTING};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Element {
    Number(u64),
    Array(Vec<Element>),
}

impl Element {
    /// The numbers in the element, in the order they appear.
    #[must_use]
    pub fn leaves(&self) -> Vec<u64> {
        match self {
            Element::Number(n) => vec![*n],
            Element::Array(items) => items.iter().flat_map(Element::leaves).collect(),
        }
    }

    /// How deeply arrays are nested; a number has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Element::Number(_) => 0,
            Element::Array(items) => 1 + items.iter().map(Element::depth).max().unwrap_or(0),
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Element::Number(n) => write!(f, "{n}"),
            Element::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Parses a bracketed, comma-separated array whose elements are
/// numbers or arrays.  Arrays may be nested up to [`MAX_NESTING`]
/// deep.
#[must_use]
pub fn array() -> Parser<str, Element> {
    recursive(MAX_NESTING, |array: Parser<str, Element>| {
        let element = choice(vec![number::<u64>().map(Element::Number), array]);
        between(literal("["), literal("]"))(sep_by(literal(","))(element)).map(Element::Array)
    })
}
