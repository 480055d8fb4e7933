//! The `bits` crate extends the `base` parser-combinator engine to
//! binary formats.
//!
//! The parsers here run over byte buffers (`[u8]` targets) and treat
//! the cursor as a *bit* offset: bit `i` of the input is bit
//! `7 - i % 8` of byte `i / 8`, so bits are read most significant
//! first.  All the `base` combinators work with these parsers.
//!
//! ```
//! use base::prelude::*;
//! use bits::*;
//!
//! let version_and_length = sequence_of(vec![uint(bit_width!(4)), uint(bit_width!(4))]);
//! assert_eq!(version_and_length.run(&[0x45][..]).result(), Some(&vec![4, 5]));
//! ```
#![deny(unsafe_code)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::pedantic)]

mod integer;
mod primitives;
mod rawstring;
mod width;

pub use integer::{int, uint};
pub use primitives::{bit, one, zero};
pub use rawstring::{raw_string, try_raw_string};
pub use width::BitWidth;

/// A [`BitWidth`] checked at compile time.
#[macro_export]
macro_rules! bit_width {
    ($n:expr) => {
        $crate::BitWidth::new::<{ $n }>()
    };
}
