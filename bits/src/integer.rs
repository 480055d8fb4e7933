//! Fixed-width integer fields.
//!
//! Fields are stored most significant bit first.  A field can be up
//! to 32 bits wide; we accumulate in an `i64` so that folding in the
//! bits of even the widest field cannot overflow, and only narrow to
//! the 32-bit result at the end.

use base::prelude::*;

use super::primitives::bit;
use super::width::BitWidth;

/// Folds bits (most significant first) into a number.
fn fold_msb_first<I>(bits: I) -> i64
where
    I: IntoIterator<Item = u8>,
{
    bits.into_iter()
        .fold(0_i64, |acc, b| (acc << 1) | i64::from(b))
}

/// The value of an unsigned field.
pub(crate) fn unsigned_value(bits: &[u8]) -> u32 {
    match u32::try_from(fold_msb_first(bits.iter().copied())) {
        Ok(n) => n,
        Err(_) => unreachable!("an unsigned field of at most 32 bits fits in a u32"),
    }
}

/// The value of a two's-complement field.
pub(crate) fn signed_value(bits: &[u8]) -> i32 {
    let value: i64 = match bits.split_first() {
        None => 0,
        Some((0, magnitude)) => fold_msb_first(magnitude.iter().copied()),
        Some((_, magnitude)) => -(1 + fold_msb_first(magnitude.iter().map(|b| b ^ 1))),
    };
    match i32::try_from(value) {
        Ok(n) => n,
        Err(_) => unreachable!("a signed field of at most 32 bits fits in an i32"),
    }
}

fn field_bits(width: BitWidth) -> Parser<[u8], Vec<u8>> {
    let n = width.get() as usize;
    sequence_of(vec![bit(); n])
}

/// Reads an unsigned integer field `width` bits wide.
pub fn uint(width: BitWidth) -> Parser<[u8], u32> {
    field_bits(width).map(|bits| unsigned_value(&bits))
}

/// Reads a two's-complement signed integer field `width` bits wide.
pub fn int(width: BitWidth) -> Parser<[u8], i32> {
    field_bits(width).map(|bits| signed_value(&bits))
}
