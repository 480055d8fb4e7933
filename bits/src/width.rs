//! Widths of integer fields.

use std::fmt::{self, Display, Formatter};

use base::error::ConstructionError;

/// The width, in bits, of an integer field read by
/// [`uint`](crate::uint) or [`int`](crate::int).  Only widths from 1
/// to 32 are allowed; since a `BitWidth` can only hold such a value,
/// a field of unsupported width is rejected when the grammar is
/// built, not when it is run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitWidth(u8);

impl BitWidth {
    pub const MIN: BitWidth = BitWidth(1);
    pub const MAX: BitWidth = BitWidth(32);

    /// Builds a width known at compile time.  An out-of-range width
    /// fails to compile.  The [`bit_width!`](crate::bit_width) macro
    /// is a shorter way to write this.
    ///
    /// ```
    /// use bits::{bit_width, BitWidth};
    ///
    /// const NIBBLE: BitWidth = bit_width!(4);
    /// assert_eq!(NIBBLE.get(), 4);
    /// assert_eq!(BitWidth::new::<32>(), BitWidth::MAX);
    /// ```
    ///
    /// A 33-bit field is rejected by the compiler:
    ///
    /// ```compile_fail
    /// use bits::{bit_width, BitWidth};
    ///
    /// const TOO_WIDE: BitWidth = bit_width!(33);
    /// ```
    ///
    /// and so is an empty one:
    ///
    /// ```compile_fail
    /// use bits::BitWidth;
    ///
    /// const EMPTY: BitWidth = BitWidth::new::<0>();
    /// ```
    pub const fn new<const N: u32>() -> BitWidth {
        struct Helper<const M: u32>;
        impl<const M: u32> Helper<M> {
            const W: BitWidth = {
                if M < 1 || M > 32 {
                    panic!("bit width is out of range")
                } else {
                    BitWidth(M as u8)
                }
            };
        }
        Helper::<N>::W
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }

    /// The largest value an unsigned field of this width can hold.
    #[must_use]
    pub const fn max_unsigned(self) -> u32 {
        u32::MAX >> (32 - self.get())
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = ConstructionError;

    fn try_from(n: u32) -> Result<BitWidth, ConstructionError> {
        match u8::try_from(n) {
            Ok(w @ 1..=32) => Ok(BitWidth(w)),
            _ => Err(ConstructionError::BitWidth(n)),
        }
    }
}

impl TryFrom<usize> for BitWidth {
    type Error = ConstructionError;

    fn try_from(n: usize) -> Result<BitWidth, ConstructionError> {
        match u32::try_from(n) {
            Ok(n) => BitWidth::try_from(n),
            Err(_) => Err(ConstructionError::BitWidth(u32::MAX)),
        }
    }
}

impl From<BitWidth> for u32 {
    fn from(w: BitWidth) -> u32 {
        w.get()
    }
}

impl Display for BitWidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.0)
    }
}

#[test]
fn test_try_from_bounds() {
    assert_eq!(BitWidth::try_from(0_u32), Err(ConstructionError::BitWidth(0)));
    assert_eq!(BitWidth::try_from(1_u32), Ok(BitWidth::MIN));
    assert_eq!(BitWidth::try_from(32_u32), Ok(BitWidth::MAX));
    assert_eq!(BitWidth::try_from(33_u32), Err(ConstructionError::BitWidth(33)));
    assert_eq!(BitWidth::try_from(300_u32), Err(ConstructionError::BitWidth(300)));
    assert_eq!(BitWidth::try_from(16_usize).map(BitWidth::get), Ok(16));
}

#[test]
fn test_const_new() {
    const W: BitWidth = BitWidth::new::<13>();
    assert_eq!(W.get(), 13);
    assert_eq!(crate::bit_width!(4), BitWidth::try_from(4_u32).unwrap());
}

#[test]
fn test_max_unsigned() {
    assert_eq!(BitWidth::MIN.max_unsigned(), 1);
    assert_eq!(BitWidth::new::<8>().max_unsigned(), 0xFF);
    assert_eq!(BitWidth::MAX.max_unsigned(), u32::MAX);
}
