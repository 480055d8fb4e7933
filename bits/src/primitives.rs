//! Single-bit parsers.  Everything else in this crate is built on
//! [`bit`].

use base::prelude::*;

/// Returns the bit at bit offset `index` of `bytes`, counting from
/// the most significant bit of the first byte.
pub(crate) fn bit_at(bytes: &[u8], index: usize) -> Option<u8> {
    let byte = bytes.get(index / 8)?;
    let shift = 7 - (index % 8);
    Some((byte >> shift) & 1)
}

/// Reads one bit, producing 0 or 1.
pub fn bit() -> Parser<[u8], u8> {
    Parser::new(|state: ParseState<'_, [u8]>| {
        let (state, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        let index = state.index();
        match bit_at(state.target(), index) {
            Some(b) => state.advance(index + 1, b),
            None => {
                let msg = format!("bit: unexpected end of input @ index {index}");
                state.fail_with(ParseError::new(ParseErrorKind::UnexpectedEndOfInput, msg))
            }
        }
    })
}

fn constant_bit(expected: u8, name: &'static str) -> Parser<[u8], u8> {
    let any_bit = bit();
    Parser::new(move |state: ParseState<'_, [u8]>| {
        let (start, ()) = match state.split() {
            Ok(parts) => parts,
            Err(failed) => return failed,
        };
        match any_bit.apply(start.clone()).split() {
            Ok((next, b)) if b == expected => next.with_result(b),
            Ok((_, b)) => {
                let msg = format!(
                    "{name}: expected a {expected} but got a {b} @ index {}",
                    start.index()
                );
                start.fail_with(ParseError::new(ParseErrorKind::BitConstraintViolation, msg))
            }
            Err(failed) => failed,
        }
    })
}

/// Reads one bit, which must be 0.
pub fn zero() -> Parser<[u8], u8> {
    constant_bit(0, "zero")
}

/// Reads one bit, which must be 1.
pub fn one() -> Parser<[u8], u8> {
    constant_bit(1, "one")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_at_is_msb_first() {
        let bytes = [0b1000_0001_u8, 0b0100_0000];
        assert_eq!(bit_at(&bytes, 0), Some(1));
        assert_eq!(bit_at(&bytes, 1), Some(0));
        assert_eq!(bit_at(&bytes, 7), Some(1));
        assert_eq!(bit_at(&bytes, 8), Some(0));
        assert_eq!(bit_at(&bytes, 9), Some(1));
        assert_eq!(bit_at(&bytes, 16), None);
    }

    #[test]
    fn test_bit_reads_every_bit_of_a_byte() {
        let p = many(bit());
        let state = p.run(&[0b1010_0110_u8][..]);
        assert_eq!(state.result(), Some(&vec![1, 0, 1, 0, 0, 1, 1, 0]));
        assert_eq!(state.index(), 8);
    }

    #[test]
    fn test_bit_end_of_input() {
        let state = bit().run(&[][..]);
        assert_eq!(
            state.error().map(ParseError::kind),
            Some(ParseErrorKind::UnexpectedEndOfInput)
        );
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn test_zero_and_one() {
        let input = [0b0100_0000_u8];
        let p = zero().then(one()).then(zero());
        let state = p.run(&input[..]);
        assert_eq!(state.result(), Some(&((0, 1), 0)));
        assert_eq!(state.index(), 3);
    }

    #[test]
    fn test_constant_bit_mismatch_reports_start_of_bit() {
        let input = [0b0100_0000_u8];
        let state = zero().then(zero()).run(&input[..]);
        let e = state.error().expect("second bit is a one");
        assert_eq!(e.kind(), ParseErrorKind::BitConstraintViolation);
        assert_eq!(e.message(), "zero: expected a 0 but got a 1 @ index 1");
        assert_eq!(state.index(), 1);

        let state = one().run(&input[..]);
        assert_eq!(
            state.error().map(ParseError::kind),
            Some(ParseErrorKind::BitConstraintViolation)
        );
        assert_eq!(state.index(), 0);
    }
}
