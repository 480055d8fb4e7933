//! IPv4 packet headers (RFC 791).
//!
//! The fixed 20-byte part of the header is a run of bit fields of
//! various widths, followed by `IHL - 5` 32-bit words of options.
use std::net::Ipv4Addr;

use serde::Serialize;

use base::prelude::*;
use bits::{bit_width, uint, BitWidth};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ipv4Header {
    pub version: u8,
    /// Header length, in 32-bit words.
    pub ihl: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub header_checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub options: Vec<u32>,
}

const FIXED_FIELD_WIDTHS: [BitWidth; 13] = [
    bit_width!(4),  // version
    bit_width!(4),  // ihl
    bit_width!(6),  // dscp
    bit_width!(2),  // ecn
    bit_width!(16), // total length
    bit_width!(16), // identification
    bit_width!(3),  // flags
    bit_width!(13), // fragment offset
    bit_width!(8),  // ttl
    bit_width!(8),  // protocol
    bit_width!(16), // header checksum
    bit_width!(32), // source address
    bit_width!(32), // destination address
];

/// Minimum value of the IHL field; a header with no options.
const MIN_IHL: u8 = 5;

fn narrow<N: TryFrom<u32>>(value: u32, field: &str) -> Result<N, String> {
    N::try_from(value).map_err(|_| format!("ipv4: {field} value {value} is out of range"))
}

/// Builds a header (without options) from the values of the fixed
/// fields.
fn fixed_header(fields: &[u32]) -> Result<Ipv4Header, String> {
    let [version, ihl, dscp, ecn, total_length, identification, flags, fragment_offset, ttl, protocol, header_checksum, source, destination] =
        fields
    else {
        return Err(format!(
            "ipv4: expected {} header fields but got {}",
            FIXED_FIELD_WIDTHS.len(),
            fields.len()
        ));
    };
    Ok(Ipv4Header {
        version: narrow(*version, "version")?,
        ihl: narrow(*ihl, "ihl")?,
        dscp: narrow(*dscp, "dscp")?,
        ecn: narrow(*ecn, "ecn")?,
        total_length: narrow(*total_length, "total length")?,
        identification: narrow(*identification, "identification")?,
        flags: narrow(*flags, "flags")?,
        fragment_offset: narrow(*fragment_offset, "fragment offset")?,
        ttl: narrow(*ttl, "ttl")?,
        protocol: narrow(*protocol, "protocol")?,
        header_checksum: narrow(*header_checksum, "header checksum")?,
        source: Ipv4Addr::from(*source),
        destination: Ipv4Addr::from(*destination),
        options: Vec::new(),
    })
}

fn options(count: usize) -> Parser<[u8], Vec<u32>> {
    sequence_of(vec![uint(BitWidth::MAX); count])
}

/// Parses an IPv4 header, including any options.  The version must
/// be 4 and the IHL at least 5.
#[must_use]
pub fn ipv4_header() -> Parser<[u8], Ipv4Header> {
    let fixed = sequence_of(FIXED_FIELD_WIDTHS.iter().map(|w| uint(*w)).collect());
    fixed.chain(|fields| {
        let header = match fixed_header(&fields) {
            Ok(header) => header,
            Err(msg) => return fail(&msg),
        };
        if header.version != 4 {
            return fail(&format!("ipv4: version is {}, expected 4", header.version));
        }
        if header.ihl < MIN_IHL {
            return fail(&format!(
                "ipv4: header length {} is less than the minimum of {MIN_IHL}",
                header.ihl
            ));
        }
        let option_words = usize::from(header.ihl - MIN_IHL);
        options(option_words).map(move |options| Ipv4Header {
            options,
            ..header.clone()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKET: [u8; 20] = [
        0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0xb8, 0x61, 0xc0, 0xa8, 0x00,
        0x01, 0xc0, 0xa8, 0x00, 0xc7,
    ];

    #[test]
    fn test_fixed_header() {
        let state = ipv4_header().run(&PACKET[..]);
        assert_eq!(
            state.result(),
            Some(&Ipv4Header {
                version: 4,
                ihl: 5,
                dscp: 0,
                ecn: 0,
                total_length: 0x73,
                identification: 0,
                flags: 2,
                fragment_offset: 0,
                ttl: 64,
                protocol: 17,
                header_checksum: 0xb861,
                source: Ipv4Addr::new(192, 168, 0, 1),
                destination: Ipv4Addr::new(192, 168, 0, 199),
                options: vec![],
            })
        );
        assert_eq!(state.index(), 160);
    }

    #[test]
    fn test_options() {
        let mut packet = PACKET.to_vec();
        packet[0] = 0x46;
        packet.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
        let state = ipv4_header().run(packet.as_slice());
        let header = state.result().expect("header with one option word");
        assert_eq!(header.ihl, 6);
        assert_eq!(header.options, vec![0x0102_0304]);
        assert_eq!(state.index(), 192);
    }

    #[test]
    fn test_missing_options() {
        let mut packet = PACKET.to_vec();
        packet[0] = 0x46;
        let state = ipv4_header().run(packet.as_slice());
        assert_eq!(
            state.error().map(ParseError::kind),
            Some(ParseErrorKind::UnexpectedEndOfInput)
        );
    }

    #[test]
    fn test_wrong_version() {
        let mut packet = PACKET;
        packet[0] = 0x65;
        let state = ipv4_header().run(&packet[..]);
        let e = state.error().expect("version 6 is rejected");
        assert_eq!(e.kind(), ParseErrorKind::Custom);
        assert_eq!(e.message(), "ipv4: version is 6, expected 4");
    }

    #[test]
    fn test_short_ihl() {
        let mut packet = PACKET;
        packet[0] = 0x44;
        assert!(ipv4_header().run(&packet[..]).is_error());
    }

    #[test]
    fn test_truncated() {
        let state = ipv4_header().run(&PACKET[..10]);
        assert_eq!(
            state.error().map(ParseError::kind),
            Some(ParseErrorKind::UnexpectedEndOfInput)
        );
        assert_eq!(state.index(), 80);
    }
}
