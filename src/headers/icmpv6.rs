//! ICMPv6 (RFC 4443), header only — the type-specific body (echo identifiers,
//! MLD/NDP payloads, ...) is left in the packet tail rather than modeled as
//! ICMPv4's body enum is.

use crate::headers::Truncated;
use crate::{ByteStruct, ByteStructLen};

/// 4-byte ICMPv6 common header.
#[derive(ByteStruct, Clone, Copy, Debug, PartialEq, Eq)]
#[byte_struct_be]
pub struct Icmpv6Header {
    /// Message type.
    pub icmp_type: u8,
    /// Message code.
    pub code: u8,
    /// Checksum (pseudo-header + header + payload, per RFC 4443 §2.1).
    pub checksum: u16,
}

static_assertions::const_assert!(Icmpv6Header::BYTE_LEN == 4);

impl Icmpv6Header {
    /// Wire length of this header.
    pub const MIN_LEN: usize = 4;

    /// Parse the fixed 4-byte header from the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < Self::MIN_LEN {
            return Err(Truncated);
        }
        Ok((
            Self::read_bytes(&bytes[..Self::MIN_LEN]),
            &bytes[Self::MIN_LEN..],
        ))
    }

    /// Serialize to its canonical 4-byte wire form.
    pub fn emit(&self) -> [u8; Self::MIN_LEN] {
        let mut out = [0u8; Self::MIN_LEN];
        self.write_bytes(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_emit_round_trip() {
        let h = Icmpv6Header {
            icmp_type: 128,
            code: 0,
            checksum: 0x1234,
        };
        let bytes = h.emit();
        let (parsed, rest) = Icmpv6Header::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }

    #[test]
    fn truncated_below_minimum() {
        assert_eq!(Icmpv6Header::parse(&[0u8; 3]), Err(Truncated));
    }
}
