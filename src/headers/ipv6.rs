//! IPv6 (RFC 8200) fixed header.

use byte_struct::bitfields;

use crate::headers::Truncated;
use crate::{ByteStruct, ByteStructLen, Ipv6Addr};

bitfields!(
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    VersionClassFlow: u32 {
        pub version: 4,
        pub traffic_class: 8,
        pub flow_label: 20
    }
);

/// 40-byte IPv6 fixed header. Extension headers are out of scope (spec
/// Non-goals); `next` names the immediately following layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Header {
    /// Traffic class (DSCP + ECN).
    pub traffic_class: u8,
    /// Flow label.
    pub flow_label: u32,
    /// Length of the payload following this 40-byte header, in bytes.
    pub payload_len: u16,
    /// Protocol number of the next header.
    pub next: u8,
    /// Hop limit.
    pub hop_limit: u8,
    /// Source address.
    pub saddr: Ipv6Addr,
    /// Destination address.
    pub daddr: Ipv6Addr,
}

impl Ipv6Header {
    /// Wire length of this header (fixed; no extension headers).
    pub const MIN_LEN: usize = 40;

    /// Parse the fixed 40-byte header from the front of `bytes`. The version
    /// nibble is read but not stored (it is always 6 on emit).
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < Self::MIN_LEN {
            return Err(Truncated);
        }
        let word = VersionClassFlow::read_bytes(&bytes[0..4]);
        let payload_len = u16::from_be_bytes([bytes[4], bytes[5]]);
        let next = bytes[6];
        let hop_limit = bytes[7];
        let mut saddr = [0u8; 16];
        saddr.copy_from_slice(&bytes[8..24]);
        let mut daddr = [0u8; 16];
        daddr.copy_from_slice(&bytes[24..40]);
        Ok((
            Ipv6Header {
                traffic_class: word.traffic_class(),
                flow_label: word.flow_label(),
                payload_len,
                next,
                hop_limit,
                saddr: Ipv6Addr::new(saddr),
                daddr: Ipv6Addr::new(daddr),
            },
            &bytes[Self::MIN_LEN..],
        ))
    }

    /// Serialize to its canonical 40-byte wire form, with version hard-coded
    /// to 6.
    pub fn emit(&self) -> [u8; Self::MIN_LEN] {
        let mut out = [0u8; Self::MIN_LEN];
        let word = VersionClassFlow::new()
            .with_version(6)
            .with_traffic_class(self.traffic_class)
            .with_flow_label(self.flow_label);
        word.write_bytes(&mut out[0..4]);
        out[4..6].copy_from_slice(&self.payload_len.to_be_bytes());
        out[6] = self.next;
        out[7] = self.hop_limit;
        out[8..24].copy_from_slice(&self.saddr.0);
        out[24..40].copy_from_slice(&self.daddr.0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_emit_round_trip() {
        let h = Ipv6Header {
            traffic_class: 0,
            flow_label: 0x1_2345,
            payload_len: 8,
            next: 17,
            hop_limit: 64,
            saddr: Ipv6Addr::new([0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]),
            daddr: Ipv6Addr::ANY,
        };
        let bytes = h.emit();
        assert_eq!(bytes[0] >> 4, 6);
        let (parsed, rest) = Ipv6Header::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }

    #[test]
    fn truncated_below_minimum() {
        assert_eq!(Ipv6Header::parse(&[0u8; 39]), Err(Truncated));
    }
}
