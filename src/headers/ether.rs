//! Link layer: Ethernet II framing.
//!
//! Wire order is destination MAC, then source MAC, then EtherType.

use crate::headers::Truncated;
use crate::{ByteStruct, ByteStructLen, MacAddr};

/// 14-byte Ethernet II header: `dhost ++ shost ++ ethertype`.
#[derive(ByteStruct, Clone, Copy, Debug, PartialEq, Eq)]
#[byte_struct_be]
pub struct EthernetHeader {
    /// Destination MAC address.
    pub dhost: MacAddr,
    /// Source MAC address.
    pub shost: MacAddr,
    /// EtherType (or TPID, if an 802.1Q tag follows).
    pub ethertype: u16,
}

static_assertions::const_assert!(EthernetHeader::BYTE_LEN == 14);

impl EthernetHeader {
    /// Minimum wire length of this header.
    pub const MIN_LEN: usize = 14;

    /// Parse the fixed-size header from the front of `bytes`, returning the
    /// unconsumed remainder.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < Self::MIN_LEN {
            return Err(Truncated);
        }
        Ok((
            Self::read_bytes(&bytes[..Self::MIN_LEN]),
            &bytes[Self::MIN_LEN..],
        ))
    }

    /// Serialize to its canonical 14-byte wire form.
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
        let h = EthernetHeader {
            dhost: MacAddr::BROADCAST,
            shost: MacAddr::new([0x02, 0xAF, 0xFF, 0x1A, 0xE5, 0x3C]),
            ethertype: 0x0800,
        };
        let bytes = h.emit();
        let (parsed, rest) = EthernetHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }

    #[test]
    fn truncated_below_minimum() {
        assert_eq!(EthernetHeader::parse(&[0u8; 13]), Err(Truncated));
    }
}
