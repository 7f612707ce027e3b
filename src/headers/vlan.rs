//! 802.1Q VLAN tag (IEEE 802.1Q). Read after an outer EtherType/TPID of
//! `0x8100` has already been consumed by the enclosing header.

use byte_struct::bitfields;

use crate::headers::Truncated;
use crate::{ByteStruct, ByteStructLen};

bitfields!(
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    Tci: u16 {
        pub pcp: 3,
        pub cfi: 1,
        pub vid: 12
    }
);

/// 4-byte 802.1Q tag: `pcp(3) cfi(1) vid(12)` packed into the TCI word,
/// followed by the inner EtherType.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ieee8021qTagHeader {
    /// Priority Code Point.
    pub pcp: u8,
    /// Canonical Format Indicator / drop-eligible bit.
    pub cfi: u8,
    /// VLAN identifier.
    pub vid: u16,
    /// The EtherType of the layer this tag encapsulates.
    pub ether_type: u16,
}

impl Ieee8021qTagHeader {
    /// Wire length of this header.
    pub const MIN_LEN: usize = 4;

    /// Parse the 4-byte tag from the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < Self::MIN_LEN {
            return Err(Truncated);
        }
        let tci = Tci::read_bytes(&bytes[0..2]);
        let ether_type = u16::from_be_bytes([bytes[2], bytes[3]]);
        Ok((
            Ieee8021qTagHeader {
                pcp: tci.pcp(),
                cfi: tci.cfi(),
                vid: tci.vid(),
                ether_type,
            },
            &bytes[Self::MIN_LEN..],
        ))
    }

    /// Serialize to the canonical 4-byte wire form.
    pub fn emit(&self) -> [u8; Self::MIN_LEN] {
        let tci = Tci::new()
            .with_pcp(self.pcp)
            .with_cfi(self.cfi)
            .with_vid(self.vid);
        let mut out = [0u8; Self::MIN_LEN];
        tci.write_bytes(&mut out[0..2]);
        out[2..4].copy_from_slice(&self.ether_type.to_be_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_emit_round_trip() {
        let h = Ieee8021qTagHeader {
            pcp: 5,
            cfi: 1,
            vid: 0xABC,
            ether_type: 0x0800,
        };
        let bytes = h.emit();
        let (parsed, rest) = Ieee8021qTagHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }
}
