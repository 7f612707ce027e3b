//! GRE (RFC 2784), restricted to the checksum-present/absent variants —
//! key/sequence-number extensions are out of scope.

use byte_struct::bitfields;

use crate::headers::{peek_u16, Truncated};
use crate::ByteStructLen;

bitfields!(
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    GreFlagsAndVersion: u16 {
        pub checksum_present: 1,
        pub reserved0: 12,
        pub version: 3
    }
);

/// GRE header: a 16-bit flags/version word, the encapsulated EtherType, and
/// an optional checksum + reserved word present only when the checksum-
/// present bit is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreHeader {
    /// Whether the optional checksum/reserved1 word follows.
    pub checksum_present: bool,
    /// GRE version (0 for standard GRE).
    pub version: u8,
    /// EtherType of the encapsulated layer.
    pub protocol_type: u16,
    /// Present only when `checksum_present` is set.
    pub checksum: Option<u16>,
    /// The reserved1 word that follows the checksum; present only when
    /// `checksum_present` is set. Carried verbatim rather than zeroed so a
    /// parse/emit round trip reproduces the original bytes.
    pub res1: Option<u16>,
}

impl GreHeader {
    /// Minimum wire length (no checksum word).
    pub const MIN_LEN: usize = 4;

    /// Parse a GRE header from the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < Self::MIN_LEN {
            return Err(Truncated);
        }
        let word = GreFlagsAndVersion::read_bytes(&bytes[0..2]);
        let protocol_type = peek_u16(bytes, 2);
        let checksum_present = word.checksum_present() == 1;
        let mut offset = 4;
        let (checksum, res1) = if checksum_present {
            if bytes.len() < offset + 4 {
                return Err(Truncated);
            }
            let sum = peek_u16(bytes, offset);
            let reserved1 = peek_u16(bytes, offset + 2);
            offset += 4; // checksum word + reserved1 word
            (Some(sum), Some(reserved1))
        } else {
            (None, None)
        };
        Ok((
            GreHeader {
                checksum_present,
                version: word.version() as u8,
                protocol_type,
                checksum,
                res1,
            },
            &bytes[offset..],
        ))
    }

    /// Serialize to wire form.
    pub fn emit(&self) -> Vec<u8> {
        let mut out = vec![0u8; if self.checksum_present { 8 } else { 4 }];
        let word = GreFlagsAndVersion::new()
            .with_checksum_present(self.checksum_present as u8)
            .with_reserved0(0)
            .with_version(self.version);
        word.write_bytes(&mut out[0..2]);
        out[2..4].copy_from_slice(&self.protocol_type.to_be_bytes());
        if self.checksum_present {
            out[4..6].copy_from_slice(&self.checksum.unwrap_or(0).to_be_bytes());
            out[6..8].copy_from_slice(&self.res1.unwrap_or(0).to_be_bytes());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_checksum_round_trip() {
        let h = GreHeader {
            checksum_present: false,
            version: 0,
            protocol_type: 0x0800,
            checksum: None,
            res1: None,
        };
        let bytes = h.emit();
        assert_eq!(bytes.len(), 4);
        let (parsed, rest) = GreHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }

    #[test]
    fn with_checksum_round_trip() {
        let h = GreHeader {
            checksum_present: true,
            version: 0,
            protocol_type: 0x0800,
            checksum: Some(0xABCD),
            res1: Some(0),
        };
        let bytes = h.emit();
        assert_eq!(bytes.len(), 8);
        let (parsed, rest) = GreHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }

    #[test]
    fn nonzero_reserved1_round_trips_verbatim() {
        let h = GreHeader {
            checksum_present: true,
            version: 0,
            protocol_type: 0x0800,
            checksum: Some(0xABCD),
            res1: Some(0x1234),
        };
        let bytes = h.emit();
        assert_eq!(&bytes[6..8], &[0x12, 0x34]);
        let (parsed, rest) = GreHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }
}
