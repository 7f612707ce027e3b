//! UDP (RFC 768).

use crate::headers::Truncated;
use crate::{ByteStruct, ByteStructLen};

/// 8-byte UDP header.
#[derive(ByteStruct, Clone, Copy, Debug, PartialEq, Eq)]
#[byte_struct_be]
pub struct UdpHeader {
    /// Source port.
    pub sport: u16,
    /// Destination port.
    pub dport: u16,
    /// Length of header plus payload.
    pub ulen: u16,
    /// Checksum (pseudo-header + header + payload). Zero means "not
    /// computed" only over IPv4; IPv6 requires a real value.
    pub checksum: u16,
}

static_assertions::const_assert!(UdpHeader::BYTE_LEN == 8);

impl UdpHeader {
    /// Wire length of this header.
    pub const MIN_LEN: usize = 8;

    /// Parse the fixed 8-byte header from the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < Self::MIN_LEN {
            return Err(Truncated);
        }
        Ok((
            Self::read_bytes(&bytes[..Self::MIN_LEN]),
            &bytes[Self::MIN_LEN..],
        ))
    }

    /// Serialize to its canonical 8-byte wire form.
    pub fn emit(&self) -> [u8; Self::MIN_LEN] {
        let mut out = [0u8; Self::MIN_LEN];
        self.write_bytes(&mut out);
        out
    }
}
