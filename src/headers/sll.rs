//! Linux "cooked" capture encapsulation (`DLT_LINUX_SLL`), used when libpcap
//! captures on an `any` interface or a link type it can't frame natively.

use crate::headers::Truncated;

/// 16-byte Linux cooked capture header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinuxCookedHeader {
    /// Packet type (0 = to us, 4 = broadcast, ...).
    pub packet_type: u16,
    /// ARPHRD_* link-layer address type of the original interface.
    pub hrd: u16,
    /// Length of the valid portion of `ll_bytes`.
    pub ll_len: u16,
    /// Up to 8 bytes of link-layer address, zero-padded.
    pub ll_bytes: [u8; 8],
    /// EtherType-style protocol of the encapsulated layer.
    pub pro: u16,
}

impl LinuxCookedHeader {
    /// Wire length of this header.
    pub const MIN_LEN: usize = 16;

    /// Parse the 16-byte header from the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < Self::MIN_LEN {
            return Err(Truncated);
        }
        let packet_type = u16::from_be_bytes([bytes[0], bytes[1]]);
        let hrd = u16::from_be_bytes([bytes[2], bytes[3]]);
        let ll_len = u16::from_be_bytes([bytes[4], bytes[5]]);
        let mut ll_bytes = [0u8; 8];
        ll_bytes.copy_from_slice(&bytes[6..14]);
        let pro = u16::from_be_bytes([bytes[14], bytes[15]]);
        Ok((
            LinuxCookedHeader {
                packet_type,
                hrd,
                ll_len,
                ll_bytes,
                pro,
            },
            &bytes[Self::MIN_LEN..],
        ))
    }

    /// Serialize to the canonical 16-byte wire form.
    pub fn emit(&self) -> [u8; Self::MIN_LEN] {
        let mut out = [0u8; Self::MIN_LEN];
        out[0..2].copy_from_slice(&self.packet_type.to_be_bytes());
        out[2..4].copy_from_slice(&self.hrd.to_be_bytes());
        out[4..6].copy_from_slice(&self.ll_len.to_be_bytes());
        out[6..14].copy_from_slice(&self.ll_bytes);
        out[14..16].copy_from_slice(&self.pro.to_be_bytes());
        out
    }
}
