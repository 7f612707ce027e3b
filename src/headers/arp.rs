//! ARP (RFC 826).
//!
//! The 28-byte layout (`hrd pro hln pln op sha sip tha tip`) is the common
//! IPv4-over-Ethernet shape (`hln=6`, `pln=4`), but `hln`/`pln` are carried
//! as real fields rather than hard-coded constants. No trailing padding is
//! added; a caller that needs to pad out to an Ethernet minimum frame size
//! does so itself.

use crate::headers::Truncated;
use crate::{enum_with_unknown, ByteStruct, ByteStructLen, Ipv4Addr, MacAddr};

enum_with_unknown!(
    /// ARP operation code.
    pub enum ArpOperation(u16) {
        /// ARP request.
        Request = 1,
        /// ARP reply.
        Reply = 2,
    }
);

/// 28-byte ARP packet for IPv4-over-Ethernet (`hrd=1, pro=0x0800, hln=6,
/// pln=4`).
#[derive(ByteStruct, Clone, Copy, Debug, PartialEq, Eq)]
#[byte_struct_be]
pub struct ArpHeader {
    /// Hardware type (1 = Ethernet).
    pub hrd: u16,
    /// Protocol type (EtherType of the resolved address, 0x0800 for IPv4).
    pub pro: u16,
    /// Hardware address length in bytes (6 for MAC addresses).
    pub hln: u8,
    /// Protocol address length in bytes (4 for IPv4).
    pub pln: u8,
    /// Operation code.
    pub op: u16,
    /// Sender hardware address.
    pub sha: MacAddr,
    /// Sender protocol address.
    pub sip: Ipv4Addr,
    /// Target hardware address.
    pub tha: MacAddr,
    /// Target protocol address.
    pub tip: Ipv4Addr,
}

static_assertions::const_assert!(ArpHeader::BYTE_LEN == 28);

impl ArpHeader {
    /// Wire length of this header.
    pub const MIN_LEN: usize = 28;

    /// Parse the fixed 28-byte ARP packet from the front of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < Self::MIN_LEN {
            return Err(Truncated);
        }
        Ok((
            Self::read_bytes(&bytes[..Self::MIN_LEN]),
            &bytes[Self::MIN_LEN..],
        ))
    }

    /// Serialize to its canonical 28-byte wire form.
    pub fn emit(&self) -> [u8; Self::MIN_LEN] {
        let mut out = [0u8; Self::MIN_LEN];
        self.write_bytes(&mut out);
        out
    }

    /// The symbolic operation this packet carries.
    pub fn operation(&self) -> ArpOperation {
        ArpOperation::from(self.op)
    }
}
