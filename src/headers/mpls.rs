//! MPLS label stack (RFC 3032).
//!
//! The bottom-of-stack bit sits between the traffic-class bits and TTL in
//! each 32-bit entry. It's derived from stack position on emit rather than
//! stored per entry, so this codec reads/writes the label word with plain
//! shifts rather than a packed-bitfield macro.

use crate::headers::{peek_u16, Truncated};

/// Whether an MPLS label stack was reached via the unicast (`0x8847`) or
/// multicast (`0x8848`) EtherType. Not encoded in-band at the label-stack
/// layer itself; it's carried from the outer EtherType tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MplsMode {
    /// Reached via EtherType 0x8847.
    Unicast,
    /// Reached via EtherType 0x8848.
    Multicast,
}

/// A single 32-bit MPLS shim header entry. The bottom-of-stack bit is not
/// stored here; it's reconstructed on emit from the entry's position in the
/// stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MplsEntry {
    /// 20-bit label value.
    pub label: u32,
    /// Traffic class bit 0 (historically part of the 3-bit "EXP" field).
    pub qos: u8,
    /// Traffic class bit 1.
    pub pri: u8,
    /// Traffic class bit 2.
    pub ecn: u8,
    /// Time to live.
    pub ttl: u8,
}

/// An MPLS label stack plus the EtherType of the layer it encapsulates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MplsTagHeader {
    /// How this stack was reached (carried from the outer EtherType, not
    /// part of the wire encoding).
    pub mode: MplsMode,
    /// Label stack entries, outermost first.
    pub stack: Vec<MplsEntry>,
    /// EtherType of the encapsulated layer, read from the two bytes after
    /// the bottom-of-stack entry.
    pub ether_type: u16,
}

const ENTRY_LEN: usize = 4;

impl MplsTagHeader {
    /// Parse a label stack (repeated 4-byte entries until the
    /// bottom-of-stack bit is set) followed by the inner EtherType.
    pub fn parse(mode: MplsMode, bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        let mut stack = Vec::new();
        let mut offset = 0usize;
        loop {
            if bytes.len() < offset + ENTRY_LEN {
                return Err(Truncated);
            }
            let word = u32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ]);
            let label = word >> 12;
            let qos = ((word >> 11) & 0x1) as u8;
            let pri = ((word >> 10) & 0x1) as u8;
            let ecn = ((word >> 9) & 0x1) as u8;
            let bottom = (word >> 8) & 0x1;
            let ttl = (word & 0xFF) as u8;
            stack.push(MplsEntry {
                label,
                qos,
                pri,
                ecn,
                ttl,
            });
            offset += ENTRY_LEN;
            if bottom == 1 {
                break;
            }
        }
        if bytes.len() < offset + 2 {
            return Err(Truncated);
        }
        let ether_type = peek_u16(bytes, offset);
        offset += 2;
        Ok((
            MplsTagHeader {
                mode,
                stack,
                ether_type,
            },
            &bytes[offset..],
        ))
    }

    /// Serialize the stack: the bottom-of-stack bit is set only on the last
    /// entry, regardless of what any input entry carried.
    pub fn emit(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.stack.len() * ENTRY_LEN + 2);
        let last = self.stack.len().saturating_sub(1);
        for (i, e) in self.stack.iter().enumerate() {
            let bottom = if i == last { 1u32 } else { 0 };
            let word = ((e.label & 0xF_FFFF) << 12)
                | (((e.qos & 1) as u32) << 11)
                | (((e.pri & 1) as u32) << 10)
                | (((e.ecn & 1) as u32) << 9)
                | (bottom << 8)
                | (e.ttl as u32);
            out.extend_from_slice(&word.to_be_bytes());
        }
        out.extend_from_slice(&self.ether_type.to_be_bytes());
        out
    }
}
