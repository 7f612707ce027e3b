//! TCP (RFC 9293).
//!
//! The data-offset/reserved nibble is packed with `byte_struct::bitfields!`,
//! matching the rest of the header codecs; the eight one-bit control flags
//! are modeled with `modular_bitfield`'s `#[bitfield]` instead, since that's
//! exactly the shape the crate exists for.

use byte_struct::bitfields;
use modular_bitfield::prelude::*;

use crate::headers::{peek_u16, Truncated};
use crate::ByteStructLen;

bitfields!(
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    OffsetAndReserved: u8 {
        pub data_offset: 4,
        pub reserved: 4
    }
);

/// The eight TCP control bits. `modular_bitfield` packs the first-declared
/// field into the least significant bit, so the fields are declared LSB
/// first (FIN) through MSB last (CWR) to land on the real wire byte, where
/// CWR is bit 7 and FIN is bit 0.
#[bitfield]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TcpFlags {
    /// No more data from sender.
    pub fin: bool,
    /// Synchronize sequence numbers.
    pub syn: bool,
    /// Reset the connection.
    pub rst: bool,
    /// Push function.
    pub psh: bool,
    /// Acknowledgment field valid.
    pub ack: bool,
    /// Urgent pointer valid.
    pub urg: bool,
    /// ECN-Echo.
    pub ece: bool,
    /// Congestion Window Reduced.
    pub cwr: bool,
}

/// TCP header, fixed 20-byte prefix plus options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpHeader {
    /// Source port.
    pub sport: u16,
    /// Destination port.
    pub dport: u16,
    /// Sequence number.
    pub seqno: u32,
    /// Acknowledgment number.
    pub ackno: u32,
    /// Control flags.
    pub flags: TcpFlags,
    /// Window size.
    pub window: u16,
    /// Checksum (pseudo-header + header + payload).
    pub checksum: u16,
    /// Urgent pointer.
    pub urgent_ptr: u16,
    /// Options, 0-40 bytes, always a multiple of 4.
    pub options: Vec<u8>,
}

const FIXED_LEN: usize = 20;

impl TcpHeader {
    /// Minimum wire length (no options).
    pub const MIN_LEN: usize = FIXED_LEN;

    /// Header length in bytes including options, i.e. what the data-offset
    /// nibble encodes.
    pub fn header_len(&self) -> usize {
        FIXED_LEN + self.options.len()
    }

    /// Parse a header from the front of `bytes`. The options length is
    /// derived from the data-offset nibble, which must be at least 5.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < FIXED_LEN {
            return Err(Truncated);
        }
        let sport = peek_u16(bytes, 0);
        let dport = peek_u16(bytes, 2);
        let seqno = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let ackno = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let off_res = OffsetAndReserved::read_bytes(&bytes[12..13]);
        let data_offset = off_res.data_offset() as usize;
        if data_offset < 5 {
            return Err(Truncated);
        }
        let header_len = data_offset * 4;
        if bytes.len() < header_len {
            return Err(Truncated);
        }
        let flags = TcpFlags::from_bytes([bytes[13]]);
        let window = peek_u16(bytes, 14);
        let checksum = peek_u16(bytes, 16);
        let urgent_ptr = peek_u16(bytes, 18);
        let options = bytes[FIXED_LEN..header_len].to_vec();
        Ok((
            TcpHeader {
                sport,
                dport,
                seqno,
                ackno,
                flags,
                window,
                checksum,
                urgent_ptr,
                options,
            },
            &bytes[header_len..],
        ))
    }

    /// Serialize to wire form: the 20-byte fixed header followed by options.
    pub fn emit(&self) -> Vec<u8> {
        let header_len = self.header_len();
        let data_offset = (header_len / 4) as u8;
        let mut out = vec![0u8; header_len];
        out[0..2].copy_from_slice(&self.sport.to_be_bytes());
        out[2..4].copy_from_slice(&self.dport.to_be_bytes());
        out[4..8].copy_from_slice(&self.seqno.to_be_bytes());
        out[8..12].copy_from_slice(&self.ackno.to_be_bytes());
        let off_res = OffsetAndReserved::new()
            .with_data_offset(data_offset)
            .with_reserved(0);
        off_res.write_bytes(&mut out[12..13]);
        out[13] = self.flags.into_bytes()[0];
        out[14..16].copy_from_slice(&self.window.to_be_bytes());
        out[16..18].copy_from_slice(&self.checksum.to_be_bytes());
        out[18..20].copy_from_slice(&self.urgent_ptr.to_be_bytes());
        out[FIXED_LEN..].copy_from_slice(&self.options);
        out
    }
}
