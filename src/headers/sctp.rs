//! SCTP (RFC 9260), common header plus a chunk list.
//!
//! The common header's four 32-bit fields are a fixed `ByteStruct`-derived
//! shape, while the chunk list is hand-parsed because each chunk's length
//! depends on a field read from the chunk itself, and RFC 9260 §3.2 pads
//! each chunk to a 4-byte boundary on the wire without that padding being
//! part of the chunk's own length field.

use crate::headers::{peek_u16, Truncated};
use crate::{ByteStruct, ByteStructLen};

/// SCTP common header: 12 bytes, no options.
#[derive(ByteStruct, Clone, Copy, Debug, PartialEq, Eq)]
#[byte_struct_be]
struct CommonHeader {
    sport: u16,
    dport: u16,
    vtag: u32,
    checksum: u32,
}

static_assertions::const_assert!(CommonHeader::BYTE_LEN == 12);

const DATA_PREFIX_LEN: usize = 12;

/// A chunk's payload: the structured DATA (type 0) layout, or an opaque
/// blob for every other chunk type this crate doesn't interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SctpChunkPayload {
    /// DATA chunk (type 0) payload.
    Data {
        /// Transmission Sequence Number.
        tsn: u32,
        /// Stream identifier.
        sid: u16,
        /// Stream sequence number.
        ssn: u16,
        /// Payload protocol identifier.
        ppi: u32,
        /// User data.
        data: Vec<u8>,
    },
    /// Any other chunk type, carried byte-for-byte.
    Opaque(Vec<u8>),
}

impl SctpChunkPayload {
    fn parse(chunk_type: u8, bytes: &[u8]) -> Result<Self, Truncated> {
        if chunk_type != 0 {
            return Ok(SctpChunkPayload::Opaque(bytes.to_vec()));
        }
        if bytes.len() < DATA_PREFIX_LEN {
            return Err(Truncated);
        }
        let tsn = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
        let sid = peek_u16(bytes, 4);
        let ssn = peek_u16(bytes, 6);
        let ppi = u32::from_be_bytes(bytes[8..12].try_into().unwrap());
        let data = bytes[DATA_PREFIX_LEN..].to_vec();
        Ok(SctpChunkPayload::Data {
            tsn,
            sid,
            ssn,
            ppi,
            data,
        })
    }

    fn emit(&self) -> Vec<u8> {
        match self {
            SctpChunkPayload::Data {
                tsn,
                sid,
                ssn,
                ppi,
                data,
            } => {
                let mut out = Vec::with_capacity(DATA_PREFIX_LEN + data.len());
                out.extend_from_slice(&tsn.to_be_bytes());
                out.extend_from_slice(&sid.to_be_bytes());
                out.extend_from_slice(&ssn.to_be_bytes());
                out.extend_from_slice(&ppi.to_be_bytes());
                out.extend_from_slice(data);
                out
            }
            SctpChunkPayload::Opaque(bytes) => bytes.clone(),
        }
    }
}

/// A single SCTP chunk: 4-byte chunk header (`type`, `flags`, `length`)
/// followed by a type-dispatched payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SctpChunk {
    /// Chunk type (0 = DATA).
    pub chunk_type: u8,
    /// Chunk flags, meaning depends on `chunk_type`.
    pub flags: u8,
    /// Parsed payload.
    pub payload: SctpChunkPayload,
}

impl SctpChunk {
    /// Parse one chunk (including its alignment padding) from the front of
    /// `bytes`, returning the unconsumed remainder.
    fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < 4 {
            return Err(Truncated);
        }
        let chunk_type = bytes[0];
        let flags = bytes[1];
        let length = peek_u16(bytes, 2) as usize;
        if length < 4 || bytes.len() < length {
            return Err(Truncated);
        }
        let payload = SctpChunkPayload::parse(chunk_type, &bytes[4..length])?;
        let chunk = SctpChunk {
            chunk_type,
            flags,
            payload,
        };
        let padded_len = (length + 3) & !3;
        if bytes.len() < padded_len {
            return Err(Truncated);
        }
        Ok((chunk, &bytes[padded_len..]))
    }

    /// Serialize including the trailing alignment padding.
    fn emit(&self) -> Vec<u8> {
        let payload_bytes = self.payload.emit();
        let length = 4 + payload_bytes.len();
        let padded_len = (length + 3) & !3;
        let mut out = vec![0u8; padded_len];
        out[0] = self.chunk_type;
        out[1] = self.flags;
        out[2..4].copy_from_slice(&(length as u16).to_be_bytes());
        out[4..length].copy_from_slice(&payload_bytes);
        out
    }
}

/// SCTP datagram: common header plus an ordered list of chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SctpHeader {
    /// Source port.
    pub sport: u16,
    /// Destination port.
    pub dport: u16,
    /// Verification tag.
    pub vtag: u32,
    /// CRC32c checksum (RFC 9260 §6.8); this crate does not validate it, it
    /// only carries the stored value.
    pub checksum: u32,
    /// Chunks, in wire order.
    pub chunks: Vec<SctpChunk>,
}

impl SctpHeader {
    /// Minimum wire length: the 12-byte common header alone.
    pub const MIN_LEN: usize = 12;

    /// Parse the common header followed by as many chunks as fill the rest
    /// of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < Self::MIN_LEN {
            return Err(Truncated);
        }
        let common = CommonHeader::read_bytes(&bytes[..Self::MIN_LEN]);
        let mut rest = &bytes[Self::MIN_LEN..];
        let mut chunks = Vec::new();
        while !rest.is_empty() {
            let (chunk, next) = SctpChunk::parse(rest)?;
            chunks.push(chunk);
            rest = next;
        }
        Ok((
            SctpHeader {
                sport: common.sport,
                dport: common.dport,
                vtag: common.vtag,
                checksum: common.checksum,
                chunks,
            },
            rest,
        ))
    }

    /// Serialize the common header followed by every chunk, each padded to
    /// a 4-byte boundary.
    pub fn emit(&self) -> Vec<u8> {
        let common = CommonHeader {
            sport: self.sport,
            dport: self.dport,
            vtag: self.vtag,
            checksum: self.checksum,
        };
        let mut out = vec![0u8; Self::MIN_LEN];
        common.write_bytes(&mut out);
        for chunk in &self.chunks {
            out.extend_from_slice(&chunk.emit());
        }
        out
    }
}
