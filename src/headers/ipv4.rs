//! IPv4 (RFC 791).

use byte_struct::bitfields;

use crate::headers::Truncated;
use crate::{ByteStruct, ByteStructLen, Ipv4Addr};

bitfields!(
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    FlagsAndFragmentOffset: u16 {
        pub reserved: 1,
        pub df: 1,
        pub mf: 1,
        pub frag_offset: 13
    }
);

/// IPv4 header. The version nibble is always 4 and is not stored; IHL is
/// derived from `options.len()` on emit rather than carried as a field, so
/// the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    /// Type of Service / DSCP + ECN byte.
    pub tos: u8,
    /// Total length of header plus payload.
    pub len: u16,
    /// Identification field, used for fragment reassembly.
    pub id: u16,
    /// Don't Fragment flag.
    pub df: bool,
    /// More Fragments flag.
    pub mf: bool,
    /// Fragment offset, in 8-byte units.
    pub frag_offset: u16,
    /// Time to live.
    pub ttl: u8,
    /// IP protocol number of the encapsulated layer.
    pub protocol: u8,
    /// Header checksum.
    pub checksum: u16,
    /// Source address.
    pub saddr: Ipv4Addr,
    /// Destination address.
    pub daddr: Ipv4Addr,
    /// Options, 0-40 bytes, always a multiple of 4.
    pub options: Vec<u8>,
}

const FIXED_LEN: usize = 20;

impl Ipv4Header {
    /// Minimum wire length (no options).
    pub const MIN_LEN: usize = FIXED_LEN;

    /// Header length in bytes including options, i.e. what IHL encodes.
    pub fn header_len(&self) -> usize {
        FIXED_LEN + self.options.len()
    }

    /// Parse a header from the front of `bytes`. The options length is
    /// derived from the IHL nibble, which must be at least 5 (20 bytes);
    /// an IHL below 5 is treated as truncation rather than a distinct error
    /// kind, consistent with the in-band `Truncated` sentinel covering all
    /// parse failures.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < FIXED_LEN {
            return Err(Truncated);
        }
        let version_ihl = bytes[0];
        let ihl = (version_ihl & 0x0F) as usize;
        if ihl < 5 {
            return Err(Truncated);
        }
        let header_len = ihl * 4;
        if bytes.len() < header_len {
            return Err(Truncated);
        }
        let tos = bytes[1];
        let len = u16::from_be_bytes([bytes[2], bytes[3]]);
        let id = u16::from_be_bytes([bytes[4], bytes[5]]);
        let flags_frag = FlagsAndFragmentOffset::read_bytes(&bytes[6..8]);
        let ttl = bytes[8];
        let protocol = bytes[9];
        let checksum = u16::from_be_bytes([bytes[10], bytes[11]]);
        let saddr = Ipv4Addr::new([bytes[12], bytes[13], bytes[14], bytes[15]]);
        let daddr = Ipv4Addr::new([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let options = bytes[FIXED_LEN..header_len].to_vec();
        Ok((
            Ipv4Header {
                tos,
                len,
                id,
                df: flags_frag.df() == 1,
                mf: flags_frag.mf() == 1,
                frag_offset: flags_frag.frag_offset(),
                ttl,
                protocol,
                checksum,
                saddr,
                daddr,
                options,
            },
            &bytes[header_len..],
        ))
    }

    /// Serialize to its wire form: the 20-byte fixed header followed by
    /// `options`, padded by the caller's responsibility to a multiple of 4
    /// (the IHL nibble is derived from the actual options length, so a
    /// caller that hands in an unpadded, non-multiple-of-4 options buffer
    /// will simply get that exact byte count reflected in IHL's low bits
    /// truncated to whole words — see [`EncapsulateError`](crate::EncapsulateError)
    /// for how `encapsulate` surfaces this as a programmer error instead).
    pub fn emit(&self) -> Vec<u8> {
        let header_len = self.header_len();
        let ihl = (header_len / 4) as u8;
        let mut out = vec![0u8; header_len];
        out[0] = 0x40 | (ihl & 0x0F);
        out[1] = self.tos;
        out[2..4].copy_from_slice(&self.len.to_be_bytes());
        out[4..6].copy_from_slice(&self.id.to_be_bytes());
        let flags_frag = FlagsAndFragmentOffset::new()
            .with_reserved(0)
            .with_df(self.df as u8)
            .with_mf(self.mf as u8)
            .with_frag_offset(self.frag_offset);
        flags_frag.write_bytes(&mut out[6..8]);
        out[8] = self.ttl;
        out[9] = self.protocol;
        out[10..12].copy_from_slice(&self.checksum.to_be_bytes());
        out[12..16].copy_from_slice(&self.saddr.0);
        out[16..20].copy_from_slice(&self.daddr.0);
        out[FIXED_LEN..].copy_from_slice(&self.options);
        out
    }
}
