//! Error type for the one fallible public operation, [`crate::encapsulate`].
//!
//! `decapsulate`/`decapsulate_dlt` are total — every input byte buffer
//! produces *some* [`crate::Packet`], with `Truncated`/`Unsupported` as
//! in-band sentinel headers rather than an error. `encapsulate` walks a
//! caller-built `Packet` back into bytes and can only fail on a structurally
//! invalid input that a caller built by hand, e.g. an `Ipv4Header` whose
//! `options` aren't a multiple of 4 bytes.

use std::fmt;

/// A caller-constructed [`crate::Packet`] could not be serialized because one
/// of its headers is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncapsulateError {
    /// An `Ipv4Header`'s `options` field is not a multiple of 4 bytes, so no
    /// valid IHL nibble can represent it.
    Ipv4OptionsNotWordAligned {
        /// The invalid options length, in bytes.
        len: usize,
    },
    /// An `Ipv4Header`'s header length (20 + `options.len()`) exceeds 60
    /// bytes, the largest value the 4-bit IHL field can encode.
    Ipv4HeaderTooLong {
        /// The header length that would have been required, in bytes.
        len: usize,
    },
    /// A `TcpHeader`'s `options` field is not a multiple of 4 bytes.
    TcpOptionsNotWordAligned {
        /// The invalid options length, in bytes.
        len: usize,
    },
    /// A `TcpHeader`'s header length (20 + `options.len()`) exceeds 60
    /// bytes, the largest value the 4-bit data-offset field can encode.
    TcpHeaderTooLong {
        /// The header length that would have been required, in bytes.
        len: usize,
    },
    /// An MPLS label stack has no entries, so there is no bottom-of-stack
    /// entry to mark.
    MplsStackEmpty,
    /// A `Packet` with no headers and an empty payload tail — there is
    /// nothing to serialize.
    EmptyPacket,
}

impl fmt::Display for EncapsulateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncapsulateError::Ipv4OptionsNotWordAligned { len } => write!(
                f,
                "ipv4 options length {len} is not a multiple of 4 bytes"
            ),
            EncapsulateError::Ipv4HeaderTooLong { len } => write!(
                f,
                "ipv4 header length {len} exceeds the 60-byte maximum the IHL field can encode"
            ),
            EncapsulateError::TcpOptionsNotWordAligned { len } => {
                write!(f, "tcp options length {len} is not a multiple of 4 bytes")
            }
            EncapsulateError::TcpHeaderTooLong { len } => write!(
                f,
                "tcp header length {len} exceeds the 60-byte maximum the data offset field can encode"
            ),
            EncapsulateError::MplsStackEmpty => {
                write!(f, "mpls label stack has no entries")
            }
            EncapsulateError::EmptyPacket => write!(f, "packet has no headers"),
        }
    }
}

impl std::error::Error for EncapsulateError {}
