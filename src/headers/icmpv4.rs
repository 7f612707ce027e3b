//! ICMPv4 (RFC 792), including the per-type body layouts.
//!
//! The type/code/checksum prefix is a fixed shape, and the type-dispatched
//! body is a plain Rust enum since its shape genuinely varies by message
//! type (`ByteStruct` derive can't express a tagged union).

use crate::headers::{peek_u16, Truncated};

/// The type-specific body that follows the 4-byte ICMPv4 common header,
/// dispatched on `(type, code)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icmpv4Body {
    /// Destination Unreachable (type 3): 4 bytes unused, then the
    /// originating IP header + 8 bytes in the tail.
    DestUnreachable {
        /// Unused 32-bit field (historically reused by some extensions).
        unused: u32,
    },
    /// Time Exceeded (type 11): same shape as Destination Unreachable.
    TimeExceeded {
        /// Unused 32-bit field.
        unused: u32,
    },
    /// Source Quench (type 4, deprecated by RFC 6633 but still decodable):
    /// same shape as Destination Unreachable.
    SourceQuench {
        /// Unused 32-bit field.
        unused: u32,
    },
    /// Parameter Problem (type 12): a byte offset plus 3 unused bytes.
    ParameterProblem {
        /// Byte offset of the offending octet in the originating datagram.
        pointer: u8,
        /// Unused 24-bit field, carried opaquely.
        unused: [u8; 3],
    },
    /// Redirect (type 5): the gateway address to use instead.
    Redirect {
        /// Gateway IPv4 address, 4 bytes.
        gateway: [u8; 4],
    },
    /// Echo Request (type 8).
    Echo {
        /// Identifier, matched against the corresponding reply.
        id: u16,
        /// Sequence number.
        seq: u16,
    },
    /// Echo Reply (type 0), same shape as Echo.
    EchoReply {
        /// Identifier.
        id: u16,
        /// Sequence number.
        seq: u16,
    },
    /// Timestamp (type 13): identifier/sequence plus originate/receive/
    /// transmit timestamps. The tail is empty; everything the message
    /// carries is in these fixed fields.
    Timestamp {
        /// Identifier.
        id: u16,
        /// Sequence number.
        seq: u16,
        /// Originate timestamp.
        originate: u32,
        /// Receive timestamp.
        receive: u32,
        /// Transmit timestamp.
        transmit: u32,
    },
    /// Timestamp Reply (type 14), same shape as Timestamp.
    TimestampReply {
        /// Identifier.
        id: u16,
        /// Sequence number.
        seq: u16,
        /// Originate timestamp.
        originate: u32,
        /// Receive timestamp.
        receive: u32,
        /// Transmit timestamp.
        transmit: u32,
    },
    /// Information Request (type 15): identifier/sequence only, empty tail.
    InfoRequest {
        /// Identifier.
        id: u16,
        /// Sequence number.
        seq: u16,
    },
    /// Information Reply (type 16), same shape as Information Request.
    InfoReply {
        /// Identifier.
        id: u16,
        /// Sequence number.
        seq: u16,
    },
    /// Any other (type, code) pair: the 4 bytes after the common header are
    /// carried opaquely and the rest is left in the packet tail.
    Other {
        /// Opaque 32-bit field, meaning depends on the unrecognized type.
        rest: u32,
    },
}

impl Icmpv4Body {
    /// Fixed length of this body's typed fields (excludes whatever is left
    /// in the packet tail).
    pub fn len(&self) -> usize {
        match self {
            Icmpv4Body::DestUnreachable { .. }
            | Icmpv4Body::TimeExceeded { .. }
            | Icmpv4Body::SourceQuench { .. }
            | Icmpv4Body::ParameterProblem { .. }
            | Icmpv4Body::Redirect { .. }
            | Icmpv4Body::Echo { .. }
            | Icmpv4Body::EchoReply { .. }
            | Icmpv4Body::InfoRequest { .. }
            | Icmpv4Body::InfoReply { .. }
            | Icmpv4Body::Other { .. } => 4,
            Icmpv4Body::Timestamp { .. } | Icmpv4Body::TimestampReply { .. } => 16,
        }
    }

    fn parse(icmp_type: u8, bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < 4 {
            return Err(Truncated);
        }
        let body = match icmp_type {
            3 => Icmpv4Body::DestUnreachable {
                unused: u32::from_be_bytes(bytes[0..4].try_into().unwrap()),
            },
            11 => Icmpv4Body::TimeExceeded {
                unused: u32::from_be_bytes(bytes[0..4].try_into().unwrap()),
            },
            4 => Icmpv4Body::SourceQuench {
                unused: u32::from_be_bytes(bytes[0..4].try_into().unwrap()),
            },
            12 => Icmpv4Body::ParameterProblem {
                pointer: bytes[0],
                unused: bytes[1..4].try_into().unwrap(),
            },
            5 => Icmpv4Body::Redirect {
                gateway: bytes[0..4].try_into().unwrap(),
            },
            8 => Icmpv4Body::Echo {
                id: peek_u16(bytes, 0),
                seq: peek_u16(bytes, 2),
            },
            0 => Icmpv4Body::EchoReply {
                id: peek_u16(bytes, 0),
                seq: peek_u16(bytes, 2),
            },
            13 | 14 => {
                if bytes.len() < 16 {
                    return Err(Truncated);
                }
                let id = peek_u16(bytes, 0);
                let seq = peek_u16(bytes, 2);
                let originate = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
                let receive = u32::from_be_bytes(bytes[8..12].try_into().unwrap());
                let transmit = u32::from_be_bytes(bytes[12..16].try_into().unwrap());
                if icmp_type == 13 {
                    Icmpv4Body::Timestamp {
                        id,
                        seq,
                        originate,
                        receive,
                        transmit,
                    }
                } else {
                    Icmpv4Body::TimestampReply {
                        id,
                        seq,
                        originate,
                        receive,
                        transmit,
                    }
                }
            }
            15 => Icmpv4Body::InfoRequest {
                id: peek_u16(bytes, 0),
                seq: peek_u16(bytes, 2),
            },
            16 => Icmpv4Body::InfoReply {
                id: peek_u16(bytes, 0),
                seq: peek_u16(bytes, 2),
            },
            _ => Icmpv4Body::Other {
                rest: u32::from_be_bytes(bytes[0..4].try_into().unwrap()),
            },
        };
        let consumed = body.len();
        Ok((body, &bytes[consumed..]))
    }

    fn emit(&self) -> Vec<u8> {
        match self {
            Icmpv4Body::DestUnreachable { unused }
            | Icmpv4Body::TimeExceeded { unused }
            | Icmpv4Body::SourceQuench { unused } => unused.to_be_bytes().to_vec(),
            Icmpv4Body::ParameterProblem { pointer, unused } => {
                vec![*pointer, unused[0], unused[1], unused[2]]
            }
            Icmpv4Body::Redirect { gateway } => gateway.to_vec(),
            Icmpv4Body::Echo { id, seq } | Icmpv4Body::EchoReply { id, seq } => {
                let mut out = Vec::with_capacity(4);
                out.extend_from_slice(&id.to_be_bytes());
                out.extend_from_slice(&seq.to_be_bytes());
                out
            }
            Icmpv4Body::Timestamp {
                id,
                seq,
                originate,
                receive,
                transmit,
            }
            | Icmpv4Body::TimestampReply {
                id,
                seq,
                originate,
                receive,
                transmit,
            } => {
                let mut out = Vec::with_capacity(16);
                out.extend_from_slice(&id.to_be_bytes());
                out.extend_from_slice(&seq.to_be_bytes());
                out.extend_from_slice(&originate.to_be_bytes());
                out.extend_from_slice(&receive.to_be_bytes());
                out.extend_from_slice(&transmit.to_be_bytes());
                out
            }
            Icmpv4Body::InfoRequest { id, seq } | Icmpv4Body::InfoReply { id, seq } => {
                let mut out = Vec::with_capacity(4);
                out.extend_from_slice(&id.to_be_bytes());
                out.extend_from_slice(&seq.to_be_bytes());
                out
            }
            Icmpv4Body::Other { rest } => rest.to_be_bytes().to_vec(),
        }
    }
}

/// ICMPv4 message: 4-byte common header plus a type-dispatched body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icmpv4Header {
    /// Message type.
    pub icmp_type: u8,
    /// Message code.
    pub code: u8,
    /// Checksum over the whole ICMP message (no pseudo-header, unlike
    /// ICMPv6).
    pub checksum: u16,
    /// Type-specific body.
    pub body: Icmpv4Body,
}

impl Icmpv4Header {
    /// Parse the common header and its type-dispatched body from the front
    /// of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8]), Truncated> {
        if bytes.len() < 4 {
            return Err(Truncated);
        }
        let icmp_type = bytes[0];
        let code = bytes[1];
        let checksum = peek_u16(bytes, 2);
        let (body, rest) = Icmpv4Body::parse(icmp_type, &bytes[4..])?;
        Ok((
            Icmpv4Header {
                icmp_type,
                code,
                checksum,
                body,
            },
            rest,
        ))
    }

    /// Serialize to wire form.
    pub fn emit(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.body.len());
        out.push(self.icmp_type);
        out.push(self.code);
        out.extend_from_slice(&self.checksum.to_be_bytes());
        out.extend_from_slice(&self.body.emit());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_request_round_trip() {
        let h = Icmpv4Header {
            icmp_type: 8,
            code: 0,
            checksum: 0,
            body: Icmpv4Body::Echo { id: 1, seq: 2 },
        };
        let bytes = h.emit();
        assert_eq!(bytes.len(), 8);
        let (parsed, rest) = Icmpv4Header::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }

    #[test]
    fn timestamp_round_trip_has_empty_tail() {
        let h = Icmpv4Header {
            icmp_type: 13,
            code: 0,
            checksum: 0,
            body: Icmpv4Body::Timestamp {
                id: 1,
                seq: 1,
                originate: 10,
                receive: 20,
                transmit: 30,
            },
        };
        let bytes = h.emit();
        assert_eq!(bytes.len(), 20);
        let (parsed, rest) = Icmpv4Header::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }

    #[test]
    fn parameter_problem_round_trips_nonzero_unused() {
        let h = Icmpv4Header {
            icmp_type: 12,
            code: 0,
            checksum: 0,
            body: Icmpv4Body::ParameterProblem {
                pointer: 5,
                unused: [0xAA, 0xBB, 0xCC],
            },
        };
        let bytes = h.emit();
        assert_eq!(bytes.len(), 8);
        let (parsed, rest) = Icmpv4Header::parse(&bytes).unwrap();
        assert_eq!(parsed, h);
        assert!(rest.is_empty());
    }

    #[test]
    fn dest_unreachable_leaves_originating_datagram_in_tail() {
        let mut bytes = vec![3u8, 1, 0, 0, 0, 0, 0, 0];
        bytes.extend_from_slice(&[0xAA; 28]); // originating IP header + 8 bytes
        let (parsed, rest) = Icmpv4Header::parse(&bytes).unwrap();
        assert_eq!(parsed.icmp_type, 3);
        assert_eq!(rest.len(), 28);
    }

    #[test]
    fn truncated_below_minimum() {
        assert_eq!(Icmpv4Header::parse(&[8u8; 3]), Err(Truncated));
    }
}
