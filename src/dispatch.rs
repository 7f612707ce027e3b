//! The layer dispatcher: `decapsulate`, `decapsulate_dlt`, `encapsulate`.
//!
//! `decapsulate` walks a captured frame outer-to-inner, peeking each layer's
//! tag field (EtherType, IP protocol number, ...) to pick the next header's
//! parser and accumulating the results into an ordered stack. `encapsulate`
//! walks that stack back the other way, recomputing length, type, and
//! checksum fields as it serializes each layer from the inside out.

#[cfg(feature = "tracing-logging")]
use tracing::trace;

use crate::checksum::{self, IpVersion};
use crate::error::EncapsulateError;
use crate::headers::{
    ArpHeader, EthernetHeader, GreHeader, Icmpv4Header, Icmpv6Header, Ieee8021qTagHeader,
    Ipv4Header, Ipv6Header, LinuxCookedHeader, MplsMode, MplsTagHeader, NullHeader, SctpHeader,
    TcpHeader, UdpHeader,
};
use crate::packet::{Header, Packet, Tail};
use crate::tables::{self, Dlt, DltRef, EtherTypeKind, IpProtoKind};

/// Which parser to invoke next for the following layer. `Stop` conditions
/// (raw payload, truncation, unsupported) are reached through early `return`
/// rather than being matched on as part of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Null,
    LinuxCooked,
    Ether,
    Ieee8021qTag,
    Mpls(MplsMode),
    Arp,
    Ipv4,
    Ipv6,
    Gre,
    Tcp,
    Udp,
    Sctp,
    Icmp,
    Icmpv6,
    /// IP protocol 255 ("raw IP"): not in the closed tag set as a header
    /// kind (there is no wire format to parse), so it's a second terminal
    /// alongside the payload-bearing transport tags.
    Raw,
    Unsupported,
}

fn ether_type_tag(code: u16) -> Tag {
    match tables::ether_type(code) {
        EtherTypeKind::Ipv4 => Tag::Ipv4,
        EtherTypeKind::Ipv6 => Tag::Ipv6,
        EtherTypeKind::Arp => Tag::Arp,
        EtherTypeKind::Dot1Q => Tag::Ieee8021qTag,
        EtherTypeKind::MplsUnicast => Tag::Mpls(MplsMode::Unicast),
        EtherTypeKind::MplsMulticast => Tag::Mpls(MplsMode::Multicast),
        EtherTypeKind::Unknown(_) => Tag::Unsupported,
    }
}

fn proto_tag(value: u8) -> Tag {
    match tables::proto(value) {
        IpProtoKind::Icmp => Tag::Icmp,
        IpProtoKind::Tcp => Tag::Tcp,
        IpProtoKind::Udp => Tag::Udp,
        IpProtoKind::Gre => Tag::Gre,
        IpProtoKind::Icmpv6 => Tag::Icmpv6,
        IpProtoKind::Sctp => Tag::Sctp,
        IpProtoKind::Raw => Tag::Raw,
        IpProtoKind::Hopopt | IpProtoKind::Ipv6 | IpProtoKind::Unknown(_) => Tag::Unsupported,
    }
}

/// Decapsulate a raw frame, assuming Ethernet II framing.
pub fn decapsulate(bytes: &[u8]) -> Packet {
    run(Tag::Ether, bytes)
}

/// Decapsulate a raw frame captured under the given pcap DLT (code or
/// name). An unrecognized DLT produces a packet with no headers and an
/// `Unsupported` tail.
pub fn decapsulate_dlt<'a>(dlt: impl Into<DltRef<'a>>, bytes: &[u8]) -> Packet {
    let tag = match tables::dlt(dlt.into()) {
        Dlt::Null | Dlt::Loop => Tag::Null,
        Dlt::LinuxSll => Tag::LinuxCooked,
        Dlt::En10mb => Tag::Ether,
        _ => Tag::Unsupported,
    };
    run(tag, bytes)
}

/// Build the `Unsupported` terminal, logging the transition. The remainder
/// is never discarded, just stops being interpreted.
fn unsupported(headers: Vec<Header>, bytes: &[u8]) -> Packet {
    #[cfg(feature = "tracing-logging")]
    tracing::debug!(remaining = bytes.len(), "unsupported layer, stopping");
    Packet { headers, tail: Tail::Unsupported(bytes.to_vec()) }
}

/// Build the `Truncated` terminal, logging the transition.
fn truncated(headers: Vec<Header>, bytes: &[u8]) -> Packet {
    #[cfg(feature = "tracing-logging")]
    tracing::debug!(remaining = bytes.len(), "truncated mid-header, stopping");
    Packet { headers, tail: Tail::Truncated(bytes.to_vec()) }
}

fn run(mut tag: Tag, mut bytes: &[u8]) -> Packet {
    let mut headers = Vec::new();
    loop {
        #[cfg(feature = "tracing-logging")]
        trace!(?tag, remaining = bytes.len(), "dispatch step");

        match tag {
            Tag::Unsupported => return unsupported(headers, bytes),
            Tag::Raw => return Packet { headers, tail: Tail::Payload(bytes.to_vec()) },

            Tag::Null => {
                if bytes.len() < NullHeader::DISPATCH_MIN_LEN {
                    return truncated(headers, bytes);
                }
                let (h, rest) = match NullHeader::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                let next = if h.family == tables::PF_INET {
                    Tag::Ipv4
                } else if h.family == tables::PF_INET6 {
                    Tag::Ipv6
                } else {
                    Tag::Unsupported
                };
                headers.push(Header::Null(h));
                bytes = rest;
                tag = next;
            }

            Tag::LinuxCooked => {
                let (h, rest) = match LinuxCookedHeader::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                let next = ether_type_tag(h.pro);
                headers.push(Header::Sll(h));
                bytes = rest;
                tag = next;
            }

            Tag::Ether => {
                let (h, rest) = match EthernetHeader::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                let next = ether_type_tag(h.ethertype);
                headers.push(Header::Ether(h));
                bytes = rest;
                tag = next;
            }

            Tag::Ieee8021qTag => {
                let (h, rest) = match Ieee8021qTagHeader::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                let next = ether_type_tag(h.ether_type);
                headers.push(Header::Vlan(h));
                bytes = rest;
                tag = next;
            }

            Tag::Mpls(mode) => {
                let (h, rest) = match MplsTagHeader::parse(mode, bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                let next = ether_type_tag(h.ether_type);
                headers.push(Header::Mpls(h));
                bytes = rest;
                tag = next;
            }

            Tag::Arp => {
                let (h, rest) = match ArpHeader::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                headers.push(Header::Arp(h));
                return Packet { headers, tail: Tail::Payload(rest.to_vec()) };
            }

            Tag::Ipv4 => {
                let (h, rest) = match Ipv4Header::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                let next = proto_tag(h.protocol);
                headers.push(Header::Ipv4(h));
                bytes = rest;
                tag = next;
            }

            Tag::Ipv6 => {
                let (h, rest) = match Ipv6Header::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                let next = proto_tag(h.next);
                headers.push(Header::Ipv6(h));
                bytes = rest;
                tag = next;
            }

            Tag::Gre => {
                let (h, rest) = match GreHeader::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                let next = ether_type_tag(h.protocol_type);
                headers.push(Header::Gre(h));
                bytes = rest;
                tag = next;
            }

            Tag::Tcp => {
                let (h, rest) = match TcpHeader::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                headers.push(Header::Tcp(h));
                return Packet { headers, tail: Tail::Payload(rest.to_vec()) };
            }

            Tag::Udp => {
                let (h, rest) = match UdpHeader::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                headers.push(Header::Udp(h));
                return Packet { headers, tail: Tail::Payload(rest.to_vec()) };
            }

            Tag::Sctp => {
                let (h, rest) = match SctpHeader::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                headers.push(Header::Sctp(h));
                return Packet { headers, tail: Tail::Payload(rest.to_vec()) };
            }

            Tag::Icmp => {
                let (h, rest) = match Icmpv4Header::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                // Timestamp and Info messages have no payload; any trailing
                // bytes are not part of the message and are dropped rather
                // than surfaced as a tail.
                let tail = if matches!(h.icmp_type, 13 | 14 | 15 | 16) {
                    Vec::new()
                } else {
                    rest.to_vec()
                };
                headers.push(Header::Icmpv4(h));
                return Packet { headers, tail: Tail::Payload(tail) };
            }

            Tag::Icmpv6 => {
                let (h, rest) = match Icmpv6Header::parse(bytes) {
                    Ok(v) => v,
                    Err(_) => return truncated(headers, bytes),
                };
                headers.push(Header::Icmpv6(h));
                return Packet { headers, tail: Tail::Payload(rest.to_vec()) };
            }
        }
    }
}

/// Serialize a decapsulated (or hand-built) [`Packet`] back into bytes,
/// walking inner-to-outer and recomputing length/type/checksum fields as it
/// goes.
pub fn encapsulate(packet: &Packet) -> Result<Vec<u8>, EncapsulateError> {
    if packet.headers.is_empty() {
        if let Tail::Payload(bytes) = &packet.tail {
            if bytes.is_empty() {
                return Err(EncapsulateError::EmptyPacket);
            }
        }
    }

    let mut inner: Vec<u8> = match &packet.tail {
        Tail::Payload(bytes) => bytes.clone(),
        Tail::Truncated(bytes) | Tail::Unsupported(bytes) => bytes.clone(),
    };

    for (i, header) in packet.headers.iter().enumerate().rev() {
        let inner_kind = next_ether_type(packet.headers.get(i + 1));
        let inner_proto = next_ip_proto(packet.headers.get(i + 1));

        inner = match header {
            Header::Null(h) => h.emit().to_vec().into_iter().chain(inner).collect(),
            Header::Sll(h) => {
                let mut h = *h;
                if let Some(et) = inner_kind {
                    h.pro = et;
                }
                h.emit().to_vec().into_iter().chain(inner).collect()
            }
            Header::Ether(h) => {
                let mut h = *h;
                if let Some(et) = inner_kind {
                    h.ethertype = et;
                }
                h.emit().to_vec().into_iter().chain(inner).collect()
            }
            Header::Vlan(h) => {
                let mut h = *h;
                if let Some(et) = inner_kind {
                    h.ether_type = et;
                }
                h.emit().to_vec().into_iter().chain(inner).collect()
            }
            Header::Mpls(h) => {
                let mut h = h.clone();
                if let Some(et) = inner_kind {
                    h.ether_type = et;
                }
                if h.stack.is_empty() {
                    return Err(EncapsulateError::MplsStackEmpty);
                }
                h.emit().into_iter().chain(inner).collect()
            }
            Header::Arp(h) => h.emit().to_vec().into_iter().chain(inner).collect(),
            Header::Ipv4(h) => {
                let mut h = h.clone();
                if h.options.len() % 4 != 0 {
                    return Err(EncapsulateError::Ipv4OptionsNotWordAligned {
                        len: h.options.len(),
                    });
                }
                if h.header_len() > 60 {
                    return Err(EncapsulateError::Ipv4HeaderTooLong {
                        len: h.header_len(),
                    });
                }
                if let Some(p) = inner_proto {
                    h.protocol = p;
                }
                h.len = (h.header_len() + inner.len()) as u16;
                h.checksum = 0;
                let mut bytes = h.emit();
                h.checksum = checksum::makesum(&bytes);
                bytes[10..12].copy_from_slice(&h.checksum.to_be_bytes());
                bytes.into_iter().chain(inner).collect()
            }
            Header::Ipv6(h) => {
                let mut h = *h;
                if let Some(p) = inner_proto {
                    h.next = p;
                }
                h.payload_len = inner.len() as u16;
                h.emit().to_vec().into_iter().chain(inner).collect()
            }
            Header::Gre(h) => {
                let mut h = *h;
                if let Some(et) = inner_kind {
                    h.protocol_type = et;
                }
                h.emit().into_iter().chain(inner).collect()
            }
            Header::Tcp(h) => {
                let mut h = h.clone();
                if h.options.len() % 4 != 0 {
                    return Err(EncapsulateError::TcpOptionsNotWordAligned {
                        len: h.options.len(),
                    });
                }
                if h.header_len() > 60 {
                    return Err(EncapsulateError::TcpHeaderTooLong {
                        len: h.header_len(),
                    });
                }
                h.checksum = 0;
                let mut bytes = h.emit();
                if let Some(ip) = enclosing_ip(&packet.headers[..i]) {
                    let mut full = bytes.clone();
                    full.extend_from_slice(&inner);
                    h.checksum = !pseudo_checksum(ip, 6, &full);
                    bytes[16..18].copy_from_slice(&h.checksum.to_be_bytes());
                }
                bytes.into_iter().chain(inner).collect()
            }
            Header::Udp(h) => {
                let mut h = *h;
                h.ulen = (UdpHeader::MIN_LEN + inner.len()) as u16;
                h.checksum = 0;
                let mut bytes = h.emit();
                if let Some(ip) = enclosing_ip(&packet.headers[..i]) {
                    let mut full = bytes.to_vec();
                    full.extend_from_slice(&inner);
                    h.checksum = !pseudo_checksum(ip, 17, &full);
                    bytes[6..8].copy_from_slice(&h.checksum.to_be_bytes());
                }
                bytes.to_vec().into_iter().chain(inner).collect()
            }
            Header::Sctp(h) => h.emit().into_iter().chain(inner).collect(),
            Header::Icmpv4(h) => {
                let mut h = h.clone();
                h.checksum = 0;
                let mut bytes = h.emit();
                bytes.extend_from_slice(&inner);
                let sum = checksum::makesum(&bytes);
                bytes[2..4].copy_from_slice(&sum.to_be_bytes());
                bytes
            }
            Header::Icmpv6(h) => {
                let mut h = *h;
                h.checksum = 0;
                let mut bytes = h.emit().to_vec();
                if let Some(ip) = enclosing_ip(&packet.headers[..i]) {
                    let mut full = bytes.clone();
                    full.extend_from_slice(&inner);
                    h.checksum = !pseudo_checksum(ip, 58, &full);
                    bytes[2..4].copy_from_slice(&h.checksum.to_be_bytes());
                }
                bytes.into_iter().chain(inner).collect()
            }
        };
    }

    Ok(inner)
}

/// The IP addresses of the nearest enclosing IP header, if any header in
/// `outer_headers` (outer-to-inner order, i.e. the slice before the current
/// layer) is `Ipv4`/`Ipv6`. The nearest one wins, matching how a real stack
/// is built innermost-out: by the time we reach TCP/UDP/ICMPv6, the IP
/// header immediately enclosing them is the last `Ipv4`/`Ipv6` entry seen.
enum EnclosingIp {
    V4 { saddr: [u8; 4], daddr: [u8; 4] },
    V6 { saddr: [u8; 16], daddr: [u8; 16] },
}

fn enclosing_ip(outer_headers: &[Header]) -> Option<EnclosingIp> {
    outer_headers.iter().rev().find_map(|h| match h {
        Header::Ipv4(ip) => Some(EnclosingIp::V4 {
            saddr: ip.saddr.0,
            daddr: ip.daddr.0,
        }),
        Header::Ipv6(ip) => Some(EnclosingIp::V6 {
            saddr: ip.saddr.0,
            daddr: ip.daddr.0,
        }),
        _ => None,
    })
}

/// The raw pseudo-header fold (no final complement, same convention as
/// [`checksum::checksum_raw`]) — callers store `!pseudo_checksum(..)` in the
/// checksum field, matching how the IPv4/ICMPv4 paths wrap their fold in
/// [`checksum::makesum`].
fn pseudo_checksum(ip: EnclosingIp, protocol: u8, transport_and_payload: &[u8]) -> u16 {
    match ip {
        EnclosingIp::V4 { saddr, daddr } => checksum::pseudo_header_checksum(
            IpVersion::V4,
            &saddr,
            &daddr,
            protocol,
            transport_and_payload.len() as u16,
            transport_and_payload,
        ),
        EnclosingIp::V6 { saddr, daddr } => checksum::pseudo_header_checksum(
            IpVersion::V6,
            &saddr,
            &daddr,
            protocol,
            transport_and_payload.len() as u16,
            transport_and_payload,
        ),
    }
}

/// The EtherType a header one layer further in would be known by, used to
/// patch the current layer's `type`/`ether_type` field on emit. `None` means
/// the inner layer's kind carries no EtherType mapping (a transport header,
/// GRE, or the raw tail), in which case the caller leaves the stored field
/// untouched rather than overwrite it with a placeholder.
fn next_ether_type(next: Option<&Header>) -> Option<u16> {
    match next? {
        Header::Vlan(_) => Some(0x8100),
        Header::Mpls(m) => Some(match m.mode {
            MplsMode::Unicast => 0x8847,
            MplsMode::Multicast => 0x8848,
        }),
        Header::Arp(_) => Some(0x0806),
        Header::Ipv4(_) => Some(0x0800),
        Header::Ipv6(_) => Some(0x86DD),
        _ => None,
    }
}

/// The IP protocol number a header one layer further in would be known by.
/// `None` preserves the stored `p`/`next` value, for the same reason as
/// [`next_ether_type`].
fn next_ip_proto(next: Option<&Header>) -> Option<u8> {
    match next? {
        Header::Icmpv4(_) => Some(1),
        Header::Tcp(_) => Some(6),
        Header::Udp(_) => Some(17),
        Header::Ipv6(_) => Some(41),
        Header::Gre(_) => Some(47),
        Header::Icmpv6(_) => Some(58),
        Header::Sctp(_) => Some(132),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::PF_INET;
    use crate::Ipv4Addr;

    #[test]
    fn ether_ipv4_udp_round_trips() {
        let ether = EthernetHeader {
            dhost: crate::MacAddr::BROADCAST,
            shost: crate::MacAddr::new([2, 0, 0, 0, 0, 1]),
            ethertype: 0x0800,
        };
        let ip = Ipv4Header {
            tos: 0,
            len: 0,
            id: 1,
            df: false,
            mf: false,
            frag_offset: 0,
            ttl: 64,
            protocol: 0,
            checksum: 0,
            saddr: Ipv4Addr::new([10, 0, 0, 1]),
            daddr: Ipv4Addr::new([10, 0, 0, 2]),
            options: Vec::new(),
        };
        let udp = UdpHeader {
            sport: 1000,
            dport: 2000,
            ulen: 0,
            checksum: 0,
        };
        let packet = Packet {
            headers: vec![Header::Ether(ether), Header::Ipv4(ip), Header::Udp(udp)],
            tail: Tail::Payload(vec![1, 2, 3, 4]),
        };
        let bytes = encapsulate(&packet).unwrap();
        let round = decapsulate(&bytes);
        assert!(matches!(round.headers[0], Header::Ether(_)));
        assert!(matches!(round.headers[1], Header::Ipv4(_)));
        assert!(matches!(round.headers[2], Header::Udp(_)));
        assert_eq!(round.tail, Tail::Payload(vec![1, 2, 3, 4]));
        if let Header::Ipv4(ip) = &round.headers[1] {
            assert_eq!(ip.protocol, 17);
        }
        if let Header::Udp(u) = &round.headers[2] {
            assert!(checksum::valid(checksum::pseudo_header_checksum(
                IpVersion::V4,
                &[10, 0, 0, 1],
                &[10, 0, 0, 2],
                17,
                (8 + 4),
                &{
                    let mut v = u.emit().to_vec();
                    v.extend_from_slice(&[1, 2, 3, 4]);
                    v
                },
            )));
        }
    }

    #[test]
    fn unknown_dlt_is_unsupported() {
        let packet = decapsulate_dlt(0xFFFF_u32, &[1, 2, 3]);
        assert!(packet.headers.is_empty());
        assert_eq!(packet.tail, Tail::Unsupported(vec![1, 2, 3]));
    }

    #[test]
    fn null_loopback_dispatches_by_family() {
        let mut frame = PF_INET.to_ne_bytes().to_vec();
        frame.extend_from_slice(&[0u8; 12]); // pad to the 16-byte dispatch minimum
        let ip = Ipv4Header {
            tos: 0,
            len: 20,
            id: 0,
            df: false,
            mf: false,
            frag_offset: 0,
            ttl: 64,
            protocol: 17,
            checksum: 0,
            saddr: Ipv4Addr::ANY,
            daddr: Ipv4Addr::ANY,
            options: Vec::new(),
        };
        let mut full = frame.clone();
        // overwrite the 12 bytes of padding with a real, if truncated, IPv4 header
        full.truncate(4);
        full.extend_from_slice(&ip.emit());
        let packet = decapsulate_dlt("null", &full);
        assert!(matches!(packet.headers[0], Header::Null(_)));
        assert!(matches!(packet.headers[1], Header::Ipv4(_)));
    }

    #[test]
    fn truncated_below_ethernet_minimum() {
        let packet = decapsulate(&[0u8; 4]);
        assert!(packet.headers.is_empty());
        assert_eq!(packet.tail, Tail::Truncated(vec![0u8; 4]));
    }
}
