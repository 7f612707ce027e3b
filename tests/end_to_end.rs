//! Named end-to-end scenarios and whole-stack property checks, as opposed to
//! the per-header round-trip tests that live alongside each codec module.

use pktlayer::*;

fn eth(dhost: [u8; 6], shost: [u8; 6], ethertype: u16) -> EthernetHeader {
    EthernetHeader {
        dhost: MacAddr::new(dhost),
        shost: MacAddr::new(shost),
        ethertype,
    }
}

fn ipv4(protocol: u8, saddr: [u8; 4], daddr: [u8; 4]) -> Ipv4Header {
    Ipv4Header {
        tos: 0,
        len: 0,
        id: 0x1234,
        df: true,
        mf: false,
        frag_offset: 0,
        ttl: 64,
        protocol,
        checksum: 0,
        saddr: Ipv4Addr::new(saddr),
        daddr: Ipv4Addr::new(daddr),
        options: Vec::new(),
    }
}

#[test]
fn icmp_echo_request_on_ethernet_ipv4() {
    let ether = eth([0x02, 0, 0, 0, 0, 2], [0x02, 0, 0, 0, 0, 1], 0x0800);
    let ip = ipv4(1, [10, 0, 0, 1], [10, 0, 0, 2]);
    let icmp = Icmpv4Header {
        icmp_type: 8,
        code: 0,
        checksum: 0,
        body: Icmpv4Body::Echo { id: 42, seq: 1 },
    };
    let packet = Packet {
        headers: vec![Header::Ether(ether), Header::Ipv4(ip), Header::Icmpv4(icmp)],
        tail: Tail::Payload(vec![0xAB; 8]),
    };
    let bytes = encapsulate(&packet).unwrap();
    let round = decapsulate(&bytes);

    assert!(matches!(round.headers[0], Header::Ether(_)));
    assert!(matches!(round.headers[1], Header::Ipv4(_)));
    match &round.headers[2] {
        Header::Icmpv4(h) => {
            assert_eq!(h.icmp_type, 8);
            assert_eq!(h.code, 0);
            assert_eq!(h.body, Icmpv4Body::Echo { id: 42, seq: 1 });
        }
        other => panic!("expected Icmpv4, got {other:?}"),
    }
    assert_eq!(round.tail, Tail::Payload(vec![0xAB; 8]));

    let rebuilt = encapsulate(&round).unwrap();
    assert_eq!(rebuilt, bytes);
}

#[test]
fn tcp_syn_with_mss_option_over_ipv4() {
    let ether = eth([0x02, 0, 0, 0, 0, 2], [0x02, 0, 0, 0, 0, 1], 0x0800);
    let ip = ipv4(6, [10, 0, 0, 1], [10, 0, 0, 2]);
    let tcp = TcpHeader {
        sport: 51000,
        dport: 443,
        seqno: 1,
        ackno: 0,
        flags: TcpFlags::new().with_syn(true),
        window: 65535,
        checksum: 0,
        urgent_ptr: 0,
        options: vec![0x02, 0x04, 0x05, 0xb4], // kind=2 len=4 mss=1460
    };
    let packet = Packet {
        headers: vec![Header::Ether(ether), Header::Ipv4(ip), Header::Tcp(tcp)],
        tail: Tail::Payload(Vec::new()),
    };
    let bytes = encapsulate(&packet).unwrap();
    let round = decapsulate(&bytes);

    let (ip_saddr, ip_daddr) = match &round.headers[1] {
        Header::Ipv4(h) => (h.saddr.0, h.daddr.0),
        other => panic!("expected Ipv4, got {other:?}"),
    };
    match &round.headers[2] {
        Header::Tcp(h) => {
            assert_eq!(h.options.len(), 4);
            assert_eq!(h.options, vec![0x02, 0x04, 0x05, 0xb4]);
            assert_eq!(h.header_len(), 24);
            let emitted = h.emit();
            assert_eq!(emitted[12] >> 4, 6); // data offset
            assert!(valid(checksum::pseudo_header_checksum(
                checksum::IpVersion::V4,
                &ip_saddr,
                &ip_daddr,
                6,
                emitted.len() as u16,
                &emitted,
            )));
        }
        other => panic!("expected Tcp, got {other:?}"),
    }

    let rebuilt = encapsulate(&round).unwrap();
    assert_eq!(rebuilt, bytes);
}

#[test]
fn udp_over_ipv6_eight_byte_payload() {
    let ether = eth([0x02, 0, 0, 0, 0, 2], [0x02, 0, 0, 0, 0, 1], 0x86DD);
    let ip = Ipv6Header {
        traffic_class: 0,
        flow_label: 0,
        payload_len: 0,
        next: 0,
        hop_limit: 64,
        saddr: Ipv6Addr::new([0x20, 1, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]),
        daddr: Ipv6Addr::new([0x20, 1, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]),
    };
    let udp = UdpHeader {
        sport: 53,
        dport: 51000,
        ulen: 0,
        checksum: 0,
    };
    let packet = Packet {
        headers: vec![Header::Ether(ether), Header::Ipv6(ip), Header::Udp(udp)],
        tail: Tail::Payload(vec![1, 2, 3, 4, 5, 6, 7, 8]),
    };
    let bytes = encapsulate(&packet).unwrap();
    let round = decapsulate(&bytes);

    let (saddr, daddr) = match &round.headers[1] {
        Header::Ipv6(h) => {
            assert_eq!(h.next, 17);
            (h.saddr.0, h.daddr.0)
        }
        other => panic!("expected Ipv6, got {other:?}"),
    };
    match &round.headers[2] {
        Header::Udp(h) => {
            assert_eq!(h.ulen, 16);
            let mut full = h.emit().to_vec();
            full.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
            assert!(valid(checksum::pseudo_header_checksum(
                checksum::IpVersion::V6,
                &saddr,
                &daddr,
                17,
                h.ulen,
                &full,
            )));
        }
        other => panic!("expected Udp, got {other:?}"),
    }
}

#[test]
fn arp_request_no_payload() {
    let frame: Vec<u8> = vec![
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // dst
        0x02, 0xaf, 0xff, 0x1a, 0xe5, 0x3c, // src
        0x08, 0x06, // ethertype = ARP
        0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, // hrd pro hln pln op
        0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 10, 0, 0, 1, // sha sip
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 10, 0, 0, 2, // tha tip
    ];
    assert_eq!(frame.len(), 14 + 28);

    let packet = decapsulate(&frame);
    assert!(matches!(packet.headers[0], Header::Ether(_)));
    match &packet.headers[1] {
        Header::Arp(h) => {
            assert_eq!(h.operation(), ArpOperation::Request);
            assert_eq!(h.sha, MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]));
            assert_eq!(h.sip, Ipv4Addr::new([10, 0, 0, 1]));
            assert_eq!(h.tip, Ipv4Addr::new([10, 0, 0, 2]));
        }
        other => panic!("expected Arp, got {other:?}"),
    }
    assert_eq!(packet.tail, Tail::Payload(Vec::new()));

    let rebuilt = encapsulate(&packet).unwrap();
    assert_eq!(rebuilt, frame);
}

#[test]
fn ipv4_checksum_becomes_valid_after_makesum() {
    let mut bytes: [u8; 20] = [
        0x45, 0x00, 0x00, 0x14, 0x12, 0x34, 0x40, 0x00, 0x40, 0x11, 0xDE, 0xAD, 10, 0, 0, 1, 10,
        0, 0, 2,
    ];
    assert!(!valid(checksum_raw(&bytes)));

    bytes[10] = 0;
    bytes[11] = 0;
    let fill = makesum(&bytes);
    bytes[10] = (fill >> 8) as u8;
    bytes[11] = (fill & 0xFF) as u8;
    assert!(valid(checksum_raw(&bytes)));
}

#[test]
fn mpls_unicast_over_ethernet_carrying_ipv4_udp() {
    let ether = eth([0x02, 0, 0, 0, 0, 2], [0x02, 0, 0, 0, 0, 1], 0x8847);
    let mpls = MplsTagHeader {
        mode: MplsMode::Unicast,
        stack: vec![
            MplsEntry {
                label: 100,
                qos: 0,
                pri: 0,
                ecn: 0,
                ttl: 64,
            },
            MplsEntry {
                label: 200,
                qos: 0,
                pri: 0,
                ecn: 0,
                ttl: 63,
            },
        ],
        ether_type: 0,
    };
    let ip = ipv4(17, [10, 0, 0, 1], [10, 0, 0, 2]);
    let udp = UdpHeader {
        sport: 1000,
        dport: 2000,
        ulen: 0,
        checksum: 0,
    };
    let packet = Packet {
        headers: vec![
            Header::Ether(ether),
            Header::Mpls(mpls),
            Header::Ipv4(ip),
            Header::Udp(udp),
        ],
        tail: Tail::Payload(vec![9, 9, 9]),
    };
    let bytes = encapsulate(&packet).unwrap();
    let round = decapsulate(&bytes);

    assert!(matches!(round.headers[0], Header::Ether(_)));
    match &round.headers[1] {
        Header::Mpls(h) => {
            assert_eq!(h.mode, MplsMode::Unicast);
            assert_eq!(h.stack.len(), 2);
            assert_eq!(h.ether_type, 0x0800);
        }
        other => panic!("expected Mpls, got {other:?}"),
    }
    assert!(matches!(round.headers[2], Header::Ipv4(_)));
    assert!(matches!(round.headers[3], Header::Udp(_)));
    assert_eq!(round.tail, Tail::Payload(vec![9, 9, 9]));
}

#[test]
fn mpls_bottom_bit_is_set_on_last_entry_only_after_encapsulate() {
    let mpls = MplsTagHeader {
        mode: MplsMode::Unicast,
        stack: vec![
            MplsEntry { label: 1, qos: 1, pri: 1, ecn: 1, ttl: 1 },
            MplsEntry { label: 2, qos: 1, pri: 1, ecn: 1, ttl: 2 },
            MplsEntry { label: 3, qos: 1, pri: 1, ecn: 1, ttl: 3 },
        ],
        ether_type: 0x0800,
    };
    let packet = Packet {
        headers: vec![Header::Mpls(mpls)],
        tail: Tail::Payload(Vec::new()),
    };
    let bytes = encapsulate(&packet).unwrap();
    for i in 0..3 {
        let s_bit = bytes[i * 4 + 3] & 1;
        let expected = if i == 2 { 1 } else { 0 };
        assert_eq!(s_bit, expected, "entry {i}");
    }
}

#[test]
fn ipv4_options_length_invariant_after_decapsulate() {
    let mut bytes = vec![
        0x46, 0x00, 0x00, 0x18, 0, 0, 0x40, 0, 64, 17, 0, 0, 10, 0, 0, 1, 10, 0, 0, 2,
    ];
    bytes.extend_from_slice(&[0, 0, 0, 0]); // one word of options, hl = 6
    bytes[0] = 0x46;
    let (parsed, rest) = Ipv4Header::parse(&bytes).unwrap();
    assert_eq!(parsed.options.len(), (6 - 5) * 4);
    assert!(rest.is_empty());
}

#[test]
fn unsupported_ether_type_logs_and_preserves_bytes() {
    let _guard = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .set_default();

    let ether = eth([0x02, 0, 0, 0, 0, 2], [0x02, 0, 0, 0, 0, 1], 0xBEEF);
    let mut frame = ether.emit().to_vec();
    frame.extend_from_slice(&[1, 2, 3, 4]);

    let packet = decapsulate(&frame);
    assert!(matches!(packet.headers[0], Header::Ether(_)));
    assert_eq!(packet.tail, Tail::Unsupported(vec![1, 2, 3, 4]));
}

#[test]
fn truncation_totality_over_every_prefix() {
    let ether = eth([0x02, 0, 0, 0, 0, 2], [0x02, 0, 0, 0, 0, 1], 0x0800);
    let ip = ipv4(6, [10, 0, 0, 1], [10, 0, 0, 2]);
    let tcp = TcpHeader {
        sport: 1,
        dport: 2,
        seqno: 0,
        ackno: 0,
        flags: TcpFlags::new().with_syn(true),
        window: 0,
        checksum: 0,
        urgent_ptr: 0,
        options: Vec::new(),
    };
    let packet = Packet {
        headers: vec![Header::Ether(ether), Header::Ipv4(ip), Header::Tcp(tcp)],
        tail: Tail::Payload(vec![1, 2, 3, 4]),
    };
    let full = encapsulate(&packet).unwrap();

    for k in 0..full.len() {
        let round = decapsulate(&full[..k]);
        assert!(
            matches!(round.tail, Tail::Truncated(_) | Tail::Unsupported(_)),
            "prefix length {k} did not terminate as Truncated/Unsupported"
        );
    }
}

#[test]
fn icmp_timestamp_trailing_bytes_are_dropped_not_carried_as_tail() {
    let ether = eth([0x02, 0, 0, 0, 0, 2], [0x02, 0, 0, 0, 0, 1], 0x0800);
    let ip = ipv4(1, [10, 0, 0, 1], [10, 0, 0, 2]);
    let icmp = Icmpv4Header {
        icmp_type: 13,
        code: 0,
        checksum: 0,
        body: Icmpv4Body::Timestamp {
            id: 1,
            seq: 2,
            originate: 0,
            receive: 0,
            transmit: 0,
        },
    };

    let mut frame = ether.emit().to_vec();
    frame.extend_from_slice(&ip.emit());
    frame.extend_from_slice(&icmp.emit());
    frame.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    let packet = decapsulate(&frame);
    match &packet.headers[2] {
        Header::Icmpv4(h) => assert_eq!(h.icmp_type, 13),
        other => panic!("expected Icmpv4, got {other:?}"),
    }
    assert_eq!(packet.tail, Tail::Payload(Vec::new()));
}

#[test]
fn full_stack_round_trip_ether_ipv4_tcp() {
    let ether = eth([0x02, 0, 0, 0, 0, 2], [0x02, 0, 0, 0, 0, 1], 0x0800);
    let ip = ipv4(6, [10, 0, 0, 1], [10, 0, 0, 2]);
    let tcp = TcpHeader {
        sport: 1,
        dport: 2,
        seqno: 7,
        ackno: 0,
        flags: TcpFlags::new().with_ack(true),
        window: 1024,
        checksum: 0,
        urgent_ptr: 0,
        options: Vec::new(),
    };
    let packet = Packet {
        headers: vec![Header::Ether(ether), Header::Ipv4(ip), Header::Tcp(tcp)],
        tail: Tail::Payload(vec![0xCA, 0xFE]),
    };
    let bytes = encapsulate(&packet).unwrap();
    let round = decapsulate(&bytes);
    let rebuilt = encapsulate(&round).unwrap();
    assert_eq!(rebuilt, bytes);
}
