//! Numeric constants and name\<->code translators (datalink type, EtherType,
//! IP protocol, address family, ICMP type).
//!
//! Each translator is built on [`crate::enum_with_unknown`], so the reverse
//! direction (`From<Kind> for u*`) returns the original numeric value for an
//! unrecognized kind rather than losing it — encapsulation never destroys a
//! field it doesn't understand.

use crate::enum_with_unknown;

/// `PF_INET`, the address family tag `Null.family` carries for an IPv4 payload.
pub const PF_INET: u32 = 2;

/// `PF_INET6`, the address family tag `Null.family` carries for an IPv6
/// payload. This is genuinely platform-specific; the `pf-inet6-bsd` feature
/// switches it from the default Linux value to the BSD/macOS value.
#[cfg(not(feature = "pf-inet6-bsd"))]
pub const PF_INET6: u32 = 10;
#[cfg(feature = "pf-inet6-bsd")]
pub const PF_INET6: u32 = 30;

enum_with_unknown!(
    /// Symbolic kind derived from an Ethernet/802.1Q/MPLS EtherType field.
    pub enum EtherTypeKind(u16) {
        /// IPv4 (0x0800)
        Ipv4 = 0x0800,
        /// IPv6 (0x86DD)
        Ipv6 = 0x86DD,
        /// ARP (0x0806)
        Arp = 0x0806,
        /// 802.1Q VLAN tag (0x8100)
        Dot1Q = 0x8100,
        /// MPLS unicast (0x8847)
        MplsUnicast = 0x8847,
        /// MPLS multicast (0x8848)
        MplsMulticast = 0x8848,
    }
);

/// Translate an EtherType code to its symbolic kind. Unrecognized codes
/// become `EtherTypeKind::Unknown(code)`.
pub fn ether_type(code: u16) -> EtherTypeKind {
    EtherTypeKind::from(code)
}

enum_with_unknown!(
    /// Symbolic kind derived from an IPv4/IPv6 protocol-number field.
    pub enum IpProtoKind(u8) {
        /// IPv6 Hop-by-Hop Option (0) -- required constant, not a dispatch target
        Hopopt = 0,
        /// ICMPv4 (1)
        Icmp = 1,
        /// TCP (6)
        Tcp = 6,
        /// UDP (17)
        Udp = 17,
        /// IPv6-in-IPv4 (41)
        Ipv6 = 41,
        /// GRE (47)
        Gre = 47,
        /// ICMPv6 (58)
        Icmpv6 = 58,
        /// SCTP (132)
        Sctp = 132,
        /// Raw IP (255)
        Raw = 255,
    }
);

/// Translate an IP protocol number to its symbolic kind. Unrecognized values
/// become `IpProtoKind::Unknown(value)`.
pub fn proto(value: u8) -> IpProtoKind {
    IpProtoKind::from(value)
}

enum_with_unknown!(
    /// Symbolic kind derived from a BSD-loopback `Null.family` field.
    pub enum AddressFamilyKind(u32) {
        /// IPv4 (`PF_INET`)
        Inet = 2,
    }
);

/// Translate a native-byte-order BSD loopback address-family value to its
/// symbolic kind. `PF_INET6`'s numeric value is platform-specific (see
/// [`PF_INET6`]), so it is matched dynamically rather than as a
/// compile-time enum variant.
pub fn link_type(family: u32) -> AddressFamilyKind {
    if family == PF_INET6 {
        // There is no single numeric constant across platforms, so this
        // isn't representable as an `enum_with_unknown!` variant; fold it
        // into Unknown but callers that care can still compare against
        // `PF_INET6` directly.
        AddressFamilyKind::Unknown(family)
    } else {
        AddressFamilyKind::from(family)
    }
}

enum_with_unknown!(
    /// pcap datalink type (DLT) code.
    pub enum Dlt(u32) {
        /// DLT_NULL -- BSD loopback
        Null = 0,
        /// DLT_EN10MB -- Ethernet II
        En10mb = 1,
        /// DLT_EN3MB
        En3mb = 2,
        /// DLT_AX25
        Ax25 = 3,
        /// DLT_PRONET
        Pronet = 4,
        /// DLT_CHAOS
        Chaos = 5,
        /// DLT_IEEE802
        Ieee802 = 6,
        /// DLT_ARCNET
        Arcnet = 7,
        /// DLT_SLIP
        Slip = 8,
        /// DLT_PPP
        Ppp = 9,
        /// DLT_FDDI
        Fddi = 10,
        /// DLT_ATM_RFC1483
        AtmRfc1483 = 11,
        /// DLT_RAW
        Raw = 12,
        /// DLT_SLIP_BSDOS
        SlipBsdos = 15,
        /// DLT_PPP_BSDOS
        PppBsdos = 16,
        /// DLT_PFSYNC
        Pfsync = 18,
        /// DLT_ATM_CLIP
        AtmClip = 19,
        /// DLT_PPP_SERIAL
        PppSerial = 50,
        /// DLT_C_HDLC / DLT_CHDLC
        CHdlc = 104,
        /// DLT_IEEE802_11
        Ieee80211 = 105,
        /// DLT_LOOP
        Loop = 108,
        /// DLT_LINUX_SLL
        LinuxSll = 113,
        /// DLT_PFLOG
        Pflog = 117,
        /// DLT_IEEE802_11_RADIO
        Ieee80211Radio = 127,
        /// DLT_APPLE_IP_OVER_IEEE1394
        AppleIpOverIeee1394 = 138,
        /// DLT_IEEE802_11_RADIO_AVS
        Ieee80211RadioAvs = 163,
    }
);

impl Dlt {
    /// The canonical lower-snake-case name for this DLT, or `None` for an
    /// unrecognized code.
    ///
    /// Only the correctly spelled `ieee802_11_radio_avs` name is exposed
    /// for `DLT_IEEE802_11_RADIO_AVS`.
    pub fn name(&self) -> Option<&'static str> {
        Some(match self {
            Dlt::Null => "null",
            Dlt::En10mb => "en10mb",
            Dlt::En3mb => "en3mb",
            Dlt::Ax25 => "ax25",
            Dlt::Pronet => "pronet",
            Dlt::Chaos => "chaos",
            Dlt::Ieee802 => "ieee802",
            Dlt::Arcnet => "arcnet",
            Dlt::Slip => "slip",
            Dlt::Ppp => "ppp",
            Dlt::Fddi => "fddi",
            Dlt::AtmRfc1483 => "atm_rfc1483",
            Dlt::Raw => "raw",
            Dlt::SlipBsdos => "slip_bsdos",
            Dlt::PppBsdos => "ppp_bsdos",
            Dlt::Pfsync => "pfsync",
            Dlt::AtmClip => "atm_clip",
            Dlt::PppSerial => "ppp_serial",
            Dlt::CHdlc => "c_hdlc",
            Dlt::Ieee80211 => "ieee802_11",
            Dlt::Loop => "loop",
            Dlt::LinuxSll => "linux_sll",
            Dlt::Pflog => "pflog",
            Dlt::Ieee80211Radio => "ieee802_11_radio",
            Dlt::AppleIpOverIeee1394 => "apple_ip_over_ieee1394",
            Dlt::Ieee80211RadioAvs => "ieee802_11_radio_avs",
            Dlt::Unknown(_) => return None,
        })
    }

    /// Look up a DLT by its canonical name (case-sensitive, lower-snake-case).
    pub fn from_name(name: &str) -> Option<Dlt> {
        Some(match name {
            "null" => Dlt::Null,
            "en10mb" => Dlt::En10mb,
            "en3mb" => Dlt::En3mb,
            "ax25" => Dlt::Ax25,
            "pronet" => Dlt::Pronet,
            "chaos" => Dlt::Chaos,
            "ieee802" => Dlt::Ieee802,
            "arcnet" => Dlt::Arcnet,
            "slip" => Dlt::Slip,
            "ppp" => Dlt::Ppp,
            "fddi" => Dlt::Fddi,
            "atm_rfc1483" => Dlt::AtmRfc1483,
            "raw" => Dlt::Raw,
            "slip_bsdos" => Dlt::SlipBsdos,
            "ppp_bsdos" => Dlt::PppBsdos,
            "pfsync" => Dlt::Pfsync,
            "atm_clip" => Dlt::AtmClip,
            "ppp_serial" => Dlt::PppSerial,
            "c_hdlc" | "chdlc" => Dlt::CHdlc,
            "ieee802_11" => Dlt::Ieee80211,
            "loop" => Dlt::Loop,
            "linux_sll" => Dlt::LinuxSll,
            "pflog" => Dlt::Pflog,
            "ieee802_11_radio" => Dlt::Ieee80211Radio,
            "apple_ip_over_ieee1394" => Dlt::AppleIpOverIeee1394,
            "ieee802_11_radio_avs" => Dlt::Ieee80211RadioAvs,
            _ => return None,
        })
    }
}

/// Either a numeric DLT code or its canonical name; accepted by
/// [`crate::decapsulate_dlt`] so callers don't need to look up the code
/// themselves.
#[derive(Debug, Clone, Copy)]
pub enum DltRef<'a> {
    /// A raw pcap DLT code.
    Code(u32),
    /// A DLT name, as returned by [`Dlt::name`].
    Name(&'a str),
}

impl<'a> From<u32> for DltRef<'a> {
    fn from(code: u32) -> Self {
        DltRef::Code(code)
    }
}

impl<'a> From<&'a str> for DltRef<'a> {
    fn from(name: &'a str) -> Self {
        DltRef::Name(name)
    }
}

/// Resolve a [`DltRef`] (code or name) to a [`Dlt`]. An unrecognized code
/// becomes `Dlt::Unknown`; an unrecognized name also becomes
/// `Dlt::Unknown(u32::MAX)` since there is no numeric code to fall back to.
pub fn dlt(r: DltRef<'_>) -> Dlt {
    match r {
        DltRef::Code(c) => Dlt::from(c),
        DltRef::Name(n) => Dlt::from_name(n).unwrap_or(Dlt::Unknown(u32::MAX)),
    }
}
