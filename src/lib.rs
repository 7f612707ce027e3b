//! A layered codec for packets captured from a link: parses a raw octet
//! buffer into a stack of per-layer header values, outer to inner, and
//! symmetrically serializes such a stack back into a byte-exact buffer.
//!
//! Covers the common TCP/IP family of headers layered above several
//! datalink framings used by packet-capture tooling (Ethernet II, 802.1Q,
//! MPLS, BSD loopback, Linux SLL).
//!
//! ```rust
//! use pktlayer::*;
//!
//! let frame: Vec<u8> = vec![
//!     // dst mac
//!     0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
//!     // src mac
//!     0x02, 0xaf, 0xff, 0x1a, 0xe5, 0x3c,
//!     // ethertype = ARP
//!     0x08, 0x06,
//!     // ARP request aa:bb:cc:dd:ee:ff / 10.0.0.1 -> 10.0.0.2
//!     0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01,
//!     0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 10, 0, 0, 1,
//!     0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 10, 0, 0, 2,
//! ];
//!
//! let packet = decapsulate(&frame);
//! assert!(matches!(packet.headers[0], Header::Ether(_)));
//! assert!(matches!(packet.headers[1], Header::Arp(_)));
//!
//! let rebuilt = encapsulate(&packet).unwrap();
//! assert_eq!(rebuilt, frame);
//! ```

#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]

pub use byte_struct::{ByteStruct, ByteStructLen};

pub mod checksum;
pub mod dispatch;
pub mod error;
pub mod headers;
pub mod packet;
pub mod tables;

pub use checksum::{checksum_raw, makesum, valid};
pub use dispatch::{decapsulate, decapsulate_dlt, encapsulate};
pub use error::EncapsulateError;
pub use headers::*;
pub use packet::{Header, Packet, Tail};
pub use tables::{dlt, ether_type, link_type, proto, Dlt, EtherTypeKind, IpProtoKind};

/// Standard 6-byte MAC address, network byte order.
///
/// Locally-administered addresses have their second-least-significant
/// octet-0 bit set: `[0x02, ..]`, `[0x06, ..]`, `[0x0A, ..]`, `[0x0E, ..]`.
pub type MacAddr = ByteArray<6>;

impl MacAddr {
    /// Broadcast address (all ones).
    pub const BROADCAST: MacAddr = ByteArray([0xFF_u8; 6]);
    /// Unspecified address (all zeroes).
    pub const ANY: MacAddr = ByteArray([0x0_u8; 6]);

    /// Build from raw bytes.
    pub fn new(v: [u8; 6]) -> Self {
        ByteArray(v)
    }
}

/// IPv4 address, network byte order.
pub type Ipv4Addr = ByteArray<4>;

impl Ipv4Addr {
    /// Limited broadcast address (all ones).
    pub const BROADCAST: Ipv4Addr = ByteArray([0xFF_u8; 4]);
    /// Unspecified address (all zeroes).
    pub const ANY: Ipv4Addr = ByteArray([0x0_u8; 4]);

    /// Build from raw bytes.
    pub fn new(v: [u8; 4]) -> Self {
        ByteArray(v)
    }
}

/// IPv6 address, network byte order.
pub type Ipv6Addr = ByteArray<16>;

impl Ipv6Addr {
    /// Unspecified address (all zeroes).
    pub const ANY: Ipv6Addr = ByteArray([0x0_u8; 16]);

    /// Build from raw bytes.
    pub fn new(v: [u8; 16]) -> Self {
        ByteArray(v)
    }
}

/// Newtype for `[u8; N]` so fixed-width addresses can implement `ByteStruct`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ByteArray<const N: usize>(pub [u8; N]);

impl<const N: usize> ByteStructLen for ByteArray<N> {
    const BYTE_LEN: usize = N;
}

impl<const N: usize> ByteStruct for ByteArray<N> {
    fn read_bytes(bytes: &[u8]) -> Self {
        let mut out = [0_u8; N];
        out.copy_from_slice(&bytes[0..N]);
        ByteArray(out)
    }

    fn write_bytes(&self, bytes: &mut [u8]) {
        bytes[0..N].copy_from_slice(&self.0);
    }
}

impl<const N: usize> ByteArray<N> {
    /// The big-endian (network) byte representation.
    pub fn to_be_bytes(&self) -> [u8; N] {
        self.0
    }
}

/// Derive bidirectional `From` between a closed set of named constants and
/// their backing numeric type, with an `Unknown(value)` catch-all so that
/// translating an unrecognized value never panics or requires a `Result`.
///
/// Used throughout `tables` and the header codecs for any field whose wire
/// values are a closed set plus an escape hatch for values not yet assigned.
#[macro_export]
macro_rules! enum_with_unknown {
    (
        $( #[$enum_attr:meta] )*
        pub enum $name:ident($ty:ty) {
            $(
              $( #[$variant_attr:meta] )*
              $variant:ident = $value:expr
            ),+ $(,)?
        }
    ) => {
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
        $( #[$enum_attr] )*
        pub enum $name {
            $(
              $( #[$variant_attr] )*
              $variant
            ),*,
            /// A value outside the closed set of recognized variants.
            Unknown($ty)
        }

        impl ::core::convert::From<$ty> for $name {
            fn from(value: $ty) -> Self {
                match value {
                    $( $value => $name::$variant ),*,
                    other => $name::Unknown(other)
                }
            }
        }

        impl ::core::convert::From<$name> for $ty {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant => $value ),*,
                    $name::Unknown(other) => other
                }
            }
        }
    }
}
