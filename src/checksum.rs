//! The Internet checksum engine (RFC 1071): one's-complement 16-bit sum with
//! end-around carry, and the pseudo-header assembly TCP/UDP/ICMPv6 need.
//!
//! `checksum_raw` folds the one's-complement sum but does **not** apply a
//! final bitwise complement — that's what lets the same primitive serve both
//! directions: validating a packet whose checksum field already holds its
//! real value (fold the whole buffer, compare against [`valid`]) and deriving
//! the value to store (zero the checksum field first, fold, then [`makesum`]
//! flips it). Folding `S` (everything but the checksum field) together with
//! the correctly-stored field `!S` always gives the one's-complement "negative
//! zero", `0xFFFF` — which is exactly what [`valid`] checks for.

/// Fold a 32-bit accumulator into 16 bits via end-around carry.
fn fold(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

/// The one's-complement sum of `data` as 16-bit big-endian words, with
/// end-around carry. An odd-length buffer is zero-padded by one byte before
/// summing. Does not apply a final complement (see the module docs for why).
pub fn checksum_raw(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut chunks = data.chunks_exact(2);
    for word in &mut chunks {
        sum += u16::from_be_bytes([word[0], word[1]]) as u32;
    }
    if let [last] = chunks.remainder() {
        #[cfg(feature = "tracing-logging")]
        tracing::trace!(len = data.len(), "odd-length checksum input, zero-padding");
        sum += u16::from_be_bytes([*last, 0]) as u32;
    }
    fold(sum)
}

/// The value to store in a checksum field so that folding the whole buffer
/// (with that field filled in) satisfies [`valid`]. Call this on the same
/// bytes passed to [`checksum_raw`], but with the checksum field zeroed.
pub fn makesum(data: &[u8]) -> u16 {
    !checksum_raw(data)
}

/// Whether a checksum fold (as returned by [`checksum_raw`] or
/// [`checksum_ipv4_header`]) indicates a structurally valid packet.
pub fn valid(sum: u16) -> bool {
    sum == 0xFFFF
}

/// Checksum an IPv4 header exactly as serialized, including whatever value
/// its `sum` field currently holds. `valid(checksum_ipv4_header(bytes))` is
/// how a received header is validated; to *construct* a checksum, zero the
/// header's `sum` field before serializing and pass the result through
/// [`makesum`] instead.
pub fn checksum_ipv4_header(header_bytes: &[u8]) -> u16 {
    checksum_raw(header_bytes)
}

/// Internet protocol version, for pseudo-header assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    /// IPv4: `saddr ++ daddr ++ 0x00 ++ protocol ++ u16(length)`.
    V4,
    /// IPv6: `saddr ++ daddr ++ u32(length) ++ 0x000000 ++ protocol`.
    V6,
}

/// Assemble an IPv4 or IPv6 pseudo-header in front of a
/// transport segment (header bytes, with whatever checksum field value the
/// caller passed in, followed by payload), and fold the whole thing with
/// [`checksum_raw`]. `length` is the upper-layer length the relevant RFC
/// specifies: TCP/ICMPv6 use the transport-header-plus-payload byte count;
/// UDP uses its own `ulen` header field (the two agree for well-formed
/// packets, but the pseudo-header always uses the field, per RFC 768/8200).
///
/// Returns the raw fold (no final complement) so the same call site can
/// either validate (`valid(..)`, with the real checksum field in
/// `transport_and_payload`) or construct (zero the field first, then
/// [`makesum`] the result).
pub fn pseudo_header_checksum(
    version: IpVersion,
    saddr: &[u8],
    daddr: &[u8],
    protocol: u8,
    length: u16,
    transport_and_payload: &[u8],
) -> u16 {
    let mut buf = Vec::with_capacity(saddr.len() + daddr.len() + 8 + transport_and_payload.len() + 1);
    buf.extend_from_slice(saddr);
    buf.extend_from_slice(daddr);
    match version {
        IpVersion::V4 => {
            buf.push(0x00);
            buf.push(protocol);
            buf.extend_from_slice(&length.to_be_bytes());
        }
        IpVersion::V6 => {
            buf.extend_from_slice(&(length as u32).to_be_bytes());
            buf.push(0x00);
            buf.push(0x00);
            buf.push(0x00);
            buf.push(protocol);
        }
    }
    buf.extend_from_slice(transport_and_payload);
    checksum_raw(&buf)
}
