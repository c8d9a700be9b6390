//! IPv4 dissector.

use pnet::packet::ipv4::Ipv4Packet;

use crate::domain::Ipv4Datagram;
use crate::error::ParseError;

use super::too_short;

/// Minimum IPv4 header size (IHL = 5)
pub const IPV4_MIN_HEADER_LEN: usize = 20;

/// Parse an IPv4 header from an Ethernet payload.
///
/// Options between byte 20 and the IHL boundary are skipped as opaque bytes.
/// The payload runs to the end of the input; the total length field is not
/// used to trim it.
pub fn parse_ipv4(data: &[u8]) -> Result<Ipv4Datagram<'_>, ParseError> {
    let ip = Ipv4Packet::new(data).ok_or_else(|| too_short("ipv4", IPV4_MIN_HEADER_LEN, data))?;

    let version = ip.get_version();
    if version != 4 {
        return Err(ParseError::UnsupportedVersion(version));
    }

    let header_len = ip.get_header_length() as usize * 4;
    if header_len < IPV4_MIN_HEADER_LEN || data.len() < header_len {
        return Err(ParseError::InvalidHeaderLength {
            layer: "ipv4",
            header_len,
            actual: data.len(),
        });
    }

    Ok(Ipv4Datagram {
        ttl: ip.get_ttl(),
        protocol: ip.get_next_level_protocol().0,
        src_ip: ip.get_source(),
        dst_ip: ip.get_destination(),
        header_len,
        payload: &data[header_len..],
    })
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::parser::testutil::ipv4_header;

    #[test]
    fn test_parse_ipv4() {
        let mut packet = ipv4_header(6, [192, 168, 1, 100], [8, 8, 8, 8], 0);
        packet.extend_from_slice(&[0xde, 0xad]);

        let ip = parse_ipv4(&packet).unwrap();
        assert_eq!(ip.src_ip, Ipv4Addr::new(192, 168, 1, 100));
        assert_eq!(ip.dst_ip, Ipv4Addr::new(8, 8, 8, 8));
        assert_eq!(ip.protocol, 6);
        assert_eq!(ip.ttl, 64);
        assert_eq!(ip.header_len, 20);
        assert_eq!(ip.payload, &[0xde, 0xad]);
    }

    #[test]
    fn test_options_are_skipped() {
        // IHL = 6, one word of options
        let mut packet = ipv4_header(17, [10, 0, 0, 1], [10, 0, 0, 2], 1);
        packet.extend_from_slice(&[0x01, 0x02]);

        let ip = parse_ipv4(&packet).unwrap();
        assert_eq!(ip.header_len, 24);
        assert_eq!(ip.payload, &[0x01, 0x02]);
    }

    #[test]
    fn test_too_short() {
        for len in 0..IPV4_MIN_HEADER_LEN {
            let packet = vec![0x45u8; len];
            assert!(matches!(
                parse_ipv4(&packet),
                Err(ParseError::TooShort { layer: "ipv4", .. })
            ));
        }
    }

    #[test]
    fn test_wrong_version() {
        let mut packet = ipv4_header(6, [10, 0, 0, 1], [10, 0, 0, 2], 0);
        packet[0] = 0x65;
        assert_eq!(parse_ipv4(&packet), Err(ParseError::UnsupportedVersion(6)));
    }

    #[test]
    fn test_header_longer_than_input() {
        let mut packet = ipv4_header(6, [10, 0, 0, 1], [10, 0, 0, 2], 0);
        // Claims 60 bytes of header, only 20 present
        packet[0] = 0x4F;
        assert!(matches!(
            parse_ipv4(&packet),
            Err(ParseError::InvalidHeaderLength { header_len: 60, actual: 20, .. })
        ));
    }

    #[test]
    fn test_total_length_does_not_trim_payload() {
        let mut packet = ipv4_header(17, [10, 0, 0, 1], [10, 0, 0, 2], 0);
        // total length claims the header only
        packet[2..4].copy_from_slice(&20u16.to_be_bytes());
        packet.extend_from_slice(&[7, 7, 7]);

        let ip = parse_ipv4(&packet).unwrap();
        assert_eq!(ip.payload, &[7, 7, 7]);
    }

    #[test]
    fn test_ihl_below_minimum() {
        let mut packet = ipv4_header(6, [10, 0, 0, 1], [10, 0, 0, 2], 0);
        packet[0] = 0x44;
        assert!(matches!(
            parse_ipv4(&packet),
            Err(ParseError::InvalidHeaderLength { header_len: 16, .. })
        ));
    }
}
