//! TCP, UDP and ICMP dissectors.

use pnet::packet::icmp::IcmpPacket;
use pnet::packet::tcp::TcpPacket;
use pnet::packet::udp::UdpPacket;

use crate::domain::{
    ip_protocol, IcmpMessage, Ipv4Datagram, TcpFlags, TcpSegment, Transport, UdpDatagram,
};
use crate::error::ParseError;

use super::too_short;

/// Minimum TCP header size (data offset = 5)
pub const TCP_MIN_HEADER_LEN: usize = 20;

/// UDP header size
pub const UDP_HEADER_LEN: usize = 8;

/// ICMP type + code + checksum
pub const ICMP_MIN_LEN: usize = 4;

/// Parse a TCP header from an IPv4 payload.
pub fn parse_tcp(data: &[u8]) -> Result<TcpSegment<'_>, ParseError> {
    let tcp = TcpPacket::new(data).ok_or_else(|| too_short("tcp", TCP_MIN_HEADER_LEN, data))?;

    let header_len = tcp.get_data_offset() as usize * 4;
    if header_len < TCP_MIN_HEADER_LEN || data.len() < header_len {
        return Err(ParseError::InvalidHeaderLength {
            layer: "tcp",
            header_len,
            actual: data.len(),
        });
    }

    Ok(TcpSegment {
        src_port: tcp.get_source(),
        dst_port: tcp.get_destination(),
        flags: TcpFlags::from_bits(tcp.get_flags()),
        header_len,
        payload: &data[header_len..],
    })
}

/// Parse a UDP header from an IPv4 payload.
///
/// The payload is everything after the fixed header; the declared length
/// field is reported but not trusted.
pub fn parse_udp(data: &[u8]) -> Result<UdpDatagram<'_>, ParseError> {
    let udp = UdpPacket::new(data).ok_or_else(|| too_short("udp", UDP_HEADER_LEN, data))?;

    Ok(UdpDatagram {
        src_port: udp.get_source(),
        dst_port: udp.get_destination(),
        length: udp.get_length(),
        payload: &data[UDP_HEADER_LEN..],
    })
}

/// Parse an ICMP header from an IPv4 payload.
pub fn parse_icmp(data: &[u8]) -> Result<IcmpMessage, ParseError> {
    let icmp = IcmpPacket::new(data).ok_or_else(|| too_short("icmp", ICMP_MIN_LEN, data))?;
    let icmp_type = icmp.get_icmp_type().0;

    Ok(IcmpMessage {
        icmp_type,
        code: icmp.get_icmp_code().0,
        type_name: IcmpMessage::type_name_for(icmp_type),
    })
}

/// Dissect the payload of an IPv4 datagram according to its protocol number.
pub fn parse_transport<'a>(ip: &Ipv4Datagram<'a>) -> Result<Transport<'a>, ParseError> {
    match ip.protocol {
        ip_protocol::TCP => parse_tcp(ip.payload).map(Transport::Tcp),
        ip_protocol::UDP => parse_udp(ip.payload).map(Transport::Udp),
        ip_protocol::ICMP => parse_icmp(ip.payload).map(Transport::Icmp),
        other => Ok(Transport::Other(other)),
    }
}
