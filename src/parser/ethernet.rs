//! Ethernet II and ARP dissectors.

use macaddr::MacAddr6;
use pnet::packet::arp::ArpPacket;
use pnet::packet::ethernet::EthernetPacket;

use crate::domain::{ether_type, ArpMessage, EthernetFrame, LinkLayer};
use crate::error::ParseError;

use super::ipv4::parse_ipv4;
use super::too_short;

/// Ethernet II header size (dst + src + ethertype)
pub const ETHERNET_HEADER_LEN: usize = 14;

/// ARP message size for Ethernet/IPv4
pub const ARP_MESSAGE_LEN: usize = 28;

/// Parse an Ethernet II header. The EtherType is not interpreted here.
pub fn parse_ethernet(data: &[u8]) -> Result<EthernetFrame<'_>, ParseError> {
    let ethernet = EthernetPacket::new(data)
        .ok_or_else(|| too_short("ethernet", ETHERNET_HEADER_LEN, data))?;

    Ok(EthernetFrame {
        dst_mac: MacAddr6::from(ethernet.get_destination().octets()),
        src_mac: MacAddr6::from(ethernet.get_source().octets()),
        ether_type: ethernet.get_ethertype().0,
        payload: &data[ETHERNET_HEADER_LEN..],
    })
}

/// Parse an ARP message from an Ethernet payload.
///
/// Hardware and protocol types are not checked; the addresses are read at
/// their Ethernet/IPv4 positions.
pub fn parse_arp(data: &[u8]) -> Result<ArpMessage, ParseError> {
    let arp = ArpPacket::new(data).ok_or_else(|| too_short("arp", ARP_MESSAGE_LEN, data))?;

    Ok(ArpMessage {
        opcode: arp.get_operation().0,
        src_mac: MacAddr6::from(arp.get_sender_hw_addr().octets()),
        src_ip: arp.get_sender_proto_addr(),
        target_mac: MacAddr6::from(arp.get_target_hw_addr().octets()),
        target_ip: arp.get_target_proto_addr(),
    })
}

/// Dissect the payload of an Ethernet frame according to its EtherType.
pub fn parse_link<'a>(eth: &EthernetFrame<'a>) -> Result<LinkLayer<'a>, ParseError> {
    match eth.ether_type {
        ether_type::ARP => parse_arp(eth.payload).map(LinkLayer::Arp),
        ether_type::IPV4 => parse_ipv4(eth.payload).map(LinkLayer::Ipv4),
        other => Ok(LinkLayer::Unsupported(other)),
    }
}
