//! Domain models for decoded network traffic.
//!
//! This module contains the decoded layer types and the normalized packet
//! record, independent of capture or persistence concerns.

mod layers;
mod record;

pub use layers::{
    ether_type, ip_protocol, ArpMessage, EthernetFrame, IcmpMessage, Ipv4Datagram, LinkLayer,
    TcpFlags, TcpSegment, Transport, UdpDatagram,
};
pub use record::{
    unix_timestamp, ArpSummary, EthSummary, IcmpSummary, IpSummary, PacketKind, PacketRecord,
    Scope, TcpSummary, UdpSummary,
};
