//! Decoded protocol layers.
//!
//! These types borrow their payload from the captured frame and live only
//! for the duration of one pipeline step.

use std::fmt;
use std::net::Ipv4Addr;

use macaddr::MacAddr6;

/// Well-known EtherTypes.
pub mod ether_type {
    pub const IPV4: u16 = 0x0800;
    pub const ARP: u16 = 0x0806;
}

/// IP protocol numbers we dissect.
pub mod ip_protocol {
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}

/// An Ethernet II frame header and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame<'a> {
    pub dst_mac: MacAddr6,
    pub src_mac: MacAddr6,
    /// Opaque selector for the next layer
    pub ether_type: u16,
    pub payload: &'a [u8],
}

/// An ARP message (Ethernet/IPv4 layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpMessage {
    /// Passed through unvalidated (1 = request, 2 = reply on a sane network)
    pub opcode: u16,
    pub src_mac: MacAddr6,
    pub src_ip: Ipv4Addr,
    pub target_mac: MacAddr6,
    pub target_ip: Ipv4Addr,
}

/// An IPv4 header. Options are skipped, never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Datagram<'a> {
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub protocol: u8,
    pub ttl: u8,
    /// Header length in bytes (IHL * 4)
    pub header_len: usize,
    pub payload: &'a [u8],
}

impl Ipv4Datagram<'_> {
    /// Both endpoints are 127.0.0.1.
    pub fn is_loopback_self_traffic(&self) -> bool {
        self.src_ip == Ipv4Addr::LOCALHOST && self.dst_ip == Ipv4Addr::LOCALHOST
    }
}

/// The TCP control bits we report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TcpFlags(u8);

impl TcpFlags {
    pub const FIN: u8 = 0x01;
    pub const SYN: u8 = 0x02;
    pub const RST: u8 = 0x04;
    pub const PSH: u8 = 0x08;
    pub const ACK: u8 = 0x10;
    pub const URG: u8 = 0x20;

    /// Rendering order, not bit order.
    const NAMED: [(u8, &'static str); 6] = [
        (Self::SYN, "SYN"),
        (Self::ACK, "ACK"),
        (Self::FIN, "FIN"),
        (Self::RST, "RST"),
        (Self::PSH, "PSH"),
        (Self::URG, "URG"),
    ];

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Names of the set flags, in reporting order.
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for TcpFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", names.join(","))
        }
    }
}

/// A TCP segment header and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpSegment<'a> {
    pub src_port: u16,
    pub dst_port: u16,
    pub flags: TcpFlags,
    /// Data offset in bytes
    pub header_len: usize,
    pub payload: &'a [u8],
}

/// A UDP datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdpDatagram<'a> {
    pub src_port: u16,
    pub dst_port: u16,
    /// Declared length. Informational only; the payload is never sliced by it.
    pub length: u16,
    pub payload: &'a [u8],
}

/// An ICMP message header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcmpMessage {
    pub icmp_type: u8,
    pub code: u8,
    pub type_name: String,
}

impl IcmpMessage {
    /// Label for an ICMP type, "Type N" when unknown.
    pub fn type_name_for(icmp_type: u8) -> String {
        match icmp_type {
            0 => "Echo Reply".to_string(),
            8 => "Echo Request".to_string(),
            other => format!("Type {}", other),
        }
    }
}

/// What the link layer carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkLayer<'a> {
    Arp(ArpMessage),
    Ipv4(Ipv4Datagram<'a>),
    /// Any other EtherType; no record is produced for these
    Unsupported(u16),
}

/// What an IPv4 datagram carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport<'a> {
    Tcp(TcpSegment<'a>),
    Udp(UdpDatagram<'a>),
    Icmp(IcmpMessage),
    /// Protocol we do not dissect
    Other(u8),
}
