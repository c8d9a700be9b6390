//! The normalized packet record produced by the capture pipeline.
//!
//! Field names match the published JSON snapshot exactly.

use std::fmt;
use std::net::Ipv4Addr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::layers::{ArpMessage, EthernetFrame, IcmpMessage, Ipv4Datagram};
use crate::codec::format_mac;

/// Whether traffic stays inside private address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scope {
    Lan,
    Internet,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lan => write!(f, "LAN"),
            Self::Internet => write!(f, "INTERNET"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthSummary {
    pub src_mac: String,
    pub dst_mac: String,
    pub eth_type: u16,
}

impl From<&EthernetFrame<'_>> for EthSummary {
    fn from(eth: &EthernetFrame<'_>) -> Self {
        Self {
            src_mac: format_mac(&eth.src_mac),
            dst_mac: format_mac(&eth.dst_mac),
            eth_type: eth.ether_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArpSummary {
    pub opcode: u16,
    pub src_mac: String,
    pub src_ip: Ipv4Addr,
    pub target_mac: String,
    pub target_ip: Ipv4Addr,
}

impl From<&ArpMessage> for ArpSummary {
    fn from(arp: &ArpMessage) -> Self {
        Self {
            opcode: arp.opcode,
            src_mac: format_mac(&arp.src_mac),
            src_ip: arp.src_ip,
            target_mac: format_mac(&arp.target_mac),
            target_ip: arp.target_ip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpSummary {
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub protocol: u8,
    pub ttl: u8,
}

impl From<&Ipv4Datagram<'_>> for IpSummary {
    fn from(ip: &Ipv4Datagram<'_>) -> Self {
        Self {
            src_ip: ip.src_ip,
            dst_ip: ip.dst_ip,
            protocol: ip.protocol,
            ttl: ip.ttl,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TcpSummary {
    pub src_port: u16,
    pub dst_port: u16,
    /// Service resolved from the destination port
    pub service: String,
    pub flags: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdpSummary {
    pub src_port: u16,
    pub dst_port: u16,
    /// Service resolved from the destination port
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmpSummary {
    #[serde(rename = "type")]
    pub icmp_type: u8,
    pub code: u8,
    pub type_name: String,
}

impl From<&IcmpMessage> for IcmpSummary {
    fn from(icmp: &IcmpMessage) -> Self {
        Self {
            icmp_type: icmp.icmp_type,
            code: icmp.code,
            type_name: icmp.type_name.clone(),
        }
    }
}

/// Badge shown by the viewer for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Arp,
    Tcp,
    Udp,
    Icmp,
    Other,
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arp => write!(f, "ARP"),
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
            Self::Icmp => write!(f, "ICMP"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// One decoded packet. Never mutated after it enters the retention buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketRecord {
    /// Seconds since the Unix epoch, fractional
    pub timestamp: f64,
    pub eth: EthSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arp: Option<ArpSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<TcpSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp: Option<UdpSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp: Option<IcmpSummary>,
}

impl PacketRecord {
    /// Create a record carrying only the Ethernet summary.
    pub fn new(timestamp: f64, eth: EthSummary) -> Self {
        Self {
            timestamp,
            eth,
            arp: None,
            ip: None,
            scope: None,
            tcp: None,
            udp: None,
            icmp: None,
        }
    }

    /// A record is worth keeping only if it decoded past the link layer.
    pub fn is_retainable(&self) -> bool {
        self.arp.is_some() || self.ip.is_some()
    }

    pub fn kind(&self) -> PacketKind {
        if self.arp.is_some() {
            PacketKind::Arp
        } else if self.tcp.is_some() {
            PacketKind::Tcp
        } else if self.udp.is_some() {
            PacketKind::Udp
        } else if self.icmp.is_some() {
            PacketKind::Icmp
        } else {
            PacketKind::Other
        }
    }
}

/// Seconds since the Unix epoch as a float.
pub fn unix_timestamp(at: SystemTime) -> f64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth() -> EthSummary {
        EthSummary {
            src_mac: "00:11:22:33:44:55".to_string(),
            dst_mac: "ff:ff:ff:ff:ff:ff".to_string(),
            eth_type: 0x0800,
        }
    }

    #[test]
    fn test_ethernet_only_is_not_retainable() {
        let record = PacketRecord::new(1.0, eth());
        assert!(!record.is_retainable());
        assert_eq!(record.kind(), PacketKind::Other);
    }

    #[test]
    fn test_ip_record_is_retainable() {
        let mut record = PacketRecord::new(1.0, eth());
        record.ip = Some(IpSummary {
            src_ip: Ipv4Addr::new(10, 0, 0, 1),
            dst_ip: Ipv4Addr::new(10, 0, 0, 2),
            protocol: 47,
            ttl: 64,
        });
        assert!(record.is_retainable());
        assert_eq!(record.kind(), PacketKind::Other);
    }

    #[test]
    fn test_serialized_field_names() {
        let mut record = PacketRecord::new(1700000000.25, eth());
        record.ip = Some(IpSummary {
            src_ip: Ipv4Addr::new(192, 168, 1, 2),
            dst_ip: Ipv4Addr::new(8, 8, 8, 8),
            protocol: 1,
            ttl: 64,
        });
        record.scope = Some(Scope::Internet);
        record.icmp = Some(IcmpSummary {
            icmp_type: 8,
            code: 0,
            type_name: "Echo Request".to_string(),
        });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["timestamp"], 1700000000.25);
        assert_eq!(value["eth"]["src_mac"], "00:11:22:33:44:55");
        assert_eq!(value["eth"]["eth_type"], 2048);
        assert_eq!(value["ip"]["src_ip"], "192.168.1.2");
        assert_eq!(value["ip"]["ttl"], 64);
        assert_eq!(value["scope"], "INTERNET");
        assert_eq!(value["icmp"]["type"], 8);
        assert_eq!(value["icmp"]["type_name"], "Echo Request");

        let object = value.as_object().unwrap();
        assert!(!object.contains_key("arp"));
        assert!(!object.contains_key("tcp"));
        assert!(!object.contains_key("udp"));
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Lan.to_string(), "LAN");
        assert_eq!(Scope::Internet.to_string(), "INTERNET");
    }

    #[test]
    fn test_unix_timestamp_is_fractional_seconds() {
        let at = UNIX_EPOCH + std::time::Duration::from_millis(1500);
        assert_eq!(unix_timestamp(at), 1.5);
    }
}
