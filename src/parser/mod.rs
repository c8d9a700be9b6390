//! Protocol dissectors.
//!
//! This module is responsible for turning raw bytes into domain layer types
//! (SRP). Field access goes through the `pnet::packet` views, which refuse
//! input shorter than the fixed header; header length, version and offset
//! checks on top of that return a `ParseError` instead of panicking.

mod ethernet;
mod ipv4;
mod transport;

pub use ethernet::{parse_arp, parse_ethernet, parse_link, ARP_MESSAGE_LEN, ETHERNET_HEADER_LEN};
pub use ipv4::{parse_ipv4, IPV4_MIN_HEADER_LEN};
pub use transport::{
    parse_icmp, parse_tcp, parse_transport, parse_udp, ICMP_MIN_LEN, TCP_MIN_HEADER_LEN,
    UDP_HEADER_LEN,
};

use crate::error::ParseError;

/// Input shorter than the fixed header of `layer`.
fn too_short(layer: &'static str, expected: usize, data: &[u8]) -> ParseError {
    ParseError::TooShort {
        layer,
        expected,
        actual: data.len(),
    }
}
