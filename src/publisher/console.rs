//! Console-based packet display.

use std::io::{self, Write};

use chrono::{DateTime, Local};

use super::SnapshotPublisher;
use crate::domain::{ip_protocol, PacketRecord};
use crate::error::PublishError;

/// Prints the newest record of every snapshot to stdout.
///
/// Formats records in a human-readable, one-line-per-packet format
/// suitable for terminal output.
pub struct ConsolePublisher {
    /// Whether to show Ethernet addresses
    verbose: bool,
}

impl ConsolePublisher {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Enable or disable verbose output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn format_record(&self, record: &PacketRecord) -> String {
        let mut output = render_record(record);
        if self.verbose {
            output.push_str(&format!(
                " | Eth: {} -> {} ({:#06x})",
                record.eth.src_mac, record.eth.dst_mac, record.eth.eth_type
            ));
        }
        output
    }
}

impl Default for ConsolePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotPublisher for ConsolePublisher {
    fn publish(&self, records: &[PacketRecord]) -> Result<(), PublishError> {
        if let Some(latest) = records.first() {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", self.format_record(latest))?;
        }
        Ok(())
    }

    fn on_start(&self, source: &str) -> Result<(), PublishError> {
        println!("Capturing on {} (ARP + IPv4/TCP/UDP/ICMP)", source);
        println!("Press Ctrl+C to stop.\n");
        Ok(())
    }

    fn on_stop(&self) {
        println!("\nStopping capture.");
    }
}

fn protocol_name(protocol: u8) -> String {
    match protocol {
        ip_protocol::ICMP => "ICMP".to_string(),
        ip_protocol::TCP => "TCP".to_string(),
        ip_protocol::UDP => "UDP".to_string(),
        other => format!("Proto {}", other),
    }
}

fn format_time(timestamp: f64) -> String {
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "??:??:??".to_string())
}

/// Render one record as a single viewer line.
pub fn render_record(record: &PacketRecord) -> String {
    let mut parts = vec![format!("[{}] {}", record.kind(), format_time(record.timestamp))];

    if let Some(ip) = &record.ip {
        parts.push(format!("{} -> {}", ip.src_ip, ip.dst_ip));
        parts.push(format!(
            "Proto: {} | TTL: {}",
            protocol_name(ip.protocol),
            ip.ttl
        ));
    }

    if let Some(tcp) = &record.tcp {
        parts.push(format!("Port: {} -> {}", tcp.src_port, tcp.dst_port));
        if tcp.flags == "NONE" {
            parts.push(format!("Info: {}", tcp.service));
        } else {
            parts.push(format!("Info: {} ({})", tcp.service, tcp.flags));
        }
    }

    if let Some(udp) = &record.udp {
        parts.push(format!("Port: {} -> {}", udp.src_port, udp.dst_port));
        parts.push(format!("Info: {}", udp.service));
    }

    if let Some(icmp) = &record.icmp {
        parts.push(format!("Info: {}", icmp.type_name));
    }

    if let Some(arp) = &record.arp {
        let opcode = if arp.opcode == 1 { "Request" } else { "Reply" };
        parts.push(format!("Opcode: {}", opcode));
        parts.push(format!(
            "{} ({}) -> {} ({})",
            arp.src_ip, arp.src_mac, arp.target_ip, arp.target_mac
        ));
    }

    parts.push(
        record
            .scope
            .map(|scope| scope.to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string()),
    );

    parts.join(" | ")
}

/// Render a whole snapshot: one line per record, newest first, then the
/// packet count. An empty snapshot renders as a waiting message.
pub fn render_snapshot(records: &[PacketRecord]) -> String {
    if records.is_empty() {
        return "Waiting for packets...".to_string();
    }

    let mut output = String::new();
    for record in records {
        output.push_str(&render_record(record));
        output.push('\n');
    }
    output.push_str(&format!(
        "{} packet{}",
        records.len(),
        if records.len() == 1 { "" } else { "s" }
    ));
    output
}
