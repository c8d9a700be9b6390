//! Capture pipeline.
//!
//! Drives every captured frame through dissection and classification,
//! keeps accepted records in the retention buffer and publishes a snapshot
//! after each acceptance. Processing is strictly sequential: one frame is
//! fully handled before the next read.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, SystemTime};

use tracing::{debug, info, trace, warn};

use crate::capture::FrameSource;
use crate::classifier::{classify_scope, service_name};
use crate::domain::{
    unix_timestamp, ArpSummary, EthSummary, IcmpSummary, IpSummary, LinkLayer, PacketRecord,
    TcpSummary, Transport, UdpSummary,
};
use crate::error::{ParseError, PublishError};
use crate::parser::{parse_ethernet, parse_link, parse_transport};
use crate::publisher::SnapshotPublisher;
use crate::retention::RetentionBuffer;

/// Why a frame produced no retained record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Not even an Ethernet header
    Link(ParseError),
    /// EtherType other than ARP or IPv4
    UnsupportedEtherType(u16),
    /// ARP or IPv4 header failed to parse
    Network(ParseError),
    /// 127.0.0.1 talking to itself
    Loopback,
    /// Nothing decoded beyond Ethernet
    NoNetworkLayer,
}

/// Result of processing one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Accepted,
    Dropped(DropReason),
}

/// Running counters, reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames: u64,
    pub accepted: u64,
    pub dropped: u64,
    pub publish_failures: u64,
    /// Failed reads from the frame source
    pub read_errors: u64,
}

/// Pause after a failed read so a downed interface does not spin the loop.
const READ_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Decode one frame into a retainable record.
///
/// Transport-layer failures only remove the transport summary; the record
/// is still returned with its IP summary.
pub fn decode_frame(frame: &[u8], timestamp: f64) -> Result<PacketRecord, DropReason> {
    let eth = parse_ethernet(frame).map_err(DropReason::Link)?;
    let mut record = PacketRecord::new(timestamp, EthSummary::from(&eth));

    match parse_link(&eth).map_err(DropReason::Network)? {
        LinkLayer::Arp(arp) => {
            record.arp = Some(ArpSummary::from(&arp));
        }
        LinkLayer::Ipv4(ip) => {
            if ip.is_loopback_self_traffic() {
                return Err(DropReason::Loopback);
            }

            record.ip = Some(IpSummary::from(&ip));
            record.scope = Some(classify_scope(ip.src_ip, ip.dst_ip));

            match parse_transport(&ip) {
                Ok(Transport::Tcp(tcp)) => {
                    record.tcp = Some(TcpSummary {
                        src_port: tcp.src_port,
                        dst_port: tcp.dst_port,
                        service: service_name(tcp.dst_port).into_owned(),
                        flags: tcp.flags.to_string(),
                    });
                }
                Ok(Transport::Udp(udp)) => {
                    record.udp = Some(UdpSummary {
                        src_port: udp.src_port,
                        dst_port: udp.dst_port,
                        service: service_name(udp.dst_port).into_owned(),
                    });
                }
                Ok(Transport::Icmp(icmp)) => {
                    record.icmp = Some(IcmpSummary::from(&icmp));
                }
                Ok(Transport::Other(protocol)) => {
                    trace!("No dissector for IP protocol {}", protocol);
                }
                Err(e) => {
                    debug!("Transport layer dropped: {}", e);
                }
            }
        }
        LinkLayer::Unsupported(ether_type) => {
            return Err(DropReason::UnsupportedEtherType(ether_type));
        }
    }

    if !record.is_retainable() {
        return Err(DropReason::NoNetworkLayer);
    }

    Ok(record)
}

/// Owns the retention buffer and the publishers.
pub struct CapturePipeline {
    buffer: RetentionBuffer,
    publishers: Vec<Box<dyn SnapshotPublisher>>,
    stats: PipelineStats,
}

impl CapturePipeline {
    pub fn new(publishers: Vec<Box<dyn SnapshotPublisher>>) -> Self {
        Self::with_buffer(RetentionBuffer::new(), publishers)
    }

    pub fn with_buffer(
        buffer: RetentionBuffer,
        publishers: Vec<Box<dyn SnapshotPublisher>>,
    ) -> Self {
        Self {
            buffer,
            publishers,
            stats: PipelineStats::default(),
        }
    }

    pub fn buffer(&self) -> &RetentionBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Prepare every publisher. Any failure here is a startup failure.
    pub fn start(&self, source_name: &str) -> Result<(), PublishError> {
        for publisher in &self.publishers {
            publisher.on_start(source_name)?;
        }
        Ok(())
    }

    /// Process one frame captured now.
    pub fn process_frame(&mut self, frame: &[u8]) -> FrameOutcome {
        self.process_frame_at(frame, unix_timestamp(SystemTime::now()))
    }

    /// Process one frame with an explicit capture timestamp.
    pub fn process_frame_at(&mut self, frame: &[u8], timestamp: f64) -> FrameOutcome {
        self.stats.frames += 1;

        match decode_frame(frame, timestamp) {
            Ok(record) => {
                self.accept(record);
                FrameOutcome::Accepted
            }
            Err(reason) => {
                trace!("Dropped {}-byte frame: {:?}", frame.len(), reason);
                self.stats.dropped += 1;
                FrameOutcome::Dropped(reason)
            }
        }
    }

    fn accept(&mut self, record: PacketRecord) {
        self.stats.accepted += 1;
        self.buffer.push(record);

        let records = self.buffer.snapshot();
        for publisher in &self.publishers {
            if let Err(e) = publisher.publish(records) {
                self.stats.publish_failures += 1;
                warn!("Failed to publish snapshot: {}", e);
            }
        }
    }

    /// Run until `running` is cleared or the source is exhausted.
    ///
    /// Nothing that happens after startup ends the loop: bad frames are
    /// dropped and read errors are logged, counted and retried.
    pub fn run(&mut self, source: &mut dyn FrameSource, running: &AtomicBool) -> PipelineStats {
        info!("Capture loop started on {}", source.name());

        while running.load(Ordering::SeqCst) {
            match source.next_frame() {
                Ok(Some(frame)) => {
                    self.process_frame(frame);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    self.stats.read_errors += 1;
                    warn!("Read from {} failed: {}", source.name(), e);
                    thread::sleep(READ_ERROR_BACKOFF);
                    continue;
                }
            }

            // Read timed out
            if source.is_exhausted() {
                break;
            }
        }

        for publisher in &self.publishers {
            publisher.on_stop();
        }

        let stats = self.stats;
        info!(
            "Capture loop stopped: {} frames, {} accepted, {} dropped, {} publish failures, {} read errors",
            stats.frames, stats.accepted, stats.dropped, stats.publish_failures, stats.read_errors
        );

        stats
    }
}
