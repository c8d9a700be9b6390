//! lansniff - raw frame sniffer.
//!
//! Decodes Ethernet frames into ARP, IPv4, TCP, UDP and ICMP records,
//! classifies them by service and LAN/INTERNET scope, and keeps a rolling
//! newest-first window of the last 50 packets published as a JSON snapshot.

pub mod capture;
pub mod classifier;
pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod publisher;
pub mod retention;

pub use capture::{FrameSource, PnetCapture, ReplayCapture};
pub use config::Config;
pub use domain::PacketRecord;
pub use error::{CaptureError, ConfigError, ParseError, PublishError};
pub use pipeline::{decode_frame, CapturePipeline, DropReason, FrameOutcome, PipelineStats};
pub use publisher::{load_snapshot, ConsolePublisher, JsonFilePublisher, SnapshotPublisher};
pub use retention::{RetentionBuffer, RETENTION_CAPACITY};
