//! Error types for every stage of the capture pipeline.

use thiserror::Error;

/// A protocol layer that could not be decoded.
///
/// Parse errors are never fatal: the pipeline records fewer layers or drops
/// the frame entirely.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{layer} too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported IP version {0}")]
    UnsupportedVersion(u8),

    #[error("{layer} header length {header_len} invalid for {actual} bytes")]
    InvalidHeaderLength {
        layer: &'static str,
        header_len: usize,
        actual: usize,
    },
}

/// Failures of the capture source.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("network interface not found: {0}")]
    InterfaceNotFound(String),

    #[error("insufficient permissions for raw capture (run as root or grant CAP_NET_RAW)")]
    InsufficientPermissions,

    #[error("failed to create capture channel: {0}")]
    ChannelCreation(String),

    #[error("capture read failed: {0}")]
    Read(#[from] std::io::Error),
}

/// Failures while writing a snapshot.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
