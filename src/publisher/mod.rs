//! Snapshot publishing.
//!
//! This module defines the `SnapshotPublisher` trait (ISP, DIP) and provides
//! a JSON file implementation for external viewers and a console
//! implementation for interactive use.

mod console;
mod json_file;

pub use console::{render_record, render_snapshot, ConsolePublisher};
pub use json_file::{load_snapshot, JsonFilePublisher};

use crate::domain::PacketRecord;
use crate::error::PublishError;

/// Trait for exposing the retention buffer to external readers.
///
/// `publish` is called synchronously with the full buffer, newest first,
/// every time a packet is accepted. Implementations must never expose a
/// partially written snapshot.
pub trait SnapshotPublisher: Send {
    /// Publish the current buffer contents.
    fn publish(&self, records: &[PacketRecord]) -> Result<(), PublishError>;

    /// Called once before the capture loop starts. Failure aborts startup.
    fn on_start(&self, _source: &str) -> Result<(), PublishError> {
        Ok(())
    }

    /// Called when the capture loop stops.
    fn on_stop(&self) {}
}
