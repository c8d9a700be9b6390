//! Frame capture abstraction.
//!
//! This module defines the `FrameSource` trait (DIP) and provides a
//! pnet-based implementation plus an in-memory replay source. This allows
//! the pipeline to be driven by a live interface or by synthetic frames.

mod pnet_capture;
mod replay;

pub use pnet_capture::PnetCapture;
pub use replay::ReplayCapture;

use crate::error::CaptureError;

/// Trait for raw frame sources (Dependency Inversion Principle).
///
/// Opening the source is where setup failures (missing interface,
/// insufficient permissions) surface; once open, `next_frame` blocks until a
/// frame arrives or the read timeout elapses.
pub trait FrameSource: Send {
    /// Block for the next raw link-layer frame.
    ///
    /// Returns `Ok(None)` when the read timed out without a frame, so the
    /// caller can check for shutdown between reads. The returned slice is
    /// only valid until the next call.
    fn next_frame(&mut self) -> Result<Option<&[u8]>, CaptureError>;

    /// Human-readable name of the source (usually the interface name).
    fn name(&self) -> &str;

    /// True once the source can never produce another frame.
    fn is_exhausted(&self) -> bool {
        false
    }
}
