//! In-memory frame source.

use std::collections::VecDeque;

use super::FrameSource;
use crate::error::CaptureError;

/// Replays a fixed list of frames, then reports itself exhausted.
pub struct ReplayCapture {
    name: String,
    pending: VecDeque<Vec<u8>>,
    current: Vec<u8>,
}

impl ReplayCapture {
    pub fn new(name: impl Into<String>, frames: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            pending: frames.into_iter().collect(),
            current: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ReplayCapture {
    fn next_frame(&mut self) -> Result<Option<&[u8]>, CaptureError> {
        match self.pending.pop_front() {
            Some(frame) => {
                self.current = frame;
                Ok(Some(&self.current))
            }
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order() {
        let mut source = ReplayCapture::new("replay", vec![vec![1], vec![2, 3]]);
        assert_eq!(source.name(), "replay");
        assert_eq!(source.remaining(), 2);

        assert_eq!(source.next_frame().unwrap(), Some(&[1u8][..]));
        assert_eq!(source.next_frame().unwrap(), Some(&[2u8, 3][..]));
        assert!(source.is_exhausted());
        assert_eq!(source.next_frame().unwrap(), None);
    }
}
