//! Fixed-capacity, newest-first history of packet records.

use std::collections::VecDeque;

use crate::domain::PacketRecord;

/// Number of records kept in the published window.
pub const RETENTION_CAPACITY: usize = 50;

/// Most-recent-first packet history.
///
/// Owned by the pipeline and mutated only through `&mut self`; it never
/// holds more than its capacity.
#[derive(Debug, Clone)]
pub struct RetentionBuffer {
    records: VecDeque<PacketRecord>,
    capacity: usize,
}

impl RetentionBuffer {
    pub fn new() -> Self {
        Self::with_capacity(RETENTION_CAPACITY)
    }

    /// Buffer with a custom capacity (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest records beyond capacity.
    pub fn push(&mut self, record: PacketRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest record, if any.
    pub fn latest(&self) -> Option<&PacketRecord> {
        self.records.front()
    }

    /// Contiguous newest-first view for publishing.
    pub fn snapshot(&mut self) -> &[PacketRecord] {
        self.records.make_contiguous()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PacketRecord> {
        self.records.iter()
    }
}

impl Default for RetentionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EthSummary;

    fn record(n: usize) -> PacketRecord {
        PacketRecord::new(
            n as f64,
            EthSummary {
                src_mac: "00:00:00:00:00:01".to_string(),
                dst_mac: "00:00:00:00:00:02".to_string(),
                eth_type: 0x0806,
            },
        )
    }

    #[test]
    fn test_newest_first() {
        let mut buffer = RetentionBuffer::new();
        buffer.push(record(1));
        buffer.push(record(2));
        buffer.push(record(3));

        let timestamps: Vec<f64> = buffer.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![3.0, 2.0, 1.0]);
        assert_eq!(buffer.latest().map(|r| r.timestamp), Some(3.0));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut buffer = RetentionBuffer::new();
        for n in 0..RETENTION_CAPACITY * 3 {
            buffer.push(record(n));
            assert!(buffer.len() <= RETENTION_CAPACITY);
        }
        assert_eq!(buffer.len(), RETENTION_CAPACITY);
    }

    #[test]
    fn test_keeps_most_recent_after_overflow() {
        let mut buffer = RetentionBuffer::new();
        let total = RETENTION_CAPACITY + 17;
        for n in 0..total {
            buffer.push(record(n));
        }

        let expected: Vec<f64> = (total - RETENTION_CAPACITY..total)
            .rev()
            .map(|n| n as f64)
            .collect();
        let actual: Vec<f64> = buffer.snapshot().iter().map(|r| r.timestamp).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut buffer = RetentionBuffer::with_capacity(0);
        buffer.push(record(1));
        buffer.push(record(2));
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_empty() {
        let buffer = RetentionBuffer::default();
        assert!(buffer.is_empty());
        assert!(buffer.latest().is_none());
    }
}
