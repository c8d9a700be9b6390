//! JSON snapshot file with atomic replacement.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::SnapshotPublisher;
use crate::domain::PacketRecord;
use crate::error::PublishError;

/// Writes the buffer as a pretty-printed JSON array.
///
/// Each write goes to `<path>.tmp` and is then renamed over `<path>`, so a
/// concurrent reader sees either the previous snapshot or the new one.
pub struct JsonFilePublisher {
    path: PathBuf,
}

impl JsonFilePublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Replace the snapshot with an empty array.
    pub fn reset(&self) -> Result<(), PublishError> {
        self.write(&[])
    }

    fn write(&self, records: &[PacketRecord]) -> Result<(), PublishError> {
        let tmp = self.temp_path();

        let result = write_json(&tmp, records).and_then(|()| {
            fs::rename(&tmp, &self.path)?;
            Ok(())
        });

        if result.is_err() {
            // Best effort; the published file is untouched either way
            let _ = fs::remove_file(&tmp);
        }

        result
    }
}

/// Write and fsync `path`, so the rename never publishes an empty file.
fn write_json(path: &Path, records: &[PacketRecord]) -> Result<(), PublishError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

impl SnapshotPublisher for JsonFilePublisher {
    fn publish(&self, records: &[PacketRecord]) -> Result<(), PublishError> {
        self.write(records)?;
        debug!("Published {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn on_start(&self, _source: &str) -> Result<(), PublishError> {
        self.reset()?;
        debug!("Reset snapshot file {}", self.path.display());
        Ok(())
    }
}

/// Read a published snapshot. A missing file is an empty snapshot.
pub fn load_snapshot(path: &Path) -> Result<Vec<PacketRecord>, PublishError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use tempfile::TempDir;

    use super::*;
    use crate::domain::{ArpSummary, EthSummary};

    fn arp_record(timestamp: f64) -> PacketRecord {
        let mut record = PacketRecord::new(
            timestamp,
            EthSummary {
                src_mac: "aa:bb:cc:dd:ee:01".to_string(),
                dst_mac: "ff:ff:ff:ff:ff:ff".to_string(),
                eth_type: 0x0806,
            },
        );
        record.arp = Some(ArpSummary {
            opcode: 1,
            src_mac: "aa:bb:cc:dd:ee:01".to_string(),
            src_ip: Ipv4Addr::new(192, 168, 1, 10),
            target_mac: "00:00:00:00:00:00".to_string(),
            target_ip: Ipv4Addr::new(192, 168, 1, 1),
        });
        record
    }

    #[test]
    fn test_publish_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("packets.json");
        let publisher = JsonFilePublisher::new(&path);

        let records = vec![arp_record(2.0), arp_record(1.0)];
        publisher.publish(&records).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded, records);
        assert!(!publisher.temp_path().exists());
    }

    #[test]
    fn test_published_json_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("packets.json");
        let publisher = JsonFilePublisher::new(&path);

        publisher.publish(&[arp_record(1.5)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        let first = &value[0];
        assert_eq!(first["timestamp"], 1.5);
        assert_eq!(first["eth"]["eth_type"], 2054);
        assert_eq!(first["arp"]["opcode"], 1);
        assert_eq!(first["arp"]["src_ip"], "192.168.1.10");
        assert_eq!(first["arp"]["target_mac"], "00:00:00:00:00:00");
        assert!(first.get("ip").is_none());
        assert!(first.get("scope").is_none());
    }

    #[test]
    fn test_reset_writes_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("packets.json");
        let publisher = JsonFilePublisher::new(&path);

        publisher.publish(&[arp_record(1.0)]).unwrap();
        publisher.on_start("eth0").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "[]");
        assert!(load_snapshot(&path).unwrap().is_empty());
    }

    #[test]
    fn test_smaller_snapshot_replaces_larger_completely() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("packets.json");
        let publisher = JsonFilePublisher::new(&path);

        let many: Vec<PacketRecord> = (0..50).map(|n| arp_record(n as f64)).collect();
        publisher.publish(&many).unwrap();
        publisher.publish(&[arp_record(99.0)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let loaded: Vec<PacketRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, vec![arp_record(99.0)]);
        assert!(!publisher.temp_path().exists());
    }

    #[test]
    fn test_write_json_persists_before_rename() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("staged.json");

        write_json(&path, &[arp_record(3.0)]).unwrap();

        let on_disk = fs::metadata(&path).unwrap().len();
        let expected = serde_json::to_string_pretty(&[arp_record(3.0)]).unwrap().len() as u64;
        assert_eq!(on_disk, expected);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = load_snapshot(&dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_unwritable_location_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("packets.json");
        let publisher = JsonFilePublisher::new(&path);
        publisher.publish(&[arp_record(1.0)]).unwrap();

        let broken = JsonFilePublisher::new(dir.path().join("missing-dir").join("packets.json"));
        assert!(matches!(
            broken.publish(&[arp_record(2.0)]),
            Err(PublishError::Io(_))
        ));

        assert_eq!(load_snapshot(&path).unwrap().len(), 1);
    }
}
