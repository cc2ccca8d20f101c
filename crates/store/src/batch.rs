//! Write batches, commit receipts and key modifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of a key's history.
///
/// `value == None` marks a delete (tombstone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyModification {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: Option<Vec<u8>>,
}

impl KeyModification {
    pub fn is_delete(&self) -> bool {
        self.value.is_none()
    }
}

/// Identifies a committed batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
}

impl CommitReceipt {
    /// Fresh transaction id stamped with the current time
    pub fn generate() -> Self {
        Self {
            tx_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Set of writes applied together.
///
/// Writing the same key twice keeps only the last write, so a batch produces
/// at most one history entry per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<(String, Option<Vec<u8>>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a snapshot for `key`
    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.stage(key.into(), Some(value));
    }

    /// Stage a tombstone for `key`
    pub fn delete(&mut self, key: impl Into<String>) {
        self.stage(key.into(), None);
    }

    /// One write per key per batch keeps a key's history at one entry per
    /// committed transaction (a self-transfer adds a single snapshot).
    fn stage(&mut self, key: String, value: Option<Vec<u8>>) {
        match self.writes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.writes.push((key, value)),
        }
    }

    /// Staged write for `key`: `Some(None)` is a staged delete
    pub fn get(&self, key: &str) -> Option<&Option<Vec<u8>>> {
        self.writes.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Writes in first-staged order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&[u8]>)> {
        self.writes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn into_writes(self) -> Vec<(String, Option<Vec<u8>>)> {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_per_key_wins() {
        let mut batch = WriteBatch::new();
        batch.put("A", b"1".to_vec());
        batch.put("B", b"2".to_vec());
        batch.put("A", b"3".to_vec());

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get("A"), Some(&Some(b"3".to_vec())));
        let keys: Vec<_> = batch.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn test_delete_overrides_put() {
        let mut batch = WriteBatch::new();
        batch.put("A", b"1".to_vec());
        batch.delete("A");
        assert_eq!(batch.get("A"), Some(&None));
        assert!(batch.get("B").is_none());
    }

    #[test]
    fn test_receipts_are_unique() {
        let a = CommitReceipt::generate();
        let b = CommitReceipt::generate();
        assert_ne!(a.tx_id, b.tx_id);
    }
}
