//! In-memory record store

use crate::batch::{CommitReceipt, KeyModification, WriteBatch};
use crate::error::StoreError;
use crate::{HistoryIter, RecordStore};
use std::collections::{BTreeMap, HashMap};

/// Record store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<KeyModification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Live keys in lexical order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.state.keys().map(String::as_str)
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.get(key).cloned())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        let receipt = CommitReceipt::generate();
        if batch.is_empty() {
            return Ok(receipt);
        }

        for (key, value) in batch.into_writes() {
            match &value {
                Some(bytes) => {
                    self.state.insert(key.clone(), bytes.clone());
                }
                None => {
                    self.state.remove(&key);
                }
            }
            self.history.entry(key).or_default().push(KeyModification {
                tx_id: receipt.tx_id.clone(),
                timestamp: receipt.timestamp,
                value,
            });
        }

        Ok(receipt)
    }

    fn history(&self, key: &str) -> Result<HistoryIter<'_>, StoreError> {
        let mods = self.history.get(key).map(Vec::as_slice).unwrap_or(&[]);
        Ok(Box::new(mods.iter().cloned().map(Ok)))
    }
}
