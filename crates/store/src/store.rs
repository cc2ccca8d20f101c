//! JSONL journal store - append-only, replayed on open
//!
//! Each committed batch becomes one hash-chained line in a daily file
//! (`YYYY-MM-DD.jsonl`). Live state and per-key history are rebuilt from the
//! journal when the store is opened.

use crate::batch::{CommitReceipt, KeyModification, WriteBatch};
use crate::error::StoreError;
use crate::hash::{calculate_record_hash, verify_chain, GENESIS_HASH};
use crate::reader::{JournalReader, JournalRecord, JournalWrite};
use crate::{HistoryIter, RecordStore};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Durable record store backed by a JSONL journal directory
pub struct JournalStore {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
    state: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<KeyModification>>,
    last_sequence: u64,
    last_hash: String,
    /// Set after a failed append; cleared only by reopening
    poisoned: bool,
}

impl JournalStore {
    /// Open (or create) the journal at `base_path` and replay it
    pub fn open(base_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        let reader = JournalReader::from_directory(&base_path)?;
        let records = reader.read_all()?;
        verify_chain(&records)?;

        let mut store = Self {
            base_path,
            current_file: None,
            current_date: None,
            state: BTreeMap::new(),
            history: HashMap::new(),
            last_sequence: 0,
            last_hash: GENESIS_HASH.to_string(),
            poisoned: false,
        };

        for record in &records {
            store.apply(record)?;
        }

        tracing::debug!(
            path = %store.base_path.display(),
            records = records.len(),
            keys = store.state.len(),
            "Journal replayed"
        );

        Ok(store)
    }

    /// Apply a verified record to the in-memory state
    fn apply(&mut self, record: &JournalRecord) -> Result<(), StoreError> {
        for write in &record.writes {
            let value = write.decode_value().map_err(|e| StoreError::Corrupt {
                file: self.base_path.display().to_string(),
                line: record.sequence as usize,
                reason: format!("invalid hex value for key {}: {}", write.key, e),
            })?;

            match &value {
                Some(bytes) => {
                    self.state.insert(write.key.clone(), bytes.clone());
                }
                None => {
                    self.state.remove(&write.key);
                }
            }

            self.history
                .entry(write.key.clone())
                .or_default()
                .push(KeyModification {
                    tx_id: record.tx_id.clone(),
                    timestamp: record.timestamp,
                    value,
                });
        }

        self.last_sequence = record.sequence;
        self.last_hash = record.hash.clone();
        Ok(())
    }

    /// Rotate to a new file for the given date
    fn rotate_file(&mut self, date: &str) -> Result<(), StoreError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());

        Ok(())
    }

    /// Append a record line and flush it
    fn append(&mut self, record: &JournalRecord) -> Result<(), StoreError> {
        let date = record.timestamp.format("%Y-%m-%d").to_string();

        if self.current_date.as_ref() != Some(&date) {
            self.rotate_file(&date)?;
        }

        let json = serde_json::to_string(record)?;
        match self.current_file {
            Some(ref mut writer) => {
                writeln!(writer, "{}", json)?;
                writer.flush()?;
                Ok(())
            }
            None => Err(StoreError::Unavailable(format!(
                "journal file for {} is not open",
                date
            ))),
        }
    }

    /// Drop the writer without flushing what it still buffers and refuse
    /// further commits. The file may end in a torn line, which the next open
    /// reports as corrupt.
    fn poison(&mut self, err: &StoreError) {
        if let Some(writer) = self.current_file.take() {
            let (_file, _unflushed) = writer.into_parts();
        }
        self.current_date = None;
        self.poisoned = true;

        tracing::error!(
            path = %self.base_path.display(),
            sequence = self.last_sequence + 1,
            error = %err,
            "Journal append failed; store poisoned"
        );
    }

    /// Whether a failed append has disabled commits
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Journal directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Sequence number of the last committed batch (0 when empty)
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Live keys in lexical order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.state.keys().map(String::as_str)
    }

    /// Flush and close the current file
    pub fn close(&mut self) -> Result<(), StoreError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }
}

impl RecordStore for JournalStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.get(key).cloned())
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<CommitReceipt, StoreError> {
        if self.poisoned {
            return Err(StoreError::Unavailable(format!(
                "journal {} failed an earlier write; reopen it to recover",
                self.base_path.display()
            )));
        }

        let receipt = CommitReceipt::generate();
        if batch.is_empty() {
            return Ok(receipt);
        }

        let mut record = JournalRecord {
            sequence: self.last_sequence + 1,
            prev_hash: self.last_hash.clone(),
            hash: String::new(),
            tx_id: receipt.tx_id.clone(),
            timestamp: receipt.timestamp,
            writes: batch
                .iter()
                .map(|(key, value)| JournalWrite::new(key, value))
                .collect(),
        };
        record.hash = calculate_record_hash(&record);

        // The journal line is the commit point: memory is only touched after it
        // has been written.
        if let Err(err) = self.append(&record) {
            self.poison(&err);
            return Err(err);
        }
        self.apply(&record)?;

        tracing::debug!(
            sequence = record.sequence,
            tx_id = %record.tx_id,
            writes = record.writes.len(),
            "Batch committed"
        );

        Ok(receipt)
    }

    fn history(&self, key: &str) -> Result<HistoryIter<'_>, StoreError> {
        let mods = self.history.get(key).map(Vec::as_slice).unwrap_or(&[]);
        Ok(Box::new(mods.iter().cloned().map(Ok)))
    }
}

impl Drop for JournalStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
