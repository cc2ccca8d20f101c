//! SnapBank Store - versioned key-value record store
//!
//! Every record is kept as a full snapshot under its key. Each committed write
//! is also appended to the key's history, which is never pruned.
//!
//! # Key Types
//! - `RecordStore`: get / put / delete / commit / history
//! - `WriteBatch`: writes that commit atomically under one transaction id
//! - `UnitOfWork`: read-your-writes staging area over a store
//! - `MemoryStore`: in-process store
//! - `JournalStore`: append-only JSONL store, replayed on open

pub mod batch;
pub mod error;
pub mod hash;
pub mod memory;
pub mod reader;
pub mod store;
pub mod unit_of_work;

pub use batch::{CommitReceipt, KeyModification, WriteBatch};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use reader::{JournalReader, JournalRecord, JournalWrite};
pub use store::JournalStore;
pub use unit_of_work::UnitOfWork;

/// Lazy, oldest-first sequence of modifications of one key
pub type HistoryIter<'a> = Box<dyn Iterator<Item = Result<KeyModification, StoreError>> + 'a>;

/// Versioned key-value store holding one live snapshot per key.
pub trait RecordStore {
    /// Current snapshot of `key`, or `None` if absent or deleted
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Apply every write of `batch` or none of them
    fn commit(&mut self, batch: WriteBatch) -> Result<CommitReceipt, StoreError>;

    /// All modifications ever committed for `key`, oldest first
    fn history(&self, key: &str) -> Result<HistoryIter<'_>, StoreError>;

    /// Write a single snapshot in its own transaction
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<CommitReceipt, StoreError> {
        let mut batch = WriteBatch::new();
        batch.put(key, value);
        self.commit(batch)
    }

    /// Delete a single key in its own transaction (history is kept)
    fn delete(&mut self, key: &str) -> Result<CommitReceipt, StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete(key);
        self.commit(batch)
    }
}
