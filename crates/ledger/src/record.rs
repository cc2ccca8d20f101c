//! Snapshot CRUD shared by every record manager
//!
//! A record is stored as one JSON snapshot under its key. Creating requires
//! the key to be free, deleting requires it to be live, and writing simply
//! replaces the snapshot.

use crate::error::{LedgerError, LedgerResult};
use crate::validation::validate_record_id;
use serde::de::DeserializeOwned;
use serde::Serialize;
use snapbank_store::{CommitReceipt, RecordStore};
use std::marker::PhantomData;

/// A record kept by a manager
pub trait Record: Serialize + DeserializeOwned {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    /// Store key of this record
    fn key(&self) -> &str;

    /// Checks run before the record is first persisted
    fn validate(&self) -> LedgerResult<()> {
        validate_record_id(Self::ENTITY, self.key())
    }
}

/// Serialize a record to its snapshot bytes
pub fn encode<T: Record>(record: &T) -> LedgerResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| LedgerError::Decode {
        entity: T::ENTITY,
        id: record.key().to_string(),
        reason: e.to_string(),
    })
}

/// Deserialize snapshot bytes stored under `id`
pub fn decode<T: Record>(id: &str, bytes: &[u8]) -> LedgerResult<T> {
    serde_json::from_slice(bytes).map_err(|e| LedgerError::Decode {
        entity: T::ENTITY,
        id: id.to_string(),
        reason: e.to_string(),
    })
}

/// Record manager over its own store
pub struct RecordBook<T, S> {
    store: S,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record, S: RecordStore> RecordBook<T, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Whether a live snapshot exists under `id`
    pub fn contains(&self, id: &str) -> LedgerResult<bool> {
        Ok(self.store.get(id)?.is_some())
    }

    /// Persist a new record; fails if the key is live
    pub fn create(&mut self, record: &T) -> LedgerResult<CommitReceipt> {
        let bytes = encode(record)?;
        self.create_snapshot(record, bytes)
    }

    /// Persist a new record under snapshot bytes supplied by the caller.
    /// `snapshot` must decode to `record`.
    pub fn create_snapshot(
        &mut self,
        record: &T,
        snapshot: Vec<u8>,
    ) -> LedgerResult<CommitReceipt> {
        record.validate()?;
        let id = record.key();
        if self.contains(id)? {
            return Err(LedgerError::already_exists(T::ENTITY, id));
        }

        let receipt = self.store.put(id, snapshot)?;

        tracing::debug!(entity = T::ENTITY, id = %id, tx_id = %receipt.tx_id, "Record created");
        Ok(receipt)
    }

    /// Raw snapshot bytes of a live record
    pub fn read_raw(&self, id: &str) -> LedgerResult<Vec<u8>> {
        self.store
            .get(id)?
            .ok_or_else(|| LedgerError::not_found(T::ENTITY, id))
    }

    /// Decoded snapshot of a live record
    pub fn read(&self, id: &str) -> LedgerResult<T> {
        let bytes = self.read_raw(id)?;
        decode(id, &bytes)
    }

    /// Replace the snapshot of `record` unconditionally
    pub fn write(&mut self, record: &T) -> LedgerResult<CommitReceipt> {
        let bytes = encode(record)?;
        Ok(self.store.put(record.key(), bytes)?)
    }

    /// Tombstone a live record; its history is kept
    pub fn delete(&mut self, id: &str) -> LedgerResult<CommitReceipt> {
        if !self.contains(id)? {
            return Err(LedgerError::not_found(T::ENTITY, id));
        }
        let receipt = self.store.delete(id)?;

        tracing::debug!(entity = T::ENTITY, id = %id, tx_id = %receipt.tx_id, "Record deleted");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde::Deserialize;
    use snapbank_store::MemoryStore;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    impl Record for Note {
        const ENTITY: &'static str = "Note";

        fn key(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_create_then_read() {
        let mut book = RecordBook::new(MemoryStore::new());
        book.create(&note("n1", "hello")).unwrap();
        assert_eq!(book.read("n1").unwrap(), note("n1", "hello"));
    }

    #[test]
    fn test_duplicate_create_keeps_original() {
        let mut book = RecordBook::new(MemoryStore::new());
        book.create(&note("n1", "first")).unwrap();
        let err = book.create(&note("n1", "second")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(book.read("n1").unwrap().text, "first");
    }

    #[test]
    fn test_create_rejects_blank_key() {
        let mut book = RecordBook::new(MemoryStore::new());
        let err = book.create(&note("", "x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut book: RecordBook<Note, _> = RecordBook::new(MemoryStore::new());
        let err = book.delete("ghost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_keeps_history() {
        let mut book = RecordBook::new(MemoryStore::new());
        book.create(&note("n1", "a")).unwrap();
        book.delete("n1").unwrap();
        assert!(!book.contains("n1").unwrap());
        assert_eq!(book.store().history("n1").unwrap().count(), 2);
    }

    #[test]
    fn test_undecodable_snapshot() {
        let mut book: RecordBook<Note, _> = RecordBook::new(MemoryStore::new());
        book.store_mut().put("n1", b"not json".to_vec()).unwrap();
        let err = book.read("n1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        assert_eq!(book.read_raw("n1").unwrap(), b"not json".to_vec());
    }
}
