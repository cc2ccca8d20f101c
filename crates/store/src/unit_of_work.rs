//! Unit of work - read-your-writes staging over a store
//!
//! Reads see staged writes first, then the store. Nothing reaches the store
//! until `commit`, which submits the whole write set as one batch.

use crate::batch::{CommitReceipt, WriteBatch};
use crate::error::StoreError;
use crate::RecordStore;

pub struct UnitOfWork<'s, S: RecordStore + ?Sized> {
    store: &'s mut S,
    batch: WriteBatch,
}

impl<'s, S: RecordStore + ?Sized> UnitOfWork<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            batch: WriteBatch::new(),
        }
    }

    /// Current value of `key` as seen by this unit of work
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.batch.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.store.get(key),
        }
    }

    pub fn put(&mut self, key: &str, value: Vec<u8>) {
        self.batch.put(key, value);
    }

    pub fn delete(&mut self, key: &str) {
        self.batch.delete(key);
    }

    /// Number of distinct keys staged
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// Submit every staged write atomically
    pub fn commit(self) -> Result<CommitReceipt, StoreError> {
        self.store.commit(self.batch)
    }
}
