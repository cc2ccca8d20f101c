//! Persons - account and card owners

use serde::{Deserialize, Serialize};
use snapbank_ledger::validation::id_from_string_or_number;
use snapbank_ledger::{LedgerResult, Record, RecordBook};
use snapbank_store::{CommitReceipt, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub second_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

impl Record for Person {
    const ENTITY: &'static str = "Person";

    fn key(&self) -> &str {
        &self.id
    }
}

/// Person manager
pub struct PersonBook<S> {
    records: RecordBook<Person, S>,
}

impl<S: RecordStore> PersonBook<S> {
    pub fn new(store: S) -> Self {
        Self {
            records: RecordBook::new(store),
        }
    }

    pub fn store(&self) -> &S {
        self.records.store()
    }

    pub fn create(&mut self, person: &Person) -> LedgerResult<CommitReceipt> {
        let receipt = self.records.create(person)?;
        tracing::info!(person = %person.id, "Person added");
        Ok(receipt)
    }

    pub fn read(&self, id: &str) -> LedgerResult<Person> {
        self.records.read(id)
    }

    pub fn read_raw(&self, id: &str) -> LedgerResult<Vec<u8>> {
        self.records.read_raw(id)
    }

    pub fn delete(&mut self, id: &str) -> LedgerResult<CommitReceipt> {
        let receipt = self.records.delete(id)?;
        tracing::info!(person = %id, "Person deleted");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapbank_ledger::ErrorKind;
    use snapbank_store::MemoryStore;

    fn alice() -> Person {
        serde_json::from_str(
            r#"{"id": 1, "first_name": "Alice", "second_name": "Smith", "address": "Main St 1", "phone": "555"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_id_is_stored_as_text() {
        let mut persons = PersonBook::new(MemoryStore::new());
        persons.create(&alice()).unwrap();
        assert_eq!(persons.read("1").unwrap().first_name, "Alice");
    }

    #[test]
    fn test_duplicate_person() {
        let mut persons = PersonBook::new(MemoryStore::new());
        persons.create(&alice()).unwrap();
        let err = persons.create(&alice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_delete_person() {
        let mut persons = PersonBook::new(MemoryStore::new());
        persons.create(&alice()).unwrap();
        persons.delete("1").unwrap();
        assert_eq!(persons.read_raw("1").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(persons.delete("1").unwrap_err().kind(), ErrorKind::NotFound);
    }
}
