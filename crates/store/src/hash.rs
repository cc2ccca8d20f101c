//! Hash chain utilities for journal integrity

use crate::error::StoreError;
use crate::reader::JournalRecord;
use sha2::{Digest, Sha256};

/// `prev_hash` of the first journal record
pub const GENESIS_HASH: &str = "GENESIS";

/// Calculate SHA256 hash of record content (excluding the hash field itself)
pub fn calculate_record_hash(record: &JournalRecord) -> String {
    let mut hasher = Sha256::new();

    hasher.update(record.sequence.to_le_bytes());
    hasher.update(record.prev_hash.as_bytes());
    hasher.update(record.tx_id.as_bytes());
    hasher.update(record.timestamp.to_rfc3339().as_bytes());

    for write in &record.writes {
        hasher.update(write.key.as_bytes());
        match &write.value {
            Some(value) => {
                hasher.update([1u8]);
                hasher.update(value.as_bytes());
            }
            None => hasher.update([0u8]),
        }
    }

    hex::encode(hasher.finalize())
}

/// Verify hash chain integrity
pub fn verify_chain(records: &[JournalRecord]) -> Result<(), StoreError> {
    let mut prev_hash = GENESIS_HASH.to_string();
    let mut expected_sequence = 1;

    for record in records {
        if record.sequence != expected_sequence {
            return Err(StoreError::BrokenChain {
                sequence: record.sequence,
                expected: format!("sequence {}", expected_sequence),
                actual: format!("sequence {}", record.sequence),
            });
        }

        if record.prev_hash != prev_hash {
            return Err(StoreError::BrokenChain {
                sequence: record.sequence,
                expected: prev_hash,
                actual: record.prev_hash.clone(),
            });
        }

        let calculated = calculate_record_hash(record);
        if record.hash != calculated {
            return Err(StoreError::BrokenChain {
                sequence: record.sequence,
                expected: calculated,
                actual: record.hash.clone(),
            });
        }

        prev_hash = record.hash.clone();
        expected_sequence += 1;
    }

    Ok(())
}
