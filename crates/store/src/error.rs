//! Store errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt journal {file} at line {line}: {reason}")]
    Corrupt {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("Broken hash chain at sequence {sequence}: expected {expected}, got {actual}")]
    BrokenChain {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
