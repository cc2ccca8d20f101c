//! Ledger errors

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use snapbank_store::StoreError;
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Stable, machine-readable failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    InsufficientFunds,
    OwnershipMismatch,
    CorruptHistory,
    DecodeError,
    StoreError,
    StoreIteration,
}

/// Errors that can occur in ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{entity} with id {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} with id {id} does not exist: {reason}")]
    MissingReference {
        entity: &'static str,
        id: String,
        reason: String,
    },

    #[error("{entity} with id {id} already exists")]
    AlreadyExists { entity: &'static str, id: String },

    #[error("Insufficient funds in account {account}: balance {balance}, requested {amount}")]
    InsufficientFunds {
        account: String,
        balance: Decimal,
        amount: Decimal,
    },

    #[error("Person {person_id} is not the owner of account {account}")]
    OwnershipMismatch { person_id: String, account: String },

    #[error("Corrupt history for {id} at transaction {tx_id}: {reason}")]
    CorruptHistory {
        id: String,
        tx_id: String,
        reason: String,
    },

    #[error("Failed to decode {entity} {id}: {reason}")]
    Decode {
        entity: &'static str,
        id: String,
        reason: String,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("History iteration failed for {id}: {source}")]
    StoreIteration {
        id: String,
        #[source]
        source: StoreError,
    },
}

/// Result type alias with LedgerError
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn already_exists(entity: &'static str, id: &str) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Machine-readable kind of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            LedgerError::NotFound { .. } | LedgerError::MissingReference { .. } => {
                ErrorKind::NotFound
            }
            LedgerError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::OwnershipMismatch { .. } => ErrorKind::OwnershipMismatch,
            LedgerError::CorruptHistory { .. } => ErrorKind::CorruptHistory,
            LedgerError::Decode { .. } => ErrorKind::DecodeError,
            LedgerError::Store(_) => ErrorKind::StoreError,
            LedgerError::StoreIteration { .. } => ErrorKind::StoreIteration,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
