//! Accounts - balance-bearing records
//!
//! An account is stored as a JSON snapshot keyed by its account number:
//! `{"account_number": "...", "person_id": "...", "balance": "..."}`.
//! The balance is set by the caller at creation and afterwards only changes
//! through a transfer.

use crate::directory::{Directory, Namespace};
use crate::error::{LedgerError, LedgerResult};
use crate::history::{reconstruct_history, History};
use crate::record::{encode, Record, RecordBook};
use crate::transfer::{TransferEngine, TransferPolicy, TransferReceipt, TransferRequest};
use crate::validation::{decode_json, id_from_string_or_number, validate_record_id};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use snapbank_core::ISSUANCE_ACCOUNT_ID;
use snapbank_store::{CommitReceipt, RecordStore};

/// Account snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "account_number", deserialize_with = "id_from_string_or_number")]
    pub id: String,

    /// Owning person; checked against the person manager at creation only
    #[serde(rename = "person_id", deserialize_with = "id_from_string_or_number")]
    pub owner_id: String,

    #[serde(default)]
    pub balance: Decimal,
}

impl Account {
    pub fn new(id: impl Into<String>, owner_id: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            balance,
        }
    }
}

impl Record for Account {
    const ENTITY: &'static str = "Account";

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> LedgerResult<()> {
        validate_record_id(Self::ENTITY, &self.id)?;
        if self.id == ISSUANCE_ACCOUNT_ID {
            return Err(LedgerError::invalid(format!(
                "account number {} is reserved for issuance",
                ISSUANCE_ACCOUNT_ID
            )));
        }
        validate_record_id("Person", &self.owner_id)
    }
}

/// Account manager: CRUD, transfers and history over one store
pub struct AccountBook<S> {
    records: RecordBook<Account, S>,
    engine: TransferEngine,
}

impl<S: RecordStore> AccountBook<S> {
    pub fn new(store: S, policy: TransferPolicy) -> Self {
        Self {
            records: RecordBook::new(store),
            engine: TransferEngine::new(policy),
        }
    }

    pub fn store(&self) -> &S {
        self.records.store()
    }

    pub fn policy(&self) -> &TransferPolicy {
        self.engine.policy()
    }

    /// Create an account whose owner must exist in the person manager
    pub fn create(
        &mut self,
        account: &Account,
        directory: &dyn Directory,
    ) -> LedgerResult<CommitReceipt> {
        let snapshot = encode(account)?;
        self.insert(account, snapshot, directory)
    }

    /// Create an account from the caller's JSON document, stored as given
    pub fn create_from_json(
        &mut self,
        raw: &str,
        directory: &dyn Directory,
    ) -> LedgerResult<CommitReceipt> {
        let account: Account = decode_json("account", raw)?;
        self.insert(&account, raw.as_bytes().to_vec(), directory)
    }

    fn insert(
        &mut self,
        account: &Account,
        snapshot: Vec<u8>,
        directory: &dyn Directory,
    ) -> LedgerResult<CommitReceipt> {
        account.validate()?;
        directory
            .exists(Namespace::Persons, &account.owner_id)
            .map_err(|reason| LedgerError::MissingReference {
                entity: "Person",
                id: account.owner_id.clone(),
                reason,
            })?;

        let receipt = self.records.create_snapshot(account, snapshot)?;

        tracing::info!(
            account = %account.id,
            owner = %account.owner_id,
            balance = %account.balance,
            "Account created"
        );
        Ok(receipt)
    }

    pub fn read(&self, id: &str) -> LedgerResult<Account> {
        self.records.read(id)
    }

    /// Stored snapshot bytes, as returned to callers
    pub fn read_raw(&self, id: &str) -> LedgerResult<Vec<u8>> {
        self.records.read_raw(id)
    }

    pub fn balance(&self, id: &str) -> LedgerResult<Decimal> {
        Ok(self.read(id)?.balance)
    }

    pub fn delete(&mut self, id: &str) -> LedgerResult<CommitReceipt> {
        let receipt = self.records.delete(id)?;
        tracing::info!(account = %id, "Account deleted");
        Ok(receipt)
    }

    /// Overwrite a snapshot without validation
    pub fn write(&mut self, account: &Account) -> LedgerResult<CommitReceipt> {
        self.records.write(account)
    }

    pub fn transfer(&mut self, request: &TransferRequest) -> LedgerResult<TransferReceipt> {
        self.engine.execute(self.records.store_mut(), request)
    }

    /// Balance deltas of `id`, oldest first
    pub fn history(&self, id: &str) -> LedgerResult<History<'_>> {
        reconstruct_history(self.records.store(), id)
    }
}
