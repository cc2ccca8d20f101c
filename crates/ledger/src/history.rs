//! History reconstruction - snapshots to signed deltas
//!
//! The store keeps every snapshot ever written for an account. Walking them
//! oldest first with a zero baseline turns balances into a delta log:
//! `delta = balance - previous_balance`. Tombstones are not snapshots and are
//! skipped, and the baseline is not reset when an account is re-created.

use crate::error::{LedgerError, LedgerResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use snapbank_store::{HistoryIter, KeyModification, RecordStore, StoreError};

/// One derived step of an account's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    /// Signed change from the previous snapshot
    pub delta: Decimal,
    /// Balance carried by this snapshot
    pub balance: Decimal,
}

/// Only the balance is needed to derive a delta
#[derive(Deserialize)]
struct BalanceView {
    balance: Decimal,
}

/// Lazy delta log of one account, oldest first.
///
/// Yields at most one error, after which it is exhausted. Call
/// [`reconstruct_history`] again to restart from the oldest snapshot.
pub struct History<'a> {
    id: String,
    modifications: HistoryIter<'a>,
    pending: Option<KeyModification>,
    previous: Decimal,
    done: bool,
}

/// Start reconstructing the history of `id`.
///
/// Fails with `NotFound` when no snapshot was ever written for `id`. A deleted
/// account with retained snapshots still has a history.
pub fn reconstruct_history<'a, S: RecordStore + ?Sized>(
    store: &'a S,
    id: &str,
) -> LedgerResult<History<'a>> {
    let mut modifications = store.history(id)?;

    let first = loop {
        match modifications.next() {
            Some(Ok(m)) if m.is_delete() => continue,
            Some(Ok(m)) => break m,
            Some(Err(source)) => return Err(iteration_error(id, source)),
            None => return Err(LedgerError::not_found("Account", id)),
        }
    };

    Ok(History {
        id: id.to_string(),
        modifications,
        pending: Some(first),
        previous: Decimal::ZERO,
        done: false,
    })
}

fn iteration_error(id: &str, source: StoreError) -> LedgerError {
    LedgerError::StoreIteration {
        id: id.to_string(),
        source,
    }
}

impl<'a> History<'a> {
    pub fn account_id(&self) -> &str {
        &self.id
    }

    /// Every entry, or the first error
    pub fn collect_all(self) -> LedgerResult<Vec<HistoryEntry>> {
        self.collect()
    }

    fn next_snapshot(&mut self) -> Option<Result<KeyModification, StoreError>> {
        if let Some(first) = self.pending.take() {
            return Some(Ok(first));
        }
        loop {
            match self.modifications.next()? {
                Ok(m) if m.is_delete() => continue,
                other => return Some(other),
            }
        }
    }

    fn derive(&mut self, modification: KeyModification) -> LedgerResult<HistoryEntry> {
        let bytes = modification.value.unwrap_or_default();
        let view: BalanceView =
            serde_json::from_slice(&bytes).map_err(|e| LedgerError::CorruptHistory {
                id: self.id.clone(),
                tx_id: modification.tx_id.clone(),
                reason: e.to_string(),
            })?;

        let delta = view.balance.checked_sub(self.previous).ok_or_else(|| {
            LedgerError::CorruptHistory {
                id: self.id.clone(),
                tx_id: modification.tx_id.clone(),
                reason: format!("delta from {} to {} overflows", self.previous, view.balance),
            }
        })?;
        self.previous = view.balance;

        Ok(HistoryEntry {
            tx_id: modification.tx_id,
            timestamp: modification.timestamp,
            delta,
            balance: view.balance,
        })
    }
}

impl Iterator for History<'_> {
    type Item = LedgerResult<HistoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = match self.next_snapshot()? {
            Ok(modification) => self.derive(modification),
            Err(source) => Err(iteration_error(&self.id, source)),
        };
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
