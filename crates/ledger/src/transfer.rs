//! Transfer engine - validated, all-or-nothing value movement
//!
//! A transfer debits `from` and credits `to` by the same amount. Every check
//! runs before anything is staged, and both writes commit in one batch, so a
//! failed transfer leaves no trace in the store.
//!
//! The issuance account (`"0"`) is never read or written: as a source it
//! mints value without a funds check, as a destination it destroys value.

use crate::account::Account;
use crate::error::{LedgerError, LedgerResult};
use crate::record::{decode, encode, Record};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use snapbank_core::{AccountRef, Amount};
use snapbank_store::{RecordStore, UnitOfWork};

/// A request to move `amount` from one account to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: AccountRef,
    pub to: AccountRef,
    pub amount: Amount,
}

impl TransferRequest {
    pub fn new(from: AccountRef, to: AccountRef, amount: Amount) -> Self {
        Self { from, to, amount }
    }
}

/// Configurable transfer rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPolicy {
    /// Accept transfers of exactly zero
    #[serde(default = "default_allow_zero_amount")]
    pub allow_zero_amount: bool,
}

fn default_allow_zero_amount() -> bool {
    true
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            allow_zero_amount: default_allow_zero_amount(),
        }
    }
}

/// Outcome of a committed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    /// Balance of the source after the transfer; `None` for issuance
    pub from_balance: Option<Decimal>,
    /// Balance of the destination after the transfer; `None` for issuance
    pub to_balance: Option<Decimal>,
}

/// Executes transfers against an account store
#[derive(Debug, Clone, Default)]
pub struct TransferEngine {
    policy: TransferPolicy,
}

impl TransferEngine {
    pub fn new(policy: TransferPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TransferPolicy {
        &self.policy
    }

    /// Validate and apply `request` as one atomic batch
    pub fn execute<S: RecordStore + ?Sized>(
        &self,
        store: &mut S,
        request: &TransferRequest,
    ) -> LedgerResult<TransferReceipt> {
        let amount = request.amount.value();
        if request.amount.is_zero() && !self.policy.allow_zero_amount {
            return Err(LedgerError::invalid("transfer amount must be positive"));
        }

        let mut uow = UnitOfWork::new(store);

        // Existence of both sides is checked before the funds check.
        let source = load(&uow, &request.from)?;
        load(&uow, &request.to)?;

        let from_balance = match source {
            Some(mut account) => {
                let remaining = account.balance.checked_sub(amount).ok_or_else(|| {
                    LedgerError::invalid(format!(
                        "debit of {} overflows balance of account {}",
                        amount, account.id
                    ))
                })?;
                if remaining.is_sign_negative() && !remaining.is_zero() {
                    tracing::warn!(
                        account = %account.id,
                        balance = %account.balance,
                        amount = %amount,
                        "Transfer rejected: insufficient funds"
                    );
                    return Err(LedgerError::InsufficientFunds {
                        account: account.id,
                        balance: account.balance,
                        amount,
                    });
                }
                account.balance = remaining;
                uow.put(account.key(), encode(&account)?);
                Some(remaining)
            }
            None => None,
        };

        // Re-read the destination so a self-transfer credits the debited state.
        let to_balance = match load(&uow, &request.to)? {
            Some(mut account) => {
                let credited = account.balance.checked_add(amount).ok_or_else(|| {
                    LedgerError::invalid(format!(
                        "credit of {} overflows balance of account {}",
                        amount, account.id
                    ))
                })?;
                account.balance = credited;
                uow.put(account.key(), encode(&account)?);
                Some(credited)
            }
            None => None,
        };

        let receipt = uow.commit()?;

        tracing::info!(
            tx_id = %receipt.tx_id,
            from = %request.from,
            to = %request.to,
            amount = %amount,
            "Transfer committed"
        );

        Ok(TransferReceipt {
            tx_id: receipt.tx_id,
            timestamp: receipt.timestamp,
            from_balance,
            to_balance,
        })
    }
}

/// Current state of a transfer side; `None` for the issuance account
fn load<S: RecordStore + ?Sized>(
    uow: &UnitOfWork<'_, S>,
    side: &AccountRef,
) -> LedgerResult<Option<Account>> {
    let Some(id) = side.account_id() else {
        return Ok(None);
    };
    match uow.get(id)? {
        Some(bytes) => decode::<Account>(id, &bytes).map(Some),
        None => Err(LedgerError::not_found(Account::ENTITY, id)),
    }
}
