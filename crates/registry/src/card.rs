//! Cards - payment cards bound to a person and one of their accounts
//!
//! Issuing a card checks that the person exists, that the account exists and
//! that the account belongs to that person. The checks go through a
//! [`Directory`] so the card manager never touches another manager's store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use snapbank_ledger::record::decode;
use snapbank_ledger::validation::{id_from_string_or_number, validate_record_id};
use snapbank_ledger::{
    Account, Directory, LedgerError, LedgerResult, Namespace, Record, RecordBook,
};
use snapbank_store::{CommitReceipt, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub card_number: String,

    #[serde(
        default,
        alias = "valid_through",
        deserialize_with = "id_from_string_or_number"
    )]
    pub expire_date: String,

    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub cvc: String,

    #[serde(deserialize_with = "id_from_string_or_number")]
    pub person_id: String,

    #[serde(deserialize_with = "id_from_string_or_number")]
    pub account_number: String,
}

impl Record for Card {
    const ENTITY: &'static str = "Card";

    fn key(&self) -> &str {
        &self.card_number
    }

    fn validate(&self) -> LedgerResult<()> {
        validate_record_id(Self::ENTITY, &self.card_number)?;
        validate_record_id("Person", &self.person_id)?;
        validate_record_id(Account::ENTITY, &self.account_number)
    }
}

/// Card joined with its owner and account snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDetails {
    pub person: Value,
    pub credit_card: Value,
    pub account: Value,
}

/// Card manager
pub struct CardBook<S> {
    records: RecordBook<Card, S>,
}

impl<S: RecordStore> CardBook<S> {
    pub fn new(store: S) -> Self {
        Self {
            records: RecordBook::new(store),
        }
    }

    pub fn store(&self) -> &S {
        self.records.store()
    }

    /// Issue a card after checking its person and account
    pub fn create(&mut self, card: &Card, directory: &dyn Directory) -> LedgerResult<CommitReceipt> {
        card.validate()?;

        directory
            .exists(Namespace::Persons, &card.person_id)
            .map_err(|reason| LedgerError::MissingReference {
                entity: "Person",
                id: card.person_id.clone(),
                reason,
            })?;

        let bytes = directory
            .lookup(Namespace::Accounts, &card.account_number)
            .map_err(|reason| LedgerError::MissingReference {
                entity: Account::ENTITY,
                id: card.account_number.clone(),
                reason,
            })?;
        let account: Account = decode(&card.account_number, &bytes)?;
        if account.owner_id != card.person_id {
            tracing::warn!(
                card = %card.card_number,
                person = %card.person_id,
                account = %account.id,
                owner = %account.owner_id,
                "Card rejected: account owned by someone else"
            );
            return Err(LedgerError::OwnershipMismatch {
                person_id: card.person_id.clone(),
                account: account.id,
            });
        }

        let receipt = self.records.create(card)?;
        tracing::info!(
            card = %card.card_number,
            person = %card.person_id,
            account = %card.account_number,
            "Card issued"
        );
        Ok(receipt)
    }

    pub fn read(&self, number: &str) -> LedgerResult<Card> {
        self.records.read(number)
    }

    /// Card with its person and account snapshots
    pub fn info(&self, number: &str, directory: &dyn Directory) -> LedgerResult<CardDetails> {
        let card = self.read(number)?;

        let person = directory
            .lookup(Namespace::Persons, &card.person_id)
            .map_err(|reason| LedgerError::MissingReference {
                entity: "Person",
                id: card.person_id.clone(),
                reason,
            })?;
        let account = directory
            .lookup(Namespace::Accounts, &card.account_number)
            .map_err(|reason| LedgerError::MissingReference {
                entity: Account::ENTITY,
                id: card.account_number.clone(),
                reason,
            })?;

        Ok(CardDetails {
            person: to_value("Person", &card.person_id, &person)?,
            credit_card: serde_json::to_value(&card).map_err(|e| LedgerError::Decode {
                entity: Card::ENTITY,
                id: card.card_number.clone(),
                reason: e.to_string(),
            })?,
            account: to_value(Account::ENTITY, &card.account_number, &account)?,
        })
    }

    pub fn delete(&mut self, number: &str) -> LedgerResult<CommitReceipt> {
        let receipt = self.records.delete(number)?;
        tracing::info!(card = %number, "Card deleted");
        Ok(receipt)
    }
}

fn to_value(entity: &'static str, id: &str, bytes: &[u8]) -> LedgerResult<Value> {
    serde_json::from_slice(bytes).map_err(|e| LedgerError::Decode {
        entity,
        id: id.to_string(),
        reason: e.to_string(),
    })
}
