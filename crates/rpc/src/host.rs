//! Host - routes named operations to the record managers
//!
//! Each manager owns its own store. Cross-manager checks (does this person
//! exist, which person owns this account) go through [`Siblings`], which
//! answers exactly what the sibling's `get*` operation would.

use crate::operation::{Chaincode, Operation};
use crate::response::Response;
use serde::Serialize;
use snapbank_ledger::validation::{
    decode_json, expect_arity, parse_account_ref, parse_amount, parse_decimal,
};
use snapbank_ledger::{
    Account, AccountBook, Directory, ErrorKind, LedgerError, LedgerResult, Namespace,
    TransferPolicy, TransferRequest,
};
use snapbank_registry::{Card, CardBook, Person, PersonBook};
use snapbank_store::RecordStore;

/// Transaction-processing host over three record managers
pub struct Host<S> {
    accounts: AccountBook<S>,
    persons: PersonBook<S>,
    cards: CardBook<S>,
}

impl<S: RecordStore> Host<S> {
    pub fn new(accounts: S, persons: S, cards: S, policy: TransferPolicy) -> Self {
        Self {
            accounts: AccountBook::new(accounts, policy),
            persons: PersonBook::new(persons),
            cards: CardBook::new(cards),
        }
    }

    pub fn accounts(&self) -> &AccountBook<S> {
        &self.accounts
    }

    pub fn persons(&self) -> &PersonBook<S> {
        &self.persons
    }

    pub fn cards(&self) -> &CardBook<S> {
        &self.cards
    }

    /// Invoke `operation` on `chaincode`. Never panics; every failure is
    /// reported in the response.
    pub fn invoke(&mut self, chaincode: &str, operation: &str, params: &[String]) -> Response {
        let Ok(target) = chaincode.parse::<Chaincode>() else {
            return Response::error(
                ErrorKind::InvalidArgument,
                format!("unknown chaincode {:?}", chaincode),
            );
        };
        let Ok(op) = operation.parse::<Operation>() else {
            return Response::error(
                ErrorKind::InvalidArgument,
                format!("unknown operation {:?}", operation),
            );
        };
        if op.chaincode() != target {
            return Response::error(
                ErrorKind::InvalidArgument,
                format!("operation {} is not served by {}", op, target),
            );
        }

        tracing::debug!(chaincode = %target, operation = %op, params = params.len(), "Invoke");

        let result = self.dispatch(op, params);
        if let Err(ref err) = result {
            tracing::debug!(operation = %op, kind = %err.kind(), error = %err, "Invoke failed");
        }
        Response::from(result)
    }

    fn dispatch(&mut self, op: Operation, params: &[String]) -> LedgerResult<Option<String>> {
        let name = op.to_string();
        match op {
            Operation::AddAccount => {
                let siblings = Siblings {
                    accounts: None,
                    persons: Some(&self.persons),
                };
                match params.len() {
                    1 => self.accounts.create_from_json(&params[0], &siblings)?,
                    3 => {
                        let account = Account::new(
                            params[0].as_str(),
                            params[1].as_str(),
                            parse_decimal("initial balance", &params[2])?,
                        );
                        self.accounts.create(&account, &siblings)?
                    }
                    n => {
                        return Err(LedgerError::invalid(format!(
                            "wrong number of parameters for {}: expected 1 or 3, but got {}",
                            name, n
                        )))
                    }
                };
                Ok(None)
            }

            Operation::GetAccount => {
                expect_arity(&name, params, 1)?;
                Ok(Some(text(self.accounts.read_raw(&params[0])?)))
            }

            Operation::GetBalance => {
                expect_arity(&name, params, 1)?;
                Ok(Some(self.accounts.balance(&params[0])?.to_string()))
            }

            Operation::DeleteAccount => {
                expect_arity(&name, params, 1)?;
                self.accounts.delete(&params[0])?;
                Ok(None)
            }

            Operation::Transfer => {
                expect_arity(&name, params, 3)?;
                let request = TransferRequest::new(
                    parse_account_ref("from", &params[0])?,
                    parse_account_ref("to", &params[1])?,
                    parse_amount(&params[2])?,
                );
                self.accounts.transfer(&request)?;
                Ok(None)
            }

            Operation::GetHistory => {
                expect_arity(&name, params, 1)?;
                let entries = self.accounts.history(&params[0])?.collect_all()?;
                to_json("History", &params[0], &entries).map(Some)
            }

            Operation::AddPerson => {
                expect_arity(&name, params, 1)?;
                let person = decode_json::<Person>("person", &params[0])?;
                self.persons.create(&person)?;
                Ok(None)
            }

            Operation::GetPerson => {
                expect_arity(&name, params, 1)?;
                Ok(Some(text(self.persons.read_raw(&params[0])?)))
            }

            Operation::DelPerson => {
                expect_arity(&name, params, 1)?;
                self.persons.delete(&params[0])?;
                Ok(None)
            }

            Operation::AddCard => {
                expect_arity(&name, params, 1)?;
                let card = decode_json::<Card>("card", &params[0])?;
                let siblings = Siblings {
                    accounts: Some(&self.accounts),
                    persons: Some(&self.persons),
                };
                self.cards.create(&card, &siblings)?;
                Ok(Some(card.card_number))
            }

            Operation::GetCardInfo => {
                expect_arity(&name, params, 1)?;
                let siblings = Siblings {
                    accounts: Some(&self.accounts),
                    persons: Some(&self.persons),
                };
                let details = self.cards.info(&params[0], &siblings)?;
                to_json("Card", &params[0], &details).map(Some)
            }

            Operation::DelCard => {
                expect_arity(&name, params, 1)?;
                self.cards.delete(&params[0])?;
                Ok(None)
            }
        }
    }
}

/// Read-only view of the managers a lookup may consult
pub struct Siblings<'a, S> {
    accounts: Option<&'a AccountBook<S>>,
    persons: Option<&'a PersonBook<S>>,
}

impl<S: RecordStore> Directory for Siblings<'_, S> {
    fn lookup(&self, namespace: Namespace, id: &str) -> Result<Vec<u8>, String> {
        let found = match namespace {
            Namespace::Accounts => self.accounts.map(|book| book.read_raw(id)),
            Namespace::Persons => self.persons.map(|book| book.read_raw(id)),
            Namespace::Cards => None,
        };
        match found {
            Some(Ok(bytes)) => Ok(bytes),
            Some(Err(err)) => Err(err.to_string()),
            None => Err(format!("{} are not reachable from this operation", namespace)),
        }
    }
}

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

fn to_json<T: Serialize>(entity: &'static str, id: &str, value: &T) -> LedgerResult<String> {
    serde_json::to_string(value).map_err(|e| LedgerError::Decode {
        entity,
        id: id.to_string(),
        reason: e.to_string(),
    })
}
