//! Named operations exposed by each record manager

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Record manager an invocation is addressed to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Chaincode {
    Accounts,
    Persons,
    Cards,
}

impl Chaincode {
    /// Operations this manager answers to
    pub fn operations(self) -> impl Iterator<Item = Operation> {
        Operation::iter().filter(move |op| op.chaincode() == self)
    }
}

/// Fixed set of operations, parsed from their camelCase names
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    // Accounts
    AddAccount,
    GetAccount,
    GetBalance,
    DeleteAccount,
    Transfer,
    GetHistory,

    // Persons
    AddPerson,
    GetPerson,
    DelPerson,

    // Cards
    AddCard,
    #[strum(to_string = "getCardInfo", serialize = "getAllInfo")]
    GetCardInfo,
    DelCard,
}

impl Operation {
    pub fn chaincode(self) -> Chaincode {
        match self {
            Operation::AddAccount
            | Operation::GetAccount
            | Operation::GetBalance
            | Operation::DeleteAccount
            | Operation::Transfer
            | Operation::GetHistory => Chaincode::Accounts,
            Operation::AddPerson | Operation::GetPerson | Operation::DelPerson => {
                Chaincode::Persons
            }
            Operation::AddCard | Operation::GetCardInfo | Operation::DelCard => Chaincode::Cards,
        }
    }
}
