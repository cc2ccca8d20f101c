//! AccountRef - the two kinds of transfer endpoint
//!
//! A transfer moves value between stored accounts, or between a stored account
//! and the issuance sentinel. The sentinel is never a stored key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reserved identifier of the issuance/sink account.
pub const ISSUANCE_ACCOUNT_ID: &str = "0";

/// Errors that can occur when parsing an account reference
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountRefError {
    #[error("Empty account id")]
    EmptyId,
}

/// Endpoint of a transfer.
///
/// # Examples
/// ```
/// use snapbank_core::AccountRef;
///
/// let issuance: AccountRef = "0".parse().unwrap();
/// assert!(issuance.is_issuance());
///
/// let real: AccountRef = "ACC-1".parse().unwrap();
/// assert_eq!(real.account_id(), Some("ACC-1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AccountRef {
    /// Unlimited source / sink of value; exempt from the funds check as source
    Issuance,
    /// A stored account, by id
    Real(String),
}

impl AccountRef {
    /// Reference a stored account. The sentinel id maps to `Issuance`.
    pub fn real(id: impl Into<String>) -> Self {
        let id = id.into();
        if id == ISSUANCE_ACCOUNT_ID {
            AccountRef::Issuance
        } else {
            AccountRef::Real(id)
        }
    }

    pub fn is_issuance(&self) -> bool {
        matches!(self, AccountRef::Issuance)
    }

    /// The stored account id, or `None` for the sentinel
    pub fn account_id(&self) -> Option<&str> {
        match self {
            AccountRef::Issuance => None,
            AccountRef::Real(id) => Some(id.as_str()),
        }
    }

    /// Identifier as it appears on the wire
    pub fn as_str(&self) -> &str {
        match self {
            AccountRef::Issuance => ISSUANCE_ACCOUNT_ID,
            AccountRef::Real(id) => id.as_str(),
        }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountRef {
    type Err = AccountRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AccountRefError::EmptyId);
        }
        Ok(Self::real(s))
    }
}

impl TryFrom<String> for AccountRef {
    type Error = AccountRefError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountRef> for String {
    fn from(r: AccountRef) -> Self {
        r.as_str().to_string()
    }
}
