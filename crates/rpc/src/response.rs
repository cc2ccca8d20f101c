//! Response envelope returned by every invocation

use serde::{Deserialize, Serialize};
use snapbank_ledger::{ErrorKind, LedgerError, LedgerResult};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success(payload: Option<String>) -> Self {
        Self {
            status: Status::Success,
            payload,
            error: None,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            payload: None,
            error: Some(ErrorBody {
                kind,
                message: message.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Kind of the failure, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}

impl From<&LedgerError> for Response {
    fn from(err: &LedgerError) -> Self {
        Response::error(err.kind(), err.to_string())
    }
}

impl From<LedgerResult<Option<String>>> for Response {
    fn from(result: LedgerResult<Option<String>>) -> Self {
        match result {
            Ok(payload) => Response::success(payload),
            Err(err) => Response::from(&err),
        }
    }
}
