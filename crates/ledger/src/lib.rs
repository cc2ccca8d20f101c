//! SnapBank Ledger - account model, transfers and history
//!
//! This is the HEART of SnapBank. Every balance change goes through this crate.
//!
//! # Key Types
//! - `Record` / `RecordBook`: snapshot CRUD shared by every record manager
//! - `Account` / `AccountBook`: balance-bearing records
//! - `TransferEngine`: validated, all-or-nothing value movement
//! - `History`: signed deltas derived from a key's snapshot history
//! - `Directory`: existence checks against sibling record managers

pub mod account;
pub mod directory;
pub mod error;
pub mod history;
pub mod record;
pub mod transfer;
pub mod validation;

pub use account::{Account, AccountBook};
pub use directory::{Directory, Namespace};
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use history::{reconstruct_history, History, HistoryEntry};
pub use record::{Record, RecordBook};
pub use transfer::{TransferEngine, TransferPolicy, TransferReceipt, TransferRequest};
