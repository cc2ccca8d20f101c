//! SnapBank Core - Domain types
//!
//! This crate contains the fundamental types shared by every record manager:
//! - `Amount`: Non-negative decimal wrapper for transfer amounts
//! - `AccountRef`: Either a stored account or the issuance sentinel

pub mod account_ref;
pub mod amount;

pub use account_ref::{AccountRef, AccountRefError, ISSUANCE_ACCOUNT_ID};
pub use amount::{Amount, AmountError};
