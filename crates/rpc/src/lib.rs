//! SnapBank RPC - operation host and CLI
//!
//! This crate provides the dispatcher that maps named operations onto the
//! record managers, plus the CLI binary that drives it against journals on
//! disk.

pub mod config;
pub mod context;
pub mod host;
pub mod operation;
pub mod response;

pub use config::{ConfigError, HostConfig};
pub use context::{audit_journals, AppContext, JournalAudit};
pub use host::Host;
pub use operation::{Chaincode, Operation};
pub use response::{ErrorBody, Response, Status};
