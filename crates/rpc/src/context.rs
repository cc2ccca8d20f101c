//! Application context - wires the host to journal stores on disk

use crate::config::HostConfig;
use crate::host::Host;
use snapbank_ledger::Namespace;
use snapbank_store::hash::verify_chain;
use snapbank_store::{JournalReader, JournalStore, StoreError};
use std::path::{Path, PathBuf};

/// Host over one journal directory per manager
pub struct AppContext {
    pub host: Host<JournalStore>,
    config: HostConfig,
}

impl AppContext {
    /// Open (or create) the journals under `config.data_dir` and replay them
    pub fn open(config: HostConfig) -> Result<Self, anyhow::Error> {
        std::fs::create_dir_all(&config.data_dir)?;

        let accounts = JournalStore::open(config.accounts_dir())?;
        let persons = JournalStore::open(config.persons_dir())?;
        let cards = JournalStore::open(config.cards_dir())?;

        tracing::info!(
            data_dir = %config.data_dir.display(),
            accounts = accounts.last_sequence(),
            persons = persons.last_sequence(),
            cards = cards.last_sequence(),
            "Journals replayed"
        );

        let host = Host::new(accounts, persons, cards, config.transfer);
        Ok(Self { host, config })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }
}

/// Integrity report for one manager's journal
#[derive(Debug)]
pub struct JournalAudit {
    pub namespace: Namespace,
    pub path: PathBuf,
    pub result: Result<usize, StoreError>,
}

/// Verify the hash chain of every journal without opening the stores
pub fn audit_journals(config: &HostConfig) -> Vec<JournalAudit> {
    [
        (Namespace::Accounts, config.accounts_dir()),
        (Namespace::Persons, config.persons_dir()),
        (Namespace::Cards, config.cards_dir()),
    ]
    .into_iter()
    .map(|(namespace, path)| {
        let result = audit_directory(&path);
        JournalAudit {
            namespace,
            path,
            result,
        }
    })
    .collect()
}

fn audit_directory(path: &Path) -> Result<usize, StoreError> {
    let records = JournalReader::from_directory(path)?.read_all()?;
    verify_chain(&records)?;
    Ok(records.len())
}
