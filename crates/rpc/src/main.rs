//! SnapBank CLI - Main entry point

use clap::{Parser, Subcommand};
use snapbank_ledger::HistoryEntry;
use snapbank_rpc::{audit_journals, AppContext, HostConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snapbank")]
#[command(about = "SnapBank - versioned account ledger", long_about = None)]
struct Cli {
    /// Data directory path (overrides SNAPBANK_DATA_DIR)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Reject transfers of exactly zero
    #[arg(long)]
    deny_zero_transfers: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invoke a named operation on a record manager
    Invoke {
        /// accounts, persons or cards
        chaincode: String,
        /// Operation name, e.g. transfer
        operation: String,
        /// Operation parameters
        params: Vec<String>,
    },

    /// Show the balance history of an account
    History {
        /// Account number
        account: String,
    },

    /// Audit every journal (verify hash chains)
    Audit,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = HostConfig::from_env()?;
    if let Some(data) = cli.data {
        config.data_dir = data;
    }
    if cli.deny_zero_transfers {
        config.transfer.allow_zero_amount = false;
    }

    match cli.command {
        Commands::Invoke {
            chaincode,
            operation,
            params,
        } => {
            let mut ctx = AppContext::open(config)?;
            let response = ctx.host.invoke(&chaincode, &operation, &params);
            drop(ctx);

            match response.error {
                None => {
                    if let Some(payload) = response.payload {
                        println!("{}", payload);
                    }
                }
                Some(error) => {
                    eprintln!("{}: {}", error.kind, error.message);
                    std::process::exit(1);
                }
            }
        }

        Commands::History { account } => {
            let ctx = AppContext::open(config)?;
            let entries: Vec<HistoryEntry> = ctx.host.accounts().history(&account)?.collect_all()?;

            println!("📒 History of {} ({} entries)", account, entries.len());
            for entry in &entries {
                println!(
                    "   {}  {:>+14}  {:>14}  {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.delta,
                    entry.balance,
                    entry.tx_id
                );
            }
        }

        Commands::Audit => {
            let mut broken = false;
            for audit in audit_journals(&config) {
                match audit.result {
                    Ok(count) => {
                        println!("✅ {} journal verified ({} records)", audit.namespace, count);
                    }
                    Err(e) => {
                        broken = true;
                        println!(
                            "❌ {} journal at {} is broken: {}",
                            audit.namespace,
                            audit.path.display(),
                            e
                        );
                    }
                }
            }
            if broken {
                anyhow::bail!("journal audit failed");
            }
        }
    }

    Ok(())
}
