use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

use crate::application::LedgerService;
use crate::domain::{AccountNumber, Cents, format_cents, parse_cents};

mod menu;
mod render;

pub use menu::run_menu;
pub use render::*;

/// Bank ledger - accounts, deposits, withdrawals and transfers
#[derive(Parser)]
#[command(name = "bank-ledger")]
#[command(about = "A single-user banking ledger backed by SQLite")]
#[command(version)]
pub struct Cli {
    /// Database file path (created on first use)
    #[arg(short, long, env = "BANK_LEDGER_DB", default_value = "ledger.db")]
    pub database: String,

    /// Enable verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a new account with a zero balance
    Open {
        /// Account holder's full name
        holder: String,
    },

    /// List all accounts
    Accounts {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show an account
    Show {
        /// Account number
        number: AccountNumber,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the current balance of an account
    Balance {
        /// Account number
        number: AccountNumber,
    },

    /// Show the transactions of an account, newest first
    History {
        /// Account number
        number: AccountNumber,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Deposit money into an account
    Deposit {
        /// Account number
        number: AccountNumber,

        /// Amount (e.g., "100.00" or "100")
        amount: String,
    },

    /// Withdraw money from an account
    Withdraw {
        /// Account number
        number: AccountNumber,

        /// Amount (e.g., "30.00" or "30")
        amount: String,
    },

    /// Transfer money between two accounts
    Transfer {
        /// Amount to transfer (e.g., "50.00" or "50")
        amount: String,

        /// Source account number
        #[arg(long)]
        from: AccountNumber,

        /// Destination account number
        #[arg(long)]
        to: AccountNumber,
    },

    /// Check stored balances against the transaction log
    Verify,

    /// Export data as CSV (accounts, transactions) or JSON (full)
    Export {
        /// What to export: accounts, transactions, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Interactive numbered menu
    Menu,
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn parse_amount(amount: &str) -> Result<Cents> {
    parse_cents(amount).context("Invalid amount format. Use '50.00' or '50'")
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let service = LedgerService::open(&self.database).await?;
        let mut out = io::stdout();

        match self.command {
            Commands::Open { holder } => {
                let account = service.open_account(&holder).await?;
                writeln!(out, "Account opened.")?;
                write_account(&mut out, &account)?;
            }

            Commands::Accounts { json } => {
                let accounts = service.list_accounts().await?;
                if json {
                    serde_json::to_writer_pretty(&mut out, &accounts)?;
                    writeln!(out)?;
                } else {
                    write_accounts_table(&mut out, &accounts)?;
                }
            }

            Commands::Show { number, json } => {
                let account = service.get_account(number).await?;
                if json {
                    serde_json::to_writer_pretty(&mut out, &account)?;
                    writeln!(out)?;
                } else {
                    write_account(&mut out, &account)?;
                }
            }

            Commands::Balance { number } => {
                let balance = service.balance(number).await?;
                writeln!(out, "{}", format_cents(balance))?;
            }

            Commands::History { number, json } => {
                let entries = service.history(number).await?;
                if json {
                    serde_json::to_writer_pretty(&mut out, &entries)?;
                    writeln!(out)?;
                } else {
                    writeln!(out, "History of account {}:", number)?;
                    write_history(&mut out, &entries)?;
                }
            }

            Commands::Deposit { number, amount } => {
                let amount = parse_amount(&amount)?;
                let result = service.deposit(number, amount).await?;
                writeln!(
                    out,
                    "Deposited {} into account {}. New balance: {}",
                    format_cents(result.transaction.amount),
                    number,
                    format_cents(result.account.balance)
                )?;
            }

            Commands::Withdraw { number, amount } => {
                let amount = parse_amount(&amount)?;
                let result = service.withdraw(number, amount).await?;
                writeln!(
                    out,
                    "Withdrew {} from account {}. New balance: {}",
                    format_cents(result.transaction.amount),
                    number,
                    format_cents(result.account.balance)
                )?;
            }

            Commands::Transfer { amount, from, to } => {
                let amount = parse_amount(&amount)?;
                let result = service.transfer(from, to, amount).await?;
                writeln!(
                    out,
                    "Transferred {} from account {} to account {} (transaction {})",
                    format_cents(result.transaction.amount),
                    from,
                    to,
                    result.transaction.id
                )?;
                writeln!(
                    out,
                    "  New balance of account {}: {}",
                    from,
                    format_cents(result.source.balance)
                )?;
            }

            Commands::Verify => {
                let report = service.verify().await?;
                write_integrity_report(&mut out, &report)?;
                if !report.is_ok() {
                    anyhow::bail!("Ledger verification failed");
                }
            }

            Commands::Export {
                export_type,
                output,
            } => {
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }

            Commands::Menu => {
                run_menu(&service, io::stdin().lock(), &mut out).await?;
            }
        }

        Ok(())
    }
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(io::stdout()),
    };

    match export_type {
        "accounts" => {
            let count = exporter.export_accounts_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} accounts", count);
            }
        }
        "transactions" => {
            let count = exporter.export_transactions_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported {} accounts and {} transactions",
                    snapshot.accounts.len(),
                    snapshot.transactions.len()
                );
            }
        }
        other => anyhow::bail!(
            "Unknown export type '{}'. Valid types: accounts, transactions, full",
            other
        ),
    }

    Ok(())
}
