use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Account, Transaction, format_cents};

/// Everything in the ledger, as written by a full JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for writing ledger data as CSV or JSON.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export accounts with their current balances.
    pub async fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.list_accounts().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["number", "holder", "balance"])?;
        for account in &accounts {
            csv_writer.write_record([
                account.number.to_string(),
                account.holder.clone(),
                format_cents(account.balance),
            ])?;
        }

        csv_writer.flush()?;
        Ok(accounts.len())
    }

    /// Export the transaction log, oldest first. Empty cells stand for
    /// endpoints the transaction kind does not have.
    pub async fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.list_transactions().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "timestamp",
            "kind",
            "amount",
            "source_account",
            "dest_account",
        ])?;

        for transaction in &transactions {
            csv_writer.write_record([
                transaction.id.to_string(),
                transaction.timestamp.to_rfc3339(),
                transaction.kind().to_string(),
                format_cents(transaction.amount),
                transaction
                    .movement
                    .source()
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                transaction
                    .movement
                    .dest()
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export accounts and the full log as one JSON document.
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            accounts: self.service.list_accounts().await?,
            transactions: self.service.list_transactions().await?,
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}
