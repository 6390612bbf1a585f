use std::io::Write;

use anyhow::Result;

use crate::domain::{Account, HistoryEntry, IntegrityReport, format_cents};

pub fn write_account<W: Write>(out: &mut W, account: &Account) -> Result<()> {
    writeln!(out, "Account: {}", account.number)?;
    writeln!(out, "  Holder:  {}", account.holder)?;
    writeln!(out, "  Balance: {}", format_cents(account.balance))?;
    Ok(())
}

pub fn write_accounts_table<W: Write>(out: &mut W, accounts: &[Account]) -> Result<()> {
    if accounts.is_empty() {
        writeln!(out, "No accounts found.")?;
        return Ok(());
    }

    writeln!(out, "{:<8} {:<30} {:>14}", "NUMBER", "HOLDER", "BALANCE")?;
    writeln!(out, "{}", "-".repeat(54))?;
    for account in accounts {
        writeln!(
            out,
            "{:<8} {:<30} {:>14}",
            account.number,
            account.holder,
            format_cents(account.balance)
        )?;
    }
    writeln!(out, "{}", "-".repeat(54))?;
    writeln!(out, "Total accounts: {}", accounts.len())?;
    Ok(())
}

pub fn write_history<W: Write>(out: &mut W, entries: &[HistoryEntry]) -> Result<()> {
    if entries.is_empty() {
        writeln!(out, "No transactions found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<20} {:<11} {:>14}  {}",
        "DATE", "KIND", "AMOUNT", "RELATED"
    )?;
    writeln!(out, "{}", "-".repeat(64))?;
    for entry in entries {
        let transaction = &entry.transaction;
        writeln!(
            out,
            "{:<20} {:<11} {:>14}  {}",
            transaction.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            transaction.kind(),
            format_cents(transaction.amount),
            entry.related
        )?;
    }
    Ok(())
}

pub fn write_integrity_report<W: Write>(out: &mut W, report: &IntegrityReport) -> Result<()> {
    writeln!(out, "Accounts:     {}", report.account_count)?;
    writeln!(out, "Transactions: {}", report.transaction_count)?;

    if report.is_ok() {
        writeln!(out, "Ledger is consistent.")?;
        return Ok(());
    }

    writeln!(out, "Found {} issue(s):", report.issue_count())?;
    for mismatch in &report.mismatches {
        writeln!(
            out,
            "  account {}: stored balance {} but transactions add up to {}",
            mismatch.number,
            format_cents(mismatch.stored),
            format_cents(mismatch.replayed)
        )?;
    }
    for number in &report.negative_balances {
        writeln!(out, "  account {}: negative balance", number)?;
    }
    for id in &report.invalid_amounts {
        writeln!(out, "  transaction {}: non-positive amount", id)?;
    }
    for id in &report.dangling_references {
        writeln!(out, "  transaction {}: references a missing account", id)?;
    }
    Ok(())
}
