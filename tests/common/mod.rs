// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bank_ledger::application::LedgerService;
use bank_ledger::domain::{Account, Cents};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::open(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Open an account and fund it with the given amount (skipped when zero).
pub async fn funded_account(
    service: &LedgerService,
    holder: &str,
    amount: Cents,
) -> Result<Account> {
    let account = service.open_account(holder).await?;
    if amount > 0 {
        service.deposit(account.number, amount).await?;
    }
    Ok(service.get_account(account.number).await?)
}

/// Total number of rows in the transaction log.
pub async fn log_len(service: &LedgerService) -> Result<usize> {
    Ok(service.list_transactions().await?.len())
}
