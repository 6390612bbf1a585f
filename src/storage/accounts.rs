//! Account store. Plain reads and writes over the `accounts` table; no
//! business rules live here.
//!
//! Every function accepts any SQLite executor, so callers pass the pool for
//! standalone reads or `&mut *tx` to take part in a database transaction.

use anyhow::{Context, Result};
use sqlx::{Row, SqliteExecutor};

use crate::domain::{Account, AccountNumber, Cents};

const ACCOUNT_COLUMNS: &str = "number, holder, balance_cents";

/// Insert a new account with a zero balance and return it with its
/// assigned number.
pub async fn create<'e, E>(executor: E, holder: &str) -> Result<Account>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(&format!(
        "INSERT INTO accounts (holder, balance_cents) VALUES (?, 0) RETURNING {}",
        ACCOUNT_COLUMNS
    ))
    .bind(holder)
    .fetch_one(executor)
    .await
    .context("Failed to create account")?;

    Ok(row_to_account(&row))
}

pub async fn get_by_number<'e, E>(executor: E, number: AccountNumber) -> Result<Option<Account>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(&format!(
        "SELECT {} FROM accounts WHERE number = ?",
        ACCOUNT_COLUMNS
    ))
    .bind(number)
    .fetch_optional(executor)
    .await
    .with_context(|| format!("Failed to fetch account {}", number))?;

    Ok(row.as_ref().map(row_to_account))
}

/// The most recently opened account whose holder matches exactly.
pub async fn get_latest_by_holder<'e, E>(executor: E, holder: &str) -> Result<Option<Account>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(&format!(
        "SELECT {} FROM accounts WHERE holder = ? ORDER BY number DESC LIMIT 1",
        ACCOUNT_COLUMNS
    ))
    .bind(holder)
    .fetch_optional(executor)
    .await
    .context("Failed to fetch account by holder")?;

    Ok(row.as_ref().map(row_to_account))
}

/// Overwrite the stored balance. The caller has already validated it.
pub async fn update_balance<'e, E>(executor: E, number: AccountNumber, balance: Cents) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE accounts SET balance_cents = ? WHERE number = ?")
        .bind(balance)
        .bind(number)
        .execute(executor)
        .await
        .with_context(|| format!("Failed to update balance of account {}", number))?;

    if result.rows_affected() != 1 {
        anyhow::bail!("Balance update matched no row for account {}", number);
    }
    Ok(())
}

pub async fn exists<'e, E>(executor: E, number: AccountNumber) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM accounts WHERE number = ?) AS found")
        .bind(number)
        .fetch_one(executor)
        .await
        .context("Failed to check account existence")?;

    Ok(row.get::<i64, _>("found") != 0)
}

/// All accounts, ascending by number.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Account>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(&format!(
        "SELECT {} FROM accounts ORDER BY number",
        ACCOUNT_COLUMNS
    ))
    .fetch_all(executor)
    .await
    .context("Failed to list accounts")?;

    Ok(rows.iter().map(row_to_account).collect())
}

fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Account {
    Account {
        number: row.get("number"),
        holder: row.get("holder"),
        balance: row.get("balance_cents"),
    }
}
