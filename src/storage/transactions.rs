//! Append-only transaction log over the `transactions` table.
//!
//! Rows are inserted and read, never updated or deleted.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqliteExecutor};

use crate::domain::{AccountNumber, Cents, Movement, Transaction, TransactionKind};

const TRANSACTION_COLUMNS: &str =
    "id, kind, amount_cents, timestamp, source_account, dest_account";

/// Fixed-width timestamps so that ordering by the text column is
/// chronological.
fn encode_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Append a transaction stamped with the current time.
pub async fn record<'e, E>(executor: E, movement: Movement, amount: Cents) -> Result<Transaction>
where
    E: SqliteExecutor<'e>,
{
    // Round-trip through the stored text so the returned record equals what
    // later reads will produce.
    let stamped = encode_timestamp(Utc::now());
    let timestamp = decode_timestamp(&stamped)?;

    let row = sqlx::query(
        r#"
        INSERT INTO transactions (kind, amount_cents, timestamp, source_account, dest_account)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(movement.kind().as_str())
    .bind(amount)
    .bind(&stamped)
    .bind(movement.source())
    .bind(movement.dest())
    .fetch_one(executor)
    .await
    .with_context(|| format!("Failed to record {} transaction", movement.kind()))?;

    Ok(Transaction {
        id: row.get("id"),
        movement,
        amount,
        timestamp,
    })
}

/// Transactions where the account is source or destination, newest first.
pub async fn find_by_account<'e, E>(executor: E, number: AccountNumber) -> Result<Vec<Transaction>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM transactions
        WHERE source_account = ? OR dest_account = ?
        ORDER BY timestamp DESC, id DESC
        "#,
        TRANSACTION_COLUMNS
    ))
    .bind(number)
    .bind(number)
    .fetch_all(executor)
    .await
    .with_context(|| format!("Failed to list transactions for account {}", number))?;

    rows.iter().map(row_to_transaction).collect()
}

/// The whole log in insertion order.
pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Transaction>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(&format!(
        "SELECT {} FROM transactions ORDER BY id",
        TRANSACTION_COLUMNS
    ))
    .fetch_all(executor)
    .await
    .context("Failed to list transactions")?;

    rows.iter().map(row_to_transaction).collect()
}

fn decode_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid transaction timestamp: {}", s))?
        .with_timezone(&Utc))
}

fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
    let kind_str: String = row.get("kind");
    let timestamp_str: String = row.get("timestamp");

    let kind = TransactionKind::from_str(&kind_str)
        .ok_or_else(|| anyhow!("Invalid transaction kind: {}", kind_str))?;
    let movement = Movement::from_columns(kind, row.get("source_account"), row.get("dest_account"))?;

    Ok(Transaction {
        id: row.get("id"),
        movement,
        amount: row.get("amount_cents"),
        timestamp: decode_timestamp(&timestamp_str)?,
    })
}
