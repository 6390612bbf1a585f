use anyhow::{Context, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::MIGRATION_001_INITIAL;

/// Owns the SQLite pool. Reads go straight to the pool; anything that
/// writes more than one row runs inside a transaction from [`Repository::begin`].
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database {}", database_url))?;
        Ok(Self::new(pool))
    }

    /// Create the tables if they are missing. Safe to run repeatedly.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Connect and bootstrap the schema.
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a database transaction. Dropping it without calling `commit`
    /// rolls back every write made through it.
    ///
    /// The write lock is taken up front (`BEGIN IMMEDIATE`), so concurrent
    /// callers queue on the busy timeout instead of failing when a read
    /// lock cannot be upgraded.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .context("Failed to begin database transaction")
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
