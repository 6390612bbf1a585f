use tracing::{debug, info, warn};

use crate::domain::{
    Account, AccountNumber, Cents, HistoryEntry, IntegrityReport, Movement, Transaction,
    build_integrity_report, normalize_holder,
};
use crate::storage::{Repository, accounts, transactions};

use super::AppError;

/// Application service providing the ledger operations.
/// This is the only component that changes balances or appends to the
/// transaction log; any client (CLI, interactive menu, tests) goes through it.
#[derive(Clone)]
pub struct LedgerService {
    repo: Repository,
}

/// Outcome of a committed transfer.
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub transaction: Transaction,
    pub source: Account,
    pub dest: Account,
}

/// Outcome of a committed deposit or withdrawal.
#[derive(Debug, Clone)]
pub struct MovementResult {
    pub transaction: Transaction,
    pub account: Account,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open (creating if needed) the database file at the given path and
    /// make sure the schema exists.
    pub async fn open(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        debug!(database = database_path, "ledger opened");
        Ok(Self::new(repo))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    // ========================
    // Account operations
    // ========================

    /// Open a new account with a zero balance.
    pub async fn open_account(&self, holder: &str) -> Result<Account, AppError> {
        let holder = normalize_holder(holder).ok_or_else(|| {
            AppError::InvalidInput("Holder name cannot be empty".to_string())
        })?;

        let account = accounts::create(self.repo.pool(), holder).await?;
        info!(number = account.number, holder = %account.holder, "account opened");
        Ok(account)
    }

    /// Get an account by number.
    pub async fn get_account(&self, number: AccountNumber) -> Result<Account, AppError> {
        debug!(number, "looking up account");
        accounts::get_by_number(self.repo.pool(), number)
            .await?
            .ok_or(AppError::AccountNotFound(number))
    }

    /// Get the most recently opened account of a holder.
    pub async fn get_latest_account_by_holder(&self, holder: &str) -> Result<Account, AppError> {
        accounts::get_latest_by_holder(self.repo.pool(), holder.trim())
            .await?
            .ok_or_else(|| AppError::HolderNotFound(holder.to_string()))
    }

    pub async fn balance(&self, number: AccountNumber) -> Result<Cents, AppError> {
        Ok(self.get_account(number).await?.balance)
    }

    /// List all accounts, ascending by number.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        Ok(accounts::list_all(self.repo.pool()).await?)
    }

    // ========================
    // Money movements
    // ========================

    /// Credit an account and log a DEPOSIT.
    pub async fn deposit(
        &self,
        number: AccountNumber,
        amount: Cents,
    ) -> Result<MovementResult, AppError> {
        validate_amount(amount)?;

        let mut tx = self.repo.begin().await?;

        let account = accounts::get_by_number(&mut *tx, number)
            .await?
            .ok_or(AppError::AccountNotFound(number))?;
        let new_balance = account.balance.checked_add(amount).ok_or_else(|| {
            AppError::InvalidAmount(format!("Deposit would overflow account {}", number))
        })?;

        accounts::update_balance(&mut *tx, number, new_balance).await?;
        let transaction =
            transactions::record(&mut *tx, Movement::Deposit { dest: number }, amount).await?;

        tx.commit().await.map_err(anyhow::Error::from)?;

        info!(number, amount, balance = new_balance, "deposit committed");
        Ok(MovementResult {
            transaction,
            account: Account {
                balance: new_balance,
                ..account
            },
        })
    }

    /// Debit an account and log a WITHDRAWAL.
    pub async fn withdraw(
        &self,
        number: AccountNumber,
        amount: Cents,
    ) -> Result<MovementResult, AppError> {
        validate_amount(amount)?;

        let mut tx = self.repo.begin().await?;

        let account = accounts::get_by_number(&mut *tx, number)
            .await?
            .ok_or(AppError::AccountNotFound(number))?;
        ensure_funds(&account, amount)?;

        let new_balance = account.balance - amount;
        accounts::update_balance(&mut *tx, number, new_balance).await?;
        let transaction =
            transactions::record(&mut *tx, Movement::Withdrawal { source: number }, amount)
                .await?;

        tx.commit().await.map_err(anyhow::Error::from)?;

        info!(number, amount, balance = new_balance, "withdrawal committed");
        Ok(MovementResult {
            transaction,
            account: Account {
                balance: new_balance,
                ..account
            },
        })
    }

    /// Move money between two accounts and log a single TRANSFER.
    ///
    /// Both balance updates and the log entry share one database transaction.
    /// The destination is read after the source has been debited, so a
    /// transfer to the same account debits and credits that row in turn and
    /// leaves its balance unchanged.
    pub async fn transfer(
        &self,
        source_number: AccountNumber,
        dest_number: AccountNumber,
        amount: Cents,
    ) -> Result<TransferResult, AppError> {
        validate_amount(amount)?;

        let mut tx = self.repo.begin().await?;

        let source = accounts::get_by_number(&mut *tx, source_number)
            .await?
            .ok_or(AppError::AccountNotFound(source_number))?;
        if !accounts::exists(&mut *tx, dest_number).await? {
            return Err(AppError::AccountNotFound(dest_number));
        }
        ensure_funds(&source, amount)?;

        let debited = source.balance - amount;
        accounts::update_balance(&mut *tx, source_number, debited).await?;

        let dest = accounts::get_by_number(&mut *tx, dest_number)
            .await?
            .ok_or(AppError::AccountNotFound(dest_number))?;
        let credited = dest.balance.checked_add(amount).ok_or_else(|| {
            AppError::InvalidAmount(format!("Transfer would overflow account {}", dest_number))
        })?;
        accounts::update_balance(&mut *tx, dest_number, credited).await?;

        let transaction = transactions::record(
            &mut *tx,
            Movement::Transfer {
                source: source_number,
                dest: dest_number,
            },
            amount,
        )
        .await?;

        // Snapshots as of the commit, in case source and destination are the same row
        let source = accounts::get_by_number(&mut *tx, source_number)
            .await?
            .ok_or(AppError::AccountNotFound(source_number))?;
        let dest = Account {
            balance: credited,
            ..dest
        };

        tx.commit().await.map_err(anyhow::Error::from)?;

        info!(
            source = source_number,
            dest = dest_number,
            amount,
            "transfer committed"
        );
        Ok(TransferResult {
            transaction,
            source,
            dest,
        })
    }

    // ========================
    // History and verification
    // ========================

    /// Transactions touching the account, newest first, each annotated with
    /// the other party from this account's point of view.
    pub async fn history(&self, number: AccountNumber) -> Result<Vec<HistoryEntry>, AppError> {
        if !accounts::exists(self.repo.pool(), number).await? {
            return Err(AppError::AccountNotFound(number));
        }

        let entries = transactions::find_by_account(self.repo.pool(), number)
            .await?
            .into_iter()
            .map(|transaction| HistoryEntry::new(transaction, number))
            .collect();
        Ok(entries)
    }

    /// The full transaction log, oldest first.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(transactions::list_all(self.repo.pool()).await?)
    }

    /// Replay the log against the stored balances.
    pub async fn verify(&self) -> Result<IntegrityReport, AppError> {
        // One snapshot for both reads
        let mut tx = self.repo.begin().await?;
        let all_accounts = accounts::list_all(&mut *tx).await?;
        let log = transactions::list_all(&mut *tx).await?;
        tx.rollback().await.map_err(anyhow::Error::from)?;

        let report = build_integrity_report(&all_accounts, &log);
        for mismatch in &report.mismatches {
            warn!(
                number = mismatch.number,
                stored = mismatch.stored,
                replayed = mismatch.replayed,
                "stored balance disagrees with transaction log"
            );
        }
        Ok(report)
    }
}

fn validate_amount(amount: Cents) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidAmount(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn ensure_funds(account: &Account, amount: Cents) -> Result<(), AppError> {
    if !account.has_funds_for(amount) {
        return Err(AppError::InsufficientFunds {
            account: account.number,
            balance: account.balance,
            requested: amount,
        });
    }
    Ok(())
}
