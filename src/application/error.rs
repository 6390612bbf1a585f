use thiserror::Error;

use crate::domain::{AccountNumber, Cents, format_cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error("No account found for holder '{0}'")]
    HolderNotFound(String),

    #[error(
        "Insufficient funds in account {account}: balance {}, requested {}",
        format_cents(*.balance),
        format_cents(*.requested)
    )]
    InsufficientFunds {
        account: AccountNumber,
        balance: Cents,
        requested: Cents,
    },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl AppError {
    /// True for lookups that missed, whether by number or by holder.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::AccountNotFound(_) | AppError::HolderNotFound(_)
        )
    }

    /// Business-rule failures the user can fix by retrying with other input.
    pub fn is_validation(&self) -> bool {
        !matches!(self, AppError::Database(_))
    }
}
