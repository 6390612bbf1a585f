use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Cents, format_cents};

/// Account numbers are assigned by storage, start at 1 and only grow.
pub type AccountNumber = i64;

/// A snapshot of an account as last read from storage.
///
/// Snapshots are never written back. Balance changes go through the ledger
/// service, which persists the new value and logs the movement together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub number: AccountNumber,
    pub holder: String,
    pub balance: Cents,
}

impl Account {
    pub fn has_funds_for(&self, amount: Cents) -> bool {
        amount <= self.balance
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {} - Holder: {} - Balance: {}",
            self.number,
            self.holder,
            format_cents(self.balance)
        )
    }
}

/// Normalize a holder name, returning `None` when nothing is left after
/// trimming.
pub fn normalize_holder(holder: &str) -> Option<&str> {
    let trimmed = holder.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana(balance: Cents) -> Account {
        Account {
            number: 1,
            holder: "Ana".into(),
            balance,
        }
    }

    #[test]
    fn test_has_funds_for() {
        let account = ana(7000);
        assert!(account.has_funds_for(7000));
        assert!(account.has_funds_for(1));
        assert!(!account.has_funds_for(7001));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ana(2000).to_string(),
            "Account 1 - Holder: Ana - Balance: 20.00"
        );
    }

    #[test]
    fn test_normalize_holder() {
        assert_eq!(normalize_holder("  Ana Souza "), Some("Ana Souza"));
        assert_eq!(normalize_holder(""), None);
        assert_eq!(normalize_holder(" \t\n"), None);
    }
}
