use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{AccountNumber, Cents};

/// Transaction ids are assigned by storage.
pub type TransactionId = i64;

/// Persisted discriminator of a transaction row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
            TransactionKind::Transfer => "TRANSFER",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DEPOSIT" => Some(TransactionKind::Deposit),
            "WITHDRAWAL" => Some(TransactionKind::Withdrawal),
            "TRANSFER" => Some(TransactionKind::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which accounts a transaction touched. Each kind carries exactly the
/// endpoints it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Movement {
    Deposit {
        dest: AccountNumber,
    },
    Withdrawal {
        source: AccountNumber,
    },
    Transfer {
        source: AccountNumber,
        dest: AccountNumber,
    },
}

impl Movement {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Movement::Deposit { .. } => TransactionKind::Deposit,
            Movement::Withdrawal { .. } => TransactionKind::Withdrawal,
            Movement::Transfer { .. } => TransactionKind::Transfer,
        }
    }

    /// Account debited by this movement, if any.
    pub fn source(&self) -> Option<AccountNumber> {
        match *self {
            Movement::Deposit { .. } => None,
            Movement::Withdrawal { source } | Movement::Transfer { source, .. } => Some(source),
        }
    }

    /// Account credited by this movement, if any.
    pub fn dest(&self) -> Option<AccountNumber> {
        match *self {
            Movement::Withdrawal { .. } => None,
            Movement::Deposit { dest } | Movement::Transfer { dest, .. } => Some(dest),
        }
    }

    pub fn involves(&self, number: AccountNumber) -> bool {
        self.source() == Some(number) || self.dest() == Some(number)
    }

    /// Rebuild a movement from its flat storage columns.
    pub fn from_columns(
        kind: TransactionKind,
        source: Option<AccountNumber>,
        dest: Option<AccountNumber>,
    ) -> Result<Self, MovementShapeError> {
        match (kind, source, dest) {
            (TransactionKind::Deposit, None, Some(dest)) => Ok(Movement::Deposit { dest }),
            (TransactionKind::Withdrawal, Some(source), None) => {
                Ok(Movement::Withdrawal { source })
            }
            (TransactionKind::Transfer, Some(source), Some(dest)) => {
                Ok(Movement::Transfer { source, dest })
            }
            _ => Err(MovementShapeError {
                kind,
                source_account: source,
                dest_account: dest,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{kind} row has inconsistent endpoints (source: {source_account:?}, dest: {dest_account:?})"
)]
pub struct MovementShapeError {
    pub kind: TransactionKind,
    pub source_account: Option<AccountNumber>,
    pub dest_account: Option<AccountNumber>,
}

/// An entry of the append-only transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(flatten)]
    pub movement: Movement,
    /// Always strictly positive
    pub amount: Cents,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        self.movement.kind()
    }

    /// Signed effect of this transaction on the given account's balance.
    /// A transfer to oneself nets to zero.
    pub fn effect_on(&self, number: AccountNumber) -> Cents {
        let mut effect = 0;
        if self.movement.dest() == Some(number) {
            effect += self.amount;
        }
        if self.movement.source() == Some(number) {
            effect -= self.amount;
        }
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(movement: Movement, amount: Cents) -> Transaction {
        Transaction {
            id: 1,
            movement,
            amount,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::Transfer,
        ] {
            assert_eq!(TransactionKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(
            TransactionKind::from_str("deposit"),
            Some(TransactionKind::Deposit)
        );
        assert_eq!(TransactionKind::from_str("REFUND"), None);
    }

    #[test]
    fn test_endpoints_by_kind() {
        let deposit = Movement::Deposit { dest: 3 };
        assert_eq!((deposit.source(), deposit.dest()), (None, Some(3)));

        let withdrawal = Movement::Withdrawal { source: 3 };
        assert_eq!((withdrawal.source(), withdrawal.dest()), (Some(3), None));

        let transfer = Movement::Transfer { source: 1, dest: 2 };
        assert_eq!((transfer.source(), transfer.dest()), (Some(1), Some(2)));
        assert!(transfer.involves(1));
        assert!(transfer.involves(2));
        assert!(!transfer.involves(3));
    }

    #[test]
    fn test_from_columns_rejects_wrong_shape() {
        assert_eq!(
            Movement::from_columns(TransactionKind::Deposit, None, Some(4)),
            Ok(Movement::Deposit { dest: 4 })
        );
        assert!(Movement::from_columns(TransactionKind::Deposit, Some(4), None).is_err());
        assert!(Movement::from_columns(TransactionKind::Withdrawal, Some(4), Some(5)).is_err());
        assert!(Movement::from_columns(TransactionKind::Transfer, Some(4), None).is_err());
    }

    #[test]
    fn test_effect_on() {
        let transfer = tx(Movement::Transfer { source: 1, dest: 2 }, 5000);
        assert_eq!(transfer.effect_on(1), -5000);
        assert_eq!(transfer.effect_on(2), 5000);
        assert_eq!(transfer.effect_on(3), 0);

        let to_self = tx(Movement::Transfer { source: 1, dest: 1 }, 5000);
        assert_eq!(to_self.effect_on(1), 0);

        assert_eq!(tx(Movement::Deposit { dest: 1 }, 100).effect_on(1), 100);
        assert_eq!(tx(Movement::Withdrawal { source: 1 }, 100).effect_on(1), -100);
    }

    #[test]
    fn test_serializes_kind_inline() {
        let json = serde_json::to_value(tx(Movement::Withdrawal { source: 9 }, 250)).unwrap();
        assert_eq!(json["kind"], "WITHDRAWAL");
        assert_eq!(json["source"], 9);
        assert_eq!(json["amount"], 250);
    }
}
