use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AccountNumber, Movement, Transaction};

/// The other side of a transaction, as seen from one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "account", rename_all = "snake_case")]
pub enum RelatedParty {
    /// Money came in from outside the ledger (deposit)
    Incoming,
    /// Money left the ledger (withdrawal)
    Outgoing,
    /// This account sent a transfer to the given account
    ToAccount(AccountNumber),
    /// This account received a transfer from the given account
    FromAccount(AccountNumber),
}

impl RelatedParty {
    /// Derive the related party of `transaction` from the point of view of
    /// `viewer`. A transfer whose source is the viewer reads as outgoing, even
    /// when the destination is the viewer as well.
    pub fn for_viewer(transaction: &Transaction, viewer: AccountNumber) -> Self {
        match transaction.movement {
            Movement::Deposit { .. } => RelatedParty::Incoming,
            Movement::Withdrawal { .. } => RelatedParty::Outgoing,
            Movement::Transfer { source, dest } if source == viewer => {
                RelatedParty::ToAccount(dest)
            }
            Movement::Transfer { source, .. } => RelatedParty::FromAccount(source),
        }
    }
}

impl fmt::Display for RelatedParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelatedParty::Incoming => write!(f, "incoming"),
            RelatedParty::Outgoing => write!(f, "outgoing"),
            RelatedParty::ToAccount(n) => write!(f, "to account {}", n),
            RelatedParty::FromAccount(n) => write!(f, "from account {}", n),
        }
    }
}

/// A transaction annotated for display in one account's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub transaction: Transaction,
    pub related: RelatedParty,
}

impl HistoryEntry {
    pub fn new(transaction: Transaction, viewer: AccountNumber) -> Self {
        let related = RelatedParty::for_viewer(&transaction, viewer);
        Self {
            transaction,
            related,
        }
    }
}
