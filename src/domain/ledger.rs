use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Account, AccountNumber, Cents, Transaction};

/// Replay the log to get the balance an account should have.
/// Balance = deposits + transfers in - withdrawals - transfers out
pub fn replay_balance(number: AccountNumber, transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .map(|transaction| transaction.effect_on(number))
        .sum()
}

/// Replay the whole log at once. Accounts with no transactions are absent
/// from the map (their expected balance is 0).
pub fn replay_all_balances(transactions: &[Transaction]) -> HashMap<AccountNumber, Cents> {
    let mut balances: HashMap<AccountNumber, Cents> = HashMap::new();

    for transaction in transactions {
        if let Some(source) = transaction.movement.source() {
            *balances.entry(source).or_insert(0) -= transaction.amount;
        }
        if let Some(dest) = transaction.movement.dest() {
            *balances.entry(dest).or_insert(0) += transaction.amount;
        }
    }

    balances
}

/// An account whose stored balance disagrees with its transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceMismatch {
    pub number: AccountNumber,
    pub stored: Cents,
    pub replayed: Cents,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub account_count: usize,
    pub transaction_count: usize,
    pub mismatches: Vec<BalanceMismatch>,
    pub negative_balances: Vec<AccountNumber>,
    /// Transactions with an amount <= 0
    pub invalid_amounts: Vec<i64>,
    /// Transactions referencing an account that does not exist
    pub dangling_references: Vec<i64>,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
            && self.negative_balances.is_empty()
            && self.invalid_amounts.is_empty()
            && self.dangling_references.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.mismatches.len()
            + self.negative_balances.len()
            + self.invalid_amounts.len()
            + self.dangling_references.len()
    }
}

pub fn build_integrity_report(accounts: &[Account], transactions: &[Transaction]) -> IntegrityReport {
    let replayed = replay_all_balances(transactions);

    let mismatches = accounts
        .iter()
        .filter_map(|account| {
            let expected = replayed.get(&account.number).copied().unwrap_or(0);
            (expected != account.balance).then(|| BalanceMismatch {
                number: account.number,
                stored: account.balance,
                replayed: expected,
            })
        })
        .collect();

    let negative_balances = accounts
        .iter()
        .filter(|account| account.balance < 0)
        .map(|account| account.number)
        .collect();

    let invalid_amounts = transactions
        .iter()
        .filter(|transaction| transaction.amount <= 0)
        .map(|transaction| transaction.id)
        .collect();

    let known = |number: Option<AccountNumber>| {
        number.is_none_or(|n| accounts.iter().any(|account| account.number == n))
    };
    let dangling_references = transactions
        .iter()
        .filter(|transaction| {
            !known(transaction.movement.source()) || !known(transaction.movement.dest())
        })
        .map(|transaction| transaction.id)
        .collect();

    IntegrityReport {
        account_count: accounts.len(),
        transaction_count: transactions.len(),
        mismatches,
        negative_balances,
        invalid_amounts,
        dangling_references,
    }
}
