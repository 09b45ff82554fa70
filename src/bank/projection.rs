//! Read-only views of the store, handed to whatever presents them.

use crate::ledger::account::Account;
use crate::ledger::transaction::Transaction;
use crate::ledger::AccountId;
use crate::monetary::Monetary;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub kind: &'static str,
    pub available: Monetary,
    pub balance: Monetary,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            kind: account.kind().label(),
            available: account.available(),
            balance: account.balance(),
        }
    }
}

impl fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): available {}, balance {}",
            self.id, self.kind, self.available, self.balance
        )
    }
}

/// One line of an account's transaction history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: &'static str,
    pub name: String,
    pub origin: String,
    pub amount: String,
}

impl From<&Transaction> for HistoryEntry {
    fn from(tx: &Transaction) -> Self {
        Self {
            kind: tx.kind().label(),
            name: tx.name().to_string(),
            origin: tx.origin().to_string(),
            amount: tx.amount().to_string(),
        }
    }
}

/// Most recent transaction first.
pub fn history(account: &Account) -> Vec<HistoryEntry> {
    account
        .transactions()
        .iter()
        .rev()
        .map(HistoryEntry::from)
        .collect()
}
