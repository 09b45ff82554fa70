mod deposit;
mod purchase;
mod transfer;

use super::kind::{AccountKind, InterestConfig};
use super::transaction::Transaction;
use super::AccountId;
use crate::list::{IndexedList, Keyed};
use crate::monetary::Monetary;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Note: I chose to keep errors simple here.
/// A rejected transaction leaves the account untouched, and callers only need
/// to know why it was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// The amount resolves to exactly zero cents.
    #[error("transaction amount is zero")]
    ZeroAmount,

    /// An incoming transfer must move a positive amount.
    #[error("transfer amount {0} is not positive")]
    NonPositiveAmount(Monetary),

    /// Recording the transaction would take the balance out of range.
    #[error("transaction amount {0} overflows the account balance")]
    Overflow(Monetary),
}

/// An account is a ledger: an append-only list of transactions, from which the
/// balance and the available funds are derived.
///
/// Both derived amounts are folded again from the whole transaction list after
/// every mutation, instead of being adjusted incrementally.
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    kind: AccountKind,
    transactions: IndexedList<Transaction>,
    balance: Monetary,
    available: Monetary,
    interest: InterestConfig,

    // Bookkeeping for the interest engine.
    pub(crate) interest_accrued: Monetary,
    pub(crate) last_interest_time: DateTime<Utc>,
    pub(crate) last_payout_time: DateTime<Utc>,
}

impl Account {
    /// Open an account with its seed deposit. An account is never empty, so a
    /// seed that resolves to zero cents is rejected.
    pub fn open(
        id: impl Into<AccountId>,
        kind: AccountKind,
        seed: Monetary,
        now: DateTime<Utc>,
    ) -> Result<Self, TransactionError> {
        let mut account = Self {
            id: id.into(),
            kind,
            transactions: IndexedList::new(),
            balance: Monetary::ZERO,
            available: Monetary::ZERO,
            interest: kind.profile().interest,
            interest_accrued: Monetary::ZERO,
            last_interest_time: now,
            last_payout_time: now,
        };
        account.process_transaction(Transaction::deposit(seed).at(now))?;

        Ok(account)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn transactions(&self) -> &IndexedList<Transaction> {
        &self.transactions
    }

    /// Sum of every transaction.
    pub fn balance(&self) -> Monetary {
        self.balance
    }

    /// Sum of every transaction that is no longer pending.
    pub fn available(&self) -> Monetary {
        self.available
    }

    pub fn interest(&self) -> InterestConfig {
        self.interest
    }

    pub fn interest_accrued(&self) -> Monetary {
        self.interest_accrued
    }

    pub fn last_interest_time(&self) -> DateTime<Utc> {
        self.last_interest_time
    }

    pub fn last_payout_time(&self) -> DateTime<Utc> {
        self.last_payout_time
    }

    /// Every mutation of the account goes through here. A rejected transaction
    /// leaves the ledger untouched.
    pub fn process_transaction(&mut self, tx: Transaction) -> Result<(), TransactionError> {
        if tx.amount().is_zero() {
            return Err(TransactionError::ZeroAmount);
        }

        let (balance, available) = fold(self.transactions.iter().chain(std::iter::once(&tx)))
            .ok_or(TransactionError::Overflow(tx.amount()))?;

        tracing::debug!(
            account = %self.id,
            kind = %tx.kind(),
            amount = %tx.amount(),
            "recording transaction"
        );
        self.transactions.push(tx);
        self.balance = balance;
        self.available = available;

        Ok(())
    }
}

// (balance, available) over the whole ledger, or None if either sum overflows.
fn fold<'a>(mut transactions: impl Iterator<Item = &'a Transaction>) -> Option<(Monetary, Monetary)> {
    transactions.try_fold((Monetary::ZERO, Monetary::ZERO), |(balance, available), tx| {
        let balance = balance.checked_add(tx.amount())?;
        let available = if tx.is_pending() {
            available
        } else {
            available.checked_add(tx.amount())?
        };
        Some((balance, available))
    })
}

impl Keyed for Account {
    fn key(&self) -> &str {
        &self.id
    }
}
