use crate::ledger::transaction::Transaction;
use crate::monetary::Monetary;

use chrono::{DateTime, Utc};

use super::{Account, TransactionError};

impl Account {
    /// Record money coming into the account. Only an amount of exactly zero
    /// cents is rejected.
    pub fn deposit(&mut self, amount: Monetary, now: DateTime<Utc>) -> Result<(), TransactionError> {
        self.process_transaction(Transaction::deposit(amount).at(now))
    }
}
