use crate::ledger::transaction::Transaction;
use crate::monetary::Monetary;

use chrono::{DateTime, Utc};

use super::{Account, TransactionError};

impl Account {
    /// Record a purchase. Purchases always take money out of the account, so
    /// the recorded amount is negative whatever the sign of `amount`.
    pub fn purchase(
        &mut self,
        amount: Monetary,
        name: impl Into<String>,
        origin: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), TransactionError> {
        self.process_transaction(Transaction::purchase(-amount.abs(), name, origin).at(now))
    }
}
