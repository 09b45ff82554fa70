use crate::ledger::transaction::Transaction;
use crate::monetary::Monetary;

use chrono::{DateTime, Utc};

use super::{Account, TransactionError};

impl Account {
    /// Debit the outgoing leg of a transfer, tagged with this account's id.
    ///
    /// Returns the amount the receiving account should be credited with.
    /// Note: the amount is returned even when the debit wasn't recorded (a
    /// zero amount), so the two legs of a transfer are not atomic. Callers
    /// applying the credit leg must not treat a zero amount as a success.
    pub fn send_transfer(&mut self, amount: Monetary, now: DateTime<Utc>) -> Monetary {
        let amount = amount.abs();
        let debit = Transaction::transfer(-amount, self.id.clone()).at(now);

        if let Err(err) = self.process_transaction(debit) {
            tracing::debug!(account = %self.id, %amount, %err, "outgoing transfer not recorded");
        }

        amount
    }

    /// Credit the incoming leg of a transfer, tagged with the sending account.
    pub fn receive_transfer(
        &mut self,
        amount: Monetary,
        counterparty: &str,
        now: DateTime<Utc>,
    ) -> Result<(), TransactionError> {
        if !amount.is_positive() {
            return Err(TransactionError::NonPositiveAmount(amount));
        }

        self.process_transaction(Transaction::transfer(amount, counterparty).at(now))
    }
}
