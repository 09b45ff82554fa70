use crate::monetary::Monetary;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Kind {
    Deposit,      // Money coming in from outside the bank.
    Purchase,     // Money spent by the account holder. Always negative.
    Transfer,     // One leg of a movement between two accounts.
    BankFunction, // Interest payouts and other movements the bank makes itself.
}

impl Kind {
    pub const fn label(self) -> &'static str {
        match self {
            Kind::Deposit => "Deposit",
            Kind::Purchase => "Purchase",
            Kind::Transfer => "Transfer",
            Kind::BankFunction => "Bank Function",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single entry of an account's ledger.
///
/// Transactions are append-only: once built they are handed over to an
/// account and never changed, which is why the fields are only readable
/// through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    amount: Monetary,
    kind: Kind,
    name: String,
    origin: String,
    timestamp: DateTime<Utc>,
    pending: bool,
    flagged: bool,
}

impl Transaction {
    pub fn new(
        kind: Kind,
        amount: Monetary,
        name: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            kind,
            name: name.into(),
            origin: origin.into(),
            timestamp: Utc::now(),
            pending: false,
            flagged: false,
        }
    }

    pub fn deposit(amount: Monetary) -> Self {
        Self::new(Kind::Deposit, amount, "Deposit", "Deposit")
    }

    pub fn purchase(amount: Monetary, name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self::new(Kind::Purchase, amount, name, origin)
    }

    /// One leg of a transfer. The origin is the account the money comes from,
    /// or goes to, depending on which side of the transfer this is.
    pub fn transfer(amount: Monetary, counterparty: impl Into<String>) -> Self {
        Self::new(Kind::Transfer, amount, "Transfer", counterparty)
    }

    pub fn bank_function(amount: Monetary, name: impl Into<String>) -> Self {
        Self::new(Kind::BankFunction, amount, name, "Bank")
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    pub fn with_flagged(mut self, flagged: bool) -> Self {
        self.flagged = flagged;
        self
    }

    pub fn amount(&self) -> Monetary {
        self.amount
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_flagged(&self) -> bool {
        self.flagged
    }
}

#[test]
fn test_constructors() {
    let cases = vec![
        (
            Transaction::deposit(Monetary::from_cents(1)),
            Kind::Deposit,
            1,
            "Deposit",
            "Deposit",
        ),
        (
            Transaction::purchase(Monetary::from_cents(-1001), "Test Purchase", "Test Company"),
            Kind::Purchase,
            -1001,
            "Test Purchase",
            "Test Company",
        ),
        (
            Transaction::transfer(Monetary::from_cents(-500), "s0001"),
            Kind::Transfer,
            -500,
            "Transfer",
            "s0001",
        ),
        (
            Transaction::bank_function(Monetary::from_cents(10), "Interest"),
            Kind::BankFunction,
            10,
            "Interest",
            "Bank",
        ),
    ];

    for (tx, kind, cents, name, origin) in cases {
        assert_eq!(kind, tx.kind());
        assert_eq!(Monetary::from_cents(cents), tx.amount());
        assert_eq!(name, tx.name());
        assert_eq!(origin, tx.origin());
        assert!(!tx.is_pending());
        assert!(!tx.is_flagged());
    }
}

#[test]
fn test_builders() {
    use chrono::TimeZone;

    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let tx = Transaction::deposit(Monetary::from_cents(5))
        .at(timestamp)
        .with_pending(true)
        .with_flagged(true);

    assert_eq!(timestamp, tx.timestamp());
    assert!(tx.is_pending());
    assert!(tx.is_flagged());
}
