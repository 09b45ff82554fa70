use crate::ledger::kind::AccountKind;
use crate::ledger::{AccountId, Username};
use crate::monetary::Monetary;

use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("malformed CSV: {0}")]
    Csv(String),
    #[error("invalid record: {0}")]
    Format(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// One operation against the bank, as read from a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Without a deposit, the configured opening deposit is used.
    CreateCustomer {
        username: Username,
        credential: String,
        account: AccountId,
        deposit: Option<Monetary>,
    },
    CreateEmployee {
        username: Username,
        credential: String,
    },
    OpenAccount {
        username: Username,
        account: AccountId,
        kind: AccountKind,
        deposit: Option<Monetary>,
    },
    Deposit {
        username: Username,
        account: AccountId,
        amount: Monetary,
    },
    Transfer {
        username: Username,
        from: AccountId,
        to: AccountId,
        amount: Monetary,
    },
    Purchase {
        username: Username,
        account: AccountId,
        amount: Monetary,
        name: String,
        origin: String,
    },
    /// Advance the clock, then run the bank processes.
    Process { hours: i64 },
}

// A malformed row doesn't abort the batch: it is reported on the error channel
// and the rows after it are still read.
pub fn parse(
    input_stream: (impl std::io::Read + Send + 'static),
) -> (Receiver<Operation>, Receiver<Error>) {
    let (operation_tx, operation_rx): (Sender<Operation>, Receiver<Operation>) = mpsc::channel();
    let (error_tx, error_rx): (Sender<Error>, Receiver<Error>) = mpsc::channel();

    let buffered = std::io::BufReader::new(input_stream);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(buffered);

    // Moving to a new thread so we can start processing the operations immediately.
    std::thread::spawn(move || {
        for record in reader.deserialize::<OperationRecord>() {
            let sent = match convert(record) {
                Ok(operation) => operation_tx.send(operation).is_ok(),
                Err(err) => error_tx.send(err).is_ok(),
            };
            // Nobody is listening anymore.
            if !sent {
                break;
            }
        }
    });

    (operation_rx, error_rx)
}

fn convert(record: Result<OperationRecord, csv::Error>) -> Result<Operation, Error> {
    Operation::try_from(record?).map_err(Error::Format)
}

// Every column but `op` is optional at the CSV level, since each operation
// only uses some of them. Which ones are required is checked when converting
// into an Operation.
#[derive(Debug, Deserialize)]
pub struct OperationRecord {
    op: OperationRecordType,
    user: Option<String>,
    credential: Option<String>,
    account: Option<String>,
    target: Option<String>,
    kind: Option<String>,
    amount: Option<Decimal>,
    name: Option<String>,
    origin: Option<String>,
    hours: Option<i64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationRecordType {
    Customer,
    Employee,
    Open,
    Deposit,
    Transfer,
    Purchase,
    Process,
}

impl OperationRecordType {
    fn name(self) -> &'static str {
        match self {
            OperationRecordType::Customer => "customer",
            OperationRecordType::Employee => "employee",
            OperationRecordType::Open => "open",
            OperationRecordType::Deposit => "deposit",
            OperationRecordType::Transfer => "transfer",
            OperationRecordType::Purchase => "purchase",
            OperationRecordType::Process => "process",
        }
    }
}

fn required<T>(field: Option<T>, column: &str, op: OperationRecordType) -> Result<T, String> {
    field.ok_or_else(|| format!("missing {} for {}", column, op.name()))
}

fn monetary(amount: Decimal) -> Result<Monetary, String> {
    Monetary::try_from(amount).map_err(|err| err.to_string())
}

impl TryFrom<OperationRecord> for Operation {
    type Error = String;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        let op = record.op;
        let amount = || required(record.amount, "amount", op).and_then(monetary);
        let deposit = || record.amount.map(monetary).transpose();

        let operation = match op {
            OperationRecordType::Customer => Operation::CreateCustomer {
                username: required(record.user.clone(), "user", op)?,
                credential: required(record.credential.clone(), "credential", op)?,
                account: required(record.account.clone(), "account", op)?,
                deposit: deposit()?,
            },
            OperationRecordType::Employee => Operation::CreateEmployee {
                username: required(record.user.clone(), "user", op)?,
                credential: required(record.credential.clone(), "credential", op)?,
            },
            OperationRecordType::Open => Operation::OpenAccount {
                username: required(record.user.clone(), "user", op)?,
                account: required(record.account.clone(), "account", op)?,
                kind: required(record.kind.as_deref(), "kind", op)?.parse::<AccountKind>()?,
                deposit: deposit()?,
            },
            OperationRecordType::Deposit => Operation::Deposit {
                username: required(record.user.clone(), "user", op)?,
                account: required(record.account.clone(), "account", op)?,
                amount: amount()?,
            },
            OperationRecordType::Transfer => Operation::Transfer {
                username: required(record.user.clone(), "user", op)?,
                from: required(record.account.clone(), "account", op)?,
                to: required(record.target.clone(), "target", op)?,
                amount: amount()?,
            },
            OperationRecordType::Purchase => Operation::Purchase {
                username: required(record.user.clone(), "user", op)?,
                account: required(record.account.clone(), "account", op)?,
                amount: amount()?,
                name: required(record.name.clone(), "name", op)?,
                origin: required(record.origin.clone(), "origin", op)?,
            },
            OperationRecordType::Process => {
                let hours = record.hours.unwrap_or(0);
                if hours < 0 {
                    return Err(format!("the clock can't go back {} hours", hours.unsigned_abs()));
                }
                Operation::Process { hours }
            }
        };

        Ok(operation)
    }
}
