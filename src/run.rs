use crate::bank::projection::{self, AccountSummary};
use crate::bank::{Bank, BankError};
use crate::config::Config;
use crate::error::Result;
use crate::input::{self, Operation};
use crate::monetary::Monetary;
use crate::output;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// How many rows of a batch were applied, rejected by the bank, or unreadable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub applied: usize,
    pub rejected: usize,
    pub malformed: usize,
}

/// Run a batch with the default configuration.
pub fn run(
    input_stream: (impl std::io::Read + Send + 'static),
    output_stream: impl std::io::Write,
) -> Result<Report> {
    run_with(&Config::default(), input_stream, output_stream)
}

/// Apply every operation of the input to a fresh bank, then write a summary
/// of every account to the output.
pub fn run_with(
    config: &Config,
    input_stream: (impl std::io::Read + Send + 'static),
    output_stream: impl std::io::Write,
) -> Result<Report> {
    let (bank, report) = execute(config, input_stream)?;
    output::write_summaries(output_stream, bank.accounts().iter().map(AccountSummary::from))?;

    Ok(report)
}

/// Like `run_with`, and also write every account's transaction history, most
/// recent first, to `history_stream`.
pub fn run_with_history(
    config: &Config,
    input_stream: (impl std::io::Read + Send + 'static),
    output_stream: impl std::io::Write,
    history_stream: impl std::io::Write,
) -> Result<Report> {
    let (bank, report) = execute(config, input_stream)?;
    output::write_summaries(output_stream, bank.accounts().iter().map(AccountSummary::from))?;
    output::write_history(
        history_stream,
        bank.accounts()
            .iter()
            .map(|account| (account.id(), projection::history(account))),
    )?;

    Ok(report)
}

// Rows are parsed on their own thread while this one applies them, so it is
// the only place the bank is ever mutated from.
fn execute(
    config: &Config,
    input_stream: (impl std::io::Read + Send + 'static),
) -> Result<(Bank, Report)> {
    let mut driver = Driver {
        bank: Bank::new(),
        clock: config.clock.epoch.unwrap_or_else(Utc::now),
        opening_deposit: Monetary::try_from(config.opening_deposit)?,
    };
    let mut report = Report::default();

    let (operations, errors) = input::parse(input_stream);

    for operation in operations {
        match driver.apply(operation) {
            Ok(()) => report.applied += 1,
            Err(err) => {
                report.rejected += 1;
                tracing::warn!(%err, "operation rejected");
            }
        }
    }

    // The reader thread is done once the operations channel closes, so every
    // error it found is already queued.
    for err in errors {
        report.malformed += 1;
        tracing::warn!(%err, "skipped record");
    }

    tracing::info!(
        applied = report.applied,
        rejected = report.rejected,
        malformed = report.malformed,
        accounts = driver.bank.accounts().count(),
        "batch complete"
    );

    Ok((driver.bank, report))
}

struct Driver {
    bank: Bank,
    // Simulated: only `process` rows move it forward.
    clock: DateTime<Utc>,
    opening_deposit: Monetary,
}

/// Why the driver refused an operation.
#[derive(Debug, Error)]
enum Rejection {
    #[error(transparent)]
    Bank(#[from] BankError),

    #[error("advancing the clock by {0} hours is out of range")]
    ClockOutOfRange(i64),
}

impl Driver {
    fn apply(&mut self, operation: Operation) -> std::result::Result<(), Rejection> {
        let now = self.clock;
        let bank = &mut self.bank;

        match operation {
            Operation::CreateCustomer {
                username,
                credential,
                account,
                deposit,
            } => bank.create_customer(
                &username,
                &credential,
                &account,
                deposit.unwrap_or(self.opening_deposit),
                now,
            )?,
            Operation::CreateEmployee {
                username,
                credential,
            } => bank.create_employee(&username, &credential)?,
            Operation::OpenAccount {
                username,
                account,
                kind,
                deposit,
            } => bank.open_account(
                &username,
                &account,
                kind,
                deposit.unwrap_or(self.opening_deposit),
                now,
            )?,
            // Employees take the privileged path, everyone else is held to
            // what they own.
            Operation::Deposit {
                username,
                account,
                amount,
            } => {
                if bank.employee(&username).is_some() {
                    bank.employee_deposit(&username, &account, amount, now)?;
                } else {
                    bank.customer_deposit(&username, &account, amount, now)?;
                }
            }
            Operation::Transfer {
                username,
                from,
                to,
                amount,
            } => {
                if bank.employee(&username).is_some() {
                    bank.employee_transfer(&username, &from, &to, amount, now)?;
                } else {
                    bank.customer_transfer(&username, &from, &to, amount, now)?;
                }
            }
            Operation::Purchase {
                username,
                account,
                amount,
                name,
                origin,
            } => {
                bank.purchase(&username, &account, amount, &name, &origin, now)?;
            }
            Operation::Process { hours } => {
                let later = Duration::try_hours(hours)
                    .and_then(|elapsed| now.checked_add_signed(elapsed))
                    .ok_or(Rejection::ClockOutOfRange(hours))?;
                self.clock = later;
                bank.run_bank_processes(later);
            }
        }

        Ok(())
    }
}
