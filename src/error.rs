use crate::bank::BankError;
use crate::monetary::MonetaryError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that end a whole run, as opposed to the per-operation errors the
/// batch driver logs and skips.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Monetary(#[from] MonetaryError),

    #[error(transparent)]
    Bank(#[from] BankError),
}
