//! A bank ledger: customers and employees, accounts whose balances are folded
//! from their transactions, time-driven interest, and overdrafts covered from
//! the customer's other accounts.

pub mod bank;
pub mod config;
pub mod error;
pub mod input;
pub mod interest;
pub mod ledger;
pub mod list;
pub mod monetary;
pub mod output;
pub mod overdraft;
pub mod run;
pub mod telemetry;

pub use error::{Error, Result};
