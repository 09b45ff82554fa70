//! The bank store: every account, customer and employee, plus the operations
//! that act across them.
//!
//! There is no global store. Whoever drives the bank builds a `Bank` and passes
//! it by `&mut` into every operation, which also makes it the only place
//! mutations can come from.

pub mod projection;
pub mod user;

use crate::interest;
use crate::ledger::account::{Account, TransactionError};
use crate::ledger::kind::AccountKind;
use crate::list::IndexedList;
use crate::monetary::Monetary;
use crate::overdraft::{self, Resolution};

use chrono::{DateTime, Utc};
use projection::{AccountSummary, HistoryEntry};
use thiserror::Error;
use user::{Customer, Employee};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("unknown customer `{0}`")]
    UnknownCustomer(String),

    #[error("unknown employee `{0}`")]
    UnknownEmployee(String),

    #[error("unknown user `{0}`")]
    UnknownUser(String),

    #[error("unknown account `{0}`")]
    UnknownAccount(String),

    #[error("customer `{username}` does not own account `{account}`")]
    NotOwner { username: String, account: String },

    #[error("username `{0}` is already taken")]
    UsernameTaken(String),

    #[error("account `{0}` already exists")]
    AccountExists(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// What a run of the periodic bank processes did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessReport {
    pub accrued: usize,
    pub paid: usize,
}

#[derive(Debug, Default, Clone)]
pub struct Bank {
    accounts: IndexedList<Account>,
    customers: IndexedList<Customer>,
    employees: IndexedList<Employee>,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> &IndexedList<Account> {
        &self.accounts
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.get_by_key(id)
    }

    pub fn customer(&self, username: &str) -> Option<&Customer> {
        self.customers.get_by_key(username)
    }

    pub fn employee(&self, username: &str) -> Option<&Employee> {
        self.employees.get_by_key(username)
    }

    fn username_taken(&self, username: &str) -> bool {
        self.customers.contains_key(username) || self.employees.contains_key(username)
    }

    /// Create a customer along with their first account, a savings account
    /// seeded with `opening_deposit`.
    pub fn create_customer(
        &mut self,
        username: &str,
        credential: &str,
        account_id: &str,
        opening_deposit: Monetary,
        now: DateTime<Utc>,
    ) -> Result<(), BankError> {
        if self.username_taken(username) {
            return Err(BankError::UsernameTaken(username.to_string()));
        }
        if self.accounts.contains_key(account_id) {
            return Err(BankError::AccountExists(account_id.to_string()));
        }

        let account = Account::open(account_id, AccountKind::Savings, opening_deposit, now)?;
        let mut customer = Customer::new(username, credential);
        customer.grant(account_id);

        self.accounts.push(account);
        self.customers.push(customer);
        tracing::info!(username, account = account_id, "created customer");

        Ok(())
    }

    pub fn create_employee(&mut self, username: &str, credential: &str) -> Result<(), BankError> {
        if self.username_taken(username) {
            return Err(BankError::UsernameTaken(username.to_string()));
        }

        self.employees.push(Employee::new(username, credential));
        tracing::info!(username, "created employee");

        Ok(())
    }

    /// Open another account for an existing customer.
    pub fn open_account(
        &mut self,
        username: &str,
        account_id: &str,
        kind: AccountKind,
        deposit: Monetary,
        now: DateTime<Utc>,
    ) -> Result<(), BankError> {
        if !self.customers.contains_key(username) {
            return Err(BankError::UnknownCustomer(username.to_string()));
        }
        if self.accounts.contains_key(account_id) {
            return Err(BankError::AccountExists(account_id.to_string()));
        }

        let account = Account::open(account_id, kind, deposit, now)?;
        self.accounts.push(account);
        if let Some(customer) = self.customers.get_by_key_mut(username) {
            customer.grant(account_id);
        }
        tracing::info!(username, account = account_id, %kind, "opened account");

        Ok(())
    }

    pub fn customer_deposit(
        &mut self,
        username: &str,
        account_id: &str,
        amount: Monetary,
        now: DateTime<Utc>,
    ) -> Result<(), BankError> {
        self.check_ownership(username, &[account_id])?;
        self.account_mut(account_id)?.deposit(amount, now)?;

        Ok(())
    }

    /// Move money between two accounts the customer owns.
    /// Returns the amount credited to `to`.
    pub fn customer_transfer(
        &mut self,
        username: &str,
        from: &str,
        to: &str,
        amount: Monetary,
        now: DateTime<Utc>,
    ) -> Result<Monetary, BankError> {
        self.check_ownership(username, &[from, to])?;
        self.transfer(from, to, amount, now)
    }

    /// Deposit into any account, regardless of ownership.
    pub fn employee_deposit(
        &mut self,
        username: &str,
        account_id: &str,
        amount: Monetary,
        now: DateTime<Utc>,
    ) -> Result<(), BankError> {
        self.check_employee(username)?;
        self.account_mut(account_id)?.deposit(amount, now)?;

        Ok(())
    }

    /// Move money between any two accounts, regardless of ownership.
    pub fn employee_transfer(
        &mut self,
        username: &str,
        from: &str,
        to: &str,
        amount: Monetary,
        now: DateTime<Utc>,
    ) -> Result<Monetary, BankError> {
        self.check_employee(username)?;
        self.transfer(from, to, amount, now)
    }

    /// Record a purchase on one of the customer's accounts, then cover any
    /// overdraft it caused from the customer's other accounts.
    pub fn purchase(
        &mut self,
        username: &str,
        account_id: &str,
        amount: Monetary,
        name: &str,
        origin: &str,
        now: DateTime<Utc>,
    ) -> Result<Resolution, BankError> {
        self.check_ownership(username, &[account_id])?;
        self.account_mut(account_id)?
            .purchase(amount, name, origin, now)?;

        overdraft::resolve(self, username, now)
    }

    /// Run the periodic processes (interest accrual and payouts) over every
    /// account in the store.
    pub fn run_bank_processes(&mut self, now: DateTime<Utc>) -> ProcessReport {
        let mut report = ProcessReport::default();
        self.accounts.for_each_mut(|account| {
            let tick = interest::tick(account, now);
            report.accrued += usize::from(tick.accrued.is_some());
            report.paid += usize::from(tick.paid.is_some());
        });
        tracing::debug!(accrued = report.accrued, paid = report.paid, "ran bank processes");

        report
    }

    pub fn account_summary(&self, account_id: &str) -> Option<AccountSummary> {
        self.account(account_id).map(AccountSummary::from)
    }

    pub fn transaction_history(&self, account_id: &str) -> Option<Vec<HistoryEntry>> {
        self.account(account_id).map(projection::history)
    }

    /// The accounts a user may look at: their own for a customer, all of them
    /// for an employee.
    pub fn visible_accounts(&self, username: &str) -> Result<Vec<AccountSummary>, BankError> {
        if let Some(customer) = self.customer(username) {
            return Ok(customer
                .owned_account_ids()
                .iter()
                .filter_map(|id| self.account_summary(id))
                .collect());
        }
        if self.employees.contains_key(username) {
            return Ok(self.accounts.iter().map(AccountSummary::from).collect());
        }

        Err(BankError::UnknownUser(username.to_string()))
    }

    fn check_ownership(&self, username: &str, account_ids: &[&str]) -> Result<(), BankError> {
        let customer = self
            .customer(username)
            .ok_or_else(|| BankError::UnknownCustomer(username.to_string()))?;

        for account_id in account_ids {
            if !customer.owns(account_id) {
                return Err(BankError::NotOwner {
                    username: username.to_string(),
                    account: account_id.to_string(),
                });
            }
        }

        Ok(())
    }

    fn check_employee(&self, username: &str) -> Result<(), BankError> {
        if !self.employees.contains_key(username) {
            return Err(BankError::UnknownEmployee(username.to_string()));
        }
        Ok(())
    }

    fn account_mut(&mut self, account_id: &str) -> Result<&mut Account, BankError> {
        self.accounts
            .get_by_key_mut(account_id)
            .ok_or_else(|| BankError::UnknownAccount(account_id.to_string()))
    }

    // Both legs are applied one after the other. The debit is recorded first,
    // and the credit is rejected if the debit moved nothing.
    fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Monetary,
        now: DateTime<Utc>,
    ) -> Result<Monetary, BankError> {
        for account_id in [from, to] {
            if !self.accounts.contains_key(account_id) {
                return Err(BankError::UnknownAccount(account_id.to_string()));
            }
        }

        let moved = self.account_mut(from)?.send_transfer(amount, now);
        self.account_mut(to)?.receive_transfer(moved, from, now)?;
        tracing::info!(from, to, %moved, "transferred");

        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::{Bank, BankError, ProcessReport};
    use crate::ledger::account::tests::epoch;
    use crate::ledger::account::TransactionError;
    use crate::ledger::kind::AccountKind;
    use crate::monetary::Monetary;

    use chrono::Duration;

    // alice owns s0001 ($100.00) and c0001 ($50.00), bob owns s0002 ($10.00),
    // and carol works at the bank.
    fn bank() -> Bank {
        let mut bank = Bank::new();
        bank.create_customer("alice", "pw", "s0001", Monetary::from_dollars(100), epoch())
            .unwrap();
        bank.open_account("alice", "c0001", AccountKind::Checking, Monetary::from_dollars(50), epoch())
            .unwrap();
        bank.create_customer("bob", "pw", "s0002", Monetary::from_dollars(10), epoch())
            .unwrap();
        bank.create_employee("carol", "pw").unwrap();
        bank
    }

    fn balance(bank: &Bank, id: &str) -> Monetary {
        bank.account(id).unwrap().balance()
    }

    #[test]
    fn test_create_customer() {
        let bank = bank();
        let alice = bank.customer("alice").unwrap();

        assert_eq!("alice", alice.username());
        assert_eq!("pw", alice.credential());
        assert_eq!(
            vec!["s0001", "c0001"],
            alice.owned_account_ids().iter().map(String::as_str).collect::<Vec<_>>()
        );
        assert_eq!(AccountKind::Savings, bank.account("s0001").unwrap().kind());
        assert_eq!(Monetary::from_dollars(100), balance(&bank, "s0001"));
        assert_eq!(3, bank.accounts().count());
    }

    #[test]
    fn test_create_customer_conflicts() {
        let mut bank = bank();
        for (username, account, want) in vec![
            ("alice", "s0009", BankError::UsernameTaken("alice".to_string())),
            ("carol", "s0009", BankError::UsernameTaken("carol".to_string())),
            ("dave", "s0002", BankError::AccountExists("s0002".to_string())),
        ] {
            let got = bank.create_customer(username, "pw", account, Monetary::from_dollars(1), epoch());
            assert_eq!(Err(want), got);
        }
        assert_eq!(3, bank.accounts().count());
    }

    #[test]
    fn test_create_customer_with_zero_deposit() {
        let mut bank = Bank::new();
        let got = bank.create_customer("dave", "pw", "s0009", Monetary::ZERO, epoch());

        assert_eq!(Err(BankError::Transaction(TransactionError::ZeroAmount)), got);
        assert!(bank.customer("dave").is_none());
        assert!(bank.account("s0009").is_none());
    }

    #[test]
    fn test_create_employee_conflicts() {
        let mut bank = bank();
        assert_eq!(
            Err(BankError::UsernameTaken("bob".to_string())),
            bank.create_employee("bob", "pw")
        );
        assert_eq!(
            Err(BankError::UsernameTaken("carol".to_string())),
            bank.create_employee("carol", "pw")
        );
    }

    #[test]
    fn test_open_account_for_unknown_customer() {
        let mut bank = bank();
        assert_eq!(
            Err(BankError::UnknownCustomer("carol".to_string())),
            bank.open_account("carol", "x", AccountKind::Savings, Monetary::ONE_CENT, epoch())
        );
    }

    #[test]
    fn test_customer_deposit() {
        let mut bank = bank();
        bank.customer_deposit("alice", "c0001", Monetary::from_cents(1001), epoch())
            .expect("alice owns c0001");
        assert_eq!(Monetary::from_cents(6001), balance(&bank, "c0001"));

        assert_eq!(
            Err(BankError::NotOwner {
                username: "alice".to_string(),
                account: "s0002".to_string()
            }),
            bank.customer_deposit("alice", "s0002", Monetary::from_dollars(1), epoch())
        );
        assert_eq!(Monetary::from_dollars(10), balance(&bank, "s0002"));

        assert_eq!(
            Err(BankError::UnknownCustomer("carol".to_string())),
            bank.customer_deposit("carol", "s0002", Monetary::from_dollars(1), epoch())
        );
    }

    #[test]
    fn test_customer_transfer() {
        let mut bank = bank();
        let moved = bank
            .customer_transfer("alice", "s0001", "c0001", Monetary::from_cents(1001), epoch())
            .expect("alice owns both accounts");

        assert_eq!(Monetary::from_cents(1001), moved);
        assert_eq!(Monetary::from_cents(8999), balance(&bank, "s0001"));
        assert_eq!(Monetary::from_cents(6001), balance(&bank, "c0001"));
    }

    #[test]
    fn test_customer_transfer_needs_both_accounts() {
        let mut bank = bank();
        for (from, to) in vec![("s0001", "s0002"), ("s0002", "s0001")] {
            let got = bank.customer_transfer("alice", from, to, Monetary::from_dollars(1), epoch());
            assert!(matches!(got, Err(BankError::NotOwner { .. })));
        }
        assert_eq!(Monetary::from_dollars(100), balance(&bank, "s0001"));
        assert_eq!(Monetary::from_dollars(10), balance(&bank, "s0002"));
    }

    #[test]
    fn test_zero_transfer_credits_nothing() {
        let mut bank = bank();
        let got = bank.customer_transfer("alice", "s0001", "c0001", Monetary::ZERO, epoch());

        assert_eq!(
            Err(BankError::Transaction(TransactionError::NonPositiveAmount(Monetary::ZERO))),
            got
        );
        assert_eq!(1, bank.account("s0001").unwrap().transactions().count());
        assert_eq!(1, bank.account("c0001").unwrap().transactions().count());
    }

    #[test]
    fn test_employee_operations_ignore_ownership() {
        let mut bank = bank();
        bank.employee_deposit("carol", "s0002", Monetary::from_dollars(5), epoch())
            .expect("employees can deposit anywhere");
        bank.employee_transfer("carol", "s0001", "s0002", Monetary::from_dollars(20), epoch())
            .expect("employees can transfer between any accounts");

        assert_eq!(Monetary::from_dollars(80), balance(&bank, "s0001"));
        assert_eq!(Monetary::from_dollars(35), balance(&bank, "s0002"));

        assert_eq!(
            Err(BankError::UnknownAccount("nope".to_string())),
            bank.employee_deposit("carol", "nope", Monetary::from_dollars(5), epoch())
        );
        assert_eq!(
            Err(BankError::UnknownEmployee("alice".to_string())),
            bank.employee_deposit("alice", "s0001", Monetary::from_dollars(5), epoch())
        );
        assert_eq!(
            Err(BankError::UnknownAccount("nope".to_string())),
            bank.employee_transfer("carol", "s0001", "nope", Monetary::from_dollars(5), epoch())
        );
        assert_eq!(Monetary::from_dollars(80), balance(&bank, "s0001"));
    }

    #[test]
    fn test_purchase_without_overdraft() {
        let mut bank = bank();
        let resolution = bank
            .purchase("alice", "c0001", Monetary::from_dollars(20), "Books", "Bookshop", epoch())
            .expect("alice owns c0001");

        assert_eq!(0, resolution.transfers);
        assert_eq!(Monetary::from_dollars(30), balance(&bank, "c0001"));
        assert_eq!(Monetary::from_dollars(100), balance(&bank, "s0001"));
    }

    #[test]
    fn test_purchase_triggers_overdraft_cover() {
        let mut bank = bank();
        let resolution = bank
            .purchase("alice", "c0001", Monetary::from_dollars(53), "Shoes", "Shoe shop", epoch())
            .expect("alice owns c0001");

        // A $3.00 deficit is covered with a single $10.00 transfer.
        assert_eq!(1, resolution.transfers);
        assert_eq!(Monetary::from_dollars(10), resolution.moved);
        assert_eq!(Monetary::from_dollars(7), balance(&bank, "c0001"));
        assert_eq!(Monetary::from_dollars(90), balance(&bank, "s0001"));
    }

    #[test]
    fn test_purchase_on_someone_elses_account() {
        let mut bank = bank();
        let got = bank.purchase("bob", "c0001", Monetary::from_dollars(1), "Gum", "Kiosk", epoch());

        assert!(matches!(got, Err(BankError::NotOwner { .. })));
        assert_eq!(Monetary::from_dollars(50), balance(&bank, "c0001"));
    }

    #[test]
    fn test_run_bank_processes() {
        let mut bank = bank();
        bank.open_account("bob", "cd0001", AccountKind::CertificateOfDeposit, Monetary::from_dollars(10_000), epoch())
            .unwrap();

        let report = bank.run_bank_processes(epoch() + Duration::hours(721));

        // Every account accrues. Only alice's savings earn a whole cent, and the
        // certificate of deposit would not pay out anyway.
        assert_eq!(ProcessReport { accrued: 4, paid: 1 }, report);
        assert_eq!(1, bank.account("cd0001").unwrap().transactions().count());
        assert_eq!(1, bank.account("c0001").unwrap().transactions().count());
        assert_eq!(2, bank.account("s0001").unwrap().transactions().count());
        assert_eq!(Monetary::from_cents(10_004), balance(&bank, "s0001"));
    }

    #[test]
    fn test_transactions_are_stamped_with_the_given_time() {
        let mut bank = bank();
        let later = epoch() + Duration::hours(5);
        bank.customer_transfer("alice", "s0001", "c0001", Monetary::from_dollars(1), later)
            .unwrap();
        bank.purchase("alice", "c0001", Monetary::from_dollars(1), "Gum", "Kiosk", later)
            .unwrap();
        bank.employee_deposit("carol", "s0002", Monetary::from_dollars(1), later)
            .unwrap();

        for id in ["s0001", "c0001", "s0002"] {
            let transactions = bank.account(id).unwrap().transactions();
            assert_eq!(epoch(), transactions.get(0).unwrap().timestamp());
            for tx in transactions.iter().skip(1) {
                assert_eq!(later, tx.timestamp(), "{}", id);
            }
        }
    }

    #[test]
    fn test_projections() {
        let mut bank = bank();
        bank.customer_transfer("alice", "s0001", "c0001", Monetary::from_dollars(1), epoch())
            .unwrap();

        let summary = bank.account_summary("c0001").unwrap();
        assert_eq!("Checking", summary.kind);
        assert_eq!(Monetary::from_dollars(51), summary.balance);
        assert_eq!(None, bank.account_summary("nope"));

        let history = bank.transaction_history("c0001").unwrap();
        assert_eq!(2, history.len());
        assert_eq!("s0001", history[0].origin);
        assert_eq!("$1.00", history[0].amount);
        assert_eq!(None, bank.transaction_history("nope"));
    }

    #[test]
    fn test_visible_accounts() {
        let bank = bank();

        let ids = |username: &str| -> Vec<String> {
            bank.visible_accounts(username)
                .unwrap()
                .into_iter()
                .map(|summary| summary.id)
                .collect()
        };
        assert_eq!(vec!["s0001", "c0001"], ids("alice"));
        assert_eq!(vec!["s0002"], ids("bob"));
        assert_eq!(vec!["s0001", "c0001", "s0002"], ids("carol"));

        assert_eq!(
            Err(BankError::UnknownUser("mallory".to_string())),
            bank.visible_accounts("mallory")
        );
    }
}
