use crate::ledger::{AccountId, Username};
use crate::list::{IndexedList, Keyed};

/// A customer can only touch the accounts listed in `owned_account_ids`.
#[derive(Debug, Clone)]
pub struct Customer {
    username: Username,
    credential: String,
    // The first id is the account opened along with the customer.
    owned_account_ids: IndexedList<AccountId>,
}

impl Customer {
    pub(super) fn new(username: impl Into<Username>, credential: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            credential: credential.into(),
            owned_account_ids: IndexedList::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn owned_account_ids(&self) -> &IndexedList<AccountId> {
        &self.owned_account_ids
    }

    pub fn owns(&self, account_id: &str) -> bool {
        self.owned_account_ids.contains_key(account_id)
    }

    pub(super) fn grant(&mut self, account_id: impl Into<AccountId>) {
        self.owned_account_ids.push(account_id.into());
    }
}

impl Keyed for Customer {
    fn key(&self) -> &str {
        &self.username
    }
}

/// Employees can act on any account in the store.
#[derive(Debug, Clone)]
pub struct Employee {
    username: Username,
    credential: String,
}

impl Employee {
    pub(super) fn new(username: impl Into<Username>, credential: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            credential: credential.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }
}

impl Keyed for Employee {
    fn key(&self) -> &str {
        &self.username
    }
}
