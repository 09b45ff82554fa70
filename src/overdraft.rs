//! Covering overdrawn accounts from the same customer's other accounts.
//!
//! After a purchase, every account the customer owns that ended up below zero
//! is topped up from its siblings, one tiered transfer at a time, until it is
//! back at zero or above or the sibling has nothing left to give.
//! This is best-effort: an account can stay overdrawn when the siblings run dry.

use crate::bank::{Bank, BankError};
use crate::ledger::AccountId;
use crate::monetary::Monetary;

use chrono::{DateTime, Utc};

/// What a resolution did, summed over every overdrawn account.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub transfers: usize,
    pub moved: Monetary,
}

/// How much to pull from a sibling for a given deficit.
///
/// Small deficits are rounded up generously, large ones are chipped away at $5
/// per transfer.
pub fn tier(deficit: Monetary) -> Monetary {
    let deficit = deficit.abs();
    if deficit < Monetary::from_dollars(5) {
        Monetary::from_dollars(10)
    } else if deficit < Monetary::from_dollars(10) {
        Monetary::from_dollars(20)
    } else if deficit < Monetary::from_dollars(20) {
        Monetary::from_dollars(50)
    } else {
        Monetary::from_dollars(5)
    }
}

pub fn resolve(
    bank: &mut Bank,
    username: &str,
    now: DateTime<Utc>,
) -> Result<Resolution, BankError> {
    let owned: Vec<AccountId> = bank
        .customer(username)
        .ok_or_else(|| BankError::UnknownCustomer(username.to_string()))?
        .owned_account_ids()
        .iter()
        .cloned()
        .collect();

    let mut resolution = Resolution::default();

    for overdrawn in &owned {
        for sibling in &owned {
            if sibling == overdrawn {
                continue;
            }

            loop {
                let (balance, available) = match (bank.account(overdrawn), bank.account(sibling)) {
                    (Some(a), Some(b)) => (a.balance(), b.available()),
                    _ => break,
                };
                if !balance.is_negative() || !available.is_positive() {
                    break;
                }

                let amount = tier(balance);
                match bank.customer_transfer(username, sibling, overdrawn, amount, now) {
                    Ok(moved) => {
                        resolution.transfers += 1;
                        resolution.moved = resolution.moved.saturating_add(moved);
                        tracing::info!(
                            username,
                            from = %sibling,
                            to = %overdrawn,
                            %moved,
                            "covered overdraft"
                        );
                    }
                    Err(err) => {
                        tracing::warn!(username, from = %sibling, to = %overdrawn, %err, "overdraft transfer failed");
                        break;
                    }
                }
            }
        }
    }

    Ok(resolution)
}
