//! Interest accrual and payout, driven by elapsed time.
//!
//! Nothing here runs on its own: a scheduler (the batch driver, or a test)
//! calls `tick` with the current time, and the account's own timestamps decide
//! whether a compounding period or a payout period has gone by.
//! Ticks must not overlap; two concurrent ticks could accrue or pay twice.

use crate::ledger::account::Account;
use crate::ledger::transaction::Transaction;
use crate::monetary::Monetary;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// What a tick did to an account.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub accrued: Option<Monetary>,
    pub paid: Option<Monetary>,
}

pub fn tick(account: &mut Account, now: DateTime<Utc>) -> Tick {
    let config = account.interest();
    let rate = config.adjusted_rate();
    let compounding_hours = config.compounding.threshold_hours();
    let payout_hours = config.payout.threshold_hours();
    let mut outcome = Tick::default();

    let since_interest = (now - account.last_interest_time).num_hours();
    if since_interest > compounding_hours {
        let interest = account.balance().percentage(rate);
        account.interest_accrued = account.interest_accrued.saturating_add(interest);
        account.last_interest_time = now;
        outcome.accrued = Some(interest);
    }

    // Term deposits keep their interest until the term ends.
    if !account.kind().profile().payout_eligible {
        return outcome;
    }

    let since_payout = (now - account.last_payout_time).num_hours();
    if since_payout > payout_hours {
        let periods = Decimal::from(payout_hours) / Decimal::from(compounding_hours);
        let pay = account.balance().percentage(rate * periods);
        if pay < Monetary::ONE_CENT {
            return outcome;
        }

        let payout = Transaction::bank_function(pay, "Interest").at(now);
        if account.process_transaction(payout).is_ok() {
            tracing::info!(account = %account.id(), %pay, "paid out interest");
            account.interest_accrued = Monetary::ZERO;
            account.last_payout_time = now;
            outcome.paid = Some(pay);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::{tick, Tick};
    use crate::ledger::account::tests::{epoch, open};
    use crate::ledger::kind::AccountKind;
    use crate::ledger::transaction::Kind;
    use crate::monetary::Monetary;

    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_nothing_happens_before_a_period_elapses() {
        let mut acc = open("s0001", AccountKind::Savings, 100_000);

        // Exactly one period is not enough, it has to be exceeded.
        let got = tick(&mut acc, epoch() + Duration::hours(720));
        assert_eq!(Tick::default(), got);
        assert_eq!(Monetary::ZERO, acc.interest_accrued());
        assert_eq!(epoch(), acc.last_interest_time());
        assert_eq!(1, acc.transactions().count());
    }

    #[test]
    fn test_monthly_accrual() {
        let mut acc = open("s0001", AccountKind::Savings, 100_000);
        let now = epoch() + Duration::hours(721);

        let got = tick(&mut acc, now);

        let want = Monetary::from_cents(100_000).percentage(dec!(0.5) / dec!(12));
        assert_eq!(Monetary::from_cents(41), want);
        assert_eq!(Some(want), got.accrued);
        assert_eq!(now, acc.last_interest_time());
    }

    #[test]
    fn test_monthly_payout() {
        let mut acc = open("s0001", AccountKind::Savings, 100_000);
        let now = epoch() + Duration::hours(721);

        let got = tick(&mut acc, now);

        // Savings pay out as often as they compound, so the payout covers one period.
        assert_eq!(Some(Monetary::from_cents(41)), got.paid);
        assert_eq!(2, acc.transactions().count());
        let payout = acc.transactions().get(1).unwrap();
        assert_eq!(Kind::BankFunction, payout.kind());
        assert_eq!("Interest", payout.name());
        assert_eq!(Monetary::from_cents(100_041), acc.balance());
        assert_eq!(Monetary::ZERO, acc.interest_accrued());
        assert_eq!(now, acc.last_payout_time());
    }

    #[test]
    fn test_payout_below_one_cent_is_suppressed() {
        // 0.5% a year on $1.00, monthly: a twenty-fourth of a cent.
        let mut acc = open("s0001", AccountKind::Savings, 100);
        let now = epoch() + Duration::hours(800);

        let got = tick(&mut acc, now);

        assert_eq!(Some(Monetary::ZERO), got.accrued);
        assert_eq!(None, got.paid);
        assert_eq!(1, acc.transactions().count());
        assert_eq!(epoch(), acc.last_payout_time());
    }

    #[test]
    fn test_term_deposits_accrue_but_never_pay_out() {
        let mut acc = open("cd0001", AccountKind::CertificateOfDeposit, 1_000_000);
        let now = epoch() + Duration::hours(9_000);

        let got = tick(&mut acc, now);

        // 4% a year compounded daily: 10_000 * 4 / 365 / 100 cents.
        assert_eq!(Some(Monetary::from_cents(109)), got.accrued);
        assert_eq!(None, got.paid);
        assert_eq!(1, acc.transactions().count());
        assert_eq!(Monetary::from_cents(109), acc.interest_accrued());
    }

    #[test]
    fn test_accrual_resets_the_clock() {
        let mut acc = open("mm0001", AccountKind::MoneyMarket, 1_000_000);

        let first = tick(&mut acc, epoch() + Duration::hours(25));
        let second = tick(&mut acc, epoch() + Duration::hours(30));
        let third = tick(&mut acc, epoch() + Duration::hours(50));

        assert!(first.accrued.is_some());
        assert_eq!(None, second.accrued);
        assert!(third.accrued.is_some());
        assert_eq!(
            first.accrued.unwrap() + third.accrued.unwrap(),
            acc.interest_accrued()
        );
        // Money market accounts pay out twice a year, so nothing is paid yet.
        assert_eq!(None, third.paid);
    }

    #[test]
    fn test_semiannual_payout_covers_every_compounding_period() {
        let mut acc = open("mm0001", AccountKind::MoneyMarket, 1_000_000);
        let now = epoch() + Duration::hours(4_321);

        let got = tick(&mut acc, now);

        // 1.5% / 365 per day, over 4320 / 24 = 180 days, on $10,000.00.
        let want = Monetary::from_cents(1_000_000).percentage(dec!(1.5) / dec!(365) * dec!(180));
        assert_eq!(Some(want), got.paid);
        assert_eq!(Monetary::from_cents(1_000_000) + want, acc.balance());
    }
}
