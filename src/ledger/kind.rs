//! Account kinds and the per-kind behaviour table.
//!
//! Savings, checking, certificates of deposit and money market accounts all
//! share the same ledger. What sets them apart is a handful of flags and their
//! interest preset, which live in one `Profile` per kind.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HOURS_PER_DAY: i64 = 24;
const HOURS_PER_MONTH: i64 = 720;
const HOURS_PER_HALF_YEAR: i64 = 4320;
const HOURS_PER_YEAR: i64 = 8760;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Savings,
    Checking,
    #[serde(rename = "cd")]
    CertificateOfDeposit,
    #[serde(rename = "moneymarket")]
    MoneyMarket,
}

/// How often interest is calculated and accrued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compounding {
    Yearly,
    Monthly,
    Daily,
}

/// How often accrued interest is paid into the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payout {
    Yearly,
    SemiAnnual,
    Monthly,
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestConfig {
    /// Annual percentage yield, in percent (0.5 means 0.5%).
    pub apy: Decimal,
    pub compounding: Compounding,
    pub payout: Payout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub label: &'static str,
    /// Funds are locked for a term.
    pub term_locked: bool,
    /// Accrued interest is paid out automatically.
    pub payout_eligible: bool,
    pub interest: InterestConfig,
}

impl AccountKind {
    pub fn profile(self) -> Profile {
        match self {
            AccountKind::Savings => Profile {
                label: "Savings",
                term_locked: false,
                payout_eligible: true,
                interest: InterestConfig {
                    apy: dec!(0.5),
                    compounding: Compounding::Monthly,
                    payout: Payout::Monthly,
                },
            },
            AccountKind::Checking => Profile {
                label: "Checking",
                term_locked: false,
                payout_eligible: true,
                interest: InterestConfig {
                    apy: dec!(0.01),
                    compounding: Compounding::Monthly,
                    payout: Payout::Monthly,
                },
            },
            AccountKind::CertificateOfDeposit => Profile {
                label: "Certificate of Deposit",
                term_locked: true,
                payout_eligible: false,
                interest: InterestConfig {
                    apy: dec!(4.0),
                    compounding: Compounding::Daily,
                    payout: Payout::Yearly,
                },
            },
            AccountKind::MoneyMarket => Profile {
                label: "Money Market",
                term_locked: false,
                payout_eligible: true,
                interest: InterestConfig {
                    apy: dec!(1.5),
                    compounding: Compounding::Daily,
                    payout: Payout::SemiAnnual,
                },
            },
        }
    }

    /// Numeric account type codes, as used when opening an account.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AccountKind::Savings),
            1 => Some(AccountKind::Checking),
            2 => Some(AccountKind::CertificateOfDeposit),
            3 => Some(AccountKind::MoneyMarket),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the numeric codes as well as the lowercase names used in CSV input.
impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code).ok_or_else(|| format!("unknown account type code {}", code));
        }

        match s.to_ascii_lowercase().as_str() {
            "savings" => Ok(AccountKind::Savings),
            "checking" => Ok(AccountKind::Checking),
            "cd" => Ok(AccountKind::CertificateOfDeposit),
            "moneymarket" => Ok(AccountKind::MoneyMarket),
            _ => Err(format!("unknown account type `{}`", s)),
        }
    }
}

impl Compounding {
    pub const fn threshold_hours(self) -> i64 {
        match self {
            Compounding::Yearly => HOURS_PER_YEAR,
            Compounding::Monthly => HOURS_PER_MONTH,
            Compounding::Daily => HOURS_PER_DAY,
        }
    }

    pub const fn periods_per_year(self) -> u32 {
        match self {
            Compounding::Yearly => 1,
            Compounding::Monthly => 12,
            Compounding::Daily => 365,
        }
    }
}

impl Payout {
    pub const fn threshold_hours(self) -> i64 {
        match self {
            Payout::Yearly => HOURS_PER_YEAR,
            Payout::SemiAnnual => HOURS_PER_HALF_YEAR,
            Payout::Monthly => HOURS_PER_MONTH,
            Payout::Daily => HOURS_PER_DAY,
        }
    }
}

impl InterestConfig {
    /// The rate applied on each compounding period, in percent.
    pub fn adjusted_rate(&self) -> Decimal {
        self.apy / Decimal::from(self.compounding.periods_per_year())
    }
}
