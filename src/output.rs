use crate::bank::projection::{AccountSummary, HistoryEntry};

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
struct SummaryRecord<'a> {
    account: &'a str,

    #[serde(rename = "type")]
    kind: &'static str,

    available: Decimal,
    balance: Decimal,
}

impl<'a> From<&'a AccountSummary> for SummaryRecord<'a> {
    fn from(summary: &'a AccountSummary) -> Self {
        Self {
            account: &summary.id,
            kind: summary.kind,
            available: summary.available.to_decimal(),
            balance: summary.balance.to_decimal(),
        }
    }
}

#[derive(Serialize)]
struct HistoryRecord<'a> {
    account: &'a str,

    #[serde(rename = "type")]
    kind: &'static str,

    name: &'a str,
    origin: &'a str,
    amount: &'a str,
}

// Writes one row per account to the given stream.
pub fn write_summaries(
    output_stream: impl std::io::Write,
    summaries: impl IntoIterator<Item = AccountSummary>,
) -> Result<(), std::io::Error> {
    let mut writer = csv::Writer::from_writer(output_stream);

    for summary in summaries {
        writer.serialize(SummaryRecord::from(&summary))?;
    }
    writer.flush()?;

    Ok(())
}

// Writes the histories of several accounts to the given stream, one row per
// transaction, in the order given.
pub fn write_history<'a>(
    output_stream: impl std::io::Write,
    histories: impl IntoIterator<Item = (&'a str, Vec<HistoryEntry>)>,
) -> Result<(), std::io::Error> {
    let mut writer = csv::Writer::from_writer(output_stream);

    for (account, entries) in histories {
        for entry in &entries {
            writer.serialize(HistoryRecord {
                account,
                kind: entry.kind,
                name: &entry.name,
                origin: &entry.origin,
                amount: &entry.amount,
            })?;
        }
    }
    writer.flush()?;

    Ok(())
}
