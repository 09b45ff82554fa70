use bank_ledger::config::Config;
use bank_ledger::run::{run_with, run_with_history};
use bank_ledger::telemetry;

use std::fs::File;

fn main() -> bank_ledger::Result<()> {
    let config = Config::load()?;
    telemetry::init(&config.log);

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "operations.csv".to_string());
    let input = File::open(&path)?;

    // A second argument names the file that receives every account's history.
    let report = match args.next() {
        Some(history_path) => run_with_history(
            &config,
            input,
            std::io::stdout(),
            File::create(history_path)?,
        )?,
        None => run_with(&config, input, std::io::stdout())?,
    };
    if report.rejected > 0 || report.malformed > 0 {
        tracing::warn!(
            path = %path,
            rejected = report.rejected,
            malformed = report.malformed,
            "some operations were not applied"
        );
    }

    Ok(())
}
