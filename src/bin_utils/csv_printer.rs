use std::io::Write;

use crate::currency::Amount;
use csv::WriterBuilder;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SubBalance {
    pub currency: String,
    pub amount: Amount,
    pub main: bool,
}

const HEADER: [&str; 3] = ["currency", "amount", "main"];

/// Writes the header even when there is nothing to list.
pub fn print_balances<W>(
    output: &mut W,
    balances: impl Iterator<Item = SubBalance>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    if let Err(err) = writer.write_record(HEADER) {
        anyhow::bail!("Failed to write to CSV: {err}")
    }
    for balance in balances {
        if let Err(err) = writer.serialize(balance) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
